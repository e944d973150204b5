/// Symbolic jump target. The assembler turns labels into instruction indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub usize);

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Abstract stack machine instruction as emitted by the code generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    PushConst(i64),
    LoadLocal(String),
    StoreLocal(String),
    UnaryNegate,
    UnaryIdentity,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    CompareGt,
    CompareLt,
    CompareEq,
    JumpIfFalse(Label),
    Jump(Label),
    Label(Label),
    LoopBegin(Label),
    LoopEnd,
    Print,
    ReadInput,
    ReturnValue,
    ReturnVoid,
}

impl Instruction {
    /// Net change to the operand stack depth when this instruction executes.
    pub fn stack_effect(&self) -> isize {
        match self {
            Self::PushConst(_) | Self::LoadLocal(_) | Self::ReadInput => 1,
            Self::StoreLocal(_)
            | Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Div
            | Self::Mod
            | Self::CompareGt
            | Self::CompareLt
            | Self::CompareEq
            | Self::JumpIfFalse(_)
            | Self::Print
            | Self::ReturnValue => -1,
            Self::UnaryNegate
            | Self::UnaryIdentity
            | Self::Jump(_)
            | Self::Label(_)
            | Self::LoopBegin(_)
            | Self::LoopEnd
            | Self::ReturnVoid => 0,
        }
    }

    /// The label this instruction jumps to, if any.
    pub fn target(&self) -> Option<Label> {
        match self {
            Self::JumpIfFalse(label) | Self::Jump(label) | Self::LoopBegin(label) => Some(*label),
            _ => None,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Self::Label(_))
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PushConst(value) => write!(f, "push-const {value}"),
            Self::LoadLocal(name) => write!(f, "load-local {name}"),
            Self::StoreLocal(name) => write!(f, "store-local {name}"),
            Self::UnaryNegate => write!(f, "unary-negate"),
            Self::UnaryIdentity => write!(f, "unary-identity"),
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Mul => write!(f, "mul"),
            Self::Div => write!(f, "div"),
            Self::Mod => write!(f, "mod"),
            Self::CompareGt => write!(f, "compare-gt"),
            Self::CompareLt => write!(f, "compare-lt"),
            Self::CompareEq => write!(f, "compare-eq"),
            Self::JumpIfFalse(label) => write!(f, "jump-if-false {label}"),
            Self::Jump(label) => write!(f, "jump {label}"),
            Self::Label(label) => write!(f, "{label}:"),
            Self::LoopBegin(label) => write!(f, "loop-region-begin {label}"),
            Self::LoopEnd => write!(f, "loop-region-end"),
            Self::Print => write!(f, "consume-and-print"),
            Self::ReadInput => write!(f, "read-input-and-push"),
            Self::ReturnValue => write!(f, "return-value"),
            Self::ReturnVoid => write!(f, "return-void"),
        }
    }
}

/// One instruction per line, labels flush left and everything else indented.
pub fn listing(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    for instruction in instructions {
        if instruction.is_label() {
            out.push_str(&format!("{instruction}\n"));
        } else {
            out.push_str(&format!("    {instruction}\n"));
        }
    }
    out
}
