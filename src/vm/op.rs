use super::OpCode;
use num_traits::ToPrimitive;

/// An instruction with its labels and locals resolved to numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    PushConst(i64),
    Load(u32),
    Store(u32),
    Negate,
    Identity,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Eq,
    JumpIfFalse(u32),
    Jump(u32),
    LoopBegin(u32),
    LoopEnd,
    Print,
    Read,
    ReturnValue,
    ReturnVoid,
}

impl Op {
    pub fn opcode(&self) -> OpCode {
        match self {
            Self::PushConst(_) => OpCode::PushConst,
            Self::Load(_) => OpCode::Load,
            Self::Store(_) => OpCode::Store,
            Self::Negate => OpCode::Negate,
            Self::Identity => OpCode::Identity,
            Self::Add => OpCode::Add,
            Self::Sub => OpCode::Sub,
            Self::Mul => OpCode::Mul,
            Self::Div => OpCode::Div,
            Self::Mod => OpCode::Mod,
            Self::Gt => OpCode::Gt,
            Self::Lt => OpCode::Lt,
            Self::Eq => OpCode::Eq,
            Self::JumpIfFalse(_) => OpCode::JumpIfFalse,
            Self::Jump(_) => OpCode::Jump,
            Self::LoopBegin(_) => OpCode::LoopBegin,
            Self::LoopEnd => OpCode::LoopEnd,
            Self::Print => OpCode::Print,
            Self::Read => OpCode::Read,
            Self::ReturnValue => OpCode::ReturnValue,
            Self::ReturnVoid => OpCode::ReturnVoid,
        }
    }

    pub fn to_bytecode(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode().to_u8().unwrap_or_default()];
        match self {
            Self::PushConst(value) => bytes.extend_from_slice(&value.to_le_bytes()),
            Self::Load(operand)
            | Self::Store(operand)
            | Self::JumpIfFalse(operand)
            | Self::Jump(operand)
            | Self::LoopBegin(operand) => bytes.extend_from_slice(&operand.to_le_bytes()),
            _ => {}
        }
        bytes
    }

    pub fn size(&self) -> usize {
        match self {
            Self::PushConst(_) => 9,
            Self::Load(_)
            | Self::Store(_)
            | Self::JumpIfFalse(_)
            | Self::Jump(_)
            | Self::LoopBegin(_) => 5,
            _ => 1,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PushConst(value) => write!(f, "push-const {value}"),
            Self::Load(slot) => write!(f, "load-local {slot}"),
            Self::Store(slot) => write!(f, "store-local {slot}"),
            Self::Negate => write!(f, "unary-negate"),
            Self::Identity => write!(f, "unary-identity"),
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Mul => write!(f, "mul"),
            Self::Div => write!(f, "div"),
            Self::Mod => write!(f, "mod"),
            Self::Gt => write!(f, "compare-gt"),
            Self::Lt => write!(f, "compare-lt"),
            Self::Eq => write!(f, "compare-eq"),
            Self::JumpIfFalse(address) => write!(f, "jump-if-false {address:04}"),
            Self::Jump(address) => write!(f, "jump {address:04}"),
            Self::LoopBegin(address) => write!(f, "loop-region-begin {address:04}"),
            Self::LoopEnd => write!(f, "loop-region-end"),
            Self::Print => write!(f, "consume-and-print"),
            Self::Read => write!(f, "read-input-and-push"),
            Self::ReturnValue => write!(f, "return-value"),
            Self::ReturnVoid => write!(f, "return-void"),
        }
    }
}
