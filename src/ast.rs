pub type Span = std::ops::Range<usize>;

/// An identifier together with where it was written. Two identifiers are equal
/// when their names are, wherever they came from.
#[derive(Debug, Clone)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    pub fn fake(name: impl Into<String>) -> Self {
        Self::new(name, 0..0)
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Ident {}

impl std::fmt::Display for Ident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vname(pub Ident);

impl Vname {
    pub fn fake(name: impl Into<String>) -> Self {
        Self(Ident::fake(name))
    }

    pub fn ident(&self) -> &Ident {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDenoter(pub Ident);

impl TypeDenoter {
    pub fn fake(name: impl Into<String>) -> Self {
        Self(Ident::fake(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Assign(Vname, Expression),
    Call(Ident),
    CallWithArgs(Ident, Arguments),
    Sequential(Box<Command>, Box<Command>),
    If(Expression, Box<Command>, Box<Command>),
    While(Expression, Box<Command>),
    Let(Box<Declaration>, Box<Command>),
    Return(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    IntegerLiteral(i64),
    StringLiteral(String),
    Vname(Vname),
    Unary(UnaryOp, Box<Expression>),
    Binary(Box<Expression>, BinaryOp, Box<Expression>),
    FunctionCall(Ident, Option<Box<Arguments>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arguments {
    Single(Expression),
    Sequential(Box<Arguments>, Box<Arguments>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Const(Ident, Expression),
    Var(Ident, TypeDenoter),
    Function {
        name: Ident,
        params: Option<Box<Parameter>>,
        return_type: TypeDenoter,
        body: Box<Command>,
    },
    Sequential(Box<Declaration>, Box<Declaration>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    Single(Vname, TypeDenoter),
    Sequential(Box<Parameter>, Box<Parameter>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Eq,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Plus),
            "-" => Some(Self::Minus),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "\\" => Some(Self::Mod),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            "=" => Some(Self::Eq),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "\\",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "=",
        }
    }
}

// Each `sequence` builds a right-leaning list that keeps source order.
macro_rules! impl_sequence {
    ($($node:ident),+ $(,)?) => {
        $(
            impl $node {
                pub fn sequence(first: Self, mut rest: Vec<Self>) -> Self {
                    let Some(mut tail) = rest.pop() else {
                        return first;
                    };
                    while let Some(previous) = rest.pop() {
                        tail = Self::Sequential(Box::new(previous), Box::new(tail));
                    }
                    Self::Sequential(Box::new(first), Box::new(tail))
                }
            }
        )+
    };
}

impl_sequence!(Command, Declaration, Parameter, Arguments);

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_single_command(f, &self.command)
    }
}

/// Writes `command` where the grammar expects a single-command, wrapping
/// sequences in `begin ... end`.
fn write_single_command(f: &mut std::fmt::Formatter<'_>, command: &Command) -> std::fmt::Result {
    match command {
        Command::Sequential(..) => {
            writeln!(f, "begin")?;
            write_command_list(f, command)?;
            write!(f, "end")
        }
        _ => write!(f, "{command}"),
    }
}

fn write_command_list(f: &mut std::fmt::Formatter<'_>, command: &Command) -> std::fmt::Result {
    match command {
        Command::Sequential(first, rest) => {
            // a nested list on the left only survives a reparse as its own block
            write_single_command(f, first)?;
            writeln!(f)?;
            write_command_list(f, rest)
        }
        _ => {
            write_single_command(f, command)?;
            writeln!(f)
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assign(vname, expr) => write!(f, "{} := {expr};", vname.0),
            Self::Call(name) => write!(f, "{name}();"),
            Self::CallWithArgs(name, args) => write!(f, "{name}({args});"),
            Self::Sequential(..) => write_single_command(f, self),
            Self::If(cond, then, otherwise) => {
                write!(f, "if {cond} then ")?;
                write_single_command(f, then)?;
                write!(f, " else ")?;
                write_single_command(f, otherwise)
            }
            Self::While(cond, body) => {
                write!(f, "while {cond} do ")?;
                write_single_command(f, body)
            }
            Self::Let(decl, body) => {
                writeln!(f, "let {decl}")?;
                write!(f, "in ")?;
                write_single_command(f, body)
            }
            Self::Return(expr) => write!(f, "return {expr};"),
        }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IntegerLiteral(value) => write!(f, "{value}"),
            Self::StringLiteral(value) => write!(f, "\"{value}\""),
            Self::Vname(vname) => write!(f, "{}", vname.0),
            Self::Unary(op, expr) => write!(f, "{}{expr}", op.symbol()),
            Self::Binary(lhs, op, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Self::FunctionCall(name, None) => write!(f, "{name}()"),
            Self::FunctionCall(name, Some(args)) => write!(f, "{name}({args})"),
        }
    }
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(expr) => write!(f, "{expr}"),
            Self::Sequential(first, rest) => write!(f, "{first}, {rest}"),
        }
    }
}

impl std::fmt::Display for Declaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Const(name, expr) => write!(f, "const {name} ~ {expr};"),
            Self::Var(name, type_denoter) => write!(f, "var {name}: {};", type_denoter.0),
            Self::Function {
                name,
                params,
                return_type,
                body,
            } => {
                match params {
                    Some(params) => write!(f, "func {name}({params}): {} ", return_type.0)?,
                    None => write!(f, "func {name}(): {} ", return_type.0)?,
                }
                write_single_command(f, body)
            }
            Self::Sequential(first, rest) => write!(f, "{first}\n    {rest}"),
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(vname, type_denoter) => write!(f, "{}: {}", vname.0, type_denoter.0),
            Self::Sequential(first, rest) => write!(f, "{first}, {rest}"),
        }
    }
}

fn pretty_print(f: &mut String, command: &Command, indent: usize) {
    let pad = "  ".repeat(indent);
    match command {
        Command::Sequential(first, rest) => {
            pretty_print(f, first, indent);
            pretty_print(f, rest, indent);
        }
        Command::If(cond, then, otherwise) => {
            f.push_str(&format!("{pad}If {cond}\n"));
            pretty_print(f, then, indent + 1);
            f.push_str(&format!("{pad}Else\n"));
            pretty_print(f, otherwise, indent + 1);
        }
        Command::While(cond, body) => {
            f.push_str(&format!("{pad}While {cond}\n"));
            pretty_print(f, body, indent + 1);
        }
        Command::Let(decl, body) => {
            f.push_str(&format!("{pad}Let\n"));
            pretty_print_declaration(f, decl, indent + 1);
            f.push_str(&format!("{pad}In\n"));
            pretty_print(f, body, indent + 1);
        }
        Command::Assign(..) | Command::Call(..) | Command::CallWithArgs(..) | Command::Return(..) => {
            f.push_str(&format!("{pad}{command}\n"));
        }
    }
}

fn pretty_print_declaration(f: &mut String, decl: &Declaration, indent: usize) {
    let pad = "  ".repeat(indent);
    match decl {
        Declaration::Sequential(first, rest) => {
            pretty_print_declaration(f, first, indent);
            pretty_print_declaration(f, rest, indent);
        }
        Declaration::Function {
            name,
            params,
            return_type,
            body,
        } => {
            let params = params.as_ref().map(|p| p.to_string()).unwrap_or_default();
            f.push_str(&format!("{pad}Func {name}({params}): {}\n", return_type.0));
            pretty_print(f, body, indent + 1);
        }
        Declaration::Const(..) | Declaration::Var(..) => f.push_str(&format!("{pad}{decl}\n")),
    }
}

/// Indented outline of the tree, used by `--debug-ast`.
pub fn outline(program: &Program) -> String {
    let mut out = String::new();
    pretty_print(&mut out, &program.command, 0);
    out
}
