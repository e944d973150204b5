use super::ast::Span;
use super::instruction::Label;
use super::token::TokenKind;
use anyhow::Result;
use ariadne::{Color, Label as ReportLabel, Report, ReportKind, Source};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unexpected {}", describe_char(.found))]
    Lex { span: Span, found: Option<char> },
    #[error("found bad token {found} at {position}")]
    Parser {
        position: usize,
        found: TokenKind,
        span: Span,
    },
    #[error("'{name}' is already declared (level {level})")]
    RepeatDeclaration {
        name: String,
        level: usize,
        span: Span,
    },
    #[error("'{name}' does not exist at level {level}, it has to be declared first")]
    Nonexist {
        name: String,
        level: usize,
        span: Span,
    },
    #[error("'{name}' is a const and cannot be changed (level {level})")]
    UnChangable {
        name: String,
        level: usize,
        span: Span,
    },
    #[error("'{name}' is referenced before assignment (level {level})")]
    NoAssignment {
        name: String,
        level: usize,
        span: Span,
    },
    #[error("cannot generate code for {node}")]
    CodeGen { node: String, span: Option<Span> },
    #[error("operand stack went below empty")]
    EmptyStack,
    #[error("label {0} is defined more than once")]
    DuplicateLabel(Label),
    #[error("label {0} is referenced but never defined")]
    UndefinedLabel(Label),
    #[error("invalid bytecode: {0}")]
    InvalidBytecode(String),
    #[error("division by zero at {ip}")]
    DivisionByZero { ip: usize },
    #[error("expected an integer on input, got {0:?}")]
    InvalidInput(String),
    #[error("operand stack underflow at {ip}")]
    StackUnderflow { ip: usize },
    #[error("local '{name}' read before it was set at {ip}")]
    UnsetLocal { name: String, ip: usize },
    #[error("step limit of {0} reached")]
    StepLimit(usize),
    #[error("{0}")]
    Io(String),
}

impl Error {
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::Lex { span, .. }
            | Self::Parser { span, .. }
            | Self::RepeatDeclaration { span, .. }
            | Self::Nonexist { span, .. }
            | Self::UnChangable { span, .. }
            | Self::NoAssignment { span, .. } => Some(span),
            Self::CodeGen { span, .. } => span.as_ref(),
            Self::EmptyStack
            | Self::DuplicateLabel(..)
            | Self::UndefinedLabel(..)
            | Self::InvalidBytecode(..)
            | Self::DivisionByZero { .. }
            | Self::InvalidInput(..)
            | Self::StackUnderflow { .. }
            | Self::UnsetLocal { .. }
            | Self::StepLimit(..)
            | Self::Io(..) => None,
        }
    }

    /// Errors that point at a bug in the compiler rather than at the program.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::EmptyStack | Self::DuplicateLabel(..) | Self::UndefinedLabel(..)
        )
    }

    fn code(&self) -> u32 {
        match self {
            Self::Lex { .. } => 1,
            Self::Parser { .. } => 2,
            Self::RepeatDeclaration { .. } => 3,
            Self::Nonexist { .. } => 4,
            Self::UnChangable { .. } => 5,
            Self::NoAssignment { .. } => 6,
            Self::CodeGen { .. } => 7,
            Self::EmptyStack | Self::DuplicateLabel(..) | Self::UndefinedLabel(..) => 8,
            Self::InvalidBytecode(..) => 9,
            Self::DivisionByZero { .. }
            | Self::InvalidInput(..)
            | Self::StackUnderflow { .. }
            | Self::UnsetLocal { .. }
            | Self::StepLimit(..)
            | Self::Io(..) => 10,
        }
    }

    fn has_note(&self) -> bool {
        matches!(
            self,
            Self::NoAssignment { .. } | Self::UnChangable { .. } | Self::CodeGen { .. }
        ) || self.is_internal()
    }

    fn note(&self) -> String {
        match self {
            Self::NoAssignment { name, .. } => {
                format!("assign `{name}` with `:=` or `getint({name});` before reading it")
            }
            Self::UnChangable { name, .. } => {
                format!("declare `{name}` with `var` if it has to change")
            }
            Self::CodeGen { .. } => {
                "only `putint(expr)` and `getint(name)` can be called".to_string()
            }
            _ => "this is a compiler bug, please report it".to_string(),
        }
    }

    pub fn report(&self, filename: &str, src: &str) -> Result<()> {
        let src = if src.is_empty() {
            " ".to_string()
        } else {
            src.to_string()
        };
        let span = self.span().cloned().unwrap_or(0..0);
        let mut report = Report::build(ReportKind::Error, (filename, span.clone()))
            .with_code(self.code())
            .with_message(self.to_string());
        if self.span().is_some() {
            report = report.with_label(
                ReportLabel::new((filename, span))
                    .with_message(self.to_string())
                    .with_color(Color::Red),
            );
        }
        if self.has_note() {
            report = report.with_note(self.note());
        }
        report.finish().eprint((filename, Source::from(src)))?;
        Ok(())
    }
}

fn describe_char(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("character {c:?}"),
        None => "end of input".to_string(),
    }
}

impl From<chumsky::error::Simple<char>> for Error {
    fn from(error: chumsky::error::Simple<char>) -> Self {
        Self::Lex {
            span: error.span(),
            found: error.found().copied(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}
