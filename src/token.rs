use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eot,
    IntLiteral,
    Identifier,
    StringLiteral,
    Operator,
    LParen,
    RParen,
    Semicolon,
    Colon,
    Comma,
    Becomes,
    Is,
    If,
    Then,
    Else,
    While,
    Do,
    Let,
    In,
    Begin,
    End,
    Const,
    Var,
    Return,
    Func,
}

impl TokenKind {
    pub fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "if" => Self::If,
            "then" => Self::Then,
            "else" => Self::Else,
            "while" => Self::While,
            "do" => Self::Do,
            "let" => Self::Let,
            "in" => Self::In,
            "begin" => Self::Begin,
            "end" => Self::End,
            "const" => Self::Const,
            "var" => Self::Var,
            "return" => Self::Return,
            "func" => Self::Func,
            _ => return None,
        };
        Some(kind)
    }

    /// Source text of kinds that always spell the same way.
    pub fn lexeme(&self) -> Option<&'static str> {
        let text = match self {
            Self::Eot
            | Self::IntLiteral
            | Self::Identifier
            | Self::StringLiteral
            | Self::Operator => return None,
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Becomes => ":=",
            Self::Is => "~",
            Self::If => "if",
            Self::Then => "then",
            Self::Else => "else",
            Self::While => "while",
            Self::Do => "do",
            Self::Let => "let",
            Self::In => "in",
            Self::Begin => "begin",
            Self::End => "end",
            Self::Const => "const",
            Self::Var => "var",
            Self::Return => "return",
            Self::Func => "func",
        };
        Some(text)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Eot => "EOT",
            Self::IntLiteral => "INTLITERAL",
            Self::Identifier => "IDENTIFIER",
            Self::StringLiteral => "STRING",
            Self::Operator => "OPERATOR",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Semicolon => "SEMICOLON",
            Self::Colon => "COLON",
            Self::Comma => "COMMA",
            Self::Becomes => "BECOMES",
            Self::Is => "IS",
            Self::If => "IF",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::Do => "DO",
            Self::Let => "LET",
            Self::In => "IN",
            Self::Begin => "BEGIN",
            Self::End => "END",
            Self::Const => "CONST",
            Self::Var => "VAR",
            Self::Return => "RETURN",
            Self::Func => "FUNC",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    pub fn eot(offset: usize) -> Self {
        Self::new(TokenKind::Eot, "", offset..offset)
    }

    pub fn position(&self) -> usize {
        self.span.start
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_operator(&self, symbols: &[&str]) -> bool {
        self.kind == TokenKind::Operator && symbols.contains(&self.value.as_str())
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}({}) at {})", self.kind, self.value, self.position())
    }
}
