//! Recursive descent parser for Mini Triangle.
//!
//! ```text
//! Program            ::= single-Command EOT
//! Command            ::= single-Command (single-Command)*
//! single-Command     ::= V-name ':=' Expression ';'
//!                      | Identifier '(' [Arguments] ')' ';'
//!                      | if Expression then single-Command else single-Command
//!                      | while Expression do single-Command
//!                      | let Declaration in single-Command
//!                      | begin Command end
//!                      | return Expression ';'
//! Expression         ::= Calculation [('>' | '<' | '=') Calculation]
//! Calculation        ::= Term (('+' | '-') Term)*
//! Term               ::= primary-Expression (('*' | '/' | '\') primary-Expression)*
//! primary-Expression ::= Integer-Literal | String-Literal | V-name
//!                      | Identifier '(' [Arguments] ')'
//!                      | ('+' | '-') primary-Expression
//!                      | '(' Expression ')'
//! Arguments          ::= Expression (',' Expression)*
//! Declaration        ::= single-Declaration (single-Declaration)*
//! single-Declaration ::= const Identifier '~' Expression ';'
//!                      | var Identifier ':' Type-denoter ';'
//!                      | func Identifier '(' [Parameters] ')' ':' Type-denoter single-Command
//! Parameters         ::= V-name ':' Type-denoter (',' V-name ':' Type-denoter)*
//! V-name             ::= Identifier
//! Type-denoter       ::= Identifier
//! ```
#[cfg(test)]
mod test;

use crate::ast::{
    Arguments, BinaryOp, Command, Declaration, Expression, Ident, Parameter, Program,
    TypeDenoter, UnaryOp, Vname,
};
use crate::error::Error;
use crate::token::{Token, TokenKind};

type Result<T> = std::result::Result<T, Error>;

const COMMAND_START: &[TokenKind] = &[
    TokenKind::Identifier,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Let,
    TokenKind::Begin,
    TokenKind::Return,
];

const DECLARATION_START: &[TokenKind] = &[TokenKind::Const, TokenKind::Var, TokenKind::Func];

const RELATIONAL: &[&str] = &[">", "<", "="];
const ADDITIVE: &[&str] = &["+", "-"];
const MULTIPLICATIVE: &[&str] = &["*", "/", "\\"];

/// Parses a complete token stream into a program, stopping at the first token
/// that does not fit the grammar.
pub fn parse(tokens: &[Token]) -> Result<Program> {
    Parser::new(tokens).parse_program()
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    eot: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.last().map(|token| token.span.end).unwrap_or(0);
        Self {
            tokens,
            current: 0,
            eot: Token::eot(end),
        }
    }

    pub fn parse_program(&mut self) -> Result<Program> {
        let command = self.single_command()?;
        self.expect(TokenKind::Eot)?;
        Ok(Program { command })
    }

    fn token_at(&self, index: usize) -> &Token {
        self.tokens.get(index).unwrap_or(&self.eot)
    }

    fn current(&self) -> &Token {
        self.token_at(self.current)
    }

    fn peek(&self, distance: usize) -> &Token {
        self.token_at(self.current + distance)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !token.is(TokenKind::Eot) {
            self.current += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if !self.current().is(kind) {
            return Err(self.error());
        }
        Ok(self.advance())
    }

    fn error(&self) -> Error {
        Self::error_at(self.current())
    }

    fn error_at(token: &Token) -> Error {
        Error::Parser {
            position: token.position(),
            found: token.kind,
            span: token.span.clone(),
        }
    }

    fn identifier(&mut self) -> Result<Ident> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Ident::new(token.value, token.span))
    }

    fn command(&mut self) -> Result<Command> {
        let first = self.single_command()?;
        let mut rest = Vec::new();
        while COMMAND_START.contains(&self.current().kind) {
            rest.push(self.single_command()?);
        }
        Ok(Command::sequence(first, rest))
    }

    fn single_command(&mut self) -> Result<Command> {
        match self.current().kind {
            TokenKind::Identifier => match self.peek(1).kind {
                TokenKind::Becomes => self.assign_command(),
                TokenKind::LParen => self.call_command(),
                _ => {
                    self.advance();
                    Err(self.error())
                }
            },
            TokenKind::If => self.if_command(),
            TokenKind::While => self.while_command(),
            TokenKind::Let => self.let_command(),
            TokenKind::Begin => {
                self.advance();
                let command = self.command()?;
                self.expect(TokenKind::End)?;
                Ok(command)
            }
            TokenKind::Return => self.return_command(),
            _ => Err(self.error()),
        }
    }

    fn assign_command(&mut self) -> Result<Command> {
        let vname = self.vname()?;
        self.expect(TokenKind::Becomes)?;
        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Command::Assign(vname, expr))
    }

    fn call_command(&mut self) -> Result<Command> {
        let name = self.identifier()?;
        self.expect(TokenKind::LParen)?;
        if self.current().is(TokenKind::RParen) {
            self.advance();
            self.expect(TokenKind::Semicolon)?;
            return Ok(Command::Call(name));
        }
        let args = self.arguments()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Command::CallWithArgs(name, args))
    }

    fn if_command(&mut self) -> Result<Command> {
        self.expect(TokenKind::If)?;
        let cond = self.expression()?;
        self.expect(TokenKind::Then)?;
        let then = self.single_command()?;
        self.expect(TokenKind::Else)?;
        let otherwise = self.single_command()?;
        Ok(Command::If(cond, Box::new(then), Box::new(otherwise)))
    }

    fn while_command(&mut self) -> Result<Command> {
        self.expect(TokenKind::While)?;
        let cond = self.expression()?;
        self.expect(TokenKind::Do)?;
        let body = self.single_command()?;
        Ok(Command::While(cond, Box::new(body)))
    }

    fn let_command(&mut self) -> Result<Command> {
        self.expect(TokenKind::Let)?;
        let decl = self.declaration()?;
        self.expect(TokenKind::In)?;
        let body = self.single_command()?;
        Ok(Command::Let(Box::new(decl), Box::new(body)))
    }

    fn return_command(&mut self) -> Result<Command> {
        self.expect(TokenKind::Return)?;
        let expr = self.expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Command::Return(expr))
    }

    fn arguments(&mut self) -> Result<Arguments> {
        let first = Arguments::Single(self.expression()?);
        let mut rest = Vec::new();
        while self.current().is(TokenKind::Comma) {
            self.advance();
            rest.push(Arguments::Single(self.expression()?));
        }
        Ok(Arguments::sequence(first, rest))
    }

    /// Relational operators do not chain: a second one is left for the caller.
    fn expression(&mut self) -> Result<Expression> {
        let lhs = self.calculation()?;
        if !self.current().is_operator(RELATIONAL) {
            return Ok(lhs);
        }
        let op = self.binary_operator()?;
        let rhs = self.calculation()?;
        Ok(Expression::Binary(Box::new(lhs), op, Box::new(rhs)))
    }

    fn calculation(&mut self) -> Result<Expression> {
        let mut expr = self.term()?;
        while self.current().is_operator(ADDITIVE) {
            let op = self.binary_operator()?;
            let rhs = self.term()?;
            expr = Expression::Binary(Box::new(expr), op, Box::new(rhs));
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expression> {
        let mut expr = self.primary_expression()?;
        while self.current().is_operator(MULTIPLICATIVE) {
            let op = self.binary_operator()?;
            let rhs = self.primary_expression()?;
            expr = Expression::Binary(Box::new(expr), op, Box::new(rhs));
        }
        Ok(expr)
    }

    fn binary_operator(&mut self) -> Result<BinaryOp> {
        let op = BinaryOp::from_symbol(&self.current().value).ok_or_else(|| self.error())?;
        self.advance();
        Ok(op)
    }

    fn primary_expression(&mut self) -> Result<Expression> {
        match self.current().kind {
            TokenKind::IntLiteral => {
                let value = self.current().value.parse().map_err(|_| self.error())?;
                self.advance();
                Ok(Expression::IntegerLiteral(value))
            }
            TokenKind::StringLiteral => Ok(Expression::StringLiteral(self.advance().value)),
            TokenKind::Identifier if self.peek(1).is(TokenKind::LParen) => self.function_call(),
            TokenKind::Identifier => Ok(Expression::Vname(self.vname()?)),
            TokenKind::Operator => {
                let op = UnaryOp::from_symbol(&self.current().value).ok_or_else(|| self.error())?;
                self.advance();
                let expr = self.primary_expression()?;
                Ok(Expression::Unary(op, Box::new(expr)))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.error()),
        }
    }

    fn function_call(&mut self) -> Result<Expression> {
        let name = self.identifier()?;
        self.expect(TokenKind::LParen)?;
        if self.current().is(TokenKind::RParen) {
            self.advance();
            return Ok(Expression::FunctionCall(name, None));
        }
        let args = self.arguments()?;
        self.expect(TokenKind::RParen)?;
        Ok(Expression::FunctionCall(name, Some(Box::new(args))))
    }

    fn vname(&mut self) -> Result<Vname> {
        Ok(Vname(self.identifier()?))
    }

    fn type_denoter(&mut self) -> Result<TypeDenoter> {
        Ok(TypeDenoter(self.identifier()?))
    }

    fn declaration(&mut self) -> Result<Declaration> {
        let first = self.single_declaration()?;
        let mut rest = Vec::new();
        while DECLARATION_START.contains(&self.current().kind) {
            rest.push(self.single_declaration()?);
        }
        Ok(Declaration::sequence(first, rest))
    }

    fn single_declaration(&mut self) -> Result<Declaration> {
        match self.current().kind {
            TokenKind::Const => {
                self.advance();
                let name = self.identifier()?;
                self.expect(TokenKind::Is)?;
                let expr = self.expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Declaration::Const(name, expr))
            }
            TokenKind::Var => {
                self.advance();
                let name = self.identifier()?;
                self.expect(TokenKind::Colon)?;
                let type_denoter = self.type_denoter()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Declaration::Var(name, type_denoter))
            }
            TokenKind::Func => {
                self.advance();
                self.function_declaration()
            }
            _ => Err(self.error()),
        }
    }

    /// `func` has been consumed; the token two ahead tells an empty parameter
    /// list apart from a parameter list.
    fn function_declaration(&mut self) -> Result<Declaration> {
        let has_params = match self.peek(2).kind {
            TokenKind::RParen => false,
            TokenKind::Identifier => true,
            _ => return Err(Self::error_at(self.peek(2))),
        };
        let name = self.identifier()?;
        self.expect(TokenKind::LParen)?;
        let params = if has_params {
            Some(Box::new(self.parameters()?))
        } else {
            None
        };
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let return_type = self.type_denoter()?;
        let body = self.single_command()?;
        Ok(Declaration::Function {
            name,
            params,
            return_type,
            body: Box::new(body),
        })
    }

    fn parameters(&mut self) -> Result<Parameter> {
        let first = self.parameter()?;
        let mut rest = Vec::new();
        while self.current().is(TokenKind::Comma) {
            self.advance();
            rest.push(self.parameter()?);
        }
        Ok(Parameter::sequence(first, rest))
    }

    fn parameter(&mut self) -> Result<Parameter> {
        let vname = self.vname()?;
        self.expect(TokenKind::Colon)?;
        let type_denoter = self.type_denoter()?;
        Ok(Parameter::Single(vname, type_denoter))
    }
}
