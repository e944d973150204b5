use chumsky::prelude::*;

use crate::error::Error;
use crate::token::{Token, TokenKind};

pub fn lexer() -> impl Parser<char, Vec<Token>, Error = Simple<char>> {
    let integer = filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(|value| (TokenKind::IntLiteral, value));

    let string = just('"')
        .ignore_then(filter(|c: &char| *c != '"').repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(|value| (TokenKind::StringLiteral, value));

    let word = text::ident().map(|word: String| {
        let kind = TokenKind::keyword(&word).unwrap_or(TokenKind::Identifier);
        (kind, word)
    });

    let operator = one_of("+-*/\\<>=").map(|c: char| (TokenKind::Operator, c.to_string()));

    // `:=` has to be tried before `:`
    let punctuation = choice((
        just(":=").to(TokenKind::Becomes),
        just(':').to(TokenKind::Colon),
        just(';').to(TokenKind::Semicolon),
        just(',').to(TokenKind::Comma),
        just('(').to(TokenKind::LParen),
        just(')').to(TokenKind::RParen),
        just('~').to(TokenKind::Is),
    ))
    .map(|kind: TokenKind| (kind, kind.lexeme().unwrap_or_default().to_string()));

    let token = choice((integer, string, word, operator, punctuation))
        .map_with_span(|(kind, value), span| Token::new(kind, value, span));

    let comment = just('!')
        .then(filter(|c: &char| *c != '\n').repeated())
        .ignored();
    let whitespace = filter(|c: &char| c.is_whitespace()).ignored();
    let trivia = comment.or(whitespace).repeated();

    token
        .padded_by(trivia.clone())
        .repeated()
        .padded_by(trivia)
        .then_ignore(end())
}

/// Splits source text into tokens, terminated by a single `Eot` token.
pub fn tokenize(src: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = lexer().parse(src).map_err(|errors| {
        errors
            .into_iter()
            .next()
            .map(Error::from)
            .unwrap_or(Error::Lex {
                span: 0..0,
                found: None,
            })
    })?;
    tokens.push(Token::eot(src.chars().count()));
    Ok(tokens)
}
