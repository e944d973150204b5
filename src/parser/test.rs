use super::parse;
use crate::ast::{
    Arguments, BinaryOp, Command, Declaration, Expression, Ident, Parameter, Program,
    TypeDenoter, UnaryOp, Vname,
};
use crate::error::Error;
use crate::lexer::tokenize;
use crate::token::TokenKind;
use pretty_assertions::assert_eq;

fn parse_src(src: &str) -> Result<Program, Error> {
    parse(&tokenize(src).unwrap())
}

fn int(value: i64) -> Expression {
    Expression::IntegerLiteral(value)
}

fn var(name: &str) -> Expression {
    Expression::Vname(Vname::fake(name))
}

fn binary(lhs: Expression, op: BinaryOp, rhs: Expression) -> Expression {
    Expression::Binary(Box::new(lhs), op, Box::new(rhs))
}

fn assign(name: &str, expr: Expression) -> Command {
    Command::Assign(Vname::fake(name), expr)
}

fn integer_var(name: &str) -> Declaration {
    Declaration::Var(Ident::fake(name), TypeDenoter::fake("Integer"))
}

fn let_in(decl: Declaration, body: Command) -> Command {
    Command::Let(Box::new(decl), Box::new(body))
}

fn seq(first: Command, second: Command) -> Command {
    Command::Sequential(Box::new(first), Box::new(second))
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let program = parse_src("let var x: Integer; in x := 2*(3+4)*5;").unwrap();
    let expected = let_in(
        integer_var("x"),
        assign(
            "x",
            binary(
                binary(int(2), BinaryOp::Mul, binary(int(3), BinaryOp::Add, int(4))),
                BinaryOp::Mul,
                int(5),
            ),
        ),
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_additive_chain_folds_left() {
    let program = parse_src("x := 1 - 2 + 3 * 4;").unwrap();
    let expected = assign(
        "x",
        binary(
            binary(int(1), BinaryOp::Sub, int(2)),
            BinaryOp::Add,
            binary(int(3), BinaryOp::Mul, int(4)),
        ),
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_relational_binds_loosest() {
    let program = parse_src(r"x := a + 1 > b \ 2;").unwrap();
    let expected = assign(
        "x",
        binary(
            binary(var("a"), BinaryOp::Add, int(1)),
            BinaryOp::Gt,
            binary(var("b"), BinaryOp::Mod, int(2)),
        ),
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_relational_does_not_chain() {
    let error = parse_src("let var x: Integer; in x := 1 < 2 < 3;").unwrap_err();
    assert_eq!(
        error,
        Error::Parser {
            position: 34,
            found: TokenKind::Operator,
            span: 34..35,
        }
    );
}

#[test]
fn test_unary_applies_to_primary_only() {
    let program = parse_src("x := -2 * +y;").unwrap();
    let expected = assign(
        "x",
        binary(
            Expression::Unary(UnaryOp::Minus, Box::new(int(2))),
            BinaryOp::Mul,
            Expression::Unary(UnaryOp::Plus, Box::new(var("y"))),
        ),
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_command_sequence_is_right_leaning() {
    let program = parse_src("begin a := 1; b := 2; c := 3; end").unwrap();
    let expected = seq(
        assign("a", int(1)),
        seq(assign("b", int(2)), assign("c", int(3))),
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_single_command_block_is_not_wrapped() {
    let program = parse_src("begin a := 1; end").unwrap();
    assert_eq!(program.command, assign("a", int(1)));
}

#[test]
fn test_call_commands() {
    let program = parse_src("begin putint(x); getint(x); reset(); show(1, x, 2); end").unwrap();
    let expected = Command::sequence(
        Command::CallWithArgs(Ident::fake("putint"), Arguments::Single(var("x"))),
        vec![
            Command::CallWithArgs(Ident::fake("getint"), Arguments::Single(var("x"))),
            Command::Call(Ident::fake("reset")),
            Command::CallWithArgs(
                Ident::fake("show"),
                Arguments::sequence(
                    Arguments::Single(int(1)),
                    vec![Arguments::Single(var("x")), Arguments::Single(int(2))],
                ),
            ),
        ],
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_identifier_must_start_assign_or_call() {
    let error = parse_src("let var x: Integer; in x 1;").unwrap_err();
    assert_eq!(
        error,
        Error::Parser {
            position: 25,
            found: TokenKind::IntLiteral,
            span: 25..26,
        }
    );
}

#[test]
fn test_if_requires_else() {
    let error = parse_src("if 1 > 0 then x := 1;").unwrap_err();
    assert_eq!(
        error,
        Error::Parser {
            position: 21,
            found: TokenKind::Eot,
            span: 21..21,
        }
    );
}

#[test]
fn test_if_and_while() {
    let program = parse_src(
        "
while x > 0 do
  if x = 1 then x := 0; else x := x - 1;
",
    )
    .unwrap();
    let expected = Command::While(
        binary(var("x"), BinaryOp::Gt, int(0)),
        Box::new(Command::If(
            binary(var("x"), BinaryOp::Eq, int(1)),
            Box::new(assign("x", int(0))),
            Box::new(assign("x", binary(var("x"), BinaryOp::Sub, int(1)))),
        )),
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_program_is_one_single_command() {
    let error = parse_src("x := 1; y := 2;").unwrap_err();
    assert_eq!(
        error,
        Error::Parser {
            position: 8,
            found: TokenKind::Identifier,
            span: 8..9,
        }
    );
}

#[test]
fn test_declaration_list() {
    let program = parse_src("let const n ~ 10; var x: Integer; in x := n;").unwrap();
    let expected = let_in(
        Declaration::sequence(
            Declaration::Const(Ident::fake("n"), int(10)),
            vec![integer_var("x")],
        ),
        assign("x", var("n")),
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_function_declarations() {
    let program = parse_src(
        "
let
  func zero(): Integer return 0;
  func add(a: Integer, b: Integer): Integer return a + b;
in
  putint(add(zero(), 2));
",
    )
    .unwrap();
    let zero = Declaration::Function {
        name: Ident::fake("zero"),
        params: None,
        return_type: TypeDenoter::fake("Integer"),
        body: Box::new(Command::Return(int(0))),
    };
    let add = Declaration::Function {
        name: Ident::fake("add"),
        params: Some(Box::new(Parameter::sequence(
            Parameter::Single(Vname::fake("a"), TypeDenoter::fake("Integer")),
            vec![Parameter::Single(Vname::fake("b"), TypeDenoter::fake("Integer"))],
        ))),
        return_type: TypeDenoter::fake("Integer"),
        body: Box::new(Command::Return(binary(var("a"), BinaryOp::Add, var("b")))),
    };
    let call = Expression::FunctionCall(
        Ident::fake("add"),
        Some(Box::new(Arguments::sequence(
            Arguments::Single(Expression::FunctionCall(Ident::fake("zero"), None)),
            vec![Arguments::Single(int(2))],
        ))),
    );
    let expected = let_in(
        Declaration::sequence(zero, vec![add]),
        Command::CallWithArgs(Ident::fake("putint"), Arguments::Single(call)),
    );
    assert_eq!(program.command, expected);
}

#[test]
fn test_function_declaration_lookahead_failure() {
    let error = parse_src("let func foo(;").unwrap_err();
    assert_eq!(
        error,
        Error::Parser {
            position: 13,
            found: TokenKind::Semicolon,
            span: 13..14,
        }
    );
}

#[test]
fn test_string_literal_expression() {
    let program = parse_src(r#"s := "hi";"#).unwrap();
    assert_eq!(
        program.command,
        assign("s", Expression::StringLiteral("hi".to_string()))
    );
}

#[test]
fn test_integer_literal_out_of_range() {
    let error = parse_src("x := 99999999999999999999;").unwrap_err();
    assert!(
        matches!(
            error,
            Error::Parser {
                position: 5,
                found: TokenKind::IntLiteral,
                ..
            }
        ),
        "{error:?}"
    );
}

#[test]
fn test_identifier_spans_are_kept() {
    let program = parse_src("x := y;").unwrap();
    let Command::Assign(target, Expression::Vname(source)) = program.command else {
        panic!("expected an assignment");
    };
    assert_eq!(target.0.span, 0..1);
    assert_eq!(source.0.span, 5..6);
}
