use super::generate;
use crate::error::Error;
use crate::instruction::{listing, Instruction, Label};
use crate::lexer::tokenize;
use crate::parser::parse;
use pretty_assertions::assert_eq;

fn emit(src: &str) -> Result<Vec<Instruction>, Error> {
    generate(&parse(&tokenize(src).unwrap()).unwrap())
}

fn store(name: &str) -> Instruction {
    Instruction::StoreLocal(name.to_string())
}

fn load(name: &str) -> Instruction {
    Instruction::LoadLocal(name.to_string())
}

#[test]
fn test_assignment_of_nested_arithmetic() {
    let code = emit("let var x: Integer; in x := 2*(3+4)*5;").unwrap();
    assert_eq!(
        code,
        vec![
            Instruction::PushConst(2),
            Instruction::PushConst(3),
            Instruction::PushConst(4),
            Instruction::Add,
            Instruction::Mul,
            Instruction::PushConst(5),
            Instruction::Mul,
            store("x@0"),
            Instruction::ReturnVoid,
        ]
    );
    let before_store: isize = code[..7].iter().map(Instruction::stack_effect).sum();
    assert_eq!(before_store, 1);
}

#[test]
fn test_if_listing() {
    let code = emit("let var x: Integer; in if 1 > 0 then x := 6; else x := 2;").unwrap();
    insta::assert_snapshot!(listing(&code), @r"
    push-const 1
    push-const 0
    compare-gt
    jump-if-false L0
    push-const 6
    store-local x@0
    jump L1
L0:
    push-const 2
    store-local x@0
L1:
    return-void
");
}

#[test]
fn test_while_listing() {
    let src = "
        let var x: Integer;
        in begin
            x := 0;
            while x < 3 do x := x + 1;
            putint(x);
        end";
    let code = emit(src).unwrap();
    insta::assert_snapshot!(listing(&code), @r"
    push-const 0
    store-local x@0
    loop-region-begin L0
L1:
    load-local x@0
    push-const 3
    compare-lt
    jump-if-false L2
    load-local x@0
    push-const 1
    add
    store-local x@0
    jump L1
L2:
    loop-region-end
L0:
    load-local x@0
    consume-and-print
    return-void
");
}

#[test]
fn test_every_referenced_label_is_defined_once() {
    let src = "
        let var x: Integer;
        in begin
            getint(x);
            while x > 0 do
                if x \\ 2 = 0 then x := x / 2; else x := x - 1;
            putint(x);
        end";
    let code = emit(src).unwrap();
    let defined: Vec<Label> = code
        .iter()
        .filter_map(|i| match i {
            Instruction::Label(label) => Some(*label),
            _ => None,
        })
        .collect();
    let mut unique = defined.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), defined.len());
    for target in code.iter().filter_map(Instruction::target) {
        assert!(defined.contains(&target), "{target} is never defined");
    }
}

#[test]
fn test_const_is_stored_at_declaration() {
    let code = emit("let const n ~ 4; var x: Integer; in x := n * n;").unwrap();
    assert_eq!(
        code,
        vec![
            Instruction::PushConst(4),
            store("n@0"),
            load("n@0"),
            load("n@0"),
            Instruction::Mul,
            store("x@0"),
            Instruction::ReturnVoid,
        ]
    );
}

#[test]
fn test_getint_reads_into_variable() {
    let code = emit("let var x: Integer; in begin getint(x); putint(-x); end").unwrap();
    assert_eq!(
        code,
        vec![
            Instruction::ReadInput,
            store("x@0"),
            load("x@0"),
            Instruction::UnaryNegate,
            Instruction::Print,
            Instruction::ReturnVoid,
        ]
    );
}

#[test]
fn test_shadowing_uses_distinct_slots() {
    let src = "
        let var x: Integer;
        in begin
            x := 1;
            let var x: Integer; in x := 2;
            putint(x);
        end";
    let code = emit(src).unwrap();
    assert_eq!(
        code,
        vec![
            Instruction::PushConst(1),
            store("x@0"),
            Instruction::PushConst(2),
            store("x@1"),
            load("x@0"),
            Instruction::Print,
            Instruction::ReturnVoid,
        ]
    );
}

#[test]
fn test_inner_assignment_does_not_initialize_outer() {
    let src = "
        let var x: Integer;
        in begin
            let var x: Integer; in x := 2;
            putint(x);
        end";
    let error = emit(src).unwrap_err();
    assert!(
        matches!(&error, Error::NoAssignment { name, level: 0, .. } if name == "x"),
        "{error:?}"
    );
}

#[test]
fn test_sibling_lets_do_not_share_slots() {
    let src = "
        let var a: Integer;
        in begin
            let var y: Integer; in y := 1;
            let var y: Integer; in y := 2;
        end";
    let code = emit(src).unwrap();
    assert_eq!(code[1], store("y@1"));
    assert_eq!(code[3], store("y@1.1"));
}

#[test]
fn test_repeat_declaration() {
    let error = emit("let var x: Integer; const x ~ 1; in x := 1;").unwrap_err();
    assert_eq!(
        error,
        Error::RepeatDeclaration {
            name: "x".to_string(),
            level: 0,
            span: 26..27,
        }
    );
}

#[test]
fn test_undeclared_name() {
    let error = emit("let var x: Integer; in y := 1;").unwrap_err();
    assert_eq!(
        error,
        Error::Nonexist {
            name: "y".to_string(),
            level: 0,
            span: 23..24,
        }
    );
}

#[test]
fn test_assigning_a_constant() {
    let error = emit("let const c ~ 1; in let var x: Integer; in c := 2;").unwrap_err();
    assert_eq!(
        error,
        Error::UnChangable {
            name: "c".to_string(),
            level: 1,
            span: 43..44,
        }
    );
}

#[test]
fn test_reading_into_a_constant() {
    let error = emit("let const c ~ 1; in getint(c);").unwrap_err();
    assert!(matches!(error, Error::UnChangable { level: 0, .. }), "{error:?}");
}

#[test]
fn test_read_before_assignment() {
    let error = emit("let var x: Integer; var y: Integer; in y := x;").unwrap_err();
    assert_eq!(
        error,
        Error::NoAssignment {
            name: "x".to_string(),
            level: 0,
            span: 44..45,
        }
    );
}

#[test]
fn test_const_cannot_refer_to_itself() {
    let error = emit("let const x ~ x + 1; in putint(x);").unwrap_err();
    assert!(matches!(error, Error::NoAssignment { .. }), "{error:?}");
}

#[test]
fn test_top_level_must_be_let() {
    let error = emit("x := 1;").unwrap_err();
    assert!(matches!(error, Error::CodeGen { span: None, .. }), "{error:?}");
}

#[test]
fn test_unsupported_nodes() {
    let cases = [
        "let var x: Integer; in foo();",
        "let var x: Integer; in show(1, 2);",
        "let var x: Integer; in putint(1, 2);",
        "let var x: Integer; in getint(1);",
        "let var x: Integer; in x := f(1);",
        r#"let var x: Integer; in x := "text";"#,
        "let var x: Integer; in return 1;",
        "let func f(): Integer return 1; in putint(1);",
    ];
    for src in cases {
        let error = emit(src).unwrap_err();
        assert!(matches!(error, Error::CodeGen { .. }), "{src}: {error:?}");
    }
}

#[test]
fn test_unsupported_call_points_at_callee() {
    let error = emit("let var x: Integer; in foo();").unwrap_err();
    assert_eq!(
        error,
        Error::CodeGen {
            node: "foo();".to_string(),
            span: Some(23..26),
        }
    );
}
