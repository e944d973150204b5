use super::{Symbol, SymbolKind, SymbolTable};
use crate::ast::Ident;
use crate::error::Error;
use pretty_assertions::assert_eq;

fn integer() -> SymbolKind {
    SymbolKind::Var("Integer".to_string())
}

#[test]
fn test_declare_and_resolve() {
    let mut table = SymbolTable::default();
    table.enter_scope();
    let x = Ident::fake("x");
    assert_eq!(table.declare(&x, integer()).unwrap(), "x@0");
    assert_eq!(
        table.resolve(&x).unwrap(),
        &Symbol {
            mangled: "x@0".to_string(),
            kind: integer(),
            initialized: false,
        }
    );
    assert!(!table.is_const(&x).unwrap());
    assert!(!table.is_initialized(&x).unwrap());
}

#[test]
fn test_constants_are_unreadable_until_stored() {
    let mut table = SymbolTable::default();
    table.enter_scope();
    let n = Ident::fake("n");
    table.declare(&n, SymbolKind::Const).unwrap();
    assert!(table.is_const(&n).unwrap());
    assert!(!table.is_initialized(&n).unwrap());
    table.mark_initialized(&n).unwrap();
    assert!(table.is_initialized(&n).unwrap());
}

#[test]
fn test_repeat_declaration_in_one_frame() {
    let mut table = SymbolTable::default();
    table.enter_scope();
    table.declare(&Ident::fake("x"), integer()).unwrap();
    let error = table
        .declare(&Ident::new("x", 20..21), SymbolKind::Const)
        .unwrap_err();
    assert_eq!(
        error,
        Error::RepeatDeclaration {
            name: "x".to_string(),
            level: 0,
            span: 20..21,
        }
    );
}

#[test]
fn test_missing_name() {
    let mut table = SymbolTable::default();
    table.enter_scope();
    table.enter_scope();
    let error = table.resolve(&Ident::new("y", 3..4)).unwrap_err();
    assert_eq!(
        error,
        Error::Nonexist {
            name: "y".to_string(),
            level: 1,
            span: 3..4,
        }
    );
    assert!(table.mark_initialized(&Ident::fake("y")).is_err());
}

#[test]
fn test_shadowing_keeps_outer_state() {
    let mut table = SymbolTable::default();
    let x = Ident::fake("x");
    table.enter_scope();
    let outer = table.declare(&x, integer()).unwrap();
    table.mark_initialized(&x).unwrap();

    table.enter_scope();
    let inner = table.declare(&x, integer()).unwrap();
    assert_ne!(outer, inner, "shadowing binds a new slot");
    assert!(!table.is_initialized(&x).unwrap(), "inner x is fresh");
    table.mark_initialized(&x).unwrap();
    table.exit_scope();

    let symbol = table.resolve(&x).unwrap();
    assert_eq!(symbol.mangled, outer);
    assert!(symbol.initialized);
}

#[test]
fn test_inner_assignment_does_not_initialize_outer() {
    let mut table = SymbolTable::default();
    let x = Ident::fake("x");
    table.enter_scope();
    table.declare(&x, integer()).unwrap();
    table.enter_scope();
    table.declare(&x, integer()).unwrap();
    table.mark_initialized(&x).unwrap();
    table.exit_scope();
    assert!(!table.is_initialized(&x).unwrap());
}

#[test]
fn test_sibling_frames_get_distinct_names() {
    let mut table = SymbolTable::default();
    let y = Ident::fake("y");
    table.enter_scope();

    table.enter_scope();
    let first = table.declare(&y, integer()).unwrap();
    table.exit_scope();

    table.enter_scope();
    let second = table.declare(&y, integer()).unwrap();
    table.exit_scope();

    assert_eq!(first, "y@1");
    assert_eq!(second, "y@1.1");
    assert_eq!(table.level(), 0);
}

#[test]
fn test_mangling_cannot_collide_with_identifiers() {
    let mut table = SymbolTable::default();
    for _ in 0..12 {
        table.enter_scope();
    }
    let deep = table.declare(&Ident::fake("x"), integer()).unwrap();
    assert_eq!(deep, "x@11");
    for _ in 0..11 {
        table.exit_scope();
    }
    table.enter_scope();
    let shallow = table.declare(&Ident::fake("x1"), integer()).unwrap();
    assert_eq!(shallow, "x1@1.1");
    assert_ne!(deep, shallow);
}
