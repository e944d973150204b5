pub mod assembler;
pub mod ast;
pub mod cli;
pub mod compiler;
pub mod emitter;
pub mod error;
pub mod instruction;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod symbol_table;
pub mod token;
pub mod vm;
