#[cfg(test)]
mod test;

use crate::ast::Ident;
use crate::error::Error;
use std::collections::HashMap;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Const,
    /// A variable together with the name of its declared type.
    Var(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Storage name, unique across every frame of a compilation.
    pub mangled: String,
    pub kind: SymbolKind,
    pub initialized: bool,
}

impl Symbol {
    pub fn is_const(&self) -> bool {
        self.kind == SymbolKind::Const
    }
}

#[derive(Debug, Clone, Default)]
struct Frame {
    /// How many frames were pushed at this level before this one.
    sibling: usize,
    symbols: HashMap<String, Symbol>,
}

/// Stack of lexical frames, one per live `let`.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    frames: Vec<Frame>,
    /// Frames ever pushed per level, so later siblings get fresh names.
    pushed: Vec<usize>,
}

impl SymbolTable {
    pub fn enter_scope(&mut self) {
        let level = self.frames.len();
        if self.pushed.len() <= level {
            self.pushed.resize(level + 1, 0);
        }
        let sibling = self.pushed[level];
        self.pushed[level] += 1;
        self.frames.push(Frame {
            sibling,
            symbols: HashMap::new(),
        });
    }

    pub fn exit_scope(&mut self) {
        self.frames.pop();
    }

    /// Nesting depth of the innermost frame, the outermost `let` being 0.
    pub fn level(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    fn mangle(name: &str, level: usize, sibling: usize) -> String {
        // `@` never appears in an identifier
        if sibling == 0 {
            format!("{name}@{level}")
        } else {
            format!("{name}@{level}.{sibling}")
        }
    }

    /// Adds `ident` to the innermost frame and returns its storage name.
    /// Every binding starts uninitialized, constants included until their
    /// value is stored.
    pub fn declare(&mut self, ident: &Ident, kind: SymbolKind) -> Result<String> {
        let level = self.level();
        let Some(frame) = self.frames.last_mut() else {
            return Err(Error::CodeGen {
                node: format!("declaration of '{}' outside of a let", ident.name),
                span: Some(ident.span.clone()),
            });
        };
        if frame.symbols.contains_key(&ident.name) {
            return Err(Error::RepeatDeclaration {
                name: ident.name.clone(),
                level,
                span: ident.span.clone(),
            });
        }
        let mangled = Self::mangle(&ident.name, level, frame.sibling);
        frame.symbols.insert(
            ident.name.clone(),
            Symbol {
                mangled: mangled.clone(),
                kind,
                initialized: false,
            },
        );
        Ok(mangled)
    }

    fn nonexist(&self, ident: &Ident) -> Error {
        Error::Nonexist {
            name: ident.name.clone(),
            level: self.level(),
            span: ident.span.clone(),
        }
    }

    /// Finds the innermost symbol named `ident`.
    pub fn resolve(&self, ident: &Ident) -> Result<&Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.symbols.get(&ident.name))
            .ok_or_else(|| self.nonexist(ident))
    }

    fn resolve_mut(&mut self, ident: &Ident) -> Result<&mut Symbol> {
        let error = self.nonexist(ident);
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.symbols.get_mut(&ident.name))
            .ok_or(error)
    }

    pub fn mark_initialized(&mut self, ident: &Ident) -> Result<()> {
        self.resolve_mut(ident)?.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self, ident: &Ident) -> Result<bool> {
        Ok(self.resolve(ident)?.initialized)
    }

    pub fn is_const(&self, ident: &Ident) -> Result<bool> {
        Ok(self.resolve(ident)?.is_const())
    }
}
