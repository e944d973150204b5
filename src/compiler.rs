use crate::{
    assembler::assemble,
    ast::{outline, Program},
    emitter,
    error::Error,
    instruction::{listing, Instruction},
    lexer::tokenize,
    parser::parse,
    vm::Chunk,
};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Default, Clone, Copy)]
pub struct CompilerOptions {
    pub debug_tokens: bool,
    pub debug_ast: bool,
    pub listing: bool,
}

/// Runs the pipeline from source text to instructions or to an assembled
/// chunk. Debug switches dump each stage to stderr.
#[derive(Debug, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    pub fn debug_tokens(mut self, debug_tokens: bool) -> Self {
        self.options.debug_tokens = debug_tokens;
        self
    }

    pub fn debug_ast(mut self, debug_ast: bool) -> Self {
        self.options.debug_ast = debug_ast;
        self
    }

    pub fn listing(mut self, listing: bool) -> Self {
        self.options.listing = listing;
        self
    }

    pub fn options(&self) -> CompilerOptions {
        self.options
    }

    pub fn parse(&self, src: &str) -> Result<Program> {
        let tokens = tokenize(src)?;
        tracing::debug!(tokens = tokens.len(), "lexed");
        if self.options.debug_tokens {
            for token in tokens.iter() {
                eprintln!("{token}");
            }
        }

        let program = parse(&tokens)?;
        tracing::debug!("parsed");
        tracing::trace!(ast = ?program.command);
        if self.options.debug_ast {
            eprintln!("{}", outline(&program));
        }
        Ok(program)
    }

    pub fn generate(&self, src: &str) -> Result<Vec<Instruction>> {
        let program = self.parse(src)?;
        let instructions = emitter::generate(&program)?;
        tracing::debug!(instructions = instructions.len(), "generated");
        if self.options.listing {
            eprint!("{}", listing(&instructions));
        }
        Ok(instructions)
    }

    pub fn compile(&self, src: &str) -> Result<Chunk> {
        let instructions = self.generate(src)?;
        assemble(&instructions)
    }
}
