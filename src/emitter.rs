#[cfg(test)]
mod test;

use std::cmp::Ordering;

use super::{
    ast::{
        Arguments, BinaryOp, Command, Declaration, Expression, Ident, Program, Span, UnaryOp,
        Vname,
    },
    error::Error,
    instruction::{Instruction, Label},
    symbol_table::{SymbolKind, SymbolTable},
};

type Result<T> = std::result::Result<T, Error>;

/// Generates the instruction sequence for a program whose top command is a
/// `let`.
pub fn generate(program: &Program) -> Result<Vec<Instruction>> {
    Emitter::default().generate(program)
}

/// Single pass code generator. Tracks the operand stack depth of everything it
/// emits so an unbalanced sequence is caught before it leaves the compiler.
#[derive(Debug, Default)]
pub struct Emitter {
    program: Vec<Instruction>,
    symbol_table: SymbolTable,
    depth: isize,
    label_counter: usize,
}

impl Emitter {
    pub fn generate(mut self, program: &Program) -> Result<Vec<Instruction>> {
        if !matches!(program.command, Command::Let(..)) {
            return Err(Self::unsupported(&program.command, None));
        }

        self.command(&program.command)?;

        match self.depth.cmp(&0) {
            Ordering::Equal => self.emit(Instruction::ReturnVoid)?,
            Ordering::Greater => self.emit(Instruction::ReturnValue)?,
            Ordering::Less => return Err(Error::EmptyStack),
        }
        Ok(self.program)
    }

    fn unsupported(node: &impl std::fmt::Display, span: Option<Span>) -> Error {
        let text = node.to_string();
        let node = text.lines().next().unwrap_or_default().trim().to_string();
        Error::CodeGen { node, span }
    }

    fn emit(&mut self, instruction: Instruction) -> Result<()> {
        self.depth += instruction.stack_effect();
        if self.depth < 0 {
            return Err(Error::EmptyStack);
        }
        self.program.push(instruction);
        Ok(())
    }

    fn new_label(&mut self) -> Label {
        let label = Label(self.label_counter);
        self.label_counter += 1;
        label
    }

    /// Runs `f` inside a fresh frame; the frame is gone once `f` returns.
    fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.symbol_table.enter_scope();
        let result = f(self);
        self.symbol_table.exit_scope();
        result
    }

    fn command(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::Assign(vname, expr) => {
                self.expression(expr)?;
                self.store(vname)
            }
            Command::Call(name) => Err(Self::unsupported(command, Some(name.span.clone()))),
            Command::CallWithArgs(name, args) => self.call(command, name, args),
            Command::Sequential(first, second) => {
                self.command(first)?;
                self.command(second)
            }
            Command::If(cond, then, otherwise) => {
                let else_label = self.new_label();
                let end_label = self.new_label();
                self.expression(cond)?;
                self.emit(Instruction::JumpIfFalse(else_label))?;
                self.command(then)?;
                self.emit(Instruction::Jump(end_label))?;
                self.emit(Instruction::Label(else_label))?;
                self.command(otherwise)?;
                self.emit(Instruction::Label(end_label))
            }
            Command::While(cond, body) => {
                let loop_label = self.new_label();
                let cond_label = self.new_label();
                let end_label = self.new_label();
                self.emit(Instruction::LoopBegin(loop_label))?;
                self.emit(Instruction::Label(cond_label))?;
                self.expression(cond)?;
                self.emit(Instruction::JumpIfFalse(end_label))?;
                self.command(body)?;
                self.emit(Instruction::Jump(cond_label))?;
                self.emit(Instruction::Label(end_label))?;
                self.emit(Instruction::LoopEnd)?;
                self.emit(Instruction::Label(loop_label))
            }
            Command::Let(decl, body) => self.scoped(|this| {
                this.declaration(decl)?;
                this.command(body)
            }),
            Command::Return(_) => Err(Self::unsupported(command, None)),
        }
    }

    /// Pops the top of the stack into `vname`, which must not be a constant.
    fn store(&mut self, vname: &Vname) -> Result<()> {
        let ident = vname.ident();
        let symbol = self.symbol_table.resolve(ident)?;
        if symbol.is_const() {
            return Err(Error::UnChangable {
                name: ident.name.clone(),
                level: self.symbol_table.level(),
                span: ident.span.clone(),
            });
        }
        let mangled = symbol.mangled.clone();
        self.emit(Instruction::StoreLocal(mangled))?;
        self.symbol_table.mark_initialized(ident)
    }

    fn call(&mut self, command: &Command, name: &Ident, args: &Arguments) -> Result<()> {
        match (name.name.as_str(), args) {
            ("putint", Arguments::Single(expr)) => {
                self.expression(expr)?;
                self.emit(Instruction::Print)
            }
            ("getint", Arguments::Single(Expression::Vname(vname))) => {
                self.emit(Instruction::ReadInput)?;
                self.store(vname)
            }
            _ => Err(Self::unsupported(command, Some(name.span.clone()))),
        }
    }

    fn declaration(&mut self, decl: &Declaration) -> Result<()> {
        match decl {
            Declaration::Var(name, type_denoter) => {
                let kind = SymbolKind::Var(type_denoter.0.name.clone());
                self.symbol_table.declare(name, kind)?;
                Ok(())
            }
            Declaration::Const(name, expr) => {
                let mangled = self.symbol_table.declare(name, SymbolKind::Const)?;
                // visible but unset while its own initializer runs
                self.expression(expr)?;
                self.emit(Instruction::StoreLocal(mangled))?;
                self.symbol_table.mark_initialized(name)
            }
            Declaration::Function { name, .. } => {
                Err(Self::unsupported(decl, Some(name.span.clone())))
            }
            Declaration::Sequential(first, second) => {
                self.declaration(first)?;
                self.declaration(second)
            }
        }
    }

    fn expression(&mut self, expr: &Expression) -> Result<()> {
        match expr {
            Expression::IntegerLiteral(value) => self.emit(Instruction::PushConst(*value)),
            Expression::Vname(vname) => {
                let ident = vname.ident();
                let symbol = self.symbol_table.resolve(ident)?;
                if !symbol.initialized {
                    return Err(Error::NoAssignment {
                        name: ident.name.clone(),
                        level: self.symbol_table.level(),
                        span: ident.span.clone(),
                    });
                }
                let mangled = symbol.mangled.clone();
                self.emit(Instruction::LoadLocal(mangled))
            }
            Expression::Unary(op, operand) => {
                self.expression(operand)?;
                match op {
                    UnaryOp::Minus => self.emit(Instruction::UnaryNegate),
                    UnaryOp::Plus => self.emit(Instruction::UnaryIdentity),
                }
            }
            Expression::Binary(lhs, op, rhs) => {
                self.expression(lhs)?;
                self.expression(rhs)?;
                let instruction = match op {
                    BinaryOp::Add => Instruction::Add,
                    BinaryOp::Sub => Instruction::Sub,
                    BinaryOp::Mul => Instruction::Mul,
                    BinaryOp::Div => Instruction::Div,
                    BinaryOp::Mod => Instruction::Mod,
                    BinaryOp::Gt => Instruction::CompareGt,
                    BinaryOp::Lt => Instruction::CompareLt,
                    BinaryOp::Eq => Instruction::CompareEq,
                };
                self.emit(instruction)
            }
            Expression::StringLiteral(_) => Err(Self::unsupported(expr, None)),
            Expression::FunctionCall(name, _) => {
                Err(Self::unsupported(expr, Some(name.span.clone())))
            }
        }
    }
}
