use std::io::{BufRead, Write};

use super::{Chunk, Op, Value};
use crate::error::Error;

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Return(Option<Value>),
}

/// Executes a [`Chunk`], reading `getint` input from `input` and writing
/// `putint` output to `output`.
pub struct Machine<R, W> {
    chunk: Chunk,
    ip: usize,
    stack: Vec<Value>,
    locals: Vec<Option<Value>>,
    input: R,
    output: W,
    step_limit: Option<usize>,
    steps: usize,
}

impl<R: BufRead, W: Write> Machine<R, W> {
    pub fn new(chunk: Chunk, input: R, output: W) -> Self {
        let locals = vec![None; chunk.locals.len()];
        Self {
            chunk,
            ip: 0,
            stack: Vec::new(),
            locals,
            input,
            output,
            step_limit: None,
            steps: 0,
        }
    }

    /// Fails the run with [`Error::StepLimit`] after `limit` executed ops.
    pub fn with_step_limit(mut self, limit: Option<usize>) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Runs until a return op and hands back the returned value, if any.
    pub fn run(&mut self) -> Result<Option<Value>> {
        tracing::debug!(ops = self.chunk.ops.len(), "machine started");
        loop {
            match self.run_once() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Return(value)) => {
                    tracing::debug!(steps = self.steps, ?value, "machine finished");
                    self.output.flush()?;
                    return Ok(value);
                }
                Err(error) => {
                    tracing::debug!(steps = self.steps, ip = self.ip, %error, "machine failed");
                    return Err(error);
                }
            }
        }
    }

    fn run_once(&mut self) -> Result<Flow> {
        if let Some(limit) = self.step_limit {
            if self.steps >= limit {
                return Err(Error::StepLimit(limit));
            }
        }
        let ip = self.ip;
        let Some(op) = self.chunk.ops.get(ip).copied() else {
            return Err(Error::InvalidBytecode(format!(
                "ran past the last op at {ip}"
            )));
        };
        tracing::trace!(ip, %op, depth = self.stack.len(), "step");
        self.steps += 1;
        self.ip += 1;

        match op {
            Op::PushConst(value) => self.stack.push(Value::Int(value)),
            Op::Load(slot) => {
                let value = self.local(slot)?;
                self.stack.push(value);
            }
            Op::Store(slot) => {
                let value = self.pop()?;
                self.set_local(slot, value)?;
            }
            Op::Negate => {
                let value = self.pop()?.as_int();
                self.stack.push(Value::Int(value.wrapping_neg()));
            }
            Op::Identity => {
                let value = self.pop()?;
                self.stack.push(value);
            }
            Op::Add => self.arithmetic(i64::wrapping_add)?,
            Op::Sub => self.arithmetic(i64::wrapping_sub)?,
            Op::Mul => self.arithmetic(i64::wrapping_mul)?,
            Op::Div => {
                let (left, right) = self.operands()?;
                if right == 0 {
                    return Err(Error::DivisionByZero { ip });
                }
                self.stack.push(Value::Int(floor_div(left, right)));
            }
            Op::Mod => {
                let (left, right) = self.operands()?;
                if right == 0 {
                    return Err(Error::DivisionByZero { ip });
                }
                self.stack.push(Value::Int(floor_mod(left, right)));
            }
            Op::Gt => self.compare(|left, right| left > right)?,
            Op::Lt => self.compare(|left, right| left < right)?,
            Op::Eq => self.compare(|left, right| left == right)?,
            Op::JumpIfFalse(address) => {
                if !self.pop()?.is_truthy() {
                    self.ip = address as usize;
                }
            }
            Op::Jump(address) => self.ip = address as usize,
            Op::LoopBegin(_) | Op::LoopEnd => {}
            Op::Print => {
                let value = self.pop()?;
                writeln!(self.output, "{}", value.as_int())?;
            }
            Op::Read => {
                let value = self.read_int()?;
                self.stack.push(Value::Int(value));
            }
            Op::ReturnValue => return Ok(Flow::Return(Some(self.pop()?))),
            Op::ReturnVoid => return Ok(Flow::Return(None)),
        }
        Ok(Flow::Continue)
    }

    fn pop(&mut self) -> Result<Value> {
        self.stack
            .pop()
            .ok_or(Error::StackUnderflow { ip: self.ip - 1 })
    }

    /// Pops the right operand, then the left one.
    fn operands(&mut self) -> Result<(i64, i64)> {
        let right = self.pop()?.as_int();
        let left = self.pop()?.as_int();
        Ok((left, right))
    }

    fn arithmetic(&mut self, f: impl FnOnce(i64, i64) -> i64) -> Result<()> {
        let (left, right) = self.operands()?;
        self.stack.push(Value::Int(f(left, right)));
        Ok(())
    }

    fn compare(&mut self, f: impl FnOnce(i64, i64) -> bool) -> Result<()> {
        let (left, right) = self.operands()?;
        self.stack.push(Value::Bool(f(left, right)));
        Ok(())
    }

    fn local(&self, slot: u32) -> Result<Value> {
        match self.locals.get(slot as usize) {
            Some(Some(value)) => Ok(*value),
            Some(None) => Err(Error::UnsetLocal {
                name: self.chunk.local_name(slot),
                ip: self.ip - 1,
            }),
            None => Err(Error::InvalidBytecode(format!("no local slot {slot}"))),
        }
    }

    fn set_local(&mut self, slot: u32, value: Value) -> Result<()> {
        let Some(local) = self.locals.get_mut(slot as usize) else {
            return Err(Error::InvalidBytecode(format!("no local slot {slot}")));
        };
        *local = Some(value);
        Ok(())
    }

    fn read_int(&mut self) -> Result<i64> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InvalidInput("end of input".to_string()));
        }
        let line = line.trim();
        line.parse()
            .map_err(|_| Error::InvalidInput(line.to_string()))
    }
}

/// Integer division rounding toward negative infinity.
pub fn floor_div(left: i64, right: i64) -> i64 {
    let quotient = left.wrapping_div(right);
    if left.wrapping_rem(right) != 0 && ((left < 0) != (right < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

/// Remainder that takes the sign of the divisor.
pub fn floor_mod(left: i64, right: i64) -> i64 {
    let remainder = left.wrapping_rem(right);
    if remainder != 0 && ((remainder < 0) != (right < 0)) {
        remainder + right
    } else {
        remainder
    }
}
