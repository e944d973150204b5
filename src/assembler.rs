use std::collections::HashMap;

use super::{
    error::Error,
    instruction::{Instruction, Label},
    vm::{Chunk, Op},
};

type Result<T> = std::result::Result<T, Error>;

/// Resolves labels to op indices and local names to slots.
pub fn assemble(instructions: &[Instruction]) -> Result<Chunk> {
    let addresses = label_addresses(instructions)?;
    let resolve = |label: Label| -> Result<u32> {
        addresses
            .get(&label)
            .copied()
            .ok_or(Error::UndefinedLabel(label))
    };

    let mut slots: HashMap<String, u32> = HashMap::new();
    let mut locals: Vec<String> = Vec::new();
    let mut slot_of = |name: &str| -> Result<u32> {
        if let Some(slot) = slots.get(name) {
            return Ok(*slot);
        }
        let slot = u16::try_from(locals.len())
            .map(u32::from)
            .map_err(|_| Error::InvalidBytecode(format!("too many locals at '{name}'")))?;
        slots.insert(name.to_string(), slot);
        locals.push(name.to_string());
        Ok(slot)
    };

    let mut ops = Vec::with_capacity(instructions.len());
    for instruction in instructions {
        let op = match instruction {
            Instruction::Label(_) => continue,
            Instruction::PushConst(value) => Op::PushConst(*value),
            Instruction::LoadLocal(name) => Op::Load(slot_of(name)?),
            Instruction::StoreLocal(name) => Op::Store(slot_of(name)?),
            Instruction::UnaryNegate => Op::Negate,
            Instruction::UnaryIdentity => Op::Identity,
            Instruction::Add => Op::Add,
            Instruction::Sub => Op::Sub,
            Instruction::Mul => Op::Mul,
            Instruction::Div => Op::Div,
            Instruction::Mod => Op::Mod,
            Instruction::CompareGt => Op::Gt,
            Instruction::CompareLt => Op::Lt,
            Instruction::CompareEq => Op::Eq,
            Instruction::JumpIfFalse(label) => Op::JumpIfFalse(resolve(*label)?),
            Instruction::Jump(label) => Op::Jump(resolve(*label)?),
            Instruction::LoopBegin(label) => Op::LoopBegin(resolve(*label)?),
            Instruction::LoopEnd => Op::LoopEnd,
            Instruction::Print => Op::Print,
            Instruction::ReadInput => Op::Read,
            Instruction::ReturnValue => Op::ReturnValue,
            Instruction::ReturnVoid => Op::ReturnVoid,
        };
        ops.push(op);
    }

    tracing::debug!(
        labels = addresses.len(),
        slots = locals.len(),
        ops = ops.len(),
        "assembled"
    );
    Ok(Chunk::new(ops, locals))
}

/// Index of the op that follows each label definition.
fn label_addresses(instructions: &[Instruction]) -> Result<HashMap<Label, u32>> {
    let mut addresses = HashMap::new();
    let mut index: u32 = 0;
    for instruction in instructions {
        match instruction {
            Instruction::Label(label) => {
                if addresses.insert(*label, index).is_some() {
                    return Err(Error::DuplicateLabel(*label));
                }
            }
            _ => index += 1,
        }
    }
    Ok(addresses)
}
