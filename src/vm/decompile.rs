use super::{chunk::MAGIC, Chunk, Op, OpCode};
use crate::error::Error;
use num_traits::FromPrimitive;

type Result<T> = std::result::Result<T, Error>;

/// Rebuilds a chunk from the bytes written by [`Chunk::to_bytecode`].
pub fn decompile(bytes: &[u8]) -> Result<Chunk> {
    if !bytes.starts_with(MAGIC) {
        return Err(Error::InvalidBytecode("missing MTC header".to_string()));
    }
    let mut ip = MAGIC.len();

    let count = u16::from_le_bytes(take(bytes, &mut ip)?);
    let mut locals = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let length = u16::from_le_bytes(take(bytes, &mut ip)?) as usize;
        let name = take_slice(bytes, &mut ip, length)?;
        let name = String::from_utf8(name.to_vec())
            .map_err(|_| Error::InvalidBytecode(format!("local {} is not utf-8", locals.len())))?;
        locals.push(name);
    }

    let mut ops = Vec::new();
    while ip < bytes.len() {
        ops.push(get_op(bytes, &mut ip)?);
    }

    for op in ops.iter() {
        if let Op::Load(slot) | Op::Store(slot) = op {
            if *slot as usize >= locals.len() {
                return Err(Error::InvalidBytecode(format!(
                    "slot {slot} is out of range for {} locals",
                    locals.len()
                )));
            }
        }
    }
    Ok(Chunk::new(ops, locals))
}

pub fn get_op(bytes: &[u8], ip: &mut usize) -> Result<Op> {
    let start = *ip;
    let [byte] = take::<1>(bytes, ip)?;
    let Some(opcode) = OpCode::from_u8(byte) else {
        return Err(Error::InvalidBytecode(format!(
            "unknown opcode {byte:#04x} at byte {start}"
        )));
    };

    let op = match opcode {
        OpCode::PushConst => Op::PushConst(i64::from_le_bytes(take(bytes, ip)?)),
        OpCode::Load => Op::Load(u32::from_le_bytes(take(bytes, ip)?)),
        OpCode::Store => Op::Store(u32::from_le_bytes(take(bytes, ip)?)),
        OpCode::Negate => Op::Negate,
        OpCode::Identity => Op::Identity,
        OpCode::Add => Op::Add,
        OpCode::Sub => Op::Sub,
        OpCode::Mul => Op::Mul,
        OpCode::Div => Op::Div,
        OpCode::Mod => Op::Mod,
        OpCode::Gt => Op::Gt,
        OpCode::Lt => Op::Lt,
        OpCode::Eq => Op::Eq,
        OpCode::JumpIfFalse => Op::JumpIfFalse(u32::from_le_bytes(take(bytes, ip)?)),
        OpCode::Jump => Op::Jump(u32::from_le_bytes(take(bytes, ip)?)),
        OpCode::LoopBegin => Op::LoopBegin(u32::from_le_bytes(take(bytes, ip)?)),
        OpCode::LoopEnd => Op::LoopEnd,
        OpCode::Print => Op::Print,
        OpCode::Read => Op::Read,
        OpCode::ReturnValue => Op::ReturnValue,
        OpCode::ReturnVoid => Op::ReturnVoid,
    };
    Ok(op)
}

fn take_slice<'a>(bytes: &'a [u8], ip: &mut usize, length: usize) -> Result<&'a [u8]> {
    let Some(slice) = bytes.get(*ip..*ip + length) else {
        return Err(Error::InvalidBytecode(format!(
            "expected {length} more bytes at byte {ip} but the input ends at {}",
            bytes.len()
        )));
    };
    *ip += length;
    Ok(slice)
}

fn take<const N: usize>(bytes: &[u8], ip: &mut usize) -> Result<[u8; N]> {
    let slice = take_slice(bytes, ip, N)?;
    let mut array = [0; N];
    array.copy_from_slice(slice);
    Ok(array)
}
