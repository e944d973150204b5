use super::Op;
use crate::error::Error;

/// Magic header of an encoded chunk, the last byte is the format version.
pub const MAGIC: &[u8; 4] = b"MTC\x01";

/// An assembled program: resolved ops plus the name behind every local slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    pub ops: Vec<Op>,
    pub locals: Vec<String>,
}

impl Chunk {
    pub fn new(ops: Vec<Op>, locals: Vec<String>) -> Self {
        Self { ops, locals }
    }

    /// Encodes the chunk. Counts and name lengths are stored as `u16`, so a
    /// chunk that overflows either is refused.
    pub fn to_bytecode(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = MAGIC.to_vec();
        let count = u16::try_from(self.locals.len()).map_err(|_| {
            Error::InvalidBytecode(format!("{} locals do not fit the header", self.locals.len()))
        })?;
        bytes.extend_from_slice(&count.to_le_bytes());
        for (slot, name) in self.locals.iter().enumerate() {
            let length = u16::try_from(name.len()).map_err(|_| {
                Error::InvalidBytecode(format!(
                    "name of local {slot} is {} bytes long",
                    name.len()
                ))
            })?;
            bytes.extend_from_slice(&length.to_le_bytes());
            bytes.extend_from_slice(name.as_bytes());
        }
        for op in self.ops.iter() {
            bytes.extend(op.to_bytecode());
        }
        Ok(bytes)
    }

    /// Name of the local behind `slot`, or the slot number if it has none.
    pub fn local_name(&self, slot: u32) -> String {
        self.locals
            .get(slot as usize)
            .cloned()
            .unwrap_or_else(|| format!("#{slot}"))
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, op) in self.ops.iter().enumerate() {
            match op {
                Op::Load(slot) | Op::Store(slot) => {
                    let text = op.to_string();
                    writeln!(f, "{index:04} {text:<24} ; {}", self.local_name(*slot))?
                }
                _ => writeln!(f, "{index:04} {op}")?,
            }
        }
        Ok(())
    }
}
