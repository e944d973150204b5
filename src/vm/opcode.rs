use num_derive::{FromPrimitive, ToPrimitive};

/// The first byte of every encoded op.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum OpCode {
    /// Followed by an `i64` constant
    PushConst = 0x01,
    /// Followed by a `u32` slot
    Load,
    /// Followed by a `u32` slot
    Store,
    Negate,
    Identity,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Eq,
    /// Followed by a `u32` address
    JumpIfFalse,
    /// Followed by a `u32` address
    Jump,
    /// Followed by the `u32` address just past the loop
    LoopBegin,
    LoopEnd,
    Print,
    Read,
    ReturnValue,
    ReturnVoid,
}
