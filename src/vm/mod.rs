mod chunk;
mod decompile;
mod machine;
mod op;
mod opcode;
mod value;
pub use chunk::{Chunk, MAGIC};
pub use decompile::decompile;
pub use machine::{floor_div, floor_mod, Machine};
pub use op::Op;
pub use opcode::OpCode;
pub use value::Value;
