//! VM output module: instruction forms and the line writer.

mod instruction;
mod writer;

pub use self::instruction::{ArithOp, Instruction, Segment};
pub use self::writer::Writer;
