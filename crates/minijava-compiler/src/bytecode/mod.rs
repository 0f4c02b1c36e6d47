//! mJAM instruction types.
//!
//! This module contains the target machine's instruction set:
//!
//! - [`Op`], [`Reg`] and [`Prim`] - operations, registers and primitive routines
//! - [`Instruction`] - one `{op, n, r, d}` word
//! - [`CodeStore`] - the append-only instruction stream
//!
//! Value representations shared by folding and emitted comparisons live here
//! as well.

mod chunk;
mod instruction;
mod opcode;

pub use chunk::CodeStore;
pub use instruction::Instruction;
pub(crate) use instruction::UNPATCHED;
pub use opcode::{Op, Prim, Reg};

/// Machine word for `true`.
pub const TRUE_REP: i32 = 1;
/// Machine word for `false`.
pub const FALSE_REP: i32 = 0;
/// Machine word for `null`.
pub const NULL_REP: i32 = 0;
/// Words in an activation record (dynamic link, static link, return address).
pub const LINK_DATA_SIZE: i32 = 3;

/// Machine word for a boolean.
pub fn bool_rep(value: bool) -> i32 {
    if value { TRUE_REP } else { FALSE_REP }
}
