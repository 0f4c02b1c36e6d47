//! A single mJAM instruction.

use std::fmt;

use super::{Op, Prim, Reg};

/// Placeholder operand of a jump or call whose target is not yet known.
pub(crate) const UNPATCHED: i32 = -1;

/// One instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub op: Op,
    /// Count operand (`RETURN` results, `JUMPIF` test value).
    pub n: i32,
    pub r: Reg,
    /// Displacement, literal or code address.
    pub d: i32,
}

impl Instruction {
    pub fn new(op: Op, n: i32, r: Reg, d: i32) -> Self {
        Self { op, n, r, d }
    }

    /// The primitive called, for `CALL PB d`.
    pub fn prim(&self) -> Option<Prim> {
        if self.op == Op::Call && self.r == Reg::PB {
            Prim::try_from(self.d).ok()
        } else {
            None
        }
    }

    /// Whether this is a code-relative jump or call still carrying the placeholder.
    pub fn is_unpatched(&self) -> bool {
        matches!(self.op, Op::Jump | Op::JumpIf | Op::Call | Op::CallI)
            && self.r == Reg::CB
            && self.d == UNPATCHED
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prim) = self.prim() {
            return write!(f, "CALL {}", prim);
        }
        match self.op {
            Op::Load | Op::LoadA | Op::Store | Op::Call | Op::CallI | Op::Jump => {
                write!(f, "{} {}[{}]", self.op, self.d, self.r)
            }
            Op::JumpIf => write!(f, "{} ({}) {}[{}]", self.op, self.n, self.d, self.r),
            Op::Return => write!(f, "{} ({}) {}", self.op, self.n, self.d),
            Op::LoadL | Op::Push | Op::Pop => write!(f, "{} {}", self.op, self.d),
            Op::LoadI | Op::StoreI | Op::CallD | Op::JumpI | Op::Halt => {
                write!(f, "{}", self.op)
            }
        }
    }
}
