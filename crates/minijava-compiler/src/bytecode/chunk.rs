//! The instruction stream.

use super::{Instruction, Op, Reg};

/// Append-only instruction stream with in-place operand patching.
///
/// Addresses are instruction indices relative to `CB`. Each instruction
/// remembers the source line it was emitted for.
#[derive(Debug, Clone, Default)]
pub struct CodeStore {
    code: Vec<Instruction>,
    /// Source line per instruction (parallel to `code`).
    lines: Vec<u32>,
}

impl CodeStore {
    /// Create a new empty code store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction and return its address.
    pub fn push(&mut self, op: Op, n: i32, r: Reg, d: i32, line: u32) -> usize {
        self.code.push(Instruction::new(op, n, r, d));
        self.lines.push(line);
        self.code.len() - 1
    }

    /// Address the next instruction will get.
    pub fn next_addr(&self) -> usize {
        self.code.len()
    }

    /// Overwrite the `d` operand of the instruction at `addr`.
    ///
    /// Returns `false` if there is no such instruction.
    pub fn patch(&mut self, addr: usize, d: i32) -> bool {
        match self.code.get_mut(addr) {
            Some(instr) => {
                instr.d = d;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, addr: usize) -> Option<&Instruction> {
        self.code.get(addr)
    }

    /// Source line of the instruction at `addr`.
    pub fn line_at(&self, addr: usize) -> Option<u32> {
        self.lines.get(addr).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Split into instructions and their source lines.
    pub fn into_parts(self) -> (Vec<Instruction>, Vec<u32>) {
        (self.code, self.lines)
    }
}
