//! The compiled program.

use std::fmt;

use crate::bytecode::{CodeStore, Instruction};
use crate::emit::PatchNote;

/// A finished mJAM program.
///
/// Addresses are instruction indices from `CB`. Execution starts at
/// address 0 with the entry sequence, which calls the entry method at
/// [`entry_addr`](Self::entry_addr) and halts when it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    lines: Vec<u32>,
    entry: usize,
    patches: Vec<PatchNote>,
}

impl Program {
    pub fn new(code: CodeStore, entry: usize, patches: Vec<PatchNote>) -> Self {
        let (instructions, lines) = code.into_parts();
        Self {
            instructions,
            lines,
            entry,
            patches,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn get(&self, addr: usize) -> Option<&Instruction> {
        self.instructions.get(addr)
    }

    /// Source line the instruction at `addr` was emitted for. The entry
    /// sequence and built-in bodies are on line 0.
    pub fn line_at(&self, addr: usize) -> Option<u32> {
        self.lines.get(addr).copied()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Code address of the entry method.
    pub fn entry_addr(&self) -> usize {
        self.entry
    }

    /// Resolved forward calls, in emission order.
    pub fn patches(&self) -> &[PatchNote] {
        &self.patches
    }

    /// Whether any jump or call still carries its placeholder operand.
    pub fn has_unpatched(&self) -> bool {
        self.instructions.iter().any(Instruction::is_unpatched)
    }
}

/// One instruction per line: address, source line, instruction.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (addr, (instr, line)) in self.instructions.iter().zip(&self.lines).enumerate() {
            writeln!(f, "{addr:>5}  {line:>4}  {instr}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Op, Prim, Reg};

    fn sample() -> Program {
        let mut code = CodeStore::new();
        code.push(Op::LoadL, 0, Reg::ZR, 0, 0);
        code.push(Op::Call, 0, Reg::PB, Prim::NewArr.into(), 0);
        code.push(Op::Call, 0, Reg::CB, 4, 0);
        code.push(Op::Halt, 0, Reg::ZR, 0, 0);
        code.push(Op::Return, 0, Reg::ZR, 1, 2);
        Program::new(code, 4, Vec::new())
    }

    #[test]
    fn accessors() {
        let program = sample();
        assert_eq!(program.len(), 5);
        assert_eq!(program.entry_addr(), 4);
        assert_eq!(program.line_at(4), Some(2));
        assert_eq!(program.get(3).map(|i| i.op), Some(Op::Halt));
        assert!(program.get(5).is_none());
        assert!(!program.has_unpatched());
    }

    #[test]
    fn placeholder_detected() {
        let mut code = CodeStore::new();
        code.push(Op::Jump, 0, Reg::CB, crate::bytecode::UNPATCHED, 0);
        let program = Program::new(code, 0, Vec::new());
        assert!(program.has_unpatched());
    }

    #[test]
    fn listing_has_one_line_per_instruction() {
        let listing = sample().to_string();
        assert_eq!(listing.lines().count(), 5);
        assert!(listing.lines().nth(1).is_some_and(|l| l.contains("newarr")));
        assert!(listing.lines().nth(3).is_some_and(|l| l.contains("HALT")));
    }
}
