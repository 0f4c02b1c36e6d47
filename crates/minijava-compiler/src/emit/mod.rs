//! Instruction emitter for the code generator.
//!
//! The [`Emitter`] wraps the [`CodeStore`] with typed helpers for each
//! instruction form, forward jumps ([`JumpLabel`]) and forward calls
//! (recorded in the [`PatchTable`]).
//!
//! # Example
//!
//! ```
//! use minijava_compiler::bytecode::{Op, Prim};
//! use minijava_compiler::emit::Emitter;
//!
//! let mut emitter = Emitter::new();
//! emitter.emit_literal(1);
//! let skip = emitter.emit_jump_if(0);
//! emitter.emit_literal(2);
//! emitter.emit_prim(Prim::PutIntNl);
//! emitter.patch_jump(skip);
//! emitter.emit_halt();
//!
//! assert_eq!(emitter.code().get(1).map(|i| i.d), Some(4));
//! assert_eq!(emitter.code().get(4).map(|i| i.op), Some(Op::Halt));
//! ```

mod patches;

pub use patches::{PatchNote, PatchTable};

use minijava_core::DeclId;

use crate::bytecode::{CodeStore, Op, Prim, Reg, UNPATCHED};
use crate::decls::DeclTable;
use crate::error::CodegenError;

/// Emits mJAM instructions.
#[derive(Debug, Default)]
pub struct Emitter {
    code: CodeStore,
    patches: PatchTable,
    /// Current source line for debug info
    current_line: u32,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set current source line for debug info.
    pub fn set_line(&mut self, line: u32) {
        self.current_line = line;
    }

    pub fn code(&self) -> &CodeStore {
        &self.code
    }

    /// Address of the next instruction.
    pub fn current_addr(&self) -> usize {
        self.code.next_addr()
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Emit one instruction and return its address.
    pub fn emit(&mut self, op: Op, n: i32, r: Reg, d: i32) -> usize {
        self.code.push(op, n, r, d, self.current_line)
    }

    /// `CALL PB prim`
    pub fn emit_prim(&mut self, prim: Prim) {
        self.emit(Op::Call, 0, Reg::PB, i32::from(prim));
    }

    /// `LOADL value`
    pub fn emit_literal(&mut self, value: i32) {
        self.emit(Op::LoadL, 0, Reg::ZR, value);
    }

    /// `LOAD d[r]`
    pub fn emit_load(&mut self, r: Reg, d: i32) {
        self.emit(Op::Load, 0, r, d);
    }

    /// `LOADA d[r]`
    pub fn emit_load_address(&mut self, r: Reg, d: i32) {
        self.emit(Op::LoadA, 0, r, d);
    }

    /// `STORE d[r]`
    pub fn emit_store(&mut self, r: Reg, d: i32) {
        self.emit(Op::Store, 0, r, d);
    }

    /// `PUSH count`, skipped when there is nothing to reserve.
    pub fn emit_push(&mut self, count: i32) {
        if count > 0 {
            self.emit(Op::Push, 0, Reg::ZR, count);
        }
    }

    /// `POP count`, skipped when there is nothing to drop.
    pub fn emit_pop(&mut self, count: i32) {
        if count > 0 {
            self.emit(Op::Pop, 0, Reg::ZR, count);
        }
    }

    /// `RETURN (results) args`
    pub fn emit_return(&mut self, results: i32, args: i32) {
        self.emit(Op::Return, results, Reg::ZR, args);
    }

    pub fn emit_halt(&mut self) {
        self.emit(Op::Halt, 0, Reg::ZR, 0);
    }

    // ==========================================================================
    // Jumps
    // ==========================================================================

    /// Emit an unconditional forward jump.
    ///
    /// Returns a label that must be patched later with [`patch_jump`](Self::patch_jump).
    pub fn emit_jump(&mut self) -> JumpLabel {
        JumpLabel(self.emit(Op::Jump, 0, Reg::CB, UNPATCHED))
    }

    /// Emit a forward jump taken when the popped word equals `value`.
    pub fn emit_jump_if(&mut self, value: i32) -> JumpLabel {
        JumpLabel(self.emit(Op::JumpIf, value, Reg::CB, UNPATCHED))
    }

    /// Emit an unconditional jump to a known address.
    pub fn emit_jump_to(&mut self, target: usize) {
        self.emit(Op::Jump, 0, Reg::CB, target as i32);
    }

    /// Patch a forward jump to the current position.
    pub fn patch_jump(&mut self, label: JumpLabel) {
        let here = self.current_addr();
        self.patch_jump_to(label, here);
    }

    /// Patch a jump to an arbitrary (usually earlier) address.
    pub fn patch_jump_to(&mut self, label: JumpLabel, target: usize) {
        self.code.patch(label.0, target as i32);
    }

    // ==========================================================================
    // Calls
    // ==========================================================================

    /// Emit `CALL` (static) or `CALLI` (instance) to a method.
    ///
    /// Without a known address the call gets a placeholder and a patch note.
    pub fn emit_call(&mut self, instance: bool, target: DeclId, addr: Option<i32>) {
        let op = if instance { Op::CallI } else { Op::Call };
        match addr {
            Some(addr) => {
                self.emit(op, 0, Reg::CB, addr);
            }
            None => {
                let at = self.emit(op, 0, Reg::CB, UNPATCHED);
                self.patches.record(at, target);
            }
        }
    }

    /// Emit a call that is always patched, even if the address is known.
    pub fn emit_patched_call(&mut self, target: DeclId) {
        let at = self.emit(Op::Call, 0, Reg::CB, UNPATCHED);
        self.patches.record(at, target);
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    /// Resolve all patch notes and return the finished stream.
    pub fn finish(self, table: &DeclTable) -> Result<(CodeStore, Vec<PatchNote>), CodegenError> {
        let mut code = self.code;
        let notes = self.patches.resolve(&mut code, table)?;
        Ok((code, notes))
    }
}

/// A label for a forward jump that needs patching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpLabel(pub(crate) usize);
