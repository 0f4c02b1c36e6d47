//! Forward call patching.
//!
//! A call to a method that has no code address yet is emitted with a
//! placeholder operand and a [`PatchNote`]. Once every method has been
//! emitted, [`PatchTable::resolve`] writes the real addresses in one pass.

use minijava_core::DeclId;

use crate::bytecode::CodeStore;
use crate::decls::DeclTable;
use crate::error::CodegenError;

/// A call instruction waiting for its target's address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchNote {
    /// Address of the call instruction.
    pub addr: usize,
    /// Method being called.
    pub target: DeclId,
}

/// Pending patch notes, in emission order.
#[derive(Debug, Default)]
pub struct PatchTable {
    notes: Vec<PatchNote>,
}

impl PatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, addr: usize, target: DeclId) {
        self.notes.push(PatchNote { addr, target });
    }

    /// Write every target's code address into its call instruction.
    ///
    /// Fails on the first note whose target never received an address.
    pub fn resolve(
        self,
        code: &mut CodeStore,
        table: &DeclTable,
    ) -> Result<Vec<PatchNote>, CodegenError> {
        for note in &self.notes {
            let target = table
                .slot(note.target)
                .ok_or(CodegenError::UnresolvedPatch {
                    addr: note.addr,
                    target: note.target,
                })?;
            if !code.patch(note.addr, target) {
                return Err(CodegenError::UnresolvedPatch {
                    addr: note.addr,
                    target: note.target,
                });
            }
            tracing::trace!(addr = note.addr, target, "patched call");
        }
        Ok(self.notes)
    }
}
