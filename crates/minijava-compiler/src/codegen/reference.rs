//! Reads and write targets of references.
//!
//! | reference | read | write |
//! |-----------|------|-------|
//! | `this` | `LOADA 0[OB]` | - |
//! | local or parameter | `LOAD d[LB]` | `STORE d[LB]` |
//! | static field | `LOAD d[SB]` | `STORE d[SB]` |
//! | own instance field | `LOAD d[OB]` | `STORE d[OB]` |
//! | `e.f` instance field | `e; LOADL d; fieldref` | `e; LOADL d; ... fieldupd` |
//! | `a.length` | `a; arraylen` | - |

use minijava_ast::{RefKind, Reference};
use minijava_core::DeclId;

use super::{CodeGenerator, RefTarget, bound};
use crate::bytecode::{Prim, Reg};
use crate::decls::DeclKind;
use crate::error::CodegenError;

impl CodeGenerator<'_> {
    /// Push the value a reference denotes.
    pub(super) fn push_ref(&mut self, reference: &Reference) -> Result<(), CodegenError> {
        match &reference.kind {
            RefKind::This => {
                self.emitter.emit_load_address(Reg::OB, 0);
                Ok(())
            }

            RefKind::Id(ident) => {
                let decl = bound(ident.decl, ident.span)?;
                let (reg, slot) = self.register_of(decl)?;
                self.emitter.emit_load(reg, slot);
                Ok(())
            }

            RefKind::Qualified { prefix, member } => {
                let decl = bound(member.decl, member.span)?;
                match self.table.get(decl).kind {
                    DeclKind::ArrayLength => {
                        self.push_ref(prefix)?;
                        self.emitter.emit_prim(Prim::ArrayLen);
                    }
                    DeclKind::Field { .. } if self.table.is_static(decl) => {
                        let slot = self.table.expect_slot(decl)?;
                        self.emitter.emit_load(Reg::SB, slot);
                    }
                    DeclKind::Field { .. } if prefix.is_this() => {
                        let slot = self.table.expect_slot(decl)?;
                        self.emitter.emit_load(Reg::OB, slot);
                    }
                    DeclKind::Field { .. } => {
                        self.push_ref(prefix)?;
                        let slot = self.table.expect_slot(decl)?;
                        self.emitter.emit_literal(slot);
                        self.emitter.emit_prim(Prim::FieldRef);
                    }
                    _ => {
                        return Err(CodegenError::WrongDeclKind {
                            decl,
                            expected: "field",
                        });
                    }
                }
                Ok(())
            }
        }
    }

    /// Prepare an assignment to `reference`.
    ///
    /// For a field reached through another object, the object address and
    /// field offset are pushed now, so the value must follow them.
    pub(super) fn write_target(
        &mut self,
        reference: &Reference,
    ) -> Result<RefTarget, CodegenError> {
        let invalid = CodegenError::InvalidTarget {
            line: reference.span.line,
        };

        match &reference.kind {
            RefKind::This => Err(invalid),

            RefKind::Id(ident) => {
                let decl = bound(ident.decl, ident.span)?;
                let (reg, slot) = self.register_of(decl)?;
                Ok(RefTarget::Register(reg, slot))
            }

            RefKind::Qualified { prefix, member } => {
                let decl = bound(member.decl, member.span)?;
                if !self.table.is_field(decl) {
                    return Err(invalid);
                }
                let slot = self.table.expect_slot(decl)?;
                if self.table.is_static(decl) {
                    Ok(RefTarget::Register(Reg::SB, slot))
                } else if prefix.is_this() {
                    Ok(RefTarget::Register(Reg::OB, slot))
                } else {
                    self.push_ref(prefix)?;
                    self.emitter.emit_literal(slot);
                    Ok(RefTarget::Indirect)
                }
            }
        }
    }

    /// Base register and offset of a variable or a field named directly.
    fn register_of(&self, decl: DeclId) -> Result<(Reg, i32), CodegenError> {
        let reg = match self.table.get(decl).kind {
            DeclKind::Local | DeclKind::Param => Reg::LB,
            DeclKind::Field { .. } if self.table.is_static(decl) => Reg::SB,
            DeclKind::Field { .. } => Reg::OB,
            _ => {
                return Err(CodegenError::WrongDeclKind {
                    decl,
                    expected: "variable",
                });
            }
        };
        Ok((reg, self.table.expect_slot(decl)?))
    }
}
