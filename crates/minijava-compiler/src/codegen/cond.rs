//! Conditions compiled to jumping code.
//!
//! `gen_cond(expr, when)` emits code that jumps when `expr` evaluates to
//! `when` and falls through otherwise. `&&`, `||` and `!` become jump chains,
//! so a short-circuit condition never materializes a boolean.

use minijava_ast::{Expr, ExprKind, UnaryOp};

use super::fold::logical_decisive;
use super::{CodeGenerator, Flow, Value};
use crate::bytecode::{TRUE_REP, bool_rep};
use crate::emit::JumpLabel;
use crate::error::CodegenError;

/// A compiled condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Cond {
    /// Known at compile time; nothing was emitted.
    Known(bool),
    /// Jumps taken when the condition has the requested value. Falling
    /// through means it has the other value.
    Jumps(Vec<JumpLabel>),
}

impl CodeGenerator<'_> {
    pub(super) fn gen_cond(
        &mut self,
        expr: &Expr,
        when: bool,
        flow: Flow,
    ) -> Result<Cond, CodegenError> {
        if let Some(value) = self.known_value(expr, flow) {
            return Ok(Cond::Known(value == TRUE_REP));
        }

        match &expr.kind {
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => Ok(match self.gen_cond(operand, !when, flow)? {
                Cond::Known(value) => Cond::Known(!value),
                jumps => jumps,
            }),

            ExprKind::Binary { op, left, right } if op.is_logical() => {
                let decisive = logical_decisive(*op) == TRUE_REP;
                if when == decisive {
                    // Either operand alone can take the jump.
                    let left = self.gen_cond(left, when, flow)?;
                    let mut jumps = self.into_jumps(left, when);
                    let right = self.gen_cond(right, when, flow)?;
                    jumps.extend(self.into_jumps(right, when));
                    Ok(Cond::Jumps(jumps))
                } else {
                    // A decisive left operand settles the other outcome.
                    let left = self.gen_cond(left, decisive, flow)?;
                    let skip = self.into_jumps(left, decisive);
                    let right = self.gen_cond(right, when, flow)?;
                    let jumps = self.into_jumps(right, when);
                    self.patch_all(skip);
                    Ok(Cond::Jumps(jumps))
                }
            }

            _ => {
                if let Value::Known(value) = self.eval(expr, flow)? {
                    return Ok(Cond::Known(value == TRUE_REP));
                }
                Ok(Cond::Jumps(vec![self.emitter.emit_jump_if(bool_rep(when))]))
            }
        }
    }

    /// Jumps for a condition whose outcome may already be known: a known
    /// outcome equal to `when` becomes an unconditional jump.
    fn into_jumps(&mut self, cond: Cond, when: bool) -> Vec<JumpLabel> {
        match cond {
            Cond::Known(value) if value == when => vec![self.emitter.emit_jump()],
            Cond::Known(_) => Vec::new(),
            Cond::Jumps(jumps) => jumps,
        }
    }

    /// Patch every jump to the current address.
    pub(super) fn patch_all(&mut self, jumps: Vec<JumpLabel>) {
        for label in jumps {
            self.emitter.patch_jump(label);
        }
    }

    /// Patch every jump to `target`.
    pub(super) fn patch_all_to(&mut self, jumps: Vec<JumpLabel>, target: usize) {
        for label in jumps {
            self.emitter.patch_jump_to(label, target);
        }
    }
}
