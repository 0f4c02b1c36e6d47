//! Compile-time values.
//!
//! [`Folder::value`] is pure: it only inspects the tree and the known-local
//! map. An expression is known only if evaluating it at run time could have
//! no effect beyond producing that value, so calls are never known and
//! neither is division by a known zero.

use minijava_ast::{BinaryOp, Expr, ExprKind, Literal, RefKind, UnaryOp};
use minijava_core::DeclId;
use rustc_hash::FxHashMap;

use super::Flow;
use crate::bytecode::{FALSE_REP, NULL_REP, TRUE_REP, bool_rep};

pub(super) struct Folder<'a> {
    known: &'a FxHashMap<DeclId, i32>,
    enabled: bool,
}

impl<'a> Folder<'a> {
    pub(super) fn new(known: &'a FxHashMap<DeclId, i32>, enabled: bool) -> Self {
        Self { known, enabled }
    }

    pub(super) fn value(&self, expr: &Expr, flow: Flow) -> Option<i32> {
        match &expr.kind {
            ExprKind::Literal(Literal::Int(value)) => Some(*value),
            ExprKind::Literal(Literal::Bool(value)) => Some(bool_rep(*value)),
            ExprKind::Null => Some(NULL_REP),
            _ if !self.enabled => None,

            ExprKind::Ref(reference) if !flow.in_loop => match &reference.kind {
                RefKind::Id(ident) => ident.decl.and_then(|decl| self.known.get(&decl).copied()),
                _ => None,
            },

            ExprKind::Unary { op, operand } => {
                let value = self.value(operand, flow)?;
                Some(fold_unary(*op, value))
            }

            ExprKind::Binary { op, left, right } if op.is_logical() => {
                let decisive = logical_decisive(*op);
                let left = self.value(left, flow)?;
                if left == decisive {
                    Some(decisive)
                } else {
                    self.value(right, flow)
                }
            }

            ExprKind::Binary { op, left, right } => {
                let left = self.value(left, flow)?;
                let right = self.value(right, flow)?;
                fold_binary(*op, left, right)
            }

            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                if self.value(cond, flow)? != FALSE_REP {
                    self.value(then_expr, flow)
                } else {
                    self.value(else_expr, flow)
                }
            }

            _ => None,
        }
    }
}

/// The operand value that decides `&&` (false) or `||` (true) alone.
pub(super) fn logical_decisive(op: BinaryOp) -> i32 {
    match op {
        BinaryOp::Or => TRUE_REP,
        _ => FALSE_REP,
    }
}

pub(super) fn fold_unary(op: UnaryOp, value: i32) -> i32 {
    match op {
        UnaryOp::Not => bool_rep(value == FALSE_REP),
        UnaryOp::Neg => value.wrapping_neg(),
    }
}

/// Fold a non-logical binary operator. Arithmetic wraps like the machine;
/// division and remainder by zero are left to fault at run time.
pub(super) fn fold_binary(op: BinaryOp, left: i32, right: i32) -> Option<i32> {
    let value = match op {
        BinaryOp::Add => left.wrapping_add(right),
        BinaryOp::Sub => left.wrapping_sub(right),
        BinaryOp::Mul => left.wrapping_mul(right),
        BinaryOp::Div if right == 0 => return None,
        BinaryOp::Div => left.wrapping_div(right),
        BinaryOp::Mod if right == 0 => return None,
        BinaryOp::Mod => left.wrapping_rem(right),
        BinaryOp::Eq => bool_rep(left == right),
        BinaryOp::Ne => bool_rep(left != right),
        BinaryOp::Lt => bool_rep(left < right),
        BinaryOp::Le => bool_rep(left <= right),
        BinaryOp::Gt => bool_rep(left > right),
        BinaryOp::Ge => bool_rep(left >= right),
        BinaryOp::And => bool_rep(left != FALSE_REP && right != FALSE_REP),
        BinaryOp::Or => bool_rep(left != FALSE_REP || right != FALSE_REP),
    };
    Some(value)
}
