//! Operator typing rules.

use minijava_ast::{BinaryOp, UnaryOp};
use minijava_core::Type;

/// Result type of a binary operator, or `None` if the operands do not fit.
pub(super) fn binary_result(op: BinaryOp, left: &Type, right: &Type) -> Option<Type> {
    let both = |ty: &Type| left.matches(ty) && right.matches(ty);

    if op.is_logical() {
        both(&Type::Boolean).then_some(Type::Boolean)
    } else if op.is_relational() {
        both(&Type::Int).then_some(Type::Boolean)
    } else if op.is_arithmetic() {
        both(&Type::Int).then_some(Type::Int)
    } else {
        (!left.is_void() && !right.is_void() && left.matches(right)).then_some(Type::Boolean)
    }
}

/// Result type of a unary operator, or `None` if the operand does not fit.
pub(super) fn unary_result(op: UnaryOp, operand: &Type) -> Option<Type> {
    match op {
        UnaryOp::Not => operand.matches(&Type::Boolean).then_some(Type::Boolean),
        UnaryOp::Neg => operand.matches(&Type::Int).then_some(Type::Int),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijava_core::DeclId;

    fn bin(op: BinaryOp, left: Type, right: Type) -> Option<Type> {
        binary_result(op, &left, &right)
    }

    #[test]
    fn arithmetic_and_relational() {
        assert_eq!(bin(BinaryOp::Add, Type::Int, Type::Int), Some(Type::Int));
        assert_eq!(bin(BinaryOp::Lt, Type::Int, Type::Int), Some(Type::Boolean));
        assert_eq!(bin(BinaryOp::Mul, Type::Int, Type::Boolean), None);
        assert_eq!(bin(BinaryOp::Ge, Type::Boolean, Type::Boolean), None);
    }

    #[test]
    fn logical() {
        let both = bin(BinaryOp::And, Type::Boolean, Type::Boolean);
        assert_eq!(both, Some(Type::Boolean));
        assert_eq!(bin(BinaryOp::Or, Type::Int, Type::Boolean), None);
    }

    #[test]
    fn equality_uses_lattice() {
        let a = Type::Class(DeclId::new(4));
        assert_eq!(bin(BinaryOp::Eq, a, Type::Null), Some(Type::Boolean));
        assert_eq!(bin(BinaryOp::Ne, Type::Int, Type::Int), Some(Type::Boolean));
        assert_eq!(bin(BinaryOp::Eq, Type::Int, Type::Boolean), None);
        assert_eq!(bin(BinaryOp::Eq, Type::Void, Type::Void), None);
        let unsupported = Type::Unsupported;
        assert_eq!(bin(BinaryOp::Eq, unsupported.clone(), unsupported), None);
    }

    #[test]
    fn error_operands_do_not_cascade() {
        assert_eq!(bin(BinaryOp::Sub, Type::Error, Type::Int), Some(Type::Int));
        let negated = unary_result(UnaryOp::Not, &Type::Error);
        assert_eq!(negated, Some(Type::Boolean));
    }

    #[test]
    fn unary() {
        assert_eq!(unary_result(UnaryOp::Neg, &Type::Int), Some(Type::Int));
        assert_eq!(unary_result(UnaryOp::Neg, &Type::Boolean), None);
        assert_eq!(unary_result(UnaryOp::Not, &Type::Int), None);
    }
}
