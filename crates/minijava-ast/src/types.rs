//! Type denoters as written in source.

use std::fmt;

use minijava_core::Span;

/// A type as written in a declaration, `new` expression or parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub span: Span,
}

/// The shape of a [`TypeExpr`].
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    Int,
    Boolean,
    Void,
    /// A class name, resolved against the global class layer.
    Class(String),
    /// `elem[]`
    Array(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeExprKind::Void)
    }

    /// `String[]`
    pub fn is_string_array(&self) -> bool {
        match &self.kind {
            TypeExprKind::Array(elem) => {
                matches!(&elem.kind, TypeExprKind::Class(name) if name == "String")
            }
            _ => false,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeExprKind::Int => write!(f, "int"),
            TypeExprKind::Boolean => write!(f, "boolean"),
            TypeExprKind::Void => write!(f, "void"),
            TypeExprKind::Class(name) => write!(f, "{}", name),
            TypeExprKind::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::build::*;

    #[test]
    fn display() {
        assert_eq!(array(array(int())).to_string(), "int[][]");
        assert_eq!(class_type("Node").to_string(), "Node");
    }

    #[test]
    fn string_array() {
        assert!(array(class_type("String")).is_string_array());
        assert!(!class_type("String").is_string_array());
        assert!(!array(array(class_type("String"))).is_string_array());
    }
}
