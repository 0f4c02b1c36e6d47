//! Semantic types and the type-equality lattice.
//!
//! [`Type`] is what the resolver assigns to every typed node. Two markers are
//! absorbing:
//!
//! - [`Type::Error`] matches every type, so a node that already failed to type
//!   check never produces a second diagnostic further up the tree.
//! - [`Type::Unsupported`] matches nothing (not even itself), so any use of an
//!   unsupported type (`String`) is rejected wherever a type comparison is made.
//!
//! Use [`Type::matches`] for every type comparison in the checker. The derived
//! `PartialEq` is structural identity and exists for tests and bookkeeping.

use std::fmt;

use crate::DeclId;

/// A resolved MiniJava type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// `int`
    Int,
    /// `boolean`
    Boolean,
    /// `void` (method return types only)
    Void,
    /// An instance of the class with the given declaration.
    Class(DeclId),
    /// The type of the `null` literal.
    Null,
    /// An array of the element type.
    Array(Box<Type>),
    /// A node whose type could not be determined (already reported).
    Error,
    /// A type the language names but does not support (`String`).
    Unsupported,
}

impl Type {
    /// Array of `elem`.
    pub fn array_of(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    /// Lattice equality.
    ///
    /// `Unsupported` is checked first, so `Error.matches(&Unsupported)` is
    /// false. Arrays compare element types deeply; classes compare declaration
    /// identity; `Null` matches any class or array type.
    pub fn matches(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Unsupported, _) | (_, Type::Unsupported) => false,
            (Type::Error, _) | (_, Type::Error) => true,
            (Type::Int, Type::Int) | (Type::Boolean, Type::Boolean) | (Type::Void, Type::Void) => {
                true
            }
            (Type::Null, Type::Null | Type::Class(_) | Type::Array(_))
            | (Type::Class(_) | Type::Array(_), Type::Null) => true,
            (Type::Class(a), Type::Class(b)) => a == b,
            (Type::Array(a), Type::Array(b)) => a.matches(b),
            _ => false,
        }
    }

    /// Whether this is the absorbing error type.
    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// Whether this is `void` (not merely lattice-equal to it).
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Element type, for arrays.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// Class declaration, for class instances.
    pub fn class_decl(&self) -> Option<DeclId> {
        match self {
            Type::Class(decl) => Some(*decl),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::Void => write!(f, "void"),
            Type::Class(decl) => write!(f, "class {:?}", decl),
            Type::Null => write!(f, "null"),
            Type::Array(elem) => write!(f, "{}[]", elem),
            Type::Error => write!(f, "<error>"),
            Type::Unsupported => write!(f, "<unsupported>"),
        }
    }
}
