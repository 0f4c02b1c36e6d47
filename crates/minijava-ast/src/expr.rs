//! Expression and reference AST nodes.
//!
//! Expressions carry a `ty` slot and references carry both a `ty` slot and
//! (through their identifiers) a `decl` slot. Both are `None` until the
//! resolver has visited the node.

use minijava_core::{DeclId, Span, Type};

use crate::node::Ident;
use crate::ops::{BinaryOp, UnaryOp};
use crate::types::TypeExpr;

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: Option<Type>,
}

/// The shape of an [`Expr`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `op operand`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `left op right`
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `cond ? then_expr : else_expr`
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// A reference read as a value.
    Ref(Reference),
    /// `target[index]`
    Index { target: Reference, index: Box<Expr> },
    /// `callee(args)`
    Call { callee: Reference, args: Vec<Expr> },
    Literal(Literal),
    /// `new C()`
    NewObject(Ident),
    /// `new T[size]`
    NewArray { elem: TypeExpr, size: Box<Expr> },
    /// `null`
    Null,
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Int(i32),
    Bool(bool),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }
}

/// A reference: `this`, a name, or a member access chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub kind: RefKind,
    pub span: Span,
    pub ty: Option<Type>,
}

/// The shape of a [`Reference`].
#[derive(Debug, Clone, PartialEq)]
pub enum RefKind {
    This,
    Id(Ident),
    /// `prefix.member`
    Qualified {
        prefix: Box<Reference>,
        member: Ident,
    },
}

impl Reference {
    pub fn new(kind: RefKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }

    /// The declaration this reference binds to, once resolved.
    ///
    /// `this` binds to no declaration; its type names the enclosing class.
    pub fn decl(&self) -> Option<DeclId> {
        match &self.kind {
            RefKind::This => None,
            RefKind::Id(ident) => ident.decl,
            RefKind::Qualified { member, .. } => member.decl,
        }
    }

    /// The trailing identifier, if any.
    pub fn ident(&self) -> Option<&Ident> {
        match &self.kind {
            RefKind::This => None,
            RefKind::Id(ident) => Some(ident),
            RefKind::Qualified { member, .. } => Some(member),
        }
    }

    pub fn is_this(&self) -> bool {
        matches!(self.kind, RefKind::This)
    }
}
