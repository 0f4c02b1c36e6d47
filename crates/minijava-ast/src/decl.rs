//! Declaration nodes.
//!
//! A [`Package`] is an ordered list of classes; each class carries its fields
//! and methods in declaration order. Declaration order matters: member maps,
//! storage layout, code emission and the choice of entry method all follow it.

use bitflags::bitflags;
use minijava_core::{DeclId, Span};

use crate::stmt::Stmt;
use crate::types::TypeExpr;

bitflags! {
    /// Member modifiers.
    ///
    /// Members are public unless `PRIVATE` is set, and instance members
    /// unless `STATIC` is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u8 {
        /// `private`
        const PRIVATE = 1 << 0;
        /// `static`
        const STATIC = 1 << 1;
    }
}

/// The root of a compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub classes: Vec<ClassDecl>,
    pub span: Span,
}

/// `class Name { fields... methods... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
    pub decl: Option<DeclId>,
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub flags: MemberFlags,
    pub ty: TypeExpr,
    pub name: String,
    pub span: Span,
    pub decl: Option<DeclId>,
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub flags: MemberFlags,
    pub return_ty: TypeExpr,
    pub name: String,
    pub params: Vec<ParameterDecl>,
    pub body: Vec<Stmt>,
    pub span: Span,
    pub decl: Option<DeclId>,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    pub ty: TypeExpr,
    pub name: String,
    pub span: Span,
    pub decl: Option<DeclId>,
}

/// A local variable introduced by a declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeExpr,
    pub name: String,
    pub span: Span,
    pub decl: Option<DeclId>,
}

impl FieldDecl {
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    pub fn is_private(&self) -> bool {
        self.flags.contains(MemberFlags::PRIVATE)
    }
}

impl MethodDecl {
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    pub fn is_private(&self) -> bool {
        self.flags.contains(MemberFlags::PRIVATE)
    }

    /// Whether the signature is `public static void main(String[] _)`.
    ///
    /// Only the declared syntax is inspected. The parameter must be written
    /// as `String[]`, whatever the class `String` resolves to.
    pub fn is_entry_signature(&self) -> bool {
        self.name == "main"
            && !self.is_private()
            && self.is_static()
            && self.return_ty.is_void()
            && self.params.len() == 1
            && self.params[0].ty.is_string_array()
    }
}
