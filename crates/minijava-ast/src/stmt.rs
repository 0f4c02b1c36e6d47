//! Statement AST nodes for MiniJava.
//!
//! Provides nodes for:
//! - Blocks and local variable declarations
//! - Assignments (plain and indexed) and call statements
//! - Control flow (if, while, for) and return

use minijava_core::Span;

use crate::decl::VarDecl;
use crate::expr::{Expr, Reference};

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `{ ... }`
    Block(Block),
    /// `T x = e;`
    VarDecl(VarDeclStmt),
    /// `r = e;`
    Assign(AssignStmt),
    /// `r[i] = e;`
    IndexAssign(IndexAssignStmt),
    /// `r(args);`
    Call(CallStmt),
    /// `return;` or `return e;`
    Return(ReturnStmt),
    /// `if (c) s else s`
    If(Box<IfStmt>),
    /// `while (c) s`
    While(Box<WhileStmt>),
    /// `for (init; cond; update) s`
    For(Box<ForStmt>),
}

impl Stmt {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(s) => s.span,
            Stmt::VarDecl(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::IndexAssign(s) => s.span,
            Stmt::Call(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::For(s) => s.span,
        }
    }

    pub(crate) fn span_mut(&mut self) -> &mut Span {
        match self {
            Stmt::Block(s) => &mut s.span,
            Stmt::VarDecl(s) => &mut s.span,
            Stmt::Assign(s) => &mut s.span,
            Stmt::IndexAssign(s) => &mut s.span,
            Stmt::Call(s) => &mut s.span,
            Stmt::Return(s) => &mut s.span,
            Stmt::If(s) => &mut s.span,
            Stmt::While(s) => &mut s.span,
            Stmt::For(s) => &mut s.span,
        }
    }

    /// Whether this is a local variable declaration.
    pub fn is_var_decl(&self) -> bool {
        matches!(self, Stmt::VarDecl(_))
    }
}

/// A braced list of statements. Opens a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A local variable declaration with its initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub var: VarDecl,
    pub init: Expr,
    pub span: Span,
}

/// An assignment to a variable or field.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Reference,
    pub value: Expr,
    pub span: Span,
}

/// An assignment to an array element.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexAssignStmt {
    pub target: Reference,
    pub index: Expr,
    pub value: Expr,
    pub span: Span,
}

/// A method call whose result, if any, is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub callee: Reference,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Stmt,
    pub else_branch: Option<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Stmt,
    pub span: Span,
}

/// A `for` loop.
///
/// `init` is a variable declaration or a simple statement (assignment or
/// call) and is scoped to the loop. `update` is a simple statement. A missing
/// condition loops until a `return`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Stmt>,
    pub cond: Option<Expr>,
    pub update: Option<Stmt>,
    pub body: Stmt,
    pub span: Span,
}
