//! Programmatic construction of syntax trees.
//!
//! Every constructor produces an unresolved node with a synthetic span.
//! Use [`At::at`] to place a node on a source line when the line matters
//! (diagnostic tests, mostly).
//!
//! ```
//! use minijava_ast::build::*;
//!
//! // int y = x * 2;   on line 4
//! let stmt = var(int(), "y", mul(read(id("x")), int_lit(2))).at(4);
//! assert_eq!(stmt.span().line, 4);
//! ```

use minijava_core::Span;

use crate::decl::{
    ClassDecl, FieldDecl, MemberFlags, MethodDecl, Package, ParameterDecl, VarDecl,
};
use crate::expr::{Expr, ExprKind, Literal, RefKind, Reference};
use crate::node::Ident;
use crate::ops::{BinaryOp, UnaryOp};
use crate::stmt::{
    AssignStmt, Block, CallStmt, ForStmt, IfStmt, IndexAssignStmt, ReturnStmt, Stmt, VarDeclStmt,
    WhileStmt,
};
use crate::types::{TypeExpr, TypeExprKind};

/// Place a node on a source line.
///
/// The node itself always moves to `line`. Descendants still carrying the
/// default span move with it; descendants already placed keep their line.
pub trait At: Sized {
    fn at(self, line: u32) -> Self;
}

impl At for Stmt {
    fn at(mut self, line: u32) -> Self {
        let span = Span::line(line);
        *self.span_mut() = span;
        stmt_children(&mut self, span);
        self
    }
}

impl At for Expr {
    fn at(mut self, line: u32) -> Self {
        let span = Span::line(line);
        self.span = span;
        expr_children(&mut self, span);
        self
    }
}

impl At for Reference {
    fn at(mut self, line: u32) -> Self {
        let span = Span::line(line);
        self.span = span;
        ref_children(&mut self, span);
        self
    }
}

impl At for ClassDecl {
    fn at(mut self, line: u32) -> Self {
        let span = Span::line(line);
        self.span = span;
        class_children(&mut self, span);
        self
    }
}

impl At for FieldDecl {
    fn at(mut self, line: u32) -> Self {
        let span = Span::line(line);
        self.span = span;
        place_type(&mut self.ty, span);
        self
    }
}

impl At for MethodDecl {
    fn at(mut self, line: u32) -> Self {
        let span = Span::line(line);
        self.span = span;
        method_children(&mut self, span);
        self
    }
}

impl At for ParameterDecl {
    fn at(mut self, line: u32) -> Self {
        let span = Span::line(line);
        self.span = span;
        place_type(&mut self.ty, span);
        self
    }
}

impl At for Package {
    fn at(mut self, line: u32) -> Self {
        let span = Span::line(line);
        self.span = span;
        for class in &mut self.classes {
            if fill(&mut class.span, span) {
                class_children(class, span);
            }
        }
        self
    }
}

// ============================================================================
// Span propagation
// ============================================================================

/// Set `slot` to `span` if it is still the default. Returns whether it was.
fn fill(slot: &mut Span, span: Span) -> bool {
    if *slot == Span::default() {
        *slot = span;
        true
    } else {
        false
    }
}

fn place_type(ty: &mut TypeExpr, span: Span) {
    if !fill(&mut ty.span, span) {
        return;
    }
    if let TypeExprKind::Array(elem) = &mut ty.kind {
        place_type(elem, span);
    }
}

fn class_children(class: &mut ClassDecl, span: Span) {
    class.fields.iter_mut().for_each(|f| place_field(f, span));
    class.methods.iter_mut().for_each(|m| place_method(m, span));
}

fn place_field(field: &mut FieldDecl, span: Span) {
    if fill(&mut field.span, span) {
        place_type(&mut field.ty, span);
    }
}

fn place_method(method: &mut MethodDecl, span: Span) {
    if fill(&mut method.span, span) {
        method_children(method, span);
    }
}

fn method_children(method: &mut MethodDecl, span: Span) {
    place_type(&mut method.return_ty, span);
    for param in &mut method.params {
        if fill(&mut param.span, span) {
            place_type(&mut param.ty, span);
        }
    }
    for stmt in &mut method.body {
        place_stmt(stmt, span);
    }
}

fn place_stmt(stmt: &mut Stmt, span: Span) {
    if fill(stmt.span_mut(), span) {
        stmt_children(stmt, span);
    }
}

fn stmt_children(stmt: &mut Stmt, span: Span) {
    match stmt {
        Stmt::Block(s) => {
            for inner in &mut s.stmts {
                place_stmt(inner, span);
            }
        }
        Stmt::VarDecl(s) => {
            if fill(&mut s.var.span, span) {
                place_type(&mut s.var.ty, span);
            }
            place_expr(&mut s.init, span);
        }
        Stmt::Assign(s) => {
            place_ref(&mut s.target, span);
            place_expr(&mut s.value, span);
        }
        Stmt::IndexAssign(s) => {
            place_ref(&mut s.target, span);
            place_expr(&mut s.index, span);
            place_expr(&mut s.value, span);
        }
        Stmt::Call(s) => {
            place_ref(&mut s.callee, span);
            s.args.iter_mut().for_each(|a| place_expr(a, span));
        }
        Stmt::Return(s) => {
            if let Some(value) = &mut s.value {
                place_expr(value, span);
            }
        }
        Stmt::If(s) => {
            place_expr(&mut s.cond, span);
            place_stmt(&mut s.then_branch, span);
            if let Some(else_branch) = &mut s.else_branch {
                place_stmt(else_branch, span);
            }
        }
        Stmt::While(s) => {
            place_expr(&mut s.cond, span);
            place_stmt(&mut s.body, span);
        }
        Stmt::For(s) => {
            if let Some(init) = &mut s.init {
                place_stmt(init, span);
            }
            if let Some(cond) = &mut s.cond {
                place_expr(cond, span);
            }
            if let Some(update) = &mut s.update {
                place_stmt(update, span);
            }
            place_stmt(&mut s.body, span);
        }
    }
}

fn place_expr(expr: &mut Expr, span: Span) {
    if fill(&mut expr.span, span) {
        expr_children(expr, span);
    }
}

fn expr_children(expr: &mut Expr, span: Span) {
    match &mut expr.kind {
        ExprKind::Unary { operand, .. } => place_expr(operand, span),
        ExprKind::Binary { left, right, .. } => {
            place_expr(left, span);
            place_expr(right, span);
        }
        ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        } => {
            place_expr(cond, span);
            place_expr(then_expr, span);
            place_expr(else_expr, span);
        }
        ExprKind::Ref(reference) => place_ref(reference, span),
        ExprKind::Index { target, index } => {
            place_ref(target, span);
            place_expr(index, span);
        }
        ExprKind::Call { callee, args } => {
            place_ref(callee, span);
            args.iter_mut().for_each(|a| place_expr(a, span));
        }
        ExprKind::NewObject(class) => {
            fill(&mut class.span, span);
        }
        ExprKind::NewArray { elem, size } => {
            place_type(elem, span);
            place_expr(size, span);
        }
        ExprKind::Literal(_) | ExprKind::Null => {}
    }
}

fn place_ref(reference: &mut Reference, span: Span) {
    if fill(&mut reference.span, span) {
        ref_children(reference, span);
    }
}

fn ref_children(reference: &mut Reference, span: Span) {
    match &mut reference.kind {
        RefKind::This => {}
        RefKind::Id(ident) => {
            fill(&mut ident.span, span);
        }
        RefKind::Qualified { prefix, member } => {
            place_ref(prefix, span);
            fill(&mut member.span, span);
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

pub fn package(classes: Vec<ClassDecl>) -> Package {
    Package {
        classes,
        span: Span::default(),
    }
}

pub fn class(
    name: impl Into<String>,
    fields: Vec<FieldDecl>,
    methods: Vec<MethodDecl>,
) -> ClassDecl {
    ClassDecl {
        name: name.into(),
        fields,
        methods,
        span: Span::default(),
        decl: None,
    }
}

pub fn field(flags: MemberFlags, ty: TypeExpr, name: impl Into<String>) -> FieldDecl {
    FieldDecl {
        flags,
        ty,
        name: name.into(),
        span: Span::default(),
        decl: None,
    }
}

pub fn method(
    flags: MemberFlags,
    return_ty: TypeExpr,
    name: impl Into<String>,
    params: Vec<ParameterDecl>,
    body: Vec<Stmt>,
) -> MethodDecl {
    MethodDecl {
        flags,
        return_ty,
        name: name.into(),
        params,
        body,
        span: Span::default(),
        decl: None,
    }
}

/// `public static void main(String[] args) { body }`
pub fn main_method(body: Vec<Stmt>) -> MethodDecl {
    method(
        MemberFlags::STATIC,
        void(),
        "main",
        vec![param(array(class_type("String")), "args")],
        body,
    )
}

pub fn param(ty: TypeExpr, name: impl Into<String>) -> ParameterDecl {
    ParameterDecl {
        ty,
        name: name.into(),
        span: Span::default(),
        decl: None,
    }
}

// ============================================================================
// Types
// ============================================================================

pub fn int() -> TypeExpr {
    TypeExpr::new(TypeExprKind::Int, Span::default())
}

pub fn boolean() -> TypeExpr {
    TypeExpr::new(TypeExprKind::Boolean, Span::default())
}

pub fn void() -> TypeExpr {
    TypeExpr::new(TypeExprKind::Void, Span::default())
}

pub fn class_type(name: impl Into<String>) -> TypeExpr {
    TypeExpr::new(TypeExprKind::Class(name.into()), Span::default())
}

pub fn array(elem: TypeExpr) -> TypeExpr {
    TypeExpr::new(TypeExprKind::Array(Box::new(elem)), Span::default())
}

// ============================================================================
// Statements
// ============================================================================

pub fn block(stmts: Vec<Stmt>) -> Stmt {
    Stmt::Block(Block {
        stmts,
        span: Span::default(),
    })
}

/// `ty name = init;`
pub fn var(ty: TypeExpr, name: impl Into<String>, init: Expr) -> Stmt {
    Stmt::VarDecl(VarDeclStmt {
        var: VarDecl {
            ty,
            name: name.into(),
            span: Span::default(),
            decl: None,
        },
        init,
        span: Span::default(),
    })
}

pub fn assign(target: Reference, value: Expr) -> Stmt {
    Stmt::Assign(AssignStmt {
        target,
        value,
        span: Span::default(),
    })
}

pub fn index_assign(target: Reference, index: Expr, value: Expr) -> Stmt {
    Stmt::IndexAssign(IndexAssignStmt {
        target,
        index,
        value,
        span: Span::default(),
    })
}

pub fn call_stmt(callee: Reference, args: Vec<Expr>) -> Stmt {
    Stmt::Call(CallStmt {
        callee,
        args,
        span: Span::default(),
    })
}

/// `System.out.println(arg);`
pub fn println(arg: Expr) -> Stmt {
    call_stmt(path("System.out.println"), vec![arg])
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return(ReturnStmt {
        value: Some(value),
        span: Span::default(),
    })
}

pub fn ret_void() -> Stmt {
    Stmt::Return(ReturnStmt {
        value: None,
        span: Span::default(),
    })
}

pub fn if_stmt(cond: Expr, then_branch: Stmt, else_branch: Option<Stmt>) -> Stmt {
    Stmt::If(Box::new(IfStmt {
        cond,
        then_branch,
        else_branch,
        span: Span::default(),
    }))
}

pub fn while_stmt(cond: Expr, body: Stmt) -> Stmt {
    Stmt::While(Box::new(WhileStmt {
        cond,
        body,
        span: Span::default(),
    }))
}

pub fn for_stmt(init: Option<Stmt>, cond: Option<Expr>, update: Option<Stmt>, body: Stmt) -> Stmt {
    Stmt::For(Box::new(ForStmt {
        init,
        cond,
        update,
        body,
        span: Span::default(),
    }))
}

// ============================================================================
// Expressions
// ============================================================================

fn expr(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::default())
}

pub fn int_lit(value: i32) -> Expr {
    expr(ExprKind::Literal(Literal::Int(value)))
}

pub fn bool_lit(value: bool) -> Expr {
    expr(ExprKind::Literal(Literal::Bool(value)))
}

pub fn null() -> Expr {
    expr(ExprKind::Null)
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    expr(ExprKind::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn not(operand: Expr) -> Expr {
    unary(UnaryOp::Not, operand)
}

pub fn neg(operand: Expr) -> Expr {
    unary(UnaryOp::Neg, operand)
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    expr(ExprKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn and(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::And, left, right)
}

pub fn or(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Or, left, right)
}

pub fn add(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Add, left, right)
}

pub fn sub(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Sub, left, right)
}

pub fn mul(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Mul, left, right)
}

pub fn lt(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Lt, left, right)
}

pub fn eq(left: Expr, right: Expr) -> Expr {
    binary(BinaryOp::Eq, left, right)
}

pub fn ternary(cond: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
    expr(ExprKind::Ternary {
        cond: Box::new(cond),
        then_expr: Box::new(then_expr),
        else_expr: Box::new(else_expr),
    })
}

/// A reference read as a value.
pub fn read(reference: Reference) -> Expr {
    expr(ExprKind::Ref(reference))
}

pub fn index(target: Reference, index: Expr) -> Expr {
    expr(ExprKind::Index {
        target,
        index: Box::new(index),
    })
}

pub fn call(callee: Reference, args: Vec<Expr>) -> Expr {
    expr(ExprKind::Call { callee, args })
}

pub fn new_object(class: impl Into<String>) -> Expr {
    expr(ExprKind::NewObject(Ident::new(class, Span::default())))
}

pub fn new_array(elem: TypeExpr, size: Expr) -> Expr {
    expr(ExprKind::NewArray {
        elem,
        size: Box::new(size),
    })
}

// ============================================================================
// References
// ============================================================================

pub fn this() -> Reference {
    Reference::new(RefKind::This, Span::default())
}

pub fn id(name: impl Into<String>) -> Reference {
    Reference::new(
        RefKind::Id(Ident::new(name, Span::default())),
        Span::default(),
    )
}

pub fn qualified(prefix: Reference, member: impl Into<String>) -> Reference {
    Reference::new(
        RefKind::Qualified {
            prefix: Box::new(prefix),
            member: Ident::new(member, Span::default()),
        },
        Span::default(),
    )
}

/// A dotted chain such as `"this.next.value"` or `"System.out.println"`.
///
/// A leading `this` segment becomes a `this` reference.
pub fn path(dotted: &str) -> Reference {
    let mut segments = dotted.split('.');
    let head = match segments.next() {
        Some("this") => this(),
        Some(name) => id(name),
        None => this(),
    };
    segments.fold(head, |prefix, member| qualified(prefix, member))
}
