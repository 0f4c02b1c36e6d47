//! Statement resolution.

use minijava_ast::{
    AssignStmt, Expr, ForStmt, IfStmt, IndexAssignStmt, Reference, ReturnStmt, Stmt, VarDeclStmt,
    WhileStmt,
};
use minijava_core::{CompilationError, Span, Type};

use super::{MethodContext, Resolver};
use crate::decls::DeclKind;
use crate::error::Abort;

impl Resolver<'_> {
    pub(super) fn resolve_stmt(
        &mut self,
        stmt: &mut Stmt,
        cx: &MethodContext,
    ) -> Result<(), Abort> {
        match stmt {
            Stmt::Block(block) => {
                self.scope.push_scope();
                for inner in &mut block.stmts {
                    self.resolve_stmt(inner, cx)?;
                }
                self.scope.pop_scope();
                Ok(())
            }
            Stmt::VarDecl(decl) => self.resolve_var_decl(decl, cx),
            Stmt::Assign(assign) => self.resolve_assign(assign, cx),
            Stmt::IndexAssign(assign) => self.resolve_index_assign(assign, cx),
            Stmt::Call(call) => {
                self.resolve_call(&mut call.callee, &mut call.args, call.span, cx)?;
                Ok(())
            }
            Stmt::Return(ret) => self.resolve_return(ret, cx),
            Stmt::If(if_stmt) => self.resolve_if(if_stmt, cx),
            Stmt::While(while_stmt) => self.resolve_while(while_stmt, cx),
            Stmt::For(for_stmt) => self.resolve_for(for_stmt, cx),
        }
    }

    /// The variable is in scope from its own declaration, but may not be
    /// read by its initializer.
    fn resolve_var_decl(
        &mut self,
        stmt: &mut VarDeclStmt,
        cx: &MethodContext,
    ) -> Result<(), Abort> {
        let ty = self.resolve_type(&stmt.var.ty)?;
        let span = stmt.var.span;
        let id = self
            .table
            .add(stmt.var.name.as_str(), DeclKind::Local, ty.clone(), span);
        self.scope
            .declare_local(&stmt.var.name, id, span)
            .map_err(|e| self.fatal(e))?;
        stmt.var.decl = Some(id);

        let outer = self.initializing.replace(id);
        let init_ty = self.resolve_expr(&mut stmt.init, cx);
        self.initializing = outer;
        let init_ty = init_ty?;

        if !ty.matches(&init_ty) {
            let message = format!(
                "cannot initialize variable '{}' of type {} with a value of type {}",
                stmt.var.name,
                self.describe(&ty),
                self.describe(&init_ty)
            );
            self.report(CompilationError::TypeMismatch {
                message,
                span: stmt.span,
            });
        }
        Ok(())
    }

    fn resolve_assign(&mut self, stmt: &mut AssignStmt, cx: &MethodContext) -> Result<(), Abort> {
        let target_ty = self.resolve_reference(&mut stmt.target, cx)?;
        let value_ty = self.resolve_expr(&mut stmt.value, cx)?;

        if let Some(target) = self.unassignable(&stmt.target) {
            self.report(CompilationError::InvalidAssignment {
                target,
                span: stmt.span,
            });
        } else if !target_ty.matches(&value_ty) {
            let message = format!(
                "cannot assign a value of type {} to a target of type {}",
                self.describe(&value_ty),
                self.describe(&target_ty)
            );
            self.report(CompilationError::TypeMismatch {
                message,
                span: stmt.span,
            });
        }
        Ok(())
    }

    fn resolve_index_assign(
        &mut self,
        stmt: &mut IndexAssignStmt,
        cx: &MethodContext,
    ) -> Result<(), Abort> {
        let target_ty = self.resolve_reference(&mut stmt.target, cx)?;
        let index_ty = self.resolve_expr(&mut stmt.index, cx)?;
        let value_ty = self.resolve_expr(&mut stmt.value, cx)?;

        let elem = self.indexed_element(&stmt.target, &target_ty, stmt.span);
        self.check_index(&index_ty, stmt.index.span);
        if !elem.matches(&value_ty) {
            let message = format!(
                "cannot store a value of type {} in an array of {}",
                self.describe(&value_ty),
                self.describe(&elem)
            );
            self.report(CompilationError::TypeMismatch {
                message,
                span: stmt.span,
            });
        }
        Ok(())
    }

    fn resolve_return(&mut self, stmt: &mut ReturnStmt, cx: &MethodContext) -> Result<(), Abort> {
        let value_ty = match &mut stmt.value {
            Some(value) => Some(self.resolve_expr(value, cx)?),
            None => None,
        };

        match value_ty {
            Some(_) if cx.return_ty.is_void() => self.report(CompilationError::InvalidReturn {
                message: "cannot return a value from a void method",
                span: stmt.span,
            }),
            None if !cx.return_ty.is_void() => self.report(CompilationError::InvalidReturn {
                message: "a non-void method must return a value",
                span: stmt.span,
            }),
            Some(ty) if !cx.return_ty.matches(&ty) => {
                let message = format!(
                    "cannot return a value of type {} from a method returning {}",
                    self.describe(&ty),
                    self.describe(&cx.return_ty)
                );
                self.report(CompilationError::TypeMismatch {
                    message,
                    span: stmt.span,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn resolve_if(&mut self, stmt: &mut IfStmt, cx: &MethodContext) -> Result<(), Abort> {
        self.check_condition(&mut stmt.cond, "if", cx)?;
        self.resolve_branch(&mut stmt.then_branch, cx)?;
        if let Some(else_branch) = &mut stmt.else_branch {
            self.resolve_branch(else_branch, cx)?;
        }
        Ok(())
    }

    fn resolve_while(&mut self, stmt: &mut WhileStmt, cx: &MethodContext) -> Result<(), Abort> {
        self.check_condition(&mut stmt.cond, "while", cx)?;
        self.resolve_branch(&mut stmt.body, cx)
    }

    /// The initializer's variable is scoped to the loop.
    fn resolve_for(&mut self, stmt: &mut ForStmt, cx: &MethodContext) -> Result<(), Abort> {
        self.scope.push_scope();
        if let Some(init) = &mut stmt.init {
            self.resolve_stmt(init, cx)?;
        }
        if let Some(cond) = &mut stmt.cond {
            self.check_condition(cond, "for", cx)?;
        }
        if let Some(update) = &mut stmt.update {
            self.resolve_stmt(update, cx)?;
        }
        self.resolve_branch(&mut stmt.body, cx)?;
        self.scope.pop_scope();
        Ok(())
    }

    /// Body of a conditional or loop. A bare declaration is rejected since
    /// nothing could ever read it.
    fn resolve_branch(&mut self, stmt: &mut Stmt, cx: &MethodContext) -> Result<(), Abort> {
        if stmt.is_var_decl() {
            self.report(CompilationError::SolitaryDeclaration { span: stmt.span() });
        }
        self.scope.push_scope();
        self.resolve_stmt(stmt, cx)?;
        self.scope.pop_scope();
        Ok(())
    }

    fn check_condition(
        &mut self,
        cond: &mut Expr,
        construct: &str,
        cx: &MethodContext,
    ) -> Result<(), Abort> {
        let ty = self.resolve_expr(cond, cx)?;
        if !ty.matches(&Type::Boolean) {
            let message = format!(
                "{construct} condition must be of type boolean, found {}",
                self.describe(&ty)
            );
            self.report(CompilationError::TypeMismatch {
                message,
                span: cond.span,
            });
        }
        Ok(())
    }

    // ==========================================================================
    // Shared with expressions
    // ==========================================================================

    /// Why `target` cannot be assigned, if it cannot.
    pub(super) fn unassignable(&self, target: &Reference) -> Option<&'static str> {
        if target.is_this() {
            return Some("\"this\"");
        }
        match self.table.get(target.decl()?).kind {
            DeclKind::Class(_) => Some("a class name"),
            DeclKind::Method(_) => Some("a method"),
            DeclKind::ArrayLength => Some("the length of an array"),
            _ => None,
        }
    }

    /// Element type of an indexed reference, or `Error` after reporting why
    /// it cannot be indexed.
    pub(super) fn indexed_element(&mut self, target: &Reference, ty: &Type, span: Span) -> Type {
        let not_a_variable = if target.is_this() {
            Some("\"this\"")
        } else {
            target.decl().and_then(|decl| match self.table.get(decl).kind {
                DeclKind::Class(_) => Some("a class name"),
                DeclKind::Method(_) => Some("a method"),
                _ => None,
            })
        };
        if let Some(target) = not_a_variable {
            self.report(CompilationError::InvalidIndexTarget { target, span });
            return Type::Error;
        }

        match ty {
            Type::Array(elem) => (**elem).clone(),
            Type::Error => Type::Error,
            other => {
                let message = format!("cannot index a value of type {}", self.describe(other));
                self.report(CompilationError::TypeMismatch { message, span });
                Type::Error
            }
        }
    }

    pub(super) fn check_index(&mut self, ty: &Type, span: Span) {
        if !ty.matches(&Type::Int) {
            let found = self.describe(ty);
            let message = format!("array index must be of type int, found {found}");
            self.report(CompilationError::TypeMismatch { message, span });
        }
    }
}

#[cfg(test)]
mod tests {
    use minijava_ast::build::*;
    use minijava_ast::{MemberFlags, Package, Stmt};
    use minijava_core::{CompilationError, Diagnostics, ErrorKind};

    use crate::resolver::Resolver;

    fn errors_in_main(body: Vec<Stmt>) -> Vec<CompilationError> {
        errors_in(package(vec![class("Main", vec![], vec![main_method(body)])]))
    }

    fn errors_in(mut program: Package) -> Vec<CompilationError> {
        let mut diagnostics = Diagnostics::new();
        let resolver = Resolver::new(&mut diagnostics).unwrap();
        let _ = resolver.resolve(&mut program);
        diagnostics.into_errors()
    }

    #[test]
    fn clean_control_flow() {
        let errors = errors_in_main(vec![
            var(int(), "i", int_lit(0)),
            while_stmt(
                lt(read(id("i")), int_lit(3)),
                block(vec![assign(id("i"), add(read(id("i")), int_lit(1)))]),
            ),
            for_stmt(
                Some(var(int(), "j", int_lit(0))),
                Some(lt(read(id("j")), int_lit(2))),
                Some(assign(id("j"), add(read(id("j")), int_lit(1)))),
                println(read(id("j"))),
            ),
            if_stmt(
                eq(read(id("i")), int_lit(3)),
                println(int_lit(1)),
                Some(println(int_lit(0))),
            ),
        ]);
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn self_reference_in_initializer_is_fatal() {
        let errors = errors_in_main(vec![var(int(), "x", add(read(id("x")), int_lit(1))).at(2)]);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CompilationError::SelfReferentialInit { .. }));
        assert_eq!(errors[0].line(), 2);
    }

    #[test]
    fn duplicate_local_in_same_block() {
        let errors = errors_in_main(vec![
            var(int(), "x", int_lit(1)),
            var(int(), "x", int_lit(2)),
            println(read(id("x"))),
        ]);
        assert!(matches!(errors[..], [CompilationError::DuplicateVariable { .. }]));
    }

    #[test]
    fn local_may_not_redeclare_parameter() {
        let errors = errors_in_main(vec![var(int(), "args", int_lit(1))]);
        assert!(matches!(errors[..], [CompilationError::DuplicateVariable { .. }]));
    }

    #[test]
    fn nested_block_shadowing_is_allowed() {
        let errors = errors_in_main(vec![
            var(int(), "x", int_lit(1)),
            block(vec![
                var(boolean(), "x", bool_lit(true)),
                if_stmt(read(id("x")), println(int_lit(1)), None),
            ]),
            println(read(id("x"))),
        ]);
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn solitary_declaration_in_branch() {
        let errors = errors_in_main(vec![
            if_stmt(bool_lit(true), var(int(), "x", int_lit(1)).at(4), None),
            while_stmt(bool_lit(false), var(int(), "y", int_lit(1)).at(5)),
        ]);
        assert_eq!(errors.len(), 2);
        let lines: Vec<_> = errors.iter().map(|e| e.line()).collect();
        assert_eq!(lines, vec![4, 5]);
        for error in &errors {
            assert!(matches!(error, CompilationError::SolitaryDeclaration { .. }));
        }
    }

    #[test]
    fn conditions_must_be_boolean() {
        let errors = errors_in_main(vec![
            if_stmt(int_lit(1), println(int_lit(1)), None),
            while_stmt(int_lit(0), println(int_lit(1))),
        ]);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind() == ErrorKind::Type));
    }

    #[test]
    fn cannot_assign_to_this_or_length() {
        let program = package(vec![class(
            "Main",
            vec![field(MemberFlags::empty(), array(int()), "a")],
            vec![
                main_method(vec![]),
                method(
                    MemberFlags::empty(),
                    void(),
                    "f",
                    vec![],
                    vec![
                        assign(this(), null()),
                        assign(path("a.length"), int_lit(3)),
                        assign(id("f"), int_lit(3)),
                    ],
                ),
            ],
        )]);
        let errors = errors_in(program);
        let targets: Vec<_> = errors
            .iter()
            .map(|e| match e {
                CompilationError::InvalidAssignment { target, .. } => *target,
                other => panic!("unexpected error {other}"),
            })
            .collect();
        assert_eq!(
            targets,
            vec!["\"this\"", "the length of an array", "a method"]
        );
    }

    #[test]
    fn index_assignment_checks_element_type() {
        let errors = errors_in_main(vec![
            var(array(int()), "a", new_array(int(), int_lit(3))),
            index_assign(id("a"), int_lit(0), int_lit(7)),
            index_assign(id("a"), bool_lit(true), int_lit(7)),
            index_assign(id("a"), int_lit(1), bool_lit(false)),
        ]);
        assert_eq!(errors.len(), 2);
        for error in &errors {
            assert!(matches!(error, CompilationError::TypeMismatch { .. }));
        }
    }

    #[test]
    fn return_checks() {
        let program = package(vec![class(
            "Main",
            vec![],
            vec![
                main_method(vec![ret(int_lit(1))]),
                method(MemberFlags::empty(), int(), "f", vec![], vec![ret_void()]),
                method(
                    MemberFlags::empty(),
                    int(),
                    "g",
                    vec![],
                    vec![ret(bool_lit(true))],
                ),
            ],
        )]);
        let errors = errors_in(program);
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], CompilationError::InvalidReturn { .. }));
        assert!(matches!(errors[1], CompilationError::InvalidReturn { .. }));
        assert!(matches!(errors[2], CompilationError::TypeMismatch { .. }));
    }

    #[test]
    fn for_variable_is_scoped_to_loop() {
        let errors = errors_in_main(vec![
            for_stmt(Some(var(int(), "i", int_lit(0))), None, None, block(vec![])),
            println(read(id("i"))),
        ]);
        assert!(matches!(errors[..], [CompilationError::UndeclaredIdentifier { .. }]));
    }
}
