//! Expression resolution and typing.

use minijava_ast::{Expr, ExprKind, Literal, Reference};
use minijava_core::{CompilationError, Span, Type};

use super::operators::{binary_result, unary_result};
use super::{MethodContext, Resolver};
use crate::decls::DeclKind;
use crate::error::Abort;

impl Resolver<'_> {
    /// Resolve an expression and record its type on the node.
    pub(super) fn resolve_expr(
        &mut self,
        expr: &mut Expr,
        cx: &MethodContext,
    ) -> Result<Type, Abort> {
        let span = expr.span;
        let ty = match &mut expr.kind {
            ExprKind::Literal(Literal::Int(_)) => Type::Int,
            ExprKind::Literal(Literal::Bool(_)) => Type::Boolean,
            ExprKind::Null => Type::Null,

            ExprKind::Unary { op, operand } => {
                let operand_ty = self.resolve_expr(operand, cx)?;
                match unary_result(*op, &operand_ty) {
                    Some(ty) => ty,
                    None => self.invalid_operand(op.as_str(), "unary", span),
                }
            }

            ExprKind::Binary { op, left, right } => {
                let left_ty = self.resolve_expr(left, cx)?;
                let right_ty = self.resolve_expr(right, cx)?;
                match binary_result(*op, &left_ty, &right_ty) {
                    Some(ty) => ty,
                    None => self.invalid_operand(op.as_str(), "binary", span),
                }
            }

            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                let cond_ty = self.resolve_expr(cond, cx)?;
                if !cond_ty.matches(&Type::Boolean) {
                    let message = format!(
                        "ternary condition must be of type boolean, found {}",
                        self.describe(&cond_ty)
                    );
                    self.report(CompilationError::TypeMismatch {
                        message,
                        span: cond.span,
                    });
                }
                let then_ty = self.resolve_expr(then_expr, cx)?;
                let else_ty = self.resolve_expr(else_expr, cx)?;
                self.ternary_result(then_ty, else_ty, span)
            }

            ExprKind::Ref(reference) => {
                let ty = self.resolve_reference(reference, cx)?;
                self.value_of(reference, ty)
            }

            ExprKind::Index { target, index } => {
                let target_ty = self.resolve_reference(target, cx)?;
                let index_ty = self.resolve_expr(index, cx)?;
                let elem = self.indexed_element(target, &target_ty, span);
                self.check_index(&index_ty, index.span);
                elem
            }

            ExprKind::Call { callee, args } => self.resolve_call(callee, args, span, cx)?,

            ExprKind::NewObject(class) => match self.scope.class(&class.name) {
                Some(id) => {
                    class.decl = Some(id);
                    if id == self.builtins.string {
                        Type::Unsupported
                    } else {
                        Type::Class(id)
                    }
                }
                None => {
                    return Err(self.fatal(CompilationError::UnknownClass {
                        name: class.name.clone(),
                        span: class.span,
                    }));
                }
            },

            ExprKind::NewArray { elem, size } => {
                let elem_ty = self.resolve_type(elem)?;
                let size_ty = self.resolve_expr(size, cx)?;
                if !size_ty.matches(&Type::Int) {
                    let message = format!(
                        "array size must be of type int, found {}",
                        self.describe(&size_ty)
                    );
                    self.report(CompilationError::TypeMismatch {
                        message,
                        span: size.span,
                    });
                }
                Type::array_of(elem_ty)
            }
        };

        expr.ty = Some(ty.clone());
        Ok(ty)
    }

    /// Resolve a call and return the method's return type.
    pub(super) fn resolve_call(
        &mut self,
        callee: &mut Reference,
        args: &mut [Expr],
        span: Span,
        cx: &MethodContext,
    ) -> Result<Type, Abort> {
        self.resolve_reference(callee, cx)?;
        let mut arg_types = Vec::with_capacity(args.len());
        for arg in args.iter_mut() {
            arg_types.push(self.resolve_expr(arg, cx)?);
        }

        let Some(method) = callee.decl().filter(|&decl| self.table.is_method(decl)) else {
            self.report(CompilationError::NotCallable { span });
            return Ok(Type::Error);
        };
        let declaration = self.table.get(method);
        let return_ty = declaration.ty.clone();
        let name = declaration.name.clone();
        let params = self
            .table
            .method_info(method)
            .map(|info| info.params.clone())
            .unwrap_or_default();

        if params.len() != arg_types.len() {
            self.report(CompilationError::ArgumentCount {
                method: name,
                expected: params.len(),
                found: arg_types.len(),
                span,
            });
            return Ok(return_ty);
        }

        let supplied = arg_types.iter().zip(args.iter());
        for (position, (param, (arg_ty, arg))) in params.iter().zip(supplied).enumerate() {
            let param_ty = &self.table.get(*param).ty;
            if !param_ty.matches(arg_ty) {
                let message = format!(
                    "argument {} of '{}' expects {}, found {}",
                    position + 1,
                    name,
                    self.describe(param_ty),
                    self.describe(arg_ty)
                );
                self.report(CompilationError::TypeMismatch {
                    message,
                    span: arg.span,
                });
            }
        }
        Ok(return_ty)
    }

    /// Class and method names are not values.
    fn value_of(&mut self, reference: &Reference, ty: Type) -> Type {
        let what = match reference.decl().map(|decl| &self.table.get(decl).kind) {
            Some(DeclKind::Class(_)) if !reference.is_this() => "class",
            Some(DeclKind::Method(_)) => "method",
            _ => return ty,
        };
        self.report(CompilationError::NotAValue {
            what,
            span: reference.span,
        });
        Type::Error
    }

    /// A `null` branch takes the type of the other branch.
    fn ternary_result(&mut self, then_ty: Type, else_ty: Type, span: Span) -> Type {
        if !then_ty.matches(&else_ty) {
            let message = format!(
                "ternary branches have incompatible types {} and {}",
                self.describe(&then_ty),
                self.describe(&else_ty)
            );
            self.report(CompilationError::TypeMismatch { message, span });
            return Type::Error;
        }
        match (then_ty, else_ty) {
            (Type::Error, _) | (_, Type::Error) => Type::Error,
            (Type::Null, other) => other,
            (ty, _) => ty,
        }
    }

    fn invalid_operand(&mut self, op: &'static str, arity: &'static str, span: Span) -> Type {
        self.report(CompilationError::InvalidOperand { op, arity, span });
        Type::Error
    }
}
