//! Signature pass: classes, members and declared types.
//!
//! Runs before any method body is visited so that bodies can refer to every
//! class and member regardless of declaration order.

use minijava_ast::{ClassDecl, MethodDecl, Package, TypeExpr, TypeExprKind};
use minijava_core::{CompilationError, DeclId, Type};

use super::Resolver;
use crate::decls::{DeclKind, MethodInfo};
use crate::error::Abort;

impl Resolver<'_> {
    /// Register every class, then every member. Returns the class ids in
    /// declaration order.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(super) fn declare_signatures(
        &mut self,
        package: &mut Package,
    ) -> Result<Vec<DeclId>, Abort> {
        let mut class_ids = Vec::with_capacity(package.classes.len());

        for class in &mut package.classes {
            if self.scope.class(&class.name).is_some() {
                return Err(self.fatal(CompilationError::DuplicateClass {
                    name: class.name.clone(),
                    span: class.span,
                }));
            }
            let id = self.table.add_class(class.name.as_str(), class.span);
            self.scope.declare_class(&class.name, id);
            class.decl = Some(id);
            class_ids.push(id);
        }

        for (class, &id) in package.classes.iter_mut().zip(&class_ids) {
            self.declare_members(class, id)?;
        }

        tracing::debug!(
            classes = class_ids.len(),
            decls = self.table.len(),
            "signatures declared"
        );
        Ok(class_ids)
    }

    /// Fields first, then methods, sharing one namespace.
    fn declare_members(&mut self, class: &mut ClassDecl, class_id: DeclId) -> Result<(), Abort> {
        for field in &mut class.fields {
            let ty = self.resolve_type(&field.ty)?;
            let kind = DeclKind::Field {
                class: class_id,
                flags: field.flags,
            };
            let id = self
                .table
                .add_member(class_id, &field.name, kind, ty, field.span)
                .ok_or_else(|| {
                    self.fatal(CompilationError::DuplicateMember {
                        name: field.name.clone(),
                        class: class.name.clone(),
                        span: field.span,
                    })
                })?;
            field.decl = Some(id);
        }

        for method in &mut class.methods {
            self.declare_method(method, class_id, &class.name)?;
        }
        Ok(())
    }

    fn declare_method(
        &mut self,
        method: &mut MethodDecl,
        class_id: DeclId,
        class_name: &str,
    ) -> Result<(), Abort> {
        let return_ty = self.resolve_type(&method.return_ty)?;
        let kind = DeclKind::Method(MethodInfo {
            class: class_id,
            flags: method.flags,
            params: Vec::new(),
        });
        let id = self
            .table
            .add_member(class_id, &method.name, kind, return_ty, method.span)
            .ok_or_else(|| {
                self.fatal(CompilationError::DuplicateMember {
                    name: method.name.clone(),
                    class: class_name.to_string(),
                    span: method.span,
                })
            })?;
        method.decl = Some(id);

        let mut params = Vec::with_capacity(method.params.len());
        for param in &mut method.params {
            let ty = self.resolve_type(&param.ty)?;
            let param_id = self
                .table
                .add(param.name.as_str(), DeclKind::Param, ty, param.span);
            param.decl = Some(param_id);
            params.push(param_id);
        }
        self.table.set_params(id, params);
        Ok(())
    }

    /// Resolve a written type. Unknown class names are fatal; `String` is
    /// known but unsupported.
    pub(super) fn resolve_type(&mut self, ty: &TypeExpr) -> Result<Type, Abort> {
        match &ty.kind {
            TypeExprKind::Int => Ok(Type::Int),
            TypeExprKind::Boolean => Ok(Type::Boolean),
            TypeExprKind::Void => Ok(Type::Void),
            TypeExprKind::Class(name) => match self.scope.class(name) {
                Some(id) if id == self.builtins.string => Ok(Type::Unsupported),
                Some(id) => Ok(Type::Class(id)),
                None => Err(self.fatal(CompilationError::UnknownClass {
                    name: name.clone(),
                    span: ty.span,
                })),
            },
            TypeExprKind::Array(elem) => Ok(Type::array_of(self.resolve_type(elem)?)),
        }
    }
}
