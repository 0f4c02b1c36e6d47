//! Reference resolution: `this`, bare names and member access chains.
//!
//! Every failure here is an identification error and aborts analysis.

use minijava_ast::{Ident, RefKind, Reference};
use minijava_core::{CompilationError, DeclId, Type};

use super::{MethodContext, Resolver};
use crate::error::Abort;
use crate::scope::Binding;

impl Resolver<'_> {
    /// Resolve a reference and record its type on the node.
    pub(super) fn resolve_reference(
        &mut self,
        reference: &mut Reference,
        cx: &MethodContext,
    ) -> Result<Type, Abort> {
        let span = reference.span;
        let ty = match &mut reference.kind {
            RefKind::This => {
                if cx.is_static {
                    return Err(self.fatal(CompilationError::ThisInStaticContext { span }));
                }
                Type::Class(cx.class)
            }
            RefKind::Id(ident) => self.resolve_id(ident, cx)?,
            RefKind::Qualified { prefix, member } => self.resolve_member(prefix, member, cx)?,
        };
        reference.ty = Some(ty.clone());
        Ok(ty)
    }

    fn resolve_id(&mut self, ident: &mut Ident, cx: &MethodContext) -> Result<Type, Abort> {
        let Some(binding) = self.scope.lookup(&ident.name) else {
            return Err(self.fatal(CompilationError::UndeclaredIdentifier {
                name: ident.name.clone(),
                span: ident.span,
            }));
        };
        let decl = binding.decl();

        if self.initializing == Some(decl) {
            return Err(self.fatal(CompilationError::SelfReferentialInit {
                name: ident.name.clone(),
                span: ident.span,
            }));
        }
        if matches!(binding, Binding::Member(_)) && cx.is_static && !self.table.is_static(decl) {
            return Err(self.fatal(CompilationError::StaticContext {
                name: ident.name.clone(),
                span: ident.span,
            }));
        }

        ident.decl = Some(decl);
        Ok(self.table.get(decl).ty.clone())
    }

    /// `prefix.member`
    ///
    /// A class-name prefix gives static access; an object prefix gives
    /// instance access. Inside its own class every member is visible,
    /// elsewhere only non-private ones.
    fn resolve_member(
        &mut self,
        prefix: &mut Reference,
        member: &mut Ident,
        cx: &MethodContext,
    ) -> Result<Type, Abort> {
        let prefix_ty = self.resolve_reference(prefix, cx)?;
        let prefix_decl = prefix.decl().filter(|_| !prefix.is_this());

        let decl = match prefix_decl {
            Some(decl) if self.table.is_method(decl) => {
                return Err(self.fatal(CompilationError::MemberOfMethod {
                    name: member.name.clone(),
                    span: member.span,
                }));
            }
            Some(class) if self.table.is_class(class) => {
                let found = self.find_member(class, member, cx)?;
                if !self.table.is_static(found) {
                    return Err(self.fatal(CompilationError::StaticContext {
                        name: member.name.clone(),
                        span: member.span,
                    }));
                }
                found
            }
            _ => match &prefix_ty {
                Type::Class(class) => self.find_member(*class, member, cx)?,
                Type::Array(_) if member.name == "length" => self.builtins.array_length,
                Type::Array(_) => {
                    return Err(self.fatal(CompilationError::NoSuchMember {
                        name: member.name.clone(),
                        owner: "an array".to_string(),
                        visibility: "",
                        span: member.span,
                    }));
                }
                _ => {
                    return Err(self.fatal(CompilationError::MemberOfNonObject {
                        name: member.name.clone(),
                        span: member.span,
                    }));
                }
            },
        };

        member.decl = Some(decl);
        Ok(self.table.get(decl).ty.clone())
    }

    /// Look `member` up in `class` with the visibility of the current class.
    fn find_member(
        &mut self,
        class: DeclId,
        member: &Ident,
        cx: &MethodContext,
    ) -> Result<DeclId, Abort> {
        let own_class = class == cx.class;
        let found = self.table.class_info(class).and_then(|info| {
            let visible = if own_class { &info.members } else { &info.public };
            visible.get(&member.name).copied()
        });

        found.ok_or_else(|| {
            let owner = format!("class {}", self.table.get(class).name);
            self.fatal(CompilationError::NoSuchMember {
                name: member.name.clone(),
                owner,
                visibility: if own_class { "" } else { "public " },
                span: member.span,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use minijava_ast::build::*;
    use minijava_ast::{MemberFlags, Package, Stmt};
    use minijava_core::{CompilationError, Diagnostics};

    use crate::resolver::Resolver;

    fn errors_in(mut program: Package) -> Vec<CompilationError> {
        let mut diagnostics = Diagnostics::new();
        let resolver = Resolver::new(&mut diagnostics).unwrap();
        let _ = resolver.resolve(&mut program);
        diagnostics.into_errors()
    }

    /// `class Main { main(..) { main_body } }` plus a helper class
    /// `class Counter { int count; private int hidden; static int total; int next() {..} }`.
    fn with_counter(main_body: Vec<Stmt>) -> Package {
        package(vec![
            class("Main", vec![], vec![main_method(main_body)]),
            class(
                "Counter",
                vec![
                    field(MemberFlags::empty(), int(), "count"),
                    field(MemberFlags::PRIVATE, int(), "hidden"),
                    field(MemberFlags::STATIC, int(), "total"),
                ],
                vec![method(
                    MemberFlags::empty(),
                    int(),
                    "next",
                    vec![],
                    vec![
                        assign(path("this.count"), add(read(id("count")), int_lit(1))),
                        assign(id("hidden"), read(path("this.hidden"))),
                        ret(read(id("count"))),
                    ],
                )],
            ),
        ])
    }

    #[test]
    fn member_access_from_other_class() {
        let errors = errors_in(with_counter(vec![
            var(class_type("Counter"), "c", new_object("Counter")),
            assign(path("c.count"), int_lit(3)),
            println(call(path("c.next"), vec![])),
            assign(path("Counter.total"), int_lit(1)),
        ]));
        assert_eq!(errors, vec![]);
    }

    #[test]
    fn private_member_hidden_outside_class() {
        let errors = errors_in(with_counter(vec![
            var(class_type("Counter"), "c", new_object("Counter")),
            println(read(path("c.hidden")).at(6)),
        ]));
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            CompilationError::NoSuchMember { visibility: "public ", owner, .. }
                if owner == "class Counter"
        ));
    }

    #[test]
    fn instance_member_through_class_name() {
        let errors = errors_in(with_counter(vec![println(read(path("Counter.count")))]));
        assert!(matches!(errors[..], [CompilationError::StaticContext { .. }]));
    }

    #[test]
    fn static_context_rejects_bare_instance_field() {
        let program = package(vec![class(
            "Main",
            vec![field(MemberFlags::empty(), int(), "x")],
            vec![main_method(vec![println(read(id("x")).at(3)).at(3)])],
        )]);
        let errors = errors_in(program);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CompilationError::StaticContext { .. }));
        assert_eq!(errors[0].line(), 3);
    }

    #[test]
    fn this_in_static_method() {
        let program = package(vec![class(
            "Main",
            vec![],
            vec![main_method(vec![var(class_type("Main"), "m", read(this()))])],
        )]);
        assert!(matches!(
            errors_in(program)[..],
            [CompilationError::ThisInStaticContext { .. }]
        ));
    }

    #[test]
    fn member_of_method() {
        let errors = errors_in(with_counter(vec![
            var(class_type("Counter"), "c", new_object("Counter")),
            println(read(path("c.next.x"))),
        ]));
        assert!(matches!(errors[..], [CompilationError::MemberOfMethod { .. }]));
    }

    #[test]
    fn member_of_int() {
        let errors = errors_in(with_counter(vec![
            var(int(), "n", int_lit(1)),
            println(read(path("n.size"))),
        ]));
        assert!(matches!(errors[..], [CompilationError::MemberOfNonObject { .. }]));
    }

    #[test]
    fn array_length_only() {
        let ok = errors_in(with_counter(vec![
            var(array(int()), "a", new_array(int(), int_lit(2))),
            println(read(path("a.length"))),
        ]));
        assert_eq!(ok, vec![]);

        let errors = errors_in(with_counter(vec![
            var(array(int()), "a", new_array(int(), int_lit(2))),
            println(read(path("a.size"))),
        ]));
        assert!(matches!(errors[..], [CompilationError::NoSuchMember { .. }]));
    }

    #[test]
    fn undeclared_name() {
        let errors = errors_in(with_counter(vec![println(read(id("ghost")))]));
        assert!(matches!(
            &errors[..],
            [CompilationError::UndeclaredIdentifier { name, .. }] if name == "ghost"
        ));
    }

    #[test]
    fn system_out_println_resolves() {
        let errors = errors_in(with_counter(vec![
            println(int_lit(1)),
            call_stmt(path("System.out.println"), vec![int_lit(2)]),
        ]));
        assert_eq!(errors, vec![]);
    }
}
