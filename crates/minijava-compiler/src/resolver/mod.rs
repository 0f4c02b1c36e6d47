//! Scope and type resolution.
//!
//! Binds every identifier to a declaration and types every expression,
//! annotating the syntax tree in place.
//!
//! ## Passes
//!
//! - **Signatures** ([`signatures`]): register classes and members, resolve
//!   every declared type
//! - **Bodies** ([`stmt`], [`expr`], [`reference`]): walk each method body
//!   with the class's members in scope
//!
//! Identification errors stop the walk immediately: the error is reported and
//! `Err(Abort)` unwinds to [`Resolver::resolve`]. Type errors are reported and
//! the node is typed [`Type::Error`], which matches everything, so one mistake
//! produces one diagnostic.

mod expr;
mod operators;
mod reference;
mod signatures;
mod stmt;

use minijava_ast::{ClassDecl, MethodDecl, Package};
use minijava_core::{CompilationError, DeclId, ErrorReporter, Type};

use crate::builtins::Builtins;
use crate::decls::DeclTable;
use crate::error::{Abort, CodegenError};
use crate::return_checker::ReturnChecker;
use crate::scope::Scope;

/// Everything the code generator needs from analysis.
#[derive(Debug)]
pub struct Analysis {
    pub table: DeclTable,
    pub builtins: Builtins,
    /// `public static void main(String[])`, if the program has one.
    pub entry: Option<DeclId>,
}

/// The method whose body is being resolved.
#[derive(Debug, Clone)]
pub(crate) struct MethodContext {
    pub class: DeclId,
    pub is_static: bool,
    pub return_ty: Type,
}

/// Resolves one package.
pub struct Resolver<'r> {
    table: DeclTable,
    builtins: Builtins,
    scope: Scope,
    reporter: &'r mut dyn ErrorReporter,
    /// Local whose initializer is being resolved.
    initializing: Option<DeclId>,
    returns: ReturnChecker,
}

impl<'r> Resolver<'r> {
    /// Create a resolver with the built-in classes in scope.
    pub fn new(reporter: &'r mut dyn ErrorReporter) -> Result<Self, CodegenError> {
        let mut table = DeclTable::new();
        let builtins = Builtins::install(&mut table)?;
        let mut scope = Scope::new();
        for &class in table.classes() {
            scope.declare_class(&table.get(class).name, class);
        }
        Ok(Self {
            table,
            builtins,
            scope,
            reporter,
            initializing: None,
            returns: ReturnChecker::new(),
        })
    }

    /// Resolve a package, consuming the resolver.
    #[tracing::instrument(level = "debug", skip_all, fields(classes = package.classes.len()))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(mut self, package: &mut Package) -> Result<Analysis, Abort> {
        let class_ids = self.declare_signatures(package)?;

        for (class, &class_id) in package.classes.iter_mut().zip(&class_ids) {
            self.resolve_class(class, class_id)?;
        }

        let entry = self.find_entry(package);

        Ok(Analysis {
            table: self.table,
            builtins: self.builtins,
            entry,
        })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(class = %class.name))]
    fn resolve_class(&mut self, class: &mut ClassDecl, class_id: DeclId) -> Result<(), Abort> {
        let Some(info) = self.table.class_info(class_id) else {
            return Ok(());
        };
        let members = info.members.clone();
        let method_ids = info.methods.clone();
        self.scope.enter_class(&members);

        for (method, method_id) in class.methods.iter_mut().zip(method_ids) {
            self.resolve_method(method, class_id, method_id)?;
        }
        Ok(())
    }

    fn resolve_method(
        &mut self,
        method: &mut MethodDecl,
        class_id: DeclId,
        method_id: DeclId,
    ) -> Result<(), Abort> {
        let params = self
            .table
            .method_info(method_id)
            .map(|info| info.params.clone())
            .unwrap_or_default();

        self.scope.enter_method();
        for (param, param_id) in method.params.iter().zip(params) {
            self.scope
                .declare_local(&param.name, param_id, param.span)
                .map_err(|e| self.fatal(e))?;
        }

        let cx = MethodContext {
            class: class_id,
            is_static: method.is_static(),
            return_ty: self.table.get(method_id).ty.clone(),
        };
        for stmt in &mut method.body {
            self.resolve_stmt(stmt, &cx)?;
        }

        if !cx.return_ty.is_void() && !self.returns.all_paths_return(&method.body) {
            self.report(CompilationError::MissingReturn {
                method: method.name.clone(),
                span: method.span,
            });
        }
        Ok(())
    }

    /// First `public static void main(String[])` in declaration order.
    fn find_entry(&mut self, package: &Package) -> Option<DeclId> {
        let entry = package
            .classes
            .iter()
            .flat_map(|class| &class.methods)
            .find(|method| method.is_entry_signature())
            .and_then(|method| method.decl);

        if entry.is_none() {
            self.report(CompilationError::MissingEntryPoint { span: package.span });
        }
        entry
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    /// Report an identification error and produce the abort signal.
    fn fatal(&mut self, error: CompilationError) -> Abort {
        self.reporter.report(error);
        Abort
    }

    /// Report a type error.
    fn report(&mut self, error: CompilationError) {
        self.reporter.report(error);
    }

    /// Source-level spelling of a type, for messages.
    fn describe(&self, ty: &Type) -> String {
        match ty {
            Type::Class(id) => self.table.get(*id).name.clone(),
            Type::Array(elem) => format!("{}[]", self.describe(elem)),
            Type::Unsupported => "String".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijava_ast::build::*;
    use minijava_ast::{ExprKind, MemberFlags, RefKind, Stmt};
    use minijava_core::{Diagnostics, ErrorKind};

    fn analyze(package: &mut Package) -> (Result<Analysis, Abort>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let resolver = Resolver::new(&mut diagnostics).unwrap();
        let result = resolver.resolve(package);
        (result, diagnostics)
    }

    fn main_class(body: Vec<Stmt>) -> ClassDecl {
        class("Main", vec![], vec![main_method(body)])
    }

    #[test]
    fn minimal_program_has_entry() {
        let mut program = package(vec![main_class(vec![println(int_lit(1))])]);
        let (result, diagnostics) = analyze(&mut program);
        let analysis = result.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(analysis.entry, program.classes[0].methods[0].decl);
    }

    #[test]
    fn annotates_println_chain() {
        let mut program = package(vec![main_class(vec![println(int_lit(1))])]);
        let (result, _) = analyze(&mut program);
        let analysis = result.unwrap();

        let Stmt::Call(call) = &program.classes[0].methods[0].body[0] else {
            panic!("expected call statement");
        };
        assert_eq!(call.callee.decl(), Some(analysis.builtins.println));
        let RefKind::Qualified { prefix, .. } = &call.callee.kind else {
            panic!("expected qualified callee");
        };
        assert_eq!(prefix.decl(), Some(analysis.builtins.out));
        assert_eq!(call.args[0].ty, Some(Type::Int));
    }

    #[test]
    fn missing_entry_point_reported_at_package() {
        let mut program = package(vec![class(
            "A",
            vec![],
            vec![method(MemberFlags::empty(), void(), "run", vec![], vec![])],
        )])
        .at(1);
        let (result, diagnostics) = analyze(&mut program);
        assert!(result.unwrap().entry.is_none());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.lines(), vec![1]);
    }

    #[test]
    fn first_matching_main_wins() {
        let mut program = package(vec![
            class(
                "A",
                vec![],
                vec![method(
                    MemberFlags::STATIC,
                    int(),
                    "main",
                    vec![],
                    vec![ret(int_lit(0))],
                )],
            ),
            main_class(vec![]),
            class("B", vec![], vec![main_method(vec![])]),
        ]);
        let (result, diagnostics) = analyze(&mut program);
        assert!(diagnostics.is_empty());
        assert_eq!(result.unwrap().entry, program.classes[1].methods[0].decl);
    }

    #[test]
    fn fatal_error_aborts_analysis() {
        let mut program = package(vec![main_class(vec![
            println(read(id("nope"))),
            println(add(bool_lit(true), int_lit(1))),
        ])]);
        let (result, diagnostics) = analyze(&mut program);
        assert!(result.is_err());
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.count_of(ErrorKind::Identification), 1);
    }

    #[test]
    fn type_errors_accumulate() {
        let mut program = package(vec![main_class(vec![
            println(add(bool_lit(true), int_lit(1))).at(3),
            var(boolean(), "b", int_lit(2)).at(4),
        ])]);
        let (result, diagnostics) = analyze(&mut program);
        assert!(result.is_ok());
        assert_eq!(diagnostics.count_of(ErrorKind::Type), 2);
        assert_eq!(diagnostics.lines(), vec![3, 4]);
    }

    #[test]
    fn missing_return_names_method() {
        let mut program = package(vec![class(
            "Main",
            vec![],
            vec![
                main_method(vec![]),
                method(
                    MemberFlags::empty(),
                    int(),
                    "f",
                    vec![],
                    vec![if_stmt(bool_lit(true), ret(int_lit(1)), None)],
                )
                .at(5),
            ],
        )]);
        let (_, diagnostics) = analyze(&mut program);
        let errors: Vec<_> = diagnostics.iter().collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            CompilationError::MissingReturn { method, span } if method == "f" && span.line == 5
        ));
    }

    #[test]
    fn new_object_binds_class() {
        let mut program = package(vec![
            main_class(vec![var(class_type("Box"), "b", new_object("Box"))]),
            class("Box", vec![], vec![]),
        ]);
        let (result, diagnostics) = analyze(&mut program);
        let analysis = result.unwrap();
        assert!(diagnostics.is_empty());

        let Stmt::VarDecl(decl) = &program.classes[0].methods[0].body[0] else {
            panic!("expected declaration");
        };
        let ExprKind::NewObject(ident) = &decl.init.kind else {
            panic!("expected new expression");
        };
        assert_eq!(ident.decl, program.classes[1].decl);
        assert!(analysis.table.is_class(ident.decl.unwrap()));
    }
}
