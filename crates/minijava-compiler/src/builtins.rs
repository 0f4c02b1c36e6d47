//! Built-in classes.
//!
//! Injected into every compilation before user classes:
//!
//! ```text
//! class System      { public static _PrintStream out; }
//! class _PrintStream { public static void println(int n); }
//! class String      { }
//! ```
//!
//! `println` is static so that `System.out` never needs a real object; its
//! body is emitted by the code generator right after the entry sequence.

use minijava_ast::MemberFlags;
use minijava_core::{DeclId, Span, Type};

use crate::decls::{DeclKind, DeclTable, MethodInfo};
use crate::error::CodegenError;

/// Ids of the built-in declarations.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    pub system: DeclId,
    pub string: DeclId,
    pub out: DeclId,
    pub println: DeclId,
    pub println_arg: DeclId,
    /// The `length` pseudo-field of every array.
    pub array_length: DeclId,
}

impl Builtins {
    /// Register the built-in classes in an empty table.
    pub fn install(table: &mut DeclTable) -> Result<Self, CodegenError> {
        let span = Span::default();
        let system = table.add_class("System", span);
        let print_stream = table.add_class("_PrintStream", span);
        let string = table.add_class("String", span);

        let out = member(
            table,
            system,
            "out",
            DeclKind::Field {
                class: system,
                flags: MemberFlags::STATIC,
            },
            Type::Class(print_stream),
        )?;

        let println = member(
            table,
            print_stream,
            "println",
            DeclKind::Method(MethodInfo {
                class: print_stream,
                flags: MemberFlags::STATIC,
                params: Vec::new(),
            }),
            Type::Void,
        )?;
        let println_arg = table.add("n", DeclKind::Param, Type::Int, span);
        table.set_params(println, vec![println_arg]);

        let array_length = table.add("length", DeclKind::ArrayLength, Type::Int, span);

        Ok(Self {
            system,
            string,
            out,
            println,
            println_arg,
            array_length,
        })
    }
}

fn member(
    table: &mut DeclTable,
    class: DeclId,
    name: &'static str,
    kind: DeclKind,
    ty: Type,
) -> Result<DeclId, CodegenError> {
    table
        .add_member(class, name, kind, ty, Span::default())
        .ok_or(CodegenError::BuiltinMember { class, name })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_shapes() {
        let mut table = DeclTable::new();
        let b = Builtins::install(&mut table).unwrap();

        let stream = table.classes()[1];
        assert_eq!(table.classes(), &[b.system, stream, b.string]);
        assert_eq!(table.get(b.out).ty, Type::Class(stream));
        assert!(table.is_static(b.out));
        assert!(table.is_static(b.println));
        assert_eq!(table.get(b.println).ty, Type::Void);
        let arity = table.method_info(b.println).map(|m| m.params.len());
        assert_eq!(arity, Some(1));
        assert_eq!(table.get(b.array_length).ty, Type::Int);
    }

    #[test]
    fn builtin_members_are_public() {
        let mut table = DeclTable::new();
        let b = Builtins::install(&mut table).unwrap();

        let system = table.class_info(b.system).unwrap();
        assert_eq!(system.public.get("out"), Some(&b.out));
        let stream = table.class_info(table.classes()[1]).unwrap();
        assert_eq!(stream.public.get("println"), Some(&b.println));
        assert!(table.class_info(b.string).unwrap().members.is_empty());
    }

    #[test]
    fn member_collision_is_an_internal_error() {
        let mut table = DeclTable::new();
        let b = Builtins::install(&mut table).unwrap();
        assert_ne!(b.out, b.system);

        let again = member(
            &mut table,
            b.system,
            "out",
            DeclKind::Field {
                class: b.system,
                flags: MemberFlags::STATIC,
            },
            Type::Int,
        );
        assert_eq!(
            again,
            Err(CodegenError::BuiltinMember {
                class: b.system,
                name: "out"
            })
        );
    }
}
