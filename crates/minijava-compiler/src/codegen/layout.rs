//! Storage layout.
//!
//! | declaration | slot |
//! |-------------|------|
//! | instance field | `OB` offset, from 0 per class |
//! | static field | `SB` offset, numbered across all classes |
//! | class | number of instance fields |
//! | parameter `i` of `n` | `LB` offset `i - n` |
//!
//! Locals and methods get their slots during emission.

use crate::decls::DeclTable;
use crate::error::CodegenError;

/// Assign field, class and parameter slots for every class, built-ins
/// included, in registration order. Returns the number of static fields.
pub(super) fn assign_slots(table: &mut DeclTable) -> Result<i32, CodegenError> {
    let mut statics = 0;

    for class in table.classes().to_vec() {
        let Some(info) = table.class_info(class) else {
            return Err(CodegenError::WrongDeclKind {
                decl: class,
                expected: "class",
            });
        };
        let fields = info.fields.clone();
        let methods = info.methods.clone();

        let mut instance = 0;
        for field in fields {
            if table.is_static(field) {
                table.set_slot(field, statics)?;
                statics += 1;
            } else {
                table.set_slot(field, instance)?;
                instance += 1;
            }
        }
        table.set_slot(class, instance)?;

        for method in methods {
            let params = table
                .method_info(method)
                .map(|info| info.params.clone())
                .unwrap_or_default();
            let count = params.len() as i32;
            for (index, param) in params.into_iter().enumerate() {
                table.set_slot(param, index as i32 - count)?;
            }
        }

        tracing::trace!(class = %table.get(class).name, instance_fields = instance, "laid out");
    }

    Ok(statics)
}
