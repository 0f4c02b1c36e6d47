//! mJAM code generation.
//!
//! Runs only on a package the resolver accepted. A layout pass assigns every
//! field and parameter its storage offset, then a single walk emits the
//! entry sequence, the built-in `println` body and every user method in
//! declaration order.
//!
//! ## Modules
//!
//! - [`layout`]: storage offsets for fields, parameters and class sizes
//! - [`stmt`]: statements, blocks and loops
//! - [`expr`]: expression values and calls
//! - [`cond`]: conditions compiled to jump chains
//! - [`reference`]: reads and write targets of references
//! - [`fold`]: compile-time values
//!
//! Expression walks return a [`Value`]: either the value is known at compile
//! time and nothing was emitted, or code was emitted that leaves it on the
//! operand stack.

mod cond;
mod expr;
mod fold;
mod layout;
mod reference;
mod stmt;

use minijava_ast::Package;
use minijava_core::{DeclId, Span};
use rustc_hash::FxHashMap;

use crate::builtins::Builtins;
use crate::bytecode::{LINK_DATA_SIZE, Prim, Reg};
use crate::decls::DeclTable;
use crate::emit::Emitter;
use crate::error::CodegenError;
use crate::program::Program;
use crate::return_checker::ReturnChecker;

// ============================================================================
// Options and values
// ============================================================================

/// Code generation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fold operators over known operands and reuse known local values.
    /// Literals stay known either way.
    pub fold_constants: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            fold_constants: true,
        }
    }
}

/// Result of generating an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Known at compile time; nothing was emitted.
    Known(i32),
    /// Emitted; the value is on top of the operand stack.
    OnStack,
}

/// Where an assignment stores its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefTarget {
    /// `STORE d[r]`
    Register(Reg, i32),
    /// Object address and field offset are already on the stack (`fieldupd`).
    Indirect,
}

/// Control-flow context of the statement being emitted.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Flow {
    /// Inside a conditionally executed branch.
    pub in_branch: bool,
    /// Inside a loop body, condition or update.
    pub in_loop: bool,
}

impl Flow {
    fn branch(self) -> Self {
        Self {
            in_branch: true,
            ..self
        }
    }

    fn looping(self) -> Self {
        Self {
            in_loop: true,
            ..self
        }
    }
}

// ============================================================================
// CodeGenerator
// ============================================================================

/// Emits the mJAM program for one analyzed package.
pub struct CodeGenerator<'a> {
    table: &'a mut DeclTable,
    builtins: Builtins,
    options: CompileOptions,
    emitter: Emitter,
    /// Compile-time values of locals on the straight-line path.
    known: FxHashMap<DeclId, i32>,
    /// `LB` offset of the next local variable.
    next_local: i32,
    /// Parameter count of the method being emitted.
    arg_count: i32,
    returns: ReturnChecker,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(table: &'a mut DeclTable, builtins: Builtins, options: CompileOptions) -> Self {
        Self {
            table,
            builtins,
            options,
            emitter: Emitter::new(),
            known: FxHashMap::default(),
            next_local: LINK_DATA_SIZE,
            arg_count: 0,
            returns: ReturnChecker::new(),
        }
    }

    /// Lay out storage and emit the whole program.
    #[tracing::instrument(level = "debug", skip_all, fields(classes = package.classes.len()))]
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn generate(mut self, package: &Package, entry: DeclId) -> Result<Program, CodegenError> {
        let statics = layout::assign_slots(self.table)?;

        self.emit_entry(statics, entry);
        self.emit_println()?;

        for class in &package.classes {
            for method in &class.methods {
                self.gen_method(method)?;
            }
        }

        let entry_addr = self.table.expect_slot(entry)?;
        let (code, patches) = self.emitter.finish(self.table)?;
        tracing::debug!(
            instructions = code.len(),
            patches = patches.len(),
            "code generation finished"
        );
        Ok(Program::new(code, entry_addr as usize, patches))
    }

    /// Allocate statics, pass an empty `String[]` to `main`, halt on return.
    fn emit_entry(&mut self, statics: i32, entry: DeclId) {
        self.emitter.set_line(0);
        self.emitter.emit_push(statics);
        self.emitter.emit_literal(0);
        self.emitter.emit_prim(Prim::NewArr);
        self.emitter.emit_patched_call(entry);
        self.emitter.emit_halt();
    }

    /// `System.out.println(int)`: print the argument and a newline.
    fn emit_println(&mut self) -> Result<(), CodegenError> {
        let addr = self.emitter.current_addr() as i32;
        self.table.set_slot(self.builtins.println, addr)?;
        self.emitter.emit_load(Reg::LB, -1);
        self.emitter.emit_prim(Prim::PutIntNl);
        self.emitter.emit_return(0, 1);
        Ok(())
    }

    /// Known value of an expression in the current state.
    fn known_value(&self, expr: &minijava_ast::Expr, flow: Flow) -> Option<i32> {
        fold::Folder::new(&self.known, self.options.fold_constants).value(expr, flow)
    }
}

/// Declaration a node was bound to by the resolver.
fn bound(decl: Option<DeclId>, span: Span) -> Result<DeclId, CodegenError> {
    decl.ok_or(CodegenError::MissingBinding { line: span.line })
}
