//! MiniJava Compiler
//!
//! Semantic analysis and mJAM code generation for MiniJava.
//!
//! ## Architecture
//!
//! - **Analysis**: declare every class signature, then bind identifiers and
//!   type-check method bodies in one walk, annotating the tree in place
//! - **Generation**: lay out storage, then emit the entry sequence and every
//!   method, patching forward calls at the end
//!
//! Generation only runs when analysis reported nothing.
//!
//! ## Modules
//!
//! - [`bytecode`]: Instruction set (Op, Reg, Prim, Instruction, CodeStore)
//! - [`builtins`]: The `System`, `_PrintStream` and `String` classes
//! - [`codegen`]: Layout and emission
//! - [`decls`]: Declaration table
//! - [`emit`]: Instruction emitter with jump labels and call patching
//! - [`program`]: The finished program
//! - [`resolver`]: Identification and type checking
//! - [`return_checker`]: Return path analysis
//! - [`scope`]: Scope layers for name lookup
//!
//! # Example
//!
//! ```
//! use minijava_ast::build::*;
//! use minijava_compiler::Compiler;
//! use minijava_core::Diagnostics;
//!
//! let mut package = package(vec![class(
//!     "Main",
//!     vec![],
//!     vec![main_method(vec![println(add(int_lit(1), int_lit(2)))])],
//! )]);
//!
//! let mut diagnostics = Diagnostics::new();
//! let program = Compiler::new().compile(&mut package, &mut diagnostics).unwrap();
//!
//! assert!(diagnostics.is_empty());
//! assert!(!program.has_unpatched());
//! ```

pub mod builtins;
pub mod bytecode;
pub mod codegen;
pub mod decls;
pub mod emit;
pub mod error;
pub mod program;
pub mod resolver;
pub mod return_checker;
pub mod scope;

pub use bytecode::{FALSE_REP, Instruction, LINK_DATA_SIZE, NULL_REP, Op, Prim, Reg, TRUE_REP};
pub use codegen::{CodeGenerator, CompileOptions};
pub use error::{Abort, CodegenError, CompileError};
pub use program::Program;
pub use resolver::{Analysis, Resolver};

// Re-export the error-reporting types from core for convenience
pub use minijava_core::{CompilationError, Diagnostics, ErrorReporter};

use minijava_ast::Package;

/// The compiler entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Resolve and type-check a package.
    ///
    /// Every problem goes to `reporter`; the result is `Rejected` whenever
    /// the reporter holds an error afterwards.
    pub fn check(
        &self,
        package: &mut Package,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Analysis, CompileError> {
        let analysis = Resolver::new(reporter)?
            .resolve(package)
            .map_err(|Abort| CompileError::Rejected)?;
        if reporter.has_errors() {
            return Err(CompileError::Rejected);
        }
        Ok(analysis)
    }

    /// Check a package and, if it is valid, generate its program.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn compile(
        &self,
        package: &mut Package,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Program, CompileError> {
        let mut analysis = self.check(package, reporter)?;
        let entry = analysis.entry.ok_or(CodegenError::MissingEntry)?;
        let program = CodeGenerator::new(&mut analysis.table, analysis.builtins, self.options)
            .generate(package, entry)?;
        Ok(program)
    }
}
