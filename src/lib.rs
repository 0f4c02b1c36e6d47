//! MiniJava
//!
//! Semantic analysis and mJAM code generation for MiniJava programs.
//!
//! The crates of the workspace are re-exported here:
//!
//! - [`core`]: spans, declaration ids, types and diagnostics
//! - [`ast`]: the syntax tree and its builder
//! - [`compiler`]: resolver, code generator and the instruction set
//!
//! # Example
//!
//! ```
//! use minijava::prelude::*;
//! use minijava::ast::build::*;
//!
//! let mut package = package(vec![class(
//!     "Main",
//!     vec![],
//!     vec![main_method(vec![println(int_lit(42))])],
//! )]);
//!
//! let program = minijava::compile(&mut package).unwrap();
//! assert_eq!(program.get(program.entry_addr()).map(|i| i.d), Some(42));
//! ```

pub use minijava_ast as ast;
pub use minijava_compiler as compiler;
pub use minijava_core as core;

use minijava_ast::Package;
use minijava_compiler::{CodegenError, CompileError, CompileOptions, Compiler, Program};
use minijava_core::Diagnostics;
use thiserror::Error;

pub mod prelude {
    pub use minijava_ast::{MemberFlags, Package};
    pub use minijava_compiler::{
        CompileError, CompileOptions, Compiler, Instruction, Op, Prim, Program, Reg,
    };
    pub use minijava_core::{CompilationError, Diagnostics, ErrorKind, ErrorReporter, Span, Type};

    pub use crate::Failure;
}

/// Why [`compile`] produced no program.
#[derive(Debug, Error)]
pub enum Failure {
    /// The program has errors; all of them are in the diagnostics.
    #[error("{count} error(s) found:\n{0}", count = .0.error_count())]
    Rejected(Diagnostics),

    #[error("internal compiler error: {0}")]
    Internal(#[from] CodegenError),
}

/// Compile a package with the default options, collecting diagnostics.
pub fn compile(package: &mut Package) -> Result<Program, Failure> {
    compile_with(package, CompileOptions::default())
}

/// Compile a package, collecting diagnostics.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_with(package: &mut Package, options: CompileOptions) -> Result<Program, Failure> {
    let mut diagnostics = Diagnostics::new();
    match Compiler::with_options(options).compile(package, &mut diagnostics) {
        Ok(program) => Ok(program),
        Err(CompileError::Rejected) => Err(Failure::Rejected(diagnostics)),
        Err(CompileError::Internal(error)) => {
            tracing::error!(%error, "code generation failed");
            Err(Failure::Internal(error))
        }
    }
}
