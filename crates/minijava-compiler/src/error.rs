//! Internal compiler errors.
//!
//! User-facing problems are [`CompilationError`](minijava_core::CompilationError)s
//! and flow through the [`ErrorReporter`](minijava_core::ErrorReporter). The
//! types here never describe a problem in the program being compiled.

use minijava_core::DeclId;
use thiserror::Error;

/// Signal that analysis stopped at a fatal (identification) error.
///
/// The error itself has already been handed to the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("analysis aborted after an identification error")]
pub struct Abort;

/// A broken invariant inside the compiler.
///
/// Seeing one of these means a compiler defect, not a bad program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("node at line {line} was never bound to a declaration")]
    MissingBinding { line: u32 },

    #[error("node at line {line} was never assigned a type")]
    MissingType { line: u32 },

    #[error("storage slot of {decl:?} assigned twice")]
    SlotReassigned { decl: DeclId },

    #[error("storage slot of {decl:?} read before it was assigned")]
    SlotUnassigned { decl: DeclId },

    #[error("call at address {addr} targets {target:?}, which never received a code address")]
    UnresolvedPatch { addr: usize, target: DeclId },

    #[error("invalid assignment target at line {line}")]
    InvalidTarget { line: u32 },

    #[error("no entry method was recorded")]
    MissingEntry,

    #[error("built-in member {name} of {class:?} could not be registered")]
    BuiltinMember { class: DeclId, name: &'static str },

    #[error("expected {expected} declaration for {decl:?}")]
    WrongDeclKind {
        decl: DeclId,
        expected: &'static str,
    },
}

/// Why [`Compiler::compile`](crate::Compiler::compile) produced no program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The reporter holds at least one diagnostic.
    #[error("program rejected, see the reported diagnostics")]
    Rejected,

    #[error(transparent)]
    Internal(#[from] CodegenError),
}
