//! MiniJava Core
//!
//! Types shared by the syntax tree and the compiler passes.
//!
//! ## Modules
//!
//! - [`span`]: Source positions attached to every node and diagnostic
//! - [`ids`]: Declaration identifiers ([`DeclId`])
//! - [`types`]: Semantic types and the type-equality lattice
//! - [`error`]: User-facing compilation errors
//! - [`diagnostics`]: The error-reporting collaborator

pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod span;
pub mod types;

pub use diagnostics::{Diagnostics, ErrorReporter};
pub use error::{CompilationError, ErrorKind};
pub use ids::DeclId;
pub use span::Span;
pub use types::Type;
