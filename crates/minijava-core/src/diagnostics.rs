//! The error-reporting collaborator.
//!
//! The compiler never decides on its own whether a program is valid: every
//! [`CompilationError`] goes through an [`ErrorReporter`], and the reporter's
//! [`has_errors`](ErrorReporter::has_errors) is the single source of truth
//! for whether code generation runs.

use std::fmt;

use crate::CompilationError;
use crate::error::ErrorKind;

/// Receives diagnostics from the compiler passes.
pub trait ErrorReporter {
    /// Record one error.
    fn report(&mut self, error: CompilationError);

    /// Whether any error has been recorded.
    fn has_errors(&self) -> bool;
}

/// A collection of diagnostics from one compilation.
///
/// # Examples
///
/// ```rust
/// use minijava_core::{CompilationError, Diagnostics, ErrorReporter, Span};
///
/// let mut diagnostics = Diagnostics::new();
/// assert!(!diagnostics.has_errors());
///
/// diagnostics.report(CompilationError::UnknownClass {
///     name: "Foo".to_string(),
///     span: Span::new(3, 5),
/// });
///
/// assert!(diagnostics.has_errors());
/// assert_eq!(diagnostics.error_count(), 1);
/// assert_eq!(diagnostics.lines(), vec![3]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    errors: Vec<CompilationError>,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of recorded errors of the given kind.
    pub fn count_of(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind() == kind).count()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate over the recorded errors in report order.
    pub fn iter(&self) -> impl Iterator<Item = &CompilationError> {
        self.errors.iter()
    }

    /// Source lines of the recorded errors, in report order.
    pub fn lines(&self) -> Vec<u32> {
        self.errors.iter().map(CompilationError::line).collect()
    }

    /// Consume the collection, yielding the errors.
    pub fn into_errors(self) -> Vec<CompilationError> {
        self.errors
    }

    /// Removes all diagnostics from the collection.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl ErrorReporter for Diagnostics {
    fn report(&mut self, error: CompilationError) {
        tracing::debug!(line = error.line(), fatal = error.is_fatal(), "{}", error);
        self.errors.push(error);
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a CompilationError;
    type IntoIter = std::slice::Iter<'a, CompilationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
