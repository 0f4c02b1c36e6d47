//! Identifiers.

use minijava_core::{DeclId, Span};

/// An identifier occurrence.
///
/// `decl` is filled in by the resolver with the declaration the name binds to.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
    pub decl: Option<DeclId>,
}

impl Ident {
    /// Create an unresolved identifier.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            decl: None,
        }
    }
}
