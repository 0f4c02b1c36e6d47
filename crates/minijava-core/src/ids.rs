//! Declaration identifiers.

use std::fmt;

/// Index of a declaration in the compiler's declaration table.
///
/// Every class, field, method, parameter and local variable gets exactly one
/// id during resolution. Ids are only meaningful for the compilation that
/// created them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    /// Create an id from a raw table index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw table index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
