//! Identifier scopes for the resolver.
//!
//! [`Scope`] layers names the way MiniJava looks them up:
//! - Local variables and parameters (nested block scopes)
//! - Members of the class being analyzed
//! - Class names
//!
//! Blocks push and pop a depth instead of copying maps. A declaration that
//! shadows an outer one saves the outer binding on a shadow stack, and
//! leaving the block restores it.

use minijava_core::{CompilationError, DeclId, Span};
use rustc_hash::FxHashMap;

// ============================================================================
// Types
// ============================================================================

/// Which layer a name was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Parameter or local variable.
    Local(DeclId),
    /// Field or method of the current class.
    Member(DeclId),
    Class(DeclId),
}

impl Binding {
    pub fn decl(self) -> DeclId {
        match self {
            Binding::Local(id) | Binding::Member(id) | Binding::Class(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LocalVar {
    decl: DeclId,
    /// Scope depth where declared
    depth: u32,
}

// ============================================================================
// Scope
// ============================================================================

/// Name layers for one analysis.
#[derive(Debug, Default)]
pub struct Scope {
    classes: FxHashMap<String, DeclId>,
    members: FxHashMap<String, DeclId>,
    locals: FxHashMap<String, LocalVar>,

    /// Current block depth (0 = parameters and the method's top level)
    depth: u32,

    /// Bindings hidden by a shadowing declaration: (shadowing depth, name, old binding)
    shadowed: Vec<(u32, String, LocalVar)>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Classes and members
    // ==========================================================================

    /// Register a class name. Returns `false` if the name is taken.
    pub fn declare_class(&mut self, name: &str, decl: DeclId) -> bool {
        if self.classes.contains_key(name) {
            return false;
        }
        self.classes.insert(name.to_string(), decl);
        true
    }

    pub fn class(&self, name: &str) -> Option<DeclId> {
        self.classes.get(name).copied()
    }

    /// Replace the member layer with the members of a new current class.
    pub fn enter_class(&mut self, members: &FxHashMap<String, DeclId>) {
        self.members.clone_from(members);
        self.enter_method();
    }

    /// Start a method: no locals, depth 0.
    pub fn enter_method(&mut self) {
        self.locals.clear();
        self.shadowed.clear();
        self.depth = 0;
    }

    // ==========================================================================
    // Blocks
    // ==========================================================================

    /// Enter a nested block.
    pub fn push_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave the current block, dropping its declarations.
    pub fn pop_scope(&mut self) {
        let depth = self.depth;
        self.locals.retain(|_, var| var.depth < depth);

        while let Some((shadowing_depth, _, _)) = self.shadowed.last() {
            if *shadowing_depth != depth {
                break;
            }
            if let Some((_, name, var)) = self.shadowed.pop() {
                self.locals.insert(name, var);
            }
        }

        self.depth = depth.saturating_sub(1);
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Declare a parameter or local variable in the current block.
    ///
    /// Shadowing an outer block is allowed; redeclaring in the same block is
    /// an identification error.
    pub fn declare_local(
        &mut self,
        name: &str,
        decl: DeclId,
        span: Span,
    ) -> Result<(), CompilationError> {
        if let Some(existing) = self.locals.get(name).copied() {
            if existing.depth == self.depth {
                return Err(CompilationError::DuplicateVariable {
                    name: name.to_string(),
                    span,
                });
            }
            self.shadowed.push((self.depth, name.to_string(), existing));
        }
        self.locals.insert(
            name.to_string(),
            LocalVar {
                decl,
                depth: self.depth,
            },
        );
        Ok(())
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Look a name up: locals, then members, then classes.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        if let Some(var) = self.locals.get(name) {
            return Some(Binding::Local(var.decl));
        }
        if let Some(&decl) = self.members.get(name) {
            return Some(Binding::Member(decl));
        }
        self.classes.get(name).map(|&decl| Binding::Class(decl))
    }
}
