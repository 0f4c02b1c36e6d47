//! User-facing compilation errors.
//!
//! Errors fall into two groups:
//!
//! ```text
//! CompilationError
//! ├── identification errors (fatal)  - a name could not be bound, or was bound illegally
//! └── type errors (non-fatal)        - operand, return, condition and assignment mismatches
//! ```
//!
//! The resolver aborts on the first identification error, since most later
//! checks assume every identifier is bound. Type errors are recorded and the
//! offending node is typed [`Type::Error`](crate::Type::Error) so no further
//! diagnostics cascade from the same root cause.

use thiserror::Error;

use crate::Span;

/// Which group a [`CompilationError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unresolvable or illegally bound names. Fatal.
    Identification,
    /// Type mismatches. Non-fatal.
    Type,
}

/// Errors reported while analyzing a MiniJava program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    // ========================================================================
    // Identification errors
    // ========================================================================
    /// Two classes share a name (including the built-in classes).
    #[error("at {span}: duplicate class declaration '{name}'")]
    DuplicateClass { name: String, span: Span },

    /// Two members of one class share a name.
    #[error("at {span}: duplicate member name '{name}' in class '{class}'")]
    DuplicateMember {
        name: String,
        class: String,
        span: Span,
    },

    /// A parameter or local variable redeclares a name in the same scope.
    #[error("at {span}: variable '{name}' is already declared in this scope")]
    DuplicateVariable { name: String, span: Span },

    /// A type names a class that does not exist.
    #[error("at {span}: unknown class name '{name}'")]
    UnknownClass { name: String, span: Span },

    /// A bare identifier matches no declaration.
    #[error("at {span}: no declarations matching the name '{name}'")]
    UndeclaredIdentifier { name: String, span: Span },

    /// A static context refers to an instance member.
    #[error("at {span}: cannot reference non-static member '{name}' from a static context")]
    StaticContext { name: String, span: Span },

    /// `this` inside a static method.
    #[error("at {span}: cannot reference \"this\" from a static context")]
    ThisInStaticContext { span: Span },

    /// A variable is used inside its own initializer.
    #[error("at {span}: cannot reference variable '{name}' in its own initializer")]
    SelfReferentialInit { name: String, span: Span },

    /// A qualified reference whose prefix is a method.
    #[error("at {span}: cannot access member '{name}' of a method")]
    MemberOfMethod { name: String, span: Span },

    /// A qualified reference whose prefix is not an object.
    #[error("at {span}: cannot access member '{name}' of a non-object reference")]
    MemberOfNonObject { name: String, span: Span },

    /// A qualified reference naming a member that does not exist (or is not visible).
    #[error("at {span}: no {visibility}member called '{name}' in {owner}")]
    NoSuchMember {
        name: String,
        owner: String,
        visibility: &'static str,
        span: Span,
    },

    /// No `public static void main(String[] args)` in the program.
    #[error("at {span}: entry point \"public static void main(String[] args)\" not found")]
    MissingEntryPoint { span: Span },

    // ========================================================================
    // Type errors
    // ========================================================================
    /// Two types that must agree do not.
    #[error("at {span}: {message}")]
    TypeMismatch { message: String, span: Span },

    /// An operator applied to operands of the wrong type.
    #[error("at {span}: invalid operand type for {arity} operator '{op}'")]
    InvalidOperand {
        op: &'static str,
        arity: &'static str,
        span: Span,
    },

    /// Assignment to something that cannot be assigned.
    #[error("at {span}: cannot reassign {target}")]
    InvalidAssignment { target: &'static str, span: Span },

    /// Indexing something that is not an array variable.
    #[error("at {span}: cannot perform array access on {target}")]
    InvalidIndexTarget { target: &'static str, span: Span },

    /// A class or method name used where a value is required.
    #[error("at {span}: cannot refer directly to a {what}")]
    NotAValue { what: &'static str, span: Span },

    /// Calling something that is not a method.
    #[error("at {span}: cannot call a non-function reference as a function")]
    NotCallable { span: Span },

    /// Wrong number of arguments in a call.
    #[error("at {span}: method '{method}' expects {expected} argument(s) but {found} were given")]
    ArgumentCount {
        method: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// A `return` that disagrees with the enclosing method's return type.
    #[error("at {span}: {message}")]
    InvalidReturn { message: &'static str, span: Span },

    /// A non-void method with a control path that does not return.
    #[error("at {span}: no return statement found at the end of the non-void method '{method}'")]
    MissingReturn { method: String, span: Span },

    /// A variable declaration as the only statement of a branch or loop body.
    #[error("at {span}: a variable declaration cannot be the solitary statement of a branch")]
    SolitaryDeclaration { span: Span },
}

impl CompilationError {
    /// The group this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompilationError::DuplicateClass { .. }
            | CompilationError::DuplicateMember { .. }
            | CompilationError::DuplicateVariable { .. }
            | CompilationError::UnknownClass { .. }
            | CompilationError::UndeclaredIdentifier { .. }
            | CompilationError::StaticContext { .. }
            | CompilationError::ThisInStaticContext { .. }
            | CompilationError::SelfReferentialInit { .. }
            | CompilationError::MemberOfMethod { .. }
            | CompilationError::MemberOfNonObject { .. }
            | CompilationError::NoSuchMember { .. }
            | CompilationError::MissingEntryPoint { .. } => ErrorKind::Identification,
            CompilationError::TypeMismatch { .. }
            | CompilationError::InvalidOperand { .. }
            | CompilationError::InvalidAssignment { .. }
            | CompilationError::InvalidIndexTarget { .. }
            | CompilationError::NotAValue { .. }
            | CompilationError::NotCallable { .. }
            | CompilationError::ArgumentCount { .. }
            | CompilationError::InvalidReturn { .. }
            | CompilationError::MissingReturn { .. }
            | CompilationError::SolitaryDeclaration { .. } => ErrorKind::Type,
        }
    }

    /// Whether this error aborts analysis.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Identification
    }

    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::DuplicateClass { span, .. }
            | CompilationError::DuplicateMember { span, .. }
            | CompilationError::DuplicateVariable { span, .. }
            | CompilationError::UnknownClass { span, .. }
            | CompilationError::UndeclaredIdentifier { span, .. }
            | CompilationError::StaticContext { span, .. }
            | CompilationError::ThisInStaticContext { span }
            | CompilationError::SelfReferentialInit { span, .. }
            | CompilationError::MemberOfMethod { span, .. }
            | CompilationError::MemberOfNonObject { span, .. }
            | CompilationError::NoSuchMember { span, .. }
            | CompilationError::MissingEntryPoint { span }
            | CompilationError::TypeMismatch { span, .. }
            | CompilationError::InvalidOperand { span, .. }
            | CompilationError::InvalidAssignment { span, .. }
            | CompilationError::InvalidIndexTarget { span, .. }
            | CompilationError::NotAValue { span, .. }
            | CompilationError::NotCallable { span }
            | CompilationError::ArgumentCount { span, .. }
            | CompilationError::InvalidReturn { span, .. }
            | CompilationError::MissingReturn { span, .. }
            | CompilationError::SolitaryDeclaration { span } => *span,
        }
    }

    /// Source line of the error.
    pub fn line(&self) -> u32 {
        self.span().line
    }
}
