//! Syntax tree for MiniJava.
//!
//! The tree is the compiler's input contract. An external parser builds it
//! (or tests do, through [`build`]); the resolver then annotates it in place:
//! every declaration and identifier gets a `decl: Some(DeclId)`, and every
//! expression and reference gets a `ty: Some(Type)`.
//!
//! ## Modules
//!
//! - [`node`]: Identifiers
//! - [`decl`]: Package, class, member, parameter and variable declarations
//! - [`types`]: Type denoters as written in source
//! - [`stmt`]: Statements
//! - [`expr`]: Expressions and references
//! - [`ops`]: Unary and binary operators
//! - [`build`]: Programmatic construction
//!
//! # Example
//!
//! ```
//! use minijava_ast::build::*;
//!
//! // class Main { public static void main(String[] args) { System.out.println(1 + 2); } }
//! let program = package(vec![class(
//!     "Main",
//!     vec![],
//!     vec![main_method(vec![println(add(int_lit(1), int_lit(2)))])],
//! )]);
//!
//! assert_eq!(program.classes.len(), 1);
//! assert_eq!(program.classes[0].methods[0].name, "main");
//! ```

pub mod build;
pub mod decl;
pub mod expr;
pub mod node;
pub mod ops;
pub mod stmt;
pub mod types;

pub use decl::*;
pub use expr::*;
pub use node::*;
pub use ops::*;
pub use stmt::*;
pub use types::*;
