//! Return path analysis.
//!
//! Decides structurally whether a statement list always returns. The
//! resolver uses it to reject non-void methods with a path that falls off the
//! end; the code generator uses it to decide whether a void method needs a
//! trailing `RETURN`.

use minijava_ast::Stmt;

/// Whether a statement always returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Returns(pub bool);

/// Checks that all code paths return.
///
/// A statement always returns if it is:
/// - a `return`
/// - an `if` with an `else` where both branches always return
/// - a block whose last statement always returns
///
/// Loops never count, even `while (true)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnChecker;

impl ReturnChecker {
    /// Create a new return checker.
    pub fn new() -> Self {
        Self
    }

    /// Check a method body.
    pub fn all_paths_return(&self, body: &[Stmt]) -> bool {
        self.check_list(body).0
    }

    fn check_list(&self, stmts: &[Stmt]) -> Returns {
        match stmts.last() {
            Some(last) => self.check(last),
            None => Returns(false),
        }
    }

    /// Check a single statement.
    pub fn check(&self, stmt: &Stmt) -> Returns {
        match stmt {
            Stmt::Return(_) => Returns(true),
            Stmt::Block(block) => self.check_list(&block.stmts),
            Stmt::If(if_stmt) => match &if_stmt.else_branch {
                Some(else_branch) => {
                    Returns(self.check(&if_stmt.then_branch).0 && self.check(else_branch).0)
                }
                None => Returns(false),
            },
            Stmt::While(_) | Stmt::For(_) => Returns(false),
            Stmt::VarDecl(_)
            | Stmt::Assign(_)
            | Stmt::IndexAssign(_)
            | Stmt::Call(_) => Returns(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijava_ast::build::*;

    fn checker() -> ReturnChecker {
        ReturnChecker::new()
    }

    #[test]
    fn empty_body_does_not_return() {
        assert!(!checker().all_paths_return(&[]));
    }

    #[test]
    fn trailing_return() {
        let body = vec![println(int_lit(1)), ret(int_lit(0))];
        assert!(checker().all_paths_return(&body));
    }

    #[test]
    fn return_must_be_last() {
        let body = vec![ret(int_lit(0)), println(int_lit(1))];
        assert!(!checker().all_paths_return(&body));
    }

    #[test]
    fn if_needs_both_branches() {
        let both = if_stmt(read(id("c")), ret(int_lit(1)), Some(ret(int_lit(2))));
        assert!(checker().all_paths_return(&[both]));

        let only_then = if_stmt(read(id("c")), ret(int_lit(1)), None);
        assert!(!checker().all_paths_return(&[only_then]));

        let else_falls_through = if_stmt(
            read(id("c")),
            ret(int_lit(1)),
            Some(block(vec![println(int_lit(2))])),
        );
        assert!(!checker().all_paths_return(&[else_falls_through]));
    }

    #[test]
    fn nested_blocks() {
        let body = vec![block(vec![block(vec![ret(int_lit(1))])])];
        assert!(checker().all_paths_return(&body));
    }

    #[test]
    fn loops_never_return() {
        let body = vec![while_stmt(bool_lit(true), ret(int_lit(1)))];
        assert!(!checker().all_paths_return(&body));

        let body = vec![for_stmt(None, None, None, block(vec![ret(int_lit(1))]))];
        assert!(!checker().all_paths_return(&body));
    }
}
