//! Methods, statements and loops.
//!
//! Locals live in the frame above the link data, in declaration order. A
//! block releases its locals with one `POP` on exit. Loops are laid out with
//! a pre-test and a back-test, so each iteration runs one conditional jump:
//!
//! ```text
//!         cond -> exit (when false)
//! body:   ...
//!         update
//!         cond -> body (when true)
//! exit:
//! ```

use minijava_ast::{Expr, ForStmt, MethodDecl, Reference, Stmt};

use super::cond::Cond;
use super::{CodeGenerator, Flow, RefTarget, Value, bound};
use crate::bytecode::{LINK_DATA_SIZE, Prim, Reg};
use crate::error::CodegenError;

impl CodeGenerator<'_> {
    /// Emit one user method and record its code address.
    pub(super) fn gen_method(&mut self, method: &MethodDecl) -> Result<(), CodegenError> {
        let decl = bound(method.decl, method.span)?;
        self.emitter.set_line(method.span.line);
        let addr = self.emitter.current_addr();
        self.table.set_slot(decl, addr as i32)?;
        tracing::trace!(method = %method.name, addr, "emitting method");

        self.next_local = LINK_DATA_SIZE;
        self.arg_count = method.params.len() as i32;
        self.known.clear();

        for stmt in &method.body {
            self.gen_stmt(stmt, Flow::default())?;
        }

        if method.return_ty.is_void() && !self.returns.all_paths_return(&method.body) {
            self.emitter.emit_return(0, self.arg_count);
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt, flow: Flow) -> Result<(), CodegenError> {
        self.emitter.set_line(stmt.span().line);

        match stmt {
            Stmt::Block(block) => {
                let mark = self.next_local;
                for stmt in &block.stmts {
                    self.gen_stmt(stmt, flow)?;
                }
                self.release_locals(mark);
            }

            Stmt::VarDecl(s) => {
                let decl = bound(s.var.decl, s.var.span)?;
                self.table.set_slot(decl, self.next_local)?;
                self.next_local += 1;
                match self.eval(&s.init, flow)? {
                    Value::Known(value) => {
                        self.emitter.emit_literal(value);
                        self.known.insert(decl, value);
                    }
                    Value::OnStack => {
                        self.known.remove(&decl);
                    }
                }
            }

            Stmt::Assign(s) => {
                let target = self.write_target(&s.target)?;
                let value = self.eval(&s.value, flow)?;
                if let Value::Known(value) = value {
                    self.emitter.emit_literal(value);
                }
                match target {
                    RefTarget::Register(reg, slot) => {
                        self.emitter.emit_store(reg, slot);
                        if reg == Reg::LB {
                            self.track_local(&s.target, value, flow);
                        }
                    }
                    RefTarget::Indirect => self.emitter.emit_prim(Prim::FieldUpd),
                }
            }

            Stmt::IndexAssign(s) => {
                self.push_ref(&s.target)?;
                self.push(&s.index, flow)?;
                self.push(&s.value, flow)?;
                self.emitter.emit_prim(Prim::ArrayUpd);
            }

            Stmt::Call(s) => {
                let method = self.gen_call(&s.callee, &s.args, flow)?;
                if !self.table.get(method).ty.is_void() {
                    self.emitter.emit_pop(1);
                }
            }

            Stmt::Return(s) => match &s.value {
                Some(value) => {
                    self.push(value, flow)?;
                    self.emitter.emit_return(1, self.arg_count);
                }
                None => self.emitter.emit_return(0, self.arg_count),
            },

            Stmt::If(s) => match self.gen_cond(&s.cond, false, flow)? {
                Cond::Known(true) => self.gen_stmt(&s.then_branch, flow)?,
                Cond::Known(false) => {
                    if let Some(else_branch) = &s.else_branch {
                        self.gen_stmt(else_branch, flow)?;
                    }
                }
                Cond::Jumps(to_else) => {
                    let inner = flow.branch();
                    self.gen_stmt(&s.then_branch, inner)?;
                    match &s.else_branch {
                        Some(else_branch) => {
                            let end = self.emitter.emit_jump();
                            self.patch_all(to_else);
                            self.gen_stmt(else_branch, inner)?;
                            self.emitter.patch_jump(end);
                        }
                        None => self.patch_all(to_else),
                    }
                }
            },

            Stmt::While(s) => {
                self.gen_loop(Some(&s.cond), &s.body, None, stmt.span().line, flow)?;
            }

            Stmt::For(s) => self.gen_for(s, flow)?,
        }
        Ok(())
    }

    fn gen_for(&mut self, s: &ForStmt, flow: Flow) -> Result<(), CodegenError> {
        let mark = self.next_local;
        if let Some(init) = &s.init {
            self.gen_stmt(init, flow)?;
        }
        let line = s.span.line;
        self.gen_loop(s.cond.as_ref(), &s.body, s.update.as_ref(), line, flow)?;
        self.release_locals(mark);
        Ok(())
    }

    /// A loop without a condition runs until a `return`.
    fn gen_loop(
        &mut self,
        cond: Option<&Expr>,
        body: &Stmt,
        update: Option<&Stmt>,
        line: u32,
        flow: Flow,
    ) -> Result<(), CodegenError> {
        let inner = flow.looping();

        let exits = match self.loop_test(cond, false, inner)? {
            Cond::Known(false) => return Ok(()),
            Cond::Known(true) => Vec::new(),
            Cond::Jumps(exits) => exits,
        };

        let body_start = self.emitter.current_addr();
        self.gen_stmt(body, inner)?;
        if let Some(update) = update {
            self.gen_stmt(update, inner)?;
        }

        self.emitter.set_line(line);
        match self.loop_test(cond, true, inner)? {
            Cond::Known(true) => self.emitter.emit_jump_to(body_start),
            Cond::Known(false) => {}
            Cond::Jumps(back) => self.patch_all_to(back, body_start),
        }
        self.patch_all(exits);
        Ok(())
    }

    fn loop_test(
        &mut self,
        cond: Option<&Expr>,
        when: bool,
        flow: Flow,
    ) -> Result<Cond, CodegenError> {
        match cond {
            Some(cond) => self.gen_cond(cond, when, flow),
            None => Ok(Cond::Known(true)),
        }
    }

    /// Update the known value of a local after a store. Stores that may not
    /// run, or may run repeatedly, make the value unknown.
    fn track_local(&mut self, target: &Reference, value: Value, flow: Flow) {
        let Some(decl) = target.decl() else {
            return;
        };
        match value {
            Value::Known(value) if !flow.in_branch && !flow.in_loop => {
                self.known.insert(decl, value);
            }
            _ => {
                self.known.remove(&decl);
            }
        }
    }

    /// Pop the locals declared since `mark`.
    fn release_locals(&mut self, mark: i32) {
        self.emitter.emit_pop(self.next_local - mark);
        self.next_local = mark;
    }
}
