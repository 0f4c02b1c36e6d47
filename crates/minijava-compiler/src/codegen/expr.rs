//! Expression values and calls.

use minijava_ast::{BinaryOp, Expr, ExprKind, Literal, RefKind, Reference, UnaryOp};
use minijava_core::DeclId;

use super::cond::Cond;
use super::fold::logical_decisive;
use super::{CodeGenerator, Flow, Value, bound};
use crate::bytecode::{NULL_REP, Prim, Reg, bool_rep};
use crate::error::CodegenError;

impl CodeGenerator<'_> {
    /// Generate an expression, leaving it known or on the stack.
    pub(super) fn eval(&mut self, expr: &Expr, flow: Flow) -> Result<Value, CodegenError> {
        if let Some(value) = self.known_value(expr, flow) {
            return Ok(Value::Known(value));
        }

        match &expr.kind {
            ExprKind::Literal(Literal::Int(value)) => Ok(Value::Known(*value)),
            ExprKind::Literal(Literal::Bool(value)) => Ok(Value::Known(bool_rep(*value))),
            ExprKind::Null => Ok(Value::Known(NULL_REP)),

            ExprKind::Unary { op, operand } => {
                self.push(operand, flow)?;
                self.emitter.emit_prim(match op {
                    UnaryOp::Not => Prim::Not,
                    UnaryOp::Neg => Prim::Neg,
                });
                Ok(Value::OnStack)
            }

            ExprKind::Binary { op, left, right } if op.is_logical() => {
                self.eval_logical(*op, left, right, flow)
            }

            ExprKind::Binary { op, left, right } => {
                self.push(left, flow)?;
                self.push(right, flow)?;
                self.emitter.emit_prim(binary_prim(*op));
                Ok(Value::OnStack)
            }

            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                match self.gen_cond(cond, false, flow)? {
                    Cond::Known(true) => self.push(then_expr, flow)?,
                    Cond::Known(false) => self.push(else_expr, flow)?,
                    Cond::Jumps(to_else) => {
                        self.push(then_expr, flow)?;
                        let end = self.emitter.emit_jump();
                        self.patch_all(to_else);
                        self.push(else_expr, flow)?;
                        self.emitter.patch_jump(end);
                    }
                }
                Ok(Value::OnStack)
            }

            ExprKind::Ref(reference) => {
                self.push_ref(reference)?;
                Ok(Value::OnStack)
            }

            ExprKind::Index { target, index } => {
                self.push_ref(target)?;
                self.push(index, flow)?;
                self.emitter.emit_prim(Prim::ArrayRef);
                Ok(Value::OnStack)
            }

            ExprKind::Call { callee, args } => {
                self.gen_call(callee, args, flow)?;
                Ok(Value::OnStack)
            }

            ExprKind::NewObject(class) => {
                let class = bound(class.decl, class.span)?;
                let fields = self.table.expect_slot(class)?;
                self.emitter.emit_literal(-1);
                self.emitter.emit_literal(fields);
                self.emitter.emit_prim(Prim::NewObj);
                Ok(Value::OnStack)
            }

            ExprKind::NewArray { size, .. } => {
                self.push(size, flow)?;
                self.emitter.emit_prim(Prim::NewArr);
                Ok(Value::OnStack)
            }
        }
    }

    /// Generate an expression and make sure its value is on the stack.
    pub(super) fn push(&mut self, expr: &Expr, flow: Flow) -> Result<(), CodegenError> {
        if let Value::Known(value) = self.eval(expr, flow)? {
            self.emitter.emit_literal(value);
        }
        Ok(())
    }

    /// `&&` and `||` as values.
    ///
    /// A known left operand either decides the result or leaves it to the
    /// right operand. After an unknown left operand, a known right operand
    /// either decides the result (the left value is dropped) or is the
    /// identity (the left value stands).
    fn eval_logical(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        flow: Flow,
    ) -> Result<Value, CodegenError> {
        let decisive = logical_decisive(op);

        match self.known_value(left, flow) {
            Some(value) if value == decisive => return Ok(Value::Known(decisive)),
            Some(_) => return self.eval(right, flow),
            None => {}
        }

        self.push(left, flow)?;
        match self.known_value(right, flow) {
            Some(value) if value == decisive => {
                self.emitter.emit_pop(1);
                Ok(Value::Known(decisive))
            }
            Some(_) => Ok(Value::OnStack),
            None => {
                let short = self.emitter.emit_jump_if(decisive);
                self.push(right, flow)?;
                let end = self.emitter.emit_jump();
                self.emitter.patch_jump(short);
                self.emitter.emit_literal(decisive);
                self.emitter.patch_jump(end);
                Ok(Value::OnStack)
            }
        }
    }

    /// Push the arguments and instance, then call. Returns the method.
    pub(super) fn gen_call(
        &mut self,
        callee: &Reference,
        args: &[Expr],
        flow: Flow,
    ) -> Result<DeclId, CodegenError> {
        for arg in args {
            self.push(arg, flow)?;
        }

        let method = bound(callee.decl(), callee.span)?;
        if !self.table.is_method(method) {
            return Err(CodegenError::WrongDeclKind {
                decl: method,
                expected: "method",
            });
        }
        let instance = !self.table.is_static(method);

        if instance {
            match &callee.kind {
                RefKind::Qualified { prefix, .. } => self.push_ref(prefix)?,
                _ => self.emitter.emit_load_address(Reg::OB, 0),
            }
        }

        let addr = self.table.slot(method);
        self.emitter.emit_call(instance, method, addr);
        Ok(method)
    }
}

fn binary_prim(op: BinaryOp) -> Prim {
    match op {
        BinaryOp::Or => Prim::Or,
        BinaryOp::And => Prim::And,
        BinaryOp::Eq => Prim::Eq,
        BinaryOp::Ne => Prim::Ne,
        BinaryOp::Lt => Prim::Lt,
        BinaryOp::Le => Prim::Le,
        BinaryOp::Gt => Prim::Gt,
        BinaryOp::Ge => Prim::Ge,
        BinaryOp::Add => Prim::Add,
        BinaryOp::Sub => Prim::Sub,
        BinaryOp::Mul => Prim::Mult,
        BinaryOp::Div => Prim::Div,
        BinaryOp::Mod => Prim::Mod,
    }
}
