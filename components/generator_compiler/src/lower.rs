//! Lowering of generator bodies to flat ops

use core_types::{JsError, Value};

use crate::ast::{Expr, GeneratorDecl, Rhs, Stmt};
use crate::program::{Handler, Op, Operand, Program, Slot, TryRegion};
use crate::scope::ScopeChain;

/// Right-hand side with names resolved
enum Lowered {
    Expr(Operand),
    Yield(Operand),
    Delegate(Operand),
}

/// Converts a [`GeneratorDecl`] into a [`Program`].
///
/// Suspend points are numbered in op order starting at 1, and every `try`
/// statement is recorded as a static [`TryRegion`]. Liveness is computed
/// separately; every slot starts out transient.
pub struct Lowerer {
    ops: Vec<Op>,
    scopes: ScopeChain,
    suspend_points: Vec<usize>,
    regions: Vec<TryRegion>,
    try_depth: usize,
    finally_depth: usize,
}

impl Lowerer {
    /// Create a new lowerer
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            scopes: ScopeChain::new(),
            suspend_points: Vec::new(),
            regions: Vec::new(),
            try_depth: 0,
            finally_depth: 0,
        }
    }

    /// Lower a generator declaration
    pub fn lower(mut self, decl: &GeneratorDecl) -> Result<Program, JsError> {
        for param in &decl.params {
            self.scopes.declare(param)?;
        }
        for stmt in &decl.body {
            self.statement(stmt)?;
        }

        // Falling off the end returns undefined
        self.emit(Op::Return(Operand::Const(Value::Undefined)));

        let slot_names = self.scopes.into_slot_names();
        Ok(Program {
            name: decl.name.clone(),
            ops: self.ops,
            lifted: vec![false; slot_names.len()],
            slot_names,
            param_count: decl.params.len(),
            suspend_points: self.suspend_points,
            regions: self.regions,
        })
    }

    fn statement(&mut self, stmt: &Stmt) -> Result<(), JsError> {
        match stmt {
            Stmt::Let(name, rhs) => {
                // the initializer cannot see the binding it initializes
                let lowered = self.rhs(rhs)?;
                let slot = self.scopes.declare(name)?;
                self.emit_rhs(lowered, Some(slot))?;
            }
            Stmt::Assign(name, rhs) => {
                let slot = self.scopes.resolve(name)?;
                let lowered = self.rhs(rhs)?;
                self.emit_rhs(lowered, Some(slot))?;
            }
            Stmt::Eval(rhs) => {
                let lowered = self.rhs(rhs)?;
                self.emit_rhs(lowered, None)?;
            }
            Stmt::If {
                test,
                then,
                otherwise,
            } => {
                let test = self.operand(test)?;
                let else_jump = self.emit(Op::JumpUnless(test, 0));
                self.block(then)?;

                if otherwise.is_empty() {
                    let end_addr = self.ops.len();
                    self.patch_jump(else_jump, end_addr);
                } else {
                    let end_jump = self.emit(Op::Jump(0));
                    let else_addr = self.ops.len();
                    self.patch_jump(else_jump, else_addr);
                    self.block(otherwise)?;
                    let end_addr = self.ops.len();
                    self.patch_jump(end_jump, end_addr);
                }
            }
            Stmt::While { test, body } => {
                let loop_start = self.ops.len();
                let test = self.operand(test)?;
                let exit_jump = self.emit(Op::JumpUnless(test, 0));
                self.block(body)?;
                self.emit(Op::Jump(loop_start));
                let end_addr = self.ops.len();
                self.patch_jump(exit_jump, end_addr);
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => self.try_statement(block, handler.as_ref(), finalizer.as_deref())?,
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.operand(expr)?,
                    None => Operand::Const(Value::Undefined),
                };
                self.emit(Op::Return(value));
            }
            Stmt::Throw(expr) => {
                let value = self.operand(expr)?;
                self.emit(Op::Throw(value));
            }
        }
        Ok(())
    }

    fn try_statement(
        &mut self,
        block: &[Stmt],
        handler: Option<&crate::ast::CatchClause>,
        finalizer: Option<&[Stmt]>,
    ) -> Result<(), JsError> {
        if handler.is_none() && finalizer.is_none() {
            return Err(JsError::syntax_error("Missing catch or finally after try"));
        }

        let id = self.regions.len();
        self.regions.push(TryRegion {
            id,
            depth: self.try_depth,
            body: 0..0,
            handler: None,
            finalizer: None,
        });
        self.try_depth += 1;

        let body_start = self.ops.len();
        self.block(block)?;
        let body_end = self.ops.len();
        let mut exits = vec![self.emit(Op::Jump(0))];

        let mut lowered_handler = None;
        if let Some(clause) = handler {
            let start = self.ops.len();
            self.scopes.enter_scope();
            let slot = match &clause.param {
                Some(name) => Some(self.scopes.declare(name)?),
                None => None,
            };
            for stmt in &clause.body {
                self.statement(stmt)?;
            }
            self.scopes.exit_scope();
            let end = self.ops.len();
            exits.push(self.emit(Op::Jump(0)));
            lowered_handler = Some(Handler {
                slot,
                range: start..end,
            });
        }

        let mut lowered_finalizer = None;
        if let Some(stmts) = finalizer {
            let start = self.ops.len();
            self.finally_depth += 1;
            let result = self.block(stmts);
            self.finally_depth -= 1;
            result?;
            self.emit(Op::EndFinally(id));
            lowered_finalizer = Some(start..self.ops.len());
        }

        self.try_depth -= 1;

        // normal completion continues into finally, or past the statement
        let target = lowered_finalizer
            .as_ref()
            .map(|r| r.start)
            .unwrap_or(self.ops.len());
        for exit in exits {
            self.patch_jump(exit, target);
        }

        let region = &mut self.regions[id];
        region.body = body_start..body_end;
        region.handler = lowered_handler;
        region.finalizer = lowered_finalizer;
        Ok(())
    }

    fn block(&mut self, stmts: &[Stmt]) -> Result<(), JsError> {
        self.scopes.enter_scope();
        let result = stmts.iter().try_for_each(|stmt| self.statement(stmt));
        self.scopes.exit_scope();
        result
    }

    fn rhs(&self, rhs: &Rhs) -> Result<Lowered, JsError> {
        Ok(match rhs {
            Rhs::Expr(expr) => Lowered::Expr(self.operand(expr)?),
            Rhs::Yield(expr) => Lowered::Yield(self.operand(expr)?),
            Rhs::Delegate(expr) => Lowered::Delegate(self.operand(expr)?),
        })
    }

    fn emit_rhs(&mut self, lowered: Lowered, target: Option<Slot>) -> Result<(), JsError> {
        match lowered {
            Lowered::Expr(value) => {
                match target {
                    Some(slot) => self.emit(Op::Assign(slot, value)),
                    None => self.emit(Op::Eval(value)),
                };
            }
            Lowered::Yield(value) => {
                let point = self.suspend_point("yield")?;
                self.emit(Op::Yield {
                    point,
                    value,
                    bind: target,
                });
            }
            Lowered::Delegate(source) => {
                let point = self.suspend_point("yield*")?;
                self.emit(Op::Delegate {
                    point,
                    source,
                    bind: target,
                });
            }
        }
        Ok(())
    }

    /// Number the suspend op about to be emitted
    fn suspend_point(&mut self, keyword: &str) -> Result<usize, JsError> {
        if self.finally_depth > 0 {
            return Err(JsError::syntax_error(format!(
                "{} is not allowed inside a finally block",
                keyword
            )));
        }
        self.suspend_points.push(self.ops.len());
        Ok(self.suspend_points.len())
    }

    fn operand(&self, expr: &Expr) -> Result<Operand, JsError> {
        Ok(match expr {
            Expr::Const(value) => Operand::Const(value.clone()),
            Expr::Local(name) => Operand::Load(self.scopes.resolve(name)?),
            Expr::Binary(op, lhs, rhs) => {
                Operand::Binary(*op, Box::new(self.operand(lhs)?), Box::new(self.operand(rhs)?))
            }
            Expr::Not(inner) => Operand::Not(Box::new(self.operand(inner)?)),
            Expr::Array(items) => Operand::Array(self.operands(items)?),
            Expr::Call(func, args) => Operand::Call(func.clone(), self.operands(args)?),
            Expr::Spawn(func, args) => Operand::Spawn(func.clone(), self.operands(args)?),
        })
    }

    fn operands(&self, exprs: &[Expr]) -> Result<Vec<Operand>, JsError> {
        exprs.iter().map(|e| self.operand(e)).collect()
    }

    fn emit(&mut self, op: Op) -> usize {
        self.ops.push(op);
        self.ops.len() - 1
    }

    fn patch_jump(&mut self, jump_idx: usize, target: usize) {
        if let Some(op) = self.ops.get_mut(jump_idx) {
            match op {
                Op::Jump(addr) | Op::JumpUnless(_, addr) => *addr = target,
                _ => {}
            }
        }
    }
}

impl Default for Lowerer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower a declaration with a fresh [`Lowerer`]
pub fn lower(decl: &GeneratorDecl) -> Result<Program, JsError> {
    Lowerer::new().lower(decl)
}
