// kiz-vm - Bytecode generation
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! AST-to-bytecode lowering.
//!
//! Jump targets are absolute instruction indices, patched after the
//! jumped-over region is emitted. `break` and `next` record their jump
//! slots in the enclosing loop record and are patched at loop exit.

use std::rc::Rc;

use kiz_core::{CodeObject, Decimal, Instruction, Object, Op, magic};
use kiz_parser::ast::{BinaryOp, Block, CatchClause, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use kiz_parser::Span;

use super::CompileError;

/// Per-loop bookkeeping for `break`/`next` patching.
#[derive(Default)]
struct LoopInfo {
    break_jumps: Vec<usize>,
    next_jumps: Vec<usize>,
}

/// One code object under construction.
pub struct CodeGen {
    code: Vec<Instruction>,
    consts: Vec<Object>,
    names: Vec<String>,
    loops: Vec<LoopInfo>,
    /// Counter for the hidden per-loop iterator temporaries.
    for_count: usize,
    /// REPL mode: keep the value of the final top-level expression
    /// statement.
    keep_last_expr: bool,
}

impl CodeGen {
    pub fn new(keep_last_expr: bool) -> Self {
        CodeGen {
            code: Vec::new(),
            consts: Vec::new(),
            names: Vec::new(),
            loops: Vec::new(),
            for_count: 0,
            keep_last_expr,
        }
    }

    /// Compile a whole program into a code object.
    pub fn compile_program(mut self, block: &Block) -> Result<CodeObject, CompileError> {
        let last = block.statements.len().saturating_sub(1);
        for (index, stmt) in block.statements.iter().enumerate() {
            let keep = self.keep_last_expr && index == last;
            self.gen_stmt(stmt, keep)?;
        }
        Ok(self.finish())
    }

    fn finish(self) -> CodeObject {
        CodeObject {
            code: self.code,
            consts: self.consts,
            names: self.names,
        }
    }

    // ------------------------------------------------------------------
    // Emission plumbing
    // ------------------------------------------------------------------

    fn emit(&mut self, op: Op, span: Span) -> usize {
        self.code.push(Instruction::new(op, span));
        self.code.len() - 1
    }

    fn add_const(&mut self, value: Object) -> usize {
        self.consts.push(value);
        self.consts.len() - 1
    }

    fn add_name(&mut self, name: &str) -> usize {
        if let Some(index) = self.names.iter().position(|existing| existing == name) {
            return index;
        }
        self.names.push(name.to_string());
        self.names.len() - 1
    }

    fn here(&self) -> usize {
        self.code.len()
    }

    /// Point a previously emitted jump-like instruction at `target`.
    fn patch(&mut self, index: usize, target: usize) {
        match &mut self.code[index].op {
            Op::Jump(slot)
            | Op::JumpIfFalse(slot)
            | Op::TryStart(slot)
            | Op::TryEnd(slot) => *slot = target,
            other => debug_assert!(false, "patch on non-jump instruction {:?}", other),
        }
    }

    fn error(message: impl Into<String>, span: Span) -> CompileError {
        CompileError {
            message: message.into(),
            span,
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn gen_block(&mut self, block: &Block) -> Result<(), CompileError> {
        for stmt in &block.statements {
            self.gen_stmt(stmt, false)?;
        }
        Ok(())
    }

    fn gen_stmt(&mut self, stmt: &Stmt, keep_expr_value: bool) -> Result<(), CompileError> {
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.gen_expr(expr)?;
                if !keep_expr_value {
                    self.emit(Op::PopTop, span);
                }
            }
            StmtKind::Assign { name, value } => {
                self.gen_expr(value)?;
                let name_idx = self.add_name(name);
                self.emit(Op::SetLocal(name_idx), span);
            }
            StmtKind::NonlocalAssign { name, value } => {
                self.gen_expr(value)?;
                let name_idx = self.add_name(name);
                self.emit(Op::SetNonlocal(name_idx), span);
            }
            StmtKind::GlobalAssign { name, value } => {
                self.gen_expr(value)?;
                let name_idx = self.add_name(name);
                self.emit(Op::SetGlobal(name_idx), span);
            }
            StmtKind::SetMember {
                object,
                name,
                value,
            } => {
                self.gen_expr(object)?;
                self.gen_expr(value)?;
                let name_idx = self.add_name(name);
                self.emit(Op::SetAttr(name_idx), span);
            }
            StmtKind::SetItem {
                object,
                index,
                value,
            } => {
                self.gen_expr(object)?;
                self.gen_expr(index)?;
                self.gen_expr(value)?;
                self.emit(Op::SetItem, span);
            }
            StmtKind::If {
                condition,
                then_block,
                else_block,
            } => self.gen_if(condition, then_block, else_block.as_ref(), span)?,
            StmtKind::While { condition, body } => self.gen_while(condition, body, span)?,
            StmtKind::For { var, iter, body } => self.gen_for(var, iter, body, span)?,
            StmtKind::Try { body, catches } => self.gen_try(body, catches, span)?,
            StmtKind::Object { name, parent, body } => {
                self.gen_object(name, parent.as_deref(), body, span)?;
            }
            StmtKind::Return(value) => {
                match value {
                    Some(expr) => self.gen_expr(expr)?,
                    None => {
                        let nil_idx = self.add_const(Object::nil());
                        self.emit(Op::LoadConst(nil_idx), span);
                    }
                }
                self.emit(Op::Ret, span);
            }
            StmtKind::Break => {
                let slot = self.emit(Op::Jump(0), span);
                match self.loops.last_mut() {
                    Some(info) => info.break_jumps.push(slot),
                    None => return Err(Self::error("'break' outside a loop", span)),
                }
            }
            StmtKind::Next => {
                let slot = self.emit(Op::Jump(0), span);
                match self.loops.last_mut() {
                    Some(info) => info.next_jumps.push(slot),
                    None => return Err(Self::error("'next' outside a loop", span)),
                }
            }
            StmtKind::Throw(expr) => {
                self.gen_expr(expr)?;
                self.emit(Op::Throw, span);
            }
            StmtKind::Import(path) => {
                let name_idx = self.add_name(path);
                self.emit(Op::Import(name_idx), span);
            }
        }
        Ok(())
    }

    fn gen_if(
        &mut self,
        condition: &Expr,
        then_block: &Block,
        else_block: Option<&Block>,
        span: Span,
    ) -> Result<(), CompileError> {
        self.gen_expr(condition)?;
        let to_else = self.emit(Op::JumpIfFalse(0), span);
        self.gen_block(then_block)?;
        let to_end = self.emit(Op::Jump(0), span);
        let else_start = self.here();
        self.patch(to_else, else_start);
        if let Some(else_block) = else_block {
            self.gen_block(else_block)?;
        }
        let end = self.here();
        self.patch(to_end, end);
        Ok(())
    }

    fn gen_while(
        &mut self,
        condition: &Expr,
        body: &Block,
        span: Span,
    ) -> Result<(), CompileError> {
        let entry = self.here();
        self.gen_expr(condition)?;
        let to_exit = self.emit(Op::JumpIfFalse(0), span);

        self.loops.push(LoopInfo::default());
        self.gen_block(body)?;
        self.emit(Op::Jump(entry), span);

        let exit = self.here();
        self.patch(to_exit, exit);
        self.patch_loop(entry, exit);
        Ok(())
    }

    /// `for x : iter` drives the iterable's `__next__` until it returns
    /// the falsy exhaustion sentinel. The iterable is evaluated once
    /// into a hidden private temporary (the `__private__` prefix also
    /// keeps it out of module exports); re-evaluating a literal iterable
    /// every round trip would reset its cursor and never terminate.
    fn gen_for(
        &mut self,
        var: &str,
        iter: &Expr,
        body: &Block,
        span: Span,
    ) -> Result<(), CompileError> {
        let temp = format!("{}for_iter_{}", magic::PRIVATE_PREFIX, self.for_count);
        self.for_count += 1;
        let temp_idx = self.add_name(&temp);
        self.gen_expr(iter)?;
        self.emit(Op::SetLocal(temp_idx), span);

        let entry = self.here();
        self.emit(Op::MakeList(0), span);
        self.emit(Op::LoadVar(temp_idx), span);
        let next_idx = self.add_name(magic::NEXT);
        self.emit(
            Op::CallMethod {
                name: next_idx,
                argc: 0,
            },
            span,
        );
        let var_idx = self.add_name(var);
        self.emit(Op::SetLocal(var_idx), span);
        self.emit(Op::LoadVar(var_idx), span);
        let to_exit = self.emit(Op::JumpIfFalse(0), span);

        self.loops.push(LoopInfo::default());
        self.gen_block(body)?;
        self.emit(Op::Jump(entry), span);

        let exit = self.here();
        self.patch(to_exit, exit);
        self.patch_loop(entry, exit);
        Ok(())
    }

    fn patch_loop(&mut self, entry: usize, exit: usize) {
        let info = self.loops.pop().expect("loop stack underflow");
        for slot in info.break_jumps {
            self.patch(slot, exit);
        }
        for slot in info.next_jumps {
            self.patch(slot, entry);
        }
    }

    /// Try/catch lowering: the try body sits between `TRY_START` and
    /// `TRY_END`; each catch clause tests the error with `IS_INSTANCE`,
    /// binds it, runs, and jumps past the remaining clauses. An
    /// unmatched error is re-raised.
    fn gen_try(
        &mut self,
        body: &Block,
        catches: &[CatchClause],
        span: Span,
    ) -> Result<(), CompileError> {
        let try_start = self.emit(Op::TryStart(0), span);
        self.gen_block(body)?;
        let try_end = self.emit(Op::TryEnd(0), span);

        let catch_start = self.here();
        self.patch(try_start, catch_start);

        let mut to_end_jumps = Vec::new();
        for clause in catches {
            self.emit(Op::LoadError, clause.span);
            self.gen_expr(&clause.proto)?;
            self.emit(Op::IsInstance, clause.span);
            let to_next = self.emit(Op::JumpIfFalse(0), clause.span);

            self.emit(Op::LoadError, clause.span);
            let name_idx = self.add_name(&clause.name);
            self.emit(Op::SetLocal(name_idx), clause.span);
            self.gen_block(&clause.body)?;
            to_end_jumps.push(self.emit(Op::Jump(0), clause.span));

            let next_clause = self.here();
            self.patch(to_next, next_clause);
        }

        // No clause matched: re-raise.
        self.emit(Op::LoadError, span);
        self.emit(Op::Throw, span);

        let end = self.here();
        self.patch(try_end, end);
        for slot in to_end_jumps {
            self.patch(slot, end);
        }
        Ok(())
    }

    /// `object N [: Parent] ... end`: a fresh object, an optional parent
    /// edge, then one `SET_ATTR` per body assignment. Anything but an
    /// assignment in the body is a compile error.
    fn gen_object(
        &mut self,
        name: &str,
        parent: Option<&str>,
        body: &Block,
        span: Span,
    ) -> Result<(), CompileError> {
        let name_idx = self.add_name(name);
        self.emit(Op::CreateObject, span);
        self.emit(Op::SetLocal(name_idx), span);

        if let Some(parent) = parent {
            let parent_idx = self.add_name(parent);
            self.emit(Op::LoadVar(name_idx), span);
            self.emit(Op::LoadVar(parent_idx), span);
            let parent_attr = self.add_name(magic::PARENT);
            self.emit(Op::SetAttr(parent_attr), span);
        }

        for stmt in &body.statements {
            let StmtKind::Assign { name: field, value } = &stmt.kind else {
                return Err(Self::error(
                    "Object Statement cannot include other code (only assign statement support)",
                    stmt.span,
                ));
            };
            self.emit(Op::LoadVar(name_idx), stmt.span);
            self.gen_expr(value)?;
            let field_idx = self.add_name(field);
            self.emit(Op::SetAttr(field_idx), stmt.span);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn gen_expr(&mut self, expr: &Expr) -> Result<(), CompileError> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Int(value) => {
                let idx = self.add_const(Object::int(value.clone()));
                self.emit(Op::LoadConst(idx), span);
            }
            ExprKind::Decimal(text) => {
                let value = Decimal::parse(text).ok_or_else(|| {
                    Self::error(format!("invalid decimal literal '{}'", text), span)
                })?;
                let idx = self.add_const(Object::decimal(value));
                self.emit(Op::LoadConst(idx), span);
            }
            ExprKind::Str(text) => {
                let idx = self.add_const(Object::string(text.clone()));
                self.emit(Op::LoadConst(idx), span);
            }
            ExprKind::Bool(value) => {
                let idx = self.add_const(Object::boolean(*value));
                self.emit(Op::LoadConst(idx), span);
            }
            ExprKind::Nil => {
                let idx = self.add_const(Object::nil());
                self.emit(Op::LoadConst(idx), span);
            }
            ExprKind::Ident(name) => {
                let idx = self.add_name(name);
                self.emit(Op::LoadVar(idx), span);
            }
            ExprKind::List(elements) => {
                for element in elements {
                    self.gen_expr(element)?;
                }
                self.emit(Op::MakeList(elements.len()), span);
            }
            ExprKind::Dict(entries) => {
                for (key, value) in entries {
                    self.gen_expr(key)?;
                    self.gen_expr(value)?;
                }
                self.emit(Op::MakeDict(entries.len()), span);
            }
            ExprKind::Binary { op, left, right } => {
                self.gen_expr(left)?;
                self.gen_expr(right)?;
                let op = match op {
                    BinaryOp::Add => Op::Add,
                    BinaryOp::Sub => Op::Sub,
                    BinaryOp::Mul => Op::Mul,
                    BinaryOp::Div => Op::Div,
                    BinaryOp::Mod => Op::Mod,
                    BinaryOp::Pow => Op::Pow,
                    BinaryOp::Eq => Op::Eq,
                    BinaryOp::Ne => Op::Ne,
                    BinaryOp::Lt => Op::Lt,
                    BinaryOp::Le => Op::Le,
                    BinaryOp::Gt => Op::Gt,
                    BinaryOp::Ge => Op::Ge,
                    BinaryOp::And => Op::And,
                    BinaryOp::Or => Op::Or,
                    BinaryOp::Is => Op::Is,
                };
                self.emit(op, span);
            }
            ExprKind::Unary { op, operand } => {
                self.gen_expr(operand)?;
                let op = match op {
                    UnaryOp::Neg => Op::Neg,
                    UnaryOp::Not => Op::Not,
                };
                self.emit(op, span);
            }
            ExprKind::Call { callee, args } => {
                for arg in args {
                    self.gen_expr(arg)?;
                }
                self.emit(Op::MakeList(args.len()), span);
                // A call of a member expression is a method call on the
                // receiver; anything else calls the evaluated callee.
                if let ExprKind::GetMember { object, name } = &callee.kind {
                    self.gen_expr(object)?;
                    let name_idx = self.add_name(name);
                    self.emit(
                        Op::CallMethod {
                            name: name_idx,
                            argc: args.len(),
                        },
                        span,
                    );
                } else {
                    self.gen_expr(callee)?;
                    self.emit(Op::Call(args.len()), span);
                }
            }
            ExprKind::GetMember { object, name } => {
                self.gen_expr(object)?;
                let name_idx = self.add_name(name);
                self.emit(Op::GetAttr(name_idx), span);
            }
            ExprKind::GetItem { object, args } => {
                for arg in args {
                    self.gen_expr(arg)?;
                }
                self.emit(Op::MakeList(args.len()), span);
                self.gen_expr(object)?;
                self.emit(Op::GetItem, span);
            }
            ExprKind::Fn { name, params, body } => {
                self.gen_fn_expr(name, params, body, span)?;
            }
        }
        Ok(())
    }

    /// Compile a function body into its own code object. Parameter names
    /// occupy the first name-table slots; the call protocol binds
    /// positional arguments by those indices.
    fn gen_fn_expr(
        &mut self,
        name: &str,
        params: &[String],
        body: &Block,
        span: Span,
    ) -> Result<(), CompileError> {
        let mut inner = CodeGen::new(false);
        for param in params {
            inner.add_name(param);
        }
        inner.gen_block(body)?;
        // A body without an explicit trailing return yields Nil.
        if !matches!(inner.code.last().map(|inst| inst.op), Some(Op::Ret)) {
            let nil_idx = inner.add_const(Object::nil());
            inner.emit(Op::LoadConst(nil_idx), span);
            inner.emit(Op::Ret, span);
        }
        let code = Rc::new(inner.finish());

        let fn_name = if name.is_empty() { "<lambda>" } else { name };
        let func = Object::function(fn_name, code, params.len());
        let idx = self.add_const(func);
        self.emit(Op::LoadConst(idx), span);
        Ok(())
    }
}
