//! x86-64 code generation, Intel syntax, for the GNU assembler.
//!
//! Expressions are compiled against an operand stack: every expression
//! pushes exactly one 8-byte slot and every consumer pops what it needs, so
//! the hardware stack is balanced around any statement.

pub mod error;

use crate::common::SourceLocation;
use crate::parser::ast::{
    AssignOp, BinaryOp, CaseBlock, Expr, ExprKind, Function, Init, Program, Stmt, UnaryOp,
};
use crate::parser::symbols::GlobalInit;
use crate::types::{align_up, find_member, Type};
use error::CodegenError;
use log::debug;

const ARGREG8: [&str; 6] = ["dil", "sil", "dl", "cl", "r8b", "r9b"];
const ARGREG32: [&str; 6] = ["edi", "esi", "edx", "ecx", "r8d", "r9d"];
const ARGREG64: [&str; 6] = ["rdi", "rsi", "rdx", "rcx", "r8", "r9"];

/// Compiles a type-checked program to assembly text.
pub fn generate(program: &Program) -> Result<String, CodegenError> {
    CodeGen::new().run(program)
}

struct CodeGen {
    out: String,
    label_id: usize,
    /// Innermost-last jump targets for `break` and `continue`.
    break_labels: Vec<String>,
    continue_labels: Vec<String>,
}

/// What one function body is compiled against.
struct FnCtx<'a> {
    func: &'a Function,
    program: &'a Program,
}

impl CodeGen {
    fn new() -> Self {
        CodeGen {
            out: String::new(),
            label_id: 0,
            break_labels: Vec::new(),
            continue_labels: Vec::new(),
        }
    }

    fn run(mut self, program: &Program) -> Result<String, CodegenError> {
        self.line(".intel_syntax noprefix");
        self.line("# compiled by kancil");
        self.gen_data(program)?;
        self.line(".text");
        for func in &program.functions {
            self.gen_function(func, program)?;
        }
        Ok(self.out)
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn ins(&mut self, text: &str) {
        self.out.push_str("  ");
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn next_label(&mut self) -> usize {
        self.label_id += 1;
        self.label_id
    }

    // ---- data section ---------------------------------------------------

    fn gen_data(&mut self, program: &Program) -> Result<(), CodegenError> {
        if program.globals.is_empty() && program.strings.is_empty() {
            return Ok(());
        }
        self.line(".data");
        for global in &program.globals {
            self.line(&format!("{}:", global.name));
            match &global.init {
                None => {
                    self.ins(&format!(".zero {}", global.ty.size()));
                }
                Some(GlobalInit::Scalar(value)) => {
                    self.gen_data_value(&global.name, global.ty.size(), *value)?;
                }
                Some(GlobalInit::List(values)) => {
                    let (elem_size, total) = match &global.ty {
                        Type::Array(base, len) => (base.size(), *len),
                        _ => {
                            return Err(CodegenError::UnsupportedGlobalInit(global.name.clone()))
                        }
                    };
                    for value in values {
                        self.gen_data_value(&global.name, elem_size, *value)?;
                    }
                    let rest = total.saturating_sub(values.len()) * elem_size;
                    if rest > 0 {
                        self.ins(&format!(".zero {}", rest));
                    }
                }
            }
        }
        for (i, s) in program.strings.iter().enumerate() {
            self.line(&format!(".L.STR{}:", i));
            self.ins(&format!(".string \"{}\"", s));
        }
        Ok(())
    }

    fn gen_data_value(
        &mut self,
        name: &str,
        size: usize,
        value: i64,
    ) -> Result<(), CodegenError> {
        let directive = match size {
            1 => ".byte",
            4 => ".long",
            8 => ".quad",
            _ => return Err(CodegenError::UnsupportedGlobalInit(name.to_string())),
        };
        self.ins(&format!("{} {}", directive, value));
        Ok(())
    }

    // ---- functions and statements ---------------------------------------

    fn gen_function(&mut self, func: &Function, program: &Program) -> Result<(), CodegenError> {
        debug!("generating code for '{}'", func.name);
        let ctx = FnCtx { func, program };

        self.line(&format!(".globl {}", func.name));
        self.line(&format!("{}:", func.name));
        self.ins("push rbp");
        self.ins("mov rbp, rsp");
        self.ins(&format!("sub rsp, {}", align_up(func.stack_size, 16)));

        // Parameters arrive in registers and are spilled to their frame
        // slots, which the parser allocated first.
        for (i, param) in func.params.iter().enumerate() {
            let offset = func.locals[i].offset;
            let reg = match param.ty.size() {
                1 => ARGREG8[i],
                4 => ARGREG32[i],
                _ => ARGREG64[i],
            };
            self.ins(&format!("mov [rbp-{}], {}", offset, reg));
        }

        for stmt in &func.body {
            self.gen_stmt(&ctx, stmt)?;
        }

        self.line(&format!(".L.RETURN.{}:", func.name));
        self.ins("mov rsp, rbp");
        self.ins("pop rbp");
        self.ins("ret");
        Ok(())
    }

    fn gen_stmt(&mut self, ctx: &FnCtx, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Empty => {}
            Stmt::Expr(expr) => {
                self.gen_expr(ctx, expr)?;
                self.ins("pop rax");
            }
            Stmt::Return(expr) => {
                if let Some(expr) = expr {
                    self.gen_expr(ctx, expr)?;
                    self.ins("pop rax");
                }
                self.ins(&format!("jmp .L.RETURN.{}", ctx.func.name));
            }
            Stmt::Block(stmts) => {
                for s in stmts {
                    self.gen_stmt(ctx, s)?;
                }
            }
            Stmt::If(cond, then, els) => {
                let id = self.next_label();
                self.gen_expr(ctx, cond)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                if let Some(els) = els {
                    self.ins(&format!("je .L{}.ELSE", id));
                    self.gen_stmt(ctx, then)?;
                    self.ins(&format!("jmp .L{}.END", id));
                    self.line(&format!(".L{}.ELSE:", id));
                    self.gen_stmt(ctx, els)?;
                } else {
                    self.ins(&format!("je .L{}.END", id));
                    self.gen_stmt(ctx, then)?;
                }
                self.line(&format!(".L{}.END:", id));
            }
            Stmt::While(cond, body) => {
                let id = self.next_label();
                self.line(&format!(".L{}.WHILE:", id));
                self.gen_expr(ctx, cond)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                self.ins(&format!("je .L{}.END", id));
                self.break_labels.push(format!(".L{}.END", id));
                self.continue_labels.push(format!(".L{}.WHILE", id));
                self.gen_stmt(ctx, body)?;
                self.break_labels.pop();
                self.continue_labels.pop();
                self.ins(&format!("jmp .L{}.WHILE", id));
                self.line(&format!(".L{}.END:", id));
            }
            Stmt::DoWhile(body, cond) => {
                let id = self.next_label();
                self.line(&format!(".L{}.DO:", id));
                self.break_labels.push(format!(".L{}.END", id));
                self.continue_labels.push(format!(".L{}.CONTINUE", id));
                self.gen_stmt(ctx, body)?;
                self.break_labels.pop();
                self.continue_labels.pop();
                self.line(&format!(".L{}.CONTINUE:", id));
                self.gen_expr(ctx, cond)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                self.ins(&format!("jne .L{}.DO", id));
                self.line(&format!(".L{}.END:", id));
            }
            Stmt::For(init, cond, step, body) => {
                let id = self.next_label();
                if let Some(init) = init {
                    self.gen_stmt(ctx, init)?;
                }
                self.line(&format!(".L{}.FOR:", id));
                if let Some(cond) = cond {
                    self.gen_expr(ctx, cond)?;
                    self.ins("pop rax");
                    self.ins("cmp rax, 0");
                    self.ins(&format!("je .L{}.END", id));
                }
                self.break_labels.push(format!(".L{}.END", id));
                self.continue_labels.push(format!(".L{}.CONTINUE", id));
                self.gen_stmt(ctx, body)?;
                self.break_labels.pop();
                self.continue_labels.pop();
                self.line(&format!(".L{}.CONTINUE:", id));
                if let Some(step) = step {
                    self.gen_expr(ctx, step)?;
                    self.ins("pop rax");
                }
                self.ins(&format!("jmp .L{}.FOR", id));
                self.line(&format!(".L{}.END:", id));
            }
            Stmt::Switch(control, cases) => self.gen_switch(ctx, control, cases)?,
            Stmt::Break => {
                let label = self
                    .break_labels
                    .last()
                    .cloned()
                    .ok_or(CodegenError::StrayBreak)?;
                self.ins(&format!("jmp {}", label));
            }
            Stmt::Continue => {
                let label = self
                    .continue_labels
                    .last()
                    .cloned()
                    .ok_or(CodegenError::StrayContinue)?;
                self.ins(&format!("jmp {}", label));
            }
            Stmt::Declaration(declarators) => {
                for d in declarators {
                    match &d.init {
                        None => {}
                        Some(Init::Scalar(expr)) => {
                            self.ins(&format!("lea rax, [rbp-{}]", d.offset));
                            self.ins("push rax");
                            self.gen_expr(ctx, expr)?;
                            self.gen_store(&d.ty, &expr.loc)?;
                            self.ins("pop rax");
                        }
                        Some(Init::List(elements)) => {
                            // The checker only lets arrays through here.
                            let (elem_ty, total) = match &d.ty {
                                Type::Array(base, len) => (base.as_ref(), *len),
                                other => (other, elements.len()),
                            };
                            let elem_size = elem_ty.size();
                            for (i, element) in elements.iter().enumerate() {
                                let disp = d.offset - i * elem_size;
                                self.ins(&format!("lea rax, [rbp-{}]", disp));
                                self.ins("push rax");
                                self.gen_expr(ctx, element)?;
                                self.gen_store(elem_ty, &element.loc)?;
                                self.ins("pop rax");
                            }
                            // Trailing elements are zeroed.
                            for i in elements.len()..total {
                                let disp = d.offset - i * elem_size;
                                let ptr = match elem_size {
                                    1 => "byte ptr",
                                    4 => "dword ptr",
                                    _ => "qword ptr",
                                };
                                self.ins(&format!("mov {} [rbp-{}], 0", ptr, disp));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Compiles a switch as a compare-and-jump chain over constant case
    /// values. The control expression is reloaded before each comparison,
    /// so it must be an lvalue.
    fn gen_switch(
        &mut self,
        ctx: &FnCtx,
        control: &Expr,
        cases: &[CaseBlock],
    ) -> Result<(), CodegenError> {
        let id = self.next_label();
        for (i, case) in cases.iter().enumerate() {
            let Some(value) = &case.value else { continue };
            let constant = case_constant(ctx, value)?;
            self.gen_addr(ctx, control)?;
            self.gen_load(ty_of(control)?);
            self.ins("pop rax");
            self.ins(&format!("cmp rax, {}", constant));
            self.ins(&format!("je .L{}.CASE{}", id, i));
        }
        match cases.iter().position(|c| c.value.is_none()) {
            Some(default) => self.ins(&format!("jmp .L{}.CASE{}", id, default)),
            None => self.ins(&format!("jmp .L{}.END", id)),
        }
        self.break_labels.push(format!(".L{}.END", id));
        for (i, case) in cases.iter().enumerate() {
            self.line(&format!(".L{}.CASE{}:", id, i));
            for stmt in &case.body {
                self.gen_stmt(ctx, stmt)?;
            }
        }
        self.break_labels.pop();
        self.line(&format!(".L{}.END:", id));
        Ok(())
    }

    // ---- expressions -----------------------------------------------------

    /// Compiles an expression; exactly one 8-byte slot is pushed.
    fn gen_expr(&mut self, ctx: &FnCtx, expr: &Expr) -> Result<(), CodegenError> {
        match &expr.kind {
            ExprKind::Number(n) => {
                self.ins(&format!("mov rax, {}", n));
                self.ins("push rax");
            }
            ExprKind::Str(index) => {
                self.ins(&format!("lea rax, .L.STR{}[rip]", index));
                self.ins("push rax");
            }
            ExprKind::Ident(name) => {
                if let Some(value) = ctx.program.types.enum_constant(name) {
                    self.ins(&format!("mov rax, {}", value));
                    self.ins("push rax");
                } else {
                    self.gen_addr(ctx, expr)?;
                    self.gen_load(ty_of(expr)?);
                }
            }
            ExprKind::Unary(UnaryOp::Neg, operand) => {
                self.gen_expr(ctx, operand)?;
                self.ins("pop rax");
                self.ins("neg rax");
                self.ins("push rax");
            }
            ExprKind::Unary(UnaryOp::Not, operand) => {
                self.gen_expr(ctx, operand)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                self.ins("sete al");
                self.ins("movzb rax, al");
                self.ins("push rax");
            }
            ExprKind::Unary(op @ (UnaryOp::PreIncrement | UnaryOp::PreDecrement), operand) => {
                self.gen_addr(ctx, operand)?;
                self.ins("pop rax");
                self.ins("mov rdi, rax");
                let ty = ty_of(operand)?;
                let step = step_size(ty);
                self.load_into_rax(ty);
                match op {
                    UnaryOp::PreIncrement => self.ins(&format!("add rax, {}", step)),
                    _ => self.ins(&format!("sub rax, {}", step)),
                }
                self.store_from_rax(ty);
                self.ins("push rax");
            }
            ExprKind::PostIncrement(operand) | ExprKind::PostDecrement(operand) => {
                self.gen_addr(ctx, operand)?;
                self.ins("pop rax");
                self.ins("mov rdi, rax");
                let ty = ty_of(operand)?;
                let step = step_size(ty);
                self.load_into_rax(ty);
                self.ins("mov rdx, rax");
                match &expr.kind {
                    ExprKind::PostIncrement(_) => self.ins(&format!("add rax, {}", step)),
                    _ => self.ins(&format!("sub rax, {}", step)),
                }
                self.store_from_rax(ty);
                self.ins("push rdx");
            }
            ExprKind::AddressOf(operand) => {
                self.gen_addr(ctx, operand)?;
            }
            ExprKind::Deref(operand) => {
                self.gen_expr(ctx, operand)?;
                self.gen_load(ty_of(expr)?);
            }
            ExprKind::Member(..) => {
                self.gen_addr(ctx, expr)?;
                self.gen_load(ty_of(expr)?);
            }
            ExprKind::Assign(AssignOp::Plain, lhs, rhs) => {
                self.gen_addr(ctx, lhs)?;
                self.gen_expr(ctx, rhs)?;
                self.gen_store(ty_of(lhs)?, &expr.loc)?;
            }
            ExprKind::Assign(op, lhs, rhs) => {
                // Compound assignment: duplicate the address, load the old
                // value, combine, store back.
                self.gen_addr(ctx, lhs)?;
                self.ins("pop rax");
                self.ins("push rax");
                self.ins("push rax");
                self.gen_load(ty_of(lhs)?);
                self.gen_expr(ctx, rhs)?;
                let binop = match op {
                    AssignOp::Add => BinaryOp::Add,
                    AssignOp::Sub => BinaryOp::Sub,
                    AssignOp::Mul => BinaryOp::Mul,
                    AssignOp::Div => BinaryOp::Div,
                    AssignOp::Plain => unreachable!("plain assignment handled above"),
                };
                self.gen_binary_op(binop, ty_of(lhs)?, ty_of(rhs)?);
                self.gen_store(ty_of(lhs)?, &expr.loc)?;
            }
            ExprKind::Binary(op @ (BinaryOp::LogicalAnd | BinaryOp::LogicalOr), lhs, rhs) => {
                self.gen_logical(ctx, *op, lhs, rhs)?;
            }
            ExprKind::Binary(op, lhs, rhs) => {
                self.gen_expr(ctx, lhs)?;
                self.gen_expr(ctx, rhs)?;
                self.gen_binary_op(*op, ty_of(lhs)?, ty_of(rhs)?);
            }
            ExprKind::Conditional(cond, then, els) => {
                let id = self.next_label();
                self.gen_expr(ctx, cond)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                self.ins(&format!("je .L{}.ELSE", id));
                self.gen_expr(ctx, then)?;
                self.ins(&format!("jmp .L{}.END", id));
                self.line(&format!(".L{}.ELSE:", id));
                self.gen_expr(ctx, els)?;
                self.line(&format!(".L{}.END:", id));
            }
            ExprKind::Comma(lhs, rhs) => {
                self.gen_expr(ctx, lhs)?;
                self.ins("pop rax");
                self.gen_expr(ctx, rhs)?;
            }
            ExprKind::Call(name, args) => {
                if args.len() > ARGREG64.len() {
                    return Err(CodegenError::TooManyArguments(
                        name.clone(),
                        expr.loc.clone(),
                    ));
                }
                for arg in args {
                    self.gen_expr(ctx, arg)?;
                }
                for i in (0..args.len()).rev() {
                    self.ins(&format!("pop {}", ARGREG64[i]));
                }
                // The stack must be 16-byte aligned at the call.
                let id = self.next_label();
                self.ins("mov rax, rsp");
                self.ins("and rax, 15");
                self.ins(&format!("jnz .L.FNCALL{}.MISALIGNED", id));
                self.ins("mov rax, 0");
                self.ins(&format!("call {}", name));
                self.ins(&format!("jmp .L.FNCALL{}.END", id));
                self.line(&format!(".L.FNCALL{}.MISALIGNED:", id));
                self.ins("sub rsp, 8");
                self.ins("mov rax, 0");
                self.ins(&format!("call {}", name));
                self.ins("add rsp, 8");
                self.line(&format!(".L.FNCALL{}.END:", id));
                self.ins("push rax");
            }
            ExprKind::SizeofExpr(operand) => {
                let size = ty_of(operand)?.size();
                self.ins(&format!("mov rax, {}", size));
                self.ins("push rax");
            }
            ExprKind::SizeofType(ty) => {
                self.ins(&format!("mov rax, {}", ty.size()));
                self.ins("push rax");
            }
        }
        Ok(())
    }

    /// Compiles the address of an lvalue; the address ends up both in rax
    /// and on the operand stack.
    fn gen_addr(&mut self, ctx: &FnCtx, expr: &Expr) -> Result<(), CodegenError> {
        match &expr.kind {
            ExprKind::Ident(name) => {
                if let Some(var) = ctx.func.locals.iter().rev().find(|v| v.name == *name) {
                    self.ins(&format!("lea rax, [rbp-{}]", var.offset));
                    self.ins("push rax");
                    return Ok(());
                }
                if ctx.program.globals.iter().any(|g| g.name == *name) {
                    self.ins(&format!("lea rax, {}[rip]", name));
                    self.ins("push rax");
                    return Ok(());
                }
                if ctx.program.types.enum_constant(name).is_some() {
                    return Err(CodegenError::NotAnLvalue(expr.loc.clone()));
                }
                Err(CodegenError::UnknownVariable(
                    name.clone(),
                    expr.loc.clone(),
                ))
            }
            ExprKind::Str(index) => {
                self.ins(&format!("lea rax, .L.STR{}[rip]", index));
                self.ins("push rax");
                Ok(())
            }
            ExprKind::Deref(operand) => self.gen_expr(ctx, operand),
            ExprKind::Member(object, name, arrow) => {
                if *arrow {
                    self.gen_expr(ctx, object)?;
                } else {
                    self.gen_addr(ctx, object)?;
                }
                let object_ty = ty_of(object)?;
                let agg = if *arrow {
                    object_ty.base().and_then(Type::aggregate)
                } else {
                    object_ty.aggregate()
                };
                let offset = agg
                    .and_then(|agg| find_member(agg, name))
                    .map(|(offset, _)| offset)
                    .ok_or_else(|| CodegenError::NotAnLvalue(expr.loc.clone()))?;
                self.ins("pop rax");
                self.ins(&format!("add rax, {}", offset));
                self.ins("push rax");
                Ok(())
            }
            _ => Err(CodegenError::NotAnLvalue(expr.loc.clone())),
        }
    }

    /// Replaces the address on top of the operand stack with the value it
    /// points at. Arrays and aggregates stay as addresses.
    fn gen_load(&mut self, ty: &Type) {
        if matches!(ty, Type::Array(..) | Type::Struct(_) | Type::Union(_)) {
            return;
        }
        self.ins("pop rax");
        self.load_into_rax(ty);
        self.ins("push rax");
    }

    /// Loads `[rax]` into rax, sign-extending narrow values.
    fn load_into_rax(&mut self, ty: &Type) {
        match ty.size() {
            1 => self.ins("movsx rax, byte ptr [rax]"),
            4 => self.ins("movsxd rax, dword ptr [rax]"),
            _ => self.ins("mov rax, [rax]"),
        }
    }

    /// Stores rax through the address in rdi, using the width of `ty`.
    fn store_from_rax(&mut self, ty: &Type) {
        match ty.size() {
            1 => self.ins("mov [rdi], al"),
            4 => self.ins("mov [rdi], eax"),
            _ => self.ins("mov [rdi], rax"),
        }
    }

    /// Pops a value and an address and stores the value through it; the
    /// value is pushed back as the result of the assignment. Aggregates
    /// have no single store width and are rejected.
    fn gen_store(&mut self, ty: &Type, loc: &SourceLocation) -> Result<(), CodegenError> {
        if matches!(ty, Type::Array(..) | Type::Struct(_) | Type::Union(_)) {
            return Err(CodegenError::AggregateAssignment(loc.clone()));
        }
        self.ins("pop rax");
        self.ins("pop rdi");
        self.store_from_rax(ty);
        self.ins("push rax");
        Ok(())
    }

    /// Pops the two operands of a binary operator (rhs into rdi, lhs into
    /// rax), combines them, and pushes the result. Pointer operands scale
    /// their integer side by the element size.
    fn gen_binary_op(&mut self, op: BinaryOp, lhs_ty: &Type, rhs_ty: &Type) {
        self.ins("pop rdi");
        self.ins("pop rax");
        match op {
            BinaryOp::Add => {
                if let (true, Some(base)) = (rhs_ty.is_integer(), lhs_ty.base()) {
                    self.ins(&format!("imul rdi, {}", base.size()));
                } else if let (true, Some(base)) = (lhs_ty.is_integer(), rhs_ty.base()) {
                    self.ins(&format!("imul rax, {}", base.size()));
                }
                self.ins("add rax, rdi");
            }
            BinaryOp::Sub => {
                if lhs_ty.is_pointer_like() && rhs_ty.is_pointer_like() {
                    let size = lhs_ty.base().map(Type::size).unwrap_or(1);
                    self.ins("sub rax, rdi");
                    self.ins("cqo");
                    self.ins(&format!("mov rdi, {}", size));
                    self.ins("idiv rdi");
                } else {
                    if let (true, Some(base)) = (rhs_ty.is_integer(), lhs_ty.base()) {
                        self.ins(&format!("imul rdi, {}", base.size()));
                    }
                    self.ins("sub rax, rdi");
                }
            }
            BinaryOp::Mul => self.ins("imul rax, rdi"),
            BinaryOp::Div => {
                self.ins("cqo");
                self.ins("idiv rdi");
            }
            BinaryOp::Mod => {
                self.ins("cqo");
                self.ins("idiv rdi");
                self.ins("mov rax, rdx");
            }
            BinaryOp::Equal => self.gen_compare("sete"),
            BinaryOp::NotEqual => self.gen_compare("setne"),
            BinaryOp::LessThan => self.gen_compare("setl"),
            BinaryOp::LessThanOrEqual => self.gen_compare("setle"),
            BinaryOp::LogicalAnd | BinaryOp::LogicalOr => {
                unreachable!("logical operators are compiled with short circuits")
            }
        }
        self.ins("push rax");
    }

    fn gen_compare(&mut self, set: &str) {
        self.ins("cmp rax, rdi");
        self.ins(&format!("{} al", set));
        self.ins("movzb rax, al");
    }

    /// `&&` and `||` short-circuit: the right operand is only evaluated
    /// when the left one has not decided the result.
    fn gen_logical(
        &mut self,
        ctx: &FnCtx,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<(), CodegenError> {
        let id = self.next_label();
        match op {
            BinaryOp::LogicalAnd => {
                self.gen_expr(ctx, lhs)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                self.ins(&format!("je .L{}.FALSE", id));
                self.gen_expr(ctx, rhs)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                self.ins(&format!("je .L{}.FALSE", id));
                self.ins("mov rax, 1");
                self.ins(&format!("jmp .L{}.END", id));
                self.line(&format!(".L{}.FALSE:", id));
                self.ins("mov rax, 0");
            }
            _ => {
                self.gen_expr(ctx, lhs)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                self.ins(&format!("jne .L{}.TRUE", id));
                self.gen_expr(ctx, rhs)?;
                self.ins("pop rax");
                self.ins("cmp rax, 0");
                self.ins(&format!("jne .L{}.TRUE", id));
                self.ins("mov rax, 0");
                self.ins(&format!("jmp .L{}.END", id));
                self.line(&format!(".L{}.TRUE:", id));
                self.ins("mov rax, 1");
            }
        }
        self.line(&format!(".L{}.END:", id));
        self.ins("push rax");
        Ok(())
    }
}

/// How far `++` and `--` move: pointers step by the size of what they
/// point at, integers by one.
fn step_size(ty: &Type) -> usize {
    ty.base().map(Type::size).unwrap_or(1)
}

fn ty_of(expr: &Expr) -> Result<&Type, CodegenError> {
    expr.ty
        .as_ref()
        .ok_or_else(|| CodegenError::UntypedExpression(expr.loc.clone()))
}

/// Case labels fold to integer constants: literals, negated literals and
/// enum constants.
fn case_constant(ctx: &FnCtx, value: &Expr) -> Result<i64, CodegenError> {
    match &value.kind {
        ExprKind::Number(n) => Ok(*n),
        ExprKind::Unary(UnaryOp::Neg, inner) => {
            if let ExprKind::Number(n) = inner.kind {
                Ok(-n)
            } else {
                Err(CodegenError::NonConstantCase(value.loc.clone()))
            }
        }
        ExprKind::Ident(name) => ctx
            .program
            .types
            .enum_constant(name)
            .ok_or_else(|| CodegenError::NonConstantCase(value.loc.clone())),
        _ => Err(CodegenError::NonConstantCase(value.loc.clone())),
    }
}

#[cfg(test)]
mod tests_codegen;
