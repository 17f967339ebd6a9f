//! The type-checking pass.
//!
//! Walks every function body once, annotating each expression with its type.
//! The walk is idempotent: an expression that already carries a type is
//! returned as-is, so re-running the pass is harmless.

pub mod error;

use crate::parser::ast::{
    AssignOp, BinaryOp, Declarator, Expr, ExprKind, Init, Program, Stmt, UnaryOp,
};
use crate::parser::symbols::{DefinedTypes, GlobalVar, LocalVar};
use crate::types::{find_member, Type};
use error::TypeError;
use indexmap::IndexMap;
use log::debug;
use std::mem;
use std::rc::Rc;

/// Type-checks every function body in the program, filling in the `ty`
/// field of each expression. Stops at the first error.
pub fn check_program(program: &mut Program) -> Result<(), TypeError> {
    for i in 0..program.functions.len() {
        debug!("type checking function '{}'", program.functions[i].name);
        let mut body = mem::take(&mut program.functions[i].body);
        let env = Env {
            locals: &program.functions[i].locals,
            globals: &program.globals,
            func_types: &program.func_types,
            types: &program.types,
            strings: &program.strings,
        };
        let result = body.iter_mut().try_for_each(|stmt| env.check_stmt(stmt));
        program.functions[i].body = body;
        result?;
    }
    Ok(())
}

/// Everything name lookup can see from inside one function.
struct Env<'a> {
    locals: &'a [LocalVar],
    globals: &'a [GlobalVar],
    func_types: &'a IndexMap<String, Type>,
    types: &'a DefinedTypes,
    strings: &'a [String],
}

impl Env<'_> {
    /// Locals shadow globals, and the latest declaration of a name wins.
    fn lookup(&self, name: &str) -> Option<Type> {
        if let Some(var) = self.locals.iter().rev().find(|v| v.name == name) {
            return Some(var.ty.clone());
        }
        self.globals
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.ty.clone())
    }

    fn check_stmt(&self, stmt: &mut Stmt) -> Result<(), TypeError> {
        match stmt {
            Stmt::Expr(expr) | Stmt::Return(Some(expr)) => {
                self.typed(expr)?;
            }
            Stmt::Return(None) | Stmt::Break | Stmt::Continue | Stmt::Empty => {}
            Stmt::Block(stmts) => {
                for s in stmts {
                    self.check_stmt(s)?;
                }
            }
            Stmt::If(cond, then, els) => {
                self.typed(cond)?;
                self.check_stmt(then)?;
                if let Some(els) = els {
                    self.check_stmt(els)?;
                }
            }
            Stmt::While(cond, body) => {
                self.typed(cond)?;
                self.check_stmt(body)?;
            }
            Stmt::DoWhile(body, cond) => {
                self.check_stmt(body)?;
                self.typed(cond)?;
            }
            Stmt::For(init, cond, step, body) => {
                if let Some(init) = init {
                    self.check_stmt(init)?;
                }
                if let Some(cond) = cond {
                    self.typed(cond)?;
                }
                if let Some(step) = step {
                    self.typed(step)?;
                }
                self.check_stmt(body)?;
            }
            Stmt::Switch(control, cases) => {
                self.typed(control)?;
                for case in cases {
                    if let Some(value) = &mut case.value {
                        self.typed(value)?;
                    }
                    for s in &mut case.body {
                        self.check_stmt(s)?;
                    }
                }
            }
            Stmt::Declaration(declarators) => {
                for d in declarators {
                    self.check_declarator(d)?;
                }
            }
        }
        Ok(())
    }

    fn check_declarator(&self, declarator: &mut Declarator) -> Result<(), TypeError> {
        match &mut declarator.init {
            None => Ok(()),
            Some(Init::Scalar(expr)) => {
                let value = self.typed(expr)?.decay();
                let target = declarator.ty.decay();
                if !is_compatible(&target, &value) {
                    return Err(TypeError::IncompatibleAssignment(expr.loc.clone()));
                }
                Ok(())
            }
            Some(Init::List(elements)) => {
                let Type::Array(_, len) = &declarator.ty else {
                    return Err(TypeError::ExpectedArray(declarator.name.clone()));
                };
                if elements.len() > *len {
                    return Err(TypeError::TooManyInitializers(
                        elements[*len].loc.clone(),
                    ));
                }
                for element in elements {
                    let ty = self.typed(element)?;
                    if !ty.is_integer() {
                        return Err(TypeError::ExpectedInteger(element.loc.clone()));
                    }
                }
                Ok(())
            }
        }
    }

    /// Computes and records the type of an expression. Already-typed
    /// expressions are returned unchanged.
    fn typed(&self, expr: &mut Expr) -> Result<Type, TypeError> {
        if let Some(ty) = &expr.ty {
            return Ok(ty.clone());
        }
        let loc = expr.loc.clone();
        let ty = match &mut expr.kind {
            ExprKind::Number(_) => Type::Int,
            ExprKind::Str(index) => {
                Type::Array(Box::new(Type::Char), self.strings[*index].len() + 1)
            }
            ExprKind::Ident(name) => {
                if let Some(ty) = self.lookup(name) {
                    ty
                } else if self.types.enum_constant(name).is_some() {
                    Type::Int
                } else {
                    return Err(TypeError::UndefinedVariable(name.clone(), loc));
                }
            }
            ExprKind::Unary(op, operand) => {
                let ty = self.typed(operand)?;
                match op {
                    UnaryOp::Not => Type::Int,
                    UnaryOp::Neg | UnaryOp::PreIncrement | UnaryOp::PreDecrement => promote(ty),
                }
            }
            ExprKind::Binary(op, lhs, rhs) => self.binary_type(*op, lhs, rhs, &loc)?,
            ExprKind::Assign(op, lhs, rhs) => {
                let target = self.typed(lhs)?;
                let value = self.typed(rhs)?.decay();
                let pointer_step = matches!(op, AssignOp::Add | AssignOp::Sub)
                    && target.is_pointer_like()
                    && value.is_integer();
                if pointer_step {
                    target
                } else if is_compatible(&target, &value) {
                    // The assignment expression takes the value's type.
                    value
                } else {
                    return Err(TypeError::IncompatibleAssignment(loc));
                }
            }
            ExprKind::Conditional(cond, then, els) => {
                let cond_ty = self.typed(cond)?;
                if !cond_ty.is_integer() {
                    return Err(TypeError::ExpectedInteger(cond.loc.clone()));
                }
                let then_ty = self.typed(then)?.decay();
                let else_ty = self.typed(els)?.decay();
                if then_ty.is_integer() && else_ty.is_integer() {
                    Type::Int
                } else if is_compatible(&then_ty, &else_ty) {
                    then_ty
                } else {
                    return Err(TypeError::InvalidOperands(loc));
                }
            }
            ExprKind::Comma(lhs, rhs) => {
                self.typed(lhs)?;
                self.typed(rhs)?
            }
            ExprKind::AddressOf(operand) => Type::Pointer(Box::new(self.typed(operand)?)),
            ExprKind::Deref(operand) => {
                let ty = self.typed(operand)?;
                match ty.base() {
                    Some(base) => base.clone(),
                    None => return Err(TypeError::ExpectedPointer(loc)),
                }
            }
            ExprKind::Member(object, name, arrow) => {
                let ty = self.typed(object)?;
                let agg = if *arrow {
                    ty.base().and_then(Type::aggregate)
                } else {
                    ty.aggregate()
                };
                let Some(agg) = agg else {
                    return Err(TypeError::InvalidMemberAccess(name.clone(), loc));
                };
                match find_member(agg, name) {
                    Some((_, member_ty)) => member_ty.clone(),
                    None => return Err(TypeError::InvalidMemberAccess(name.clone(), loc)),
                }
            }
            ExprKind::Call(name, args) => {
                // Argument count and types are not checked against the
                // declaration; unknown functions default to returning int.
                for arg in args.iter_mut() {
                    self.typed(arg)?;
                }
                self.func_types.get(name.as_str()).cloned().unwrap_or(Type::Int)
            }
            ExprKind::SizeofExpr(operand) => {
                self.typed(operand)?;
                Type::Int
            }
            ExprKind::SizeofType(_) => Type::Int,
            ExprKind::PostIncrement(operand) | ExprKind::PostDecrement(operand) => {
                promote(self.typed(operand)?)
            }
        };
        expr.ty = Some(ty.clone());
        Ok(ty)
    }

    fn binary_type(
        &self,
        op: BinaryOp,
        lhs: &mut Expr,
        rhs: &mut Expr,
        loc: &crate::common::SourceLocation,
    ) -> Result<Type, TypeError> {
        let lt = self.typed(lhs)?.decay();
        let rt = self.typed(rhs)?.decay();
        match op {
            BinaryOp::Add => {
                if lt.is_integer() && rt.is_integer() {
                    Ok(Type::Int)
                } else if lt.is_pointer_like() && rt.is_integer() {
                    Ok(lt)
                } else if lt.is_integer() && rt.is_pointer_like() {
                    Ok(rt)
                } else {
                    Err(TypeError::InvalidOperands(loc.clone()))
                }
            }
            BinaryOp::Sub => {
                if lt.is_integer() && rt.is_integer() {
                    Ok(Type::Int)
                } else if lt.is_pointer_like() && rt.is_integer() {
                    Ok(lt)
                } else if lt.is_pointer_like() && rt.is_pointer_like() {
                    // Pointer difference is an element count.
                    Ok(Type::Int)
                } else {
                    Err(TypeError::InvalidOperands(loc.clone()))
                }
            }
            BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::LogicalAnd
            | BinaryOp::LogicalOr => {
                if lt.is_integer() && rt.is_integer() {
                    Ok(Type::Int)
                } else {
                    Err(TypeError::ExpectedInteger(loc.clone()))
                }
            }
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::LessThan
            | BinaryOp::LessThanOrEqual => {
                if lt.is_integer() && rt.is_integer() {
                    Ok(Type::Int)
                } else if lt.is_pointer_like() && rt.is_pointer_like() && is_compatible(&lt, &rt) {
                    Ok(Type::Int)
                } else {
                    Err(TypeError::InvalidOperands(loc.clone()))
                }
            }
        }
    }
}

/// Integer promotion: char and enum widen to int in arithmetic.
fn promote(ty: Type) -> Type {
    if ty.is_integer() {
        Type::Int
    } else {
        ty
    }
}

/// Whether a value of type `value` may stand where `target` is expected.
/// Integers mix freely, `void *` converts to and from any pointer, and
/// aggregates must be the same body.
fn is_compatible(target: &Type, value: &Type) -> bool {
    match (target, value) {
        _ if target.is_integer() && value.is_integer() => true,
        (Type::Pointer(a), Type::Pointer(b)) => {
            matches!(a.as_ref(), Type::Void)
                || matches!(b.as_ref(), Type::Void)
                || is_compatible(a, b)
        }
        (Type::Struct(a), Type::Struct(b)) | (Type::Union(a), Type::Union(b)) => {
            Rc::ptr_eq(a, b) || (a.tag.is_some() && a.tag == b.tag)
        }
        (Type::Void, Type::Void) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests_semantic;
