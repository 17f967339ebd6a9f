//! The abstract syntax tree produced by the parser.
//!
//! Expressions carry an optional type annotation which starts out `None`
//! and is filled in exactly once by the semantic pass.

use crate::common::SourceLocation;
use crate::parser::symbols::{DefinedTypes, GlobalVar, LocalVar};
use crate::types::Type;
use indexmap::IndexMap;
use thin_vec::ThinVec;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Logical not, yielding 0 or 1.
    Not,
    PreIncrement,
    PreDecrement,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    LogicalAnd,
    LogicalOr,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum AssignOp {
    Plain,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Filled in by the semantic pass; `None` until then.
    pub ty: Option<Type>,
    pub loc: SourceLocation,
}

impl Expr {
    pub fn new(kind: ExprKind, loc: SourceLocation) -> Self {
        Expr {
            kind,
            ty: None,
            loc,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Number(i64),
    /// A string literal, referring into `Program::strings` by index.
    Str(usize),
    Ident(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Assign(AssignOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    /// The sequencing comma operator.
    Comma(Box<Expr>, Box<Expr>),
    AddressOf(Box<Expr>),
    Deref(Box<Expr>),
    /// `expr.name` when `arrow` is false, `expr->name` when true.
    Member(Box<Expr>, String, bool),
    Call(String, ThinVec<Expr>),
    SizeofExpr(Box<Expr>),
    SizeofType(Type),
    PostIncrement(Box<Expr>),
    PostDecrement(Box<Expr>),
}

/// A local variable initializer.
#[derive(Debug, PartialEq)]
pub enum Init {
    Scalar(Expr),
    List(Vec<Expr>),
}

/// One declared local variable, bound to its frame slot.
#[derive(Debug, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub ty: Type,
    pub offset: usize,
    pub init: Option<Init>,
}

/// The statements collected under one `case` or `default` label.
#[derive(Debug, PartialEq)]
pub struct CaseBlock {
    /// `None` for the `default` label.
    pub value: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Return(Option<Expr>),
    Block(Vec<Stmt>),
    If(Expr, Box<Stmt>, Option<Box<Stmt>>),
    While(Expr, Box<Stmt>),
    DoWhile(Box<Stmt>, Expr),
    For(Option<Box<Stmt>>, Option<Expr>, Option<Expr>, Box<Stmt>),
    Switch(Expr, Vec<CaseBlock>),
    Break,
    Continue,
    Declaration(Vec<Declarator>),
    Empty,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, PartialEq)]
pub struct Function {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Parameter>,
    pub body: Vec<Stmt>,
    /// Every frame slot of the function, parameters first, in declaration
    /// order. Name lookup scans from the back so the latest declaration wins.
    pub locals: Vec<LocalVar>,
    /// Total frame bytes before 16-byte rounding.
    pub stack_size: usize,
}

#[derive(Debug, PartialEq, Default)]
pub struct Program {
    pub functions: Vec<Function>,
    pub globals: Vec<GlobalVar>,
    /// String literals in order of first appearance.
    pub strings: Vec<String>,
    /// Declared or defined function return types by name.
    pub func_types: IndexMap<String, Type>,
    pub types: DefinedTypes,
}
