//! A parser that converts a token stream into a typed-later abstract syntax
//! tree, building the symbol tables (frame slots, globals, tags, typedefs,
//! enum constants, string literals) as it goes.

pub mod ast;
pub mod error;
pub mod expressions;
pub mod symbols;

use crate::common::KeywordKind;
use crate::lexer::{Token, TokenKind};
use crate::types::{align_up, Aggregate, EnumDef, Type};
use ast::{CaseBlock, Declarator, Expr, ExprKind, Function, Init, Parameter, Program, Stmt, UnaryOp};
use error::ParserError;
use expressions::{parse_expression, BindingPower};
use indexmap::IndexMap;
use log::debug;
use std::mem;
use std::rc::Rc;
use symbols::{DefinedTypes, GlobalInit, GlobalVar, LocalVar};

/// Function calls pass arguments in registers only.
const MAX_ARG_REGS: usize = 6;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    types: DefinedTypes,
    func_types: IndexMap<String, Type>,
    globals: Vec<GlobalVar>,
    strings: Vec<String>,
    functions: Vec<Function>,
    /// Frame slots of the function currently being parsed.
    locals: Vec<LocalVar>,
    stack_offset: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
            types: DefinedTypes::default(),
            func_types: IndexMap::new(),
            globals: Vec::new(),
            strings: Vec::new(),
            functions: Vec::new(),
            locals: Vec::new(),
            stack_offset: 0,
        }
    }

    /// Parses the entire token stream into a program. Stops at the first
    /// error; there is no recovery.
    pub fn parse(mut self) -> Result<Program, ParserError> {
        while self.current_kind()? != TokenKind::Eof {
            self.parse_toplevel()?;
        }
        Ok(Program {
            functions: self.functions,
            globals: self.globals,
            strings: self.strings,
            func_types: self.func_types,
            types: self.types,
        })
    }

    // ---- token cursor -------------------------------------------------

    /// Returns the current token without consuming it.
    fn current_token(&self) -> Result<Token, ParserError> {
        self.tokens
            .get(self.position)
            .cloned()
            .ok_or(ParserError::UnexpectedEof)
    }

    /// Returns the kind of the current token.
    fn current_kind(&self) -> Result<TokenKind, ParserError> {
        self.current_token().map(|t| t.kind)
    }

    /// Consumes the current token.
    fn eat(&mut self) {
        self.position += 1;
    }

    /// Consumes the current token if it matches `kind`.
    fn eat_token(&mut self, kind: &TokenKind) -> bool {
        match self.tokens.get(self.position) {
            Some(token) if token.kind == *kind => {
                self.position += 1;
                true
            }
            _ => false,
        }
    }

    /// Expects a specific punctuation token.
    fn expect_punct(&mut self, kind: TokenKind) -> Result<(), ParserError> {
        let token = self.current_token()?;
        if token.kind == kind {
            self.eat();
            return Ok(());
        }
        Err(ParserError::UnexpectedToken(token))
    }

    /// Expects a specific keyword.
    fn expect_keyword(&mut self, keyword: KeywordKind) -> Result<(), ParserError> {
        if self.eat_token(&TokenKind::Keyword(keyword)) {
            return Ok(());
        }
        let token = self.current_token()?;
        Err(ParserError::UnexpectedToken(token))
    }

    /// Consumes an optional identifier, returning its name if present.
    fn maybe_name(&mut self) -> Result<Option<String>, ParserError> {
        let token = self.current_token()?;
        if let TokenKind::Identifier(name) = token.kind {
            self.eat();
            Ok(Some(name))
        } else {
            Ok(None)
        }
    }

    /// Expects and consumes an identifier, returning its name.
    fn expect_name(&mut self) -> Result<String, ParserError> {
        let token = self.current_token()?;
        if let TokenKind::Identifier(name) = token.kind {
            self.eat();
            Ok(name)
        } else {
            Err(ParserError::UnexpectedToken(token))
        }
    }

    /// Records a string literal, reusing the slot of an identical earlier one.
    fn intern_string(&mut self, content: String) -> usize {
        match self.strings.iter().position(|s| *s == content) {
            Some(index) => index,
            None => {
                self.strings.push(content);
                self.strings.len() - 1
            }
        }
    }

    fn token_starts_type(&self, kind: &TokenKind) -> bool {
        match kind {
            TokenKind::Keyword(
                KeywordKind::Void
                | KeywordKind::Char
                | KeywordKind::Int
                | KeywordKind::Struct
                | KeywordKind::Union
                | KeywordKind::Enum
                | KeywordKind::Const,
            ) => true,
            TokenKind::Identifier(name) => self.types.is_typedef(name),
            _ => false,
        }
    }

    /// Whether the current token begins a type specifier.
    fn starts_type_specifier(&self) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|t| self.token_starts_type(&t.kind))
    }

    /// Whether the token after the current one begins a type specifier.
    fn peek_is_type_specifier(&self) -> bool {
        self.tokens
            .get(self.position + 1)
            .is_some_and(|t| self.token_starts_type(&t.kind))
    }

    /// Folds an expression to an integer constant where the grammar requires
    /// one: literals, negation, enum constants and `sizeof(type)`.
    fn const_int(&self, expr: &Expr) -> Option<i64> {
        match &expr.kind {
            ExprKind::Number(n) => Some(*n),
            ExprKind::Unary(UnaryOp::Neg, inner) => self.const_int(inner).map(|v| -v),
            ExprKind::Ident(name) => self.types.enum_constant(name),
            ExprKind::SizeofType(ty) => Some(ty.size() as i64),
            _ => None,
        }
    }

    // ---- types and declarators ----------------------------------------

    /// Parses a type specifier: a builtin type, a struct/union/enum head or
    /// a typedef name. `const` is accepted and ignored on either side.
    fn parse_type_specifier(&mut self) -> Result<Type, ParserError> {
        while self.eat_token(&TokenKind::Keyword(KeywordKind::Const)) {}
        let token = self.current_token()?;
        let ty = match &token.kind {
            TokenKind::Keyword(KeywordKind::Void) => {
                self.eat();
                Type::Void
            }
            TokenKind::Keyword(KeywordKind::Char) => {
                self.eat();
                Type::Char
            }
            TokenKind::Keyword(KeywordKind::Int) => {
                self.eat();
                Type::Int
            }
            TokenKind::Keyword(KeywordKind::Struct) => self.parse_struct_or_union(true)?,
            TokenKind::Keyword(KeywordKind::Union) => self.parse_struct_or_union(false)?,
            TokenKind::Keyword(KeywordKind::Enum) => self.parse_enum()?,
            TokenKind::Identifier(name) if self.types.is_typedef(name) => {
                let ty = self.types.typedefs[name].clone();
                self.eat();
                ty
            }
            _ => return Err(ParserError::UnknownTypeName(token)),
        };
        while self.eat_token(&TokenKind::Keyword(KeywordKind::Const)) {}
        Ok(ty)
    }

    /// Parses a struct or union head: either a body (laid out immediately
    /// and registered under its tag, if any) or a reference to a known tag.
    fn parse_struct_or_union(&mut self, is_struct: bool) -> Result<Type, ParserError> {
        self.eat(); // struct / union
        let tag_token = self.current_token()?;
        let tag = self.maybe_name()?;

        if self.eat_token(&TokenKind::LeftBrace) {
            let mut members: Vec<(Option<String>, Type)> = Vec::new();
            while !self.eat_token(&TokenKind::RightBrace) {
                let spec = self.parse_type_specifier()?;
                if self.eat_token(&TokenKind::Semicolon) {
                    // A bare struct/union body is an anonymous member whose
                    // own members are reachable from the outer type.
                    members.push((None, spec));
                    continue;
                }
                loop {
                    let (ty, name) = self.parse_declarator(spec.clone())?;
                    members.push((Some(name), ty));
                    if !self.eat_token(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_punct(TokenKind::Semicolon)?;
            }
            let agg = Rc::new(if is_struct {
                Aggregate::layout_struct(tag.clone(), members)
            } else {
                Aggregate::layout_union(tag.clone(), members)
            });
            if let Some(tag) = tag {
                let table = if is_struct {
                    &mut self.types.struct_tags
                } else {
                    &mut self.types.union_tags
                };
                table.insert(tag, agg.clone());
            }
            return Ok(if is_struct {
                Type::Struct(agg)
            } else {
                Type::Union(agg)
            });
        }

        let Some(tag) = tag else {
            return Err(ParserError::UnexpectedToken(tag_token));
        };
        let table = if is_struct {
            &self.types.struct_tags
        } else {
            &self.types.union_tags
        };
        match table.get(&tag) {
            Some(agg) => Ok(if is_struct {
                Type::Struct(agg.clone())
            } else {
                Type::Union(agg.clone())
            }),
            None => Err(ParserError::UnknownTag(tag_token)),
        }
    }

    /// Parses an enum head. Members are numbered from zero in order and
    /// registered in the flat enum-constant namespace.
    fn parse_enum(&mut self) -> Result<Type, ParserError> {
        self.eat(); // enum
        let tag_token = self.current_token()?;
        let tag = self.maybe_name()?;

        if self.eat_token(&TokenKind::LeftBrace) {
            let mut constants = Vec::new();
            let mut next = 0i64;
            while !self.eat_token(&TokenKind::RightBrace) {
                let name = self.expect_name()?;
                self.types.enum_constants.insert(name.clone(), next);
                constants.push((name, next));
                next += 1;
                if !self.eat_token(&TokenKind::Comma) {
                    self.expect_punct(TokenKind::RightBrace)?;
                    break;
                }
            }
            let def = Rc::new(EnumDef {
                tag: tag.clone(),
                constants,
            });
            if let Some(tag) = tag {
                self.types.enum_tags.insert(tag, def.clone());
            }
            return Ok(Type::Enum(def));
        }

        let Some(tag) = tag else {
            return Err(ParserError::UnexpectedToken(tag_token));
        };
        match self.types.enum_tags.get(&tag) {
            Some(def) => Ok(Type::Enum(def.clone())),
            None => Err(ParserError::UnknownTag(tag_token)),
        }
    }

    /// Parses a declarator over an already-parsed specifier: pointer stars,
    /// then either a parenthesized inner declarator or a name, then array
    /// dimensions, which apply inside out.
    fn parse_declarator(&mut self, base: Type) -> Result<(Type, String), ParserError> {
        let mut ty = base;
        while self.eat_token(&TokenKind::Star) {
            ty = Type::Pointer(Box::new(ty));
        }
        if self.eat_token(&TokenKind::LeftParen) {
            // The inner declarator wraps the type built by the suffix that
            // follows the closing paren, so parse the suffix first and then
            // come back for the inner part.
            let inner_start = self.position;
            self.skip_balanced_parens()?;
            let outer = self.parse_array_suffix(ty)?;
            let after_suffix = self.position;
            self.position = inner_start;
            let (ty, name) = self.parse_declarator(outer)?;
            self.expect_punct(TokenKind::RightParen)?;
            self.position = after_suffix;
            return Ok((ty, name));
        }
        let name = self.expect_name()?;
        let ty = self.parse_array_suffix(ty)?;
        Ok((ty, name))
    }

    fn skip_balanced_parens(&mut self) -> Result<(), ParserError> {
        let mut depth = 1usize;
        loop {
            let kind = self.current_kind()?;
            if kind == TokenKind::Eof {
                return Err(ParserError::UnexpectedEof);
            }
            self.eat();
            match kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// Parses `[N]` suffixes. `int a[2][3]` is an array of two arrays of
    /// three ints.
    fn parse_array_suffix(&mut self, ty: Type) -> Result<Type, ParserError> {
        let mut dims = Vec::new();
        while self.eat_token(&TokenKind::LeftBracket) {
            let token = self.current_token()?;
            let expr = parse_expression(self, BindingPower::CONDITIONAL)?;
            let len = self
                .const_int(&expr)
                .ok_or(ParserError::ExpectedConstant(token))?;
            self.expect_punct(TokenKind::RightBracket)?;
            dims.push(len as usize);
        }
        let mut ty = ty;
        for len in dims.into_iter().rev() {
            ty = Type::Array(Box::new(ty), len);
        }
        Ok(ty)
    }

    /// Parses an abstract type name, as used by `sizeof(...)`.
    fn parse_type_name(&mut self) -> Result<Type, ParserError> {
        let mut ty = self.parse_type_specifier()?;
        while self.eat_token(&TokenKind::Star) {
            ty = Type::Pointer(Box::new(ty));
        }
        self.parse_array_suffix(ty)
    }

    // ---- statements ----------------------------------------------------

    fn parse_stmt(&mut self) -> Result<Stmt, ParserError> {
        let token = self.current_token()?;
        match &token.kind {
            TokenKind::LeftBrace => {
                self.eat();
                Ok(Stmt::Block(self.parse_block()?))
            }
            TokenKind::Semicolon => {
                self.eat();
                Ok(Stmt::Empty)
            }
            TokenKind::Keyword(KeywordKind::Return) => {
                self.eat();
                if self.eat_token(&TokenKind::Semicolon) {
                    return Ok(Stmt::Return(None));
                }
                let expr = parse_expression(self, BindingPower::MIN)?;
                self.expect_punct(TokenKind::Semicolon)?;
                Ok(Stmt::Return(Some(expr)))
            }
            TokenKind::Keyword(KeywordKind::If) => {
                self.eat();
                self.expect_punct(TokenKind::LeftParen)?;
                let cond = parse_expression(self, BindingPower::MIN)?;
                self.expect_punct(TokenKind::RightParen)?;
                let then = Box::new(self.parse_stmt()?);
                let els = if self.eat_token(&TokenKind::Keyword(KeywordKind::Else)) {
                    Some(Box::new(self.parse_stmt()?))
                } else {
                    None
                };
                Ok(Stmt::If(cond, then, els))
            }
            TokenKind::Keyword(KeywordKind::While) => {
                self.eat();
                self.expect_punct(TokenKind::LeftParen)?;
                let cond = parse_expression(self, BindingPower::MIN)?;
                self.expect_punct(TokenKind::RightParen)?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::While(cond, body))
            }
            TokenKind::Keyword(KeywordKind::Do) => {
                self.eat();
                let body = Box::new(self.parse_stmt()?);
                self.expect_keyword(KeywordKind::While)?;
                self.expect_punct(TokenKind::LeftParen)?;
                let cond = parse_expression(self, BindingPower::MIN)?;
                self.expect_punct(TokenKind::RightParen)?;
                self.expect_punct(TokenKind::Semicolon)?;
                Ok(Stmt::DoWhile(body, cond))
            }
            TokenKind::Keyword(KeywordKind::For) => self.parse_for(),
            TokenKind::Keyword(KeywordKind::Switch) => self.parse_switch(),
            TokenKind::Keyword(KeywordKind::Break) => {
                self.eat();
                self.expect_punct(TokenKind::Semicolon)?;
                Ok(Stmt::Break)
            }
            TokenKind::Keyword(KeywordKind::Continue) => {
                self.eat();
                self.expect_punct(TokenKind::Semicolon)?;
                Ok(Stmt::Continue)
            }
            _ if self.starts_type_specifier() => self.parse_declaration_stmt(),
            _ => {
                let expr = parse_expression(self, BindingPower::MIN)?;
                self.expect_punct(TokenKind::Semicolon)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Parses statements up to and including the closing brace.
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParserError> {
        let mut stmts = Vec::new();
        while !self.eat_token(&TokenKind::RightBrace) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    /// Parses a local declaration statement, assigning each declared name
    /// the next frame slot: the previous cursor plus the value's size,
    /// rounded up to the value's alignment.
    fn parse_declaration_stmt(&mut self) -> Result<Stmt, ParserError> {
        let spec = self.parse_type_specifier()?;
        if self.eat_token(&TokenKind::Semicolon) {
            // Tag-only declaration, e.g. `struct S { ... };`.
            return Ok(Stmt::Empty);
        }
        let mut declarators = Vec::new();
        loop {
            let (ty, name) = self.parse_declarator(spec.clone())?;
            let offset = align_up(self.stack_offset + ty.size(), ty.align());
            self.stack_offset = offset;
            self.locals.push(LocalVar {
                name: name.clone(),
                ty: ty.clone(),
                offset,
            });
            let init = if self.eat_token(&TokenKind::Equal) {
                Some(self.parse_initializer()?)
            } else {
                None
            };
            declarators.push(Declarator {
                name,
                ty,
                offset,
                init,
            });
            if !self.eat_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_punct(TokenKind::Semicolon)?;
        Ok(Stmt::Declaration(declarators))
    }

    fn parse_initializer(&mut self) -> Result<Init, ParserError> {
        if self.eat_token(&TokenKind::LeftBrace) {
            let mut elements = Vec::new();
            while !self.eat_token(&TokenKind::RightBrace) {
                elements.push(parse_expression(self, BindingPower::ASSIGNMENT)?);
                if !self.eat_token(&TokenKind::Comma) {
                    self.expect_punct(TokenKind::RightBrace)?;
                    break;
                }
            }
            Ok(Init::List(elements))
        } else {
            Ok(Init::Scalar(parse_expression(self, BindingPower::ASSIGNMENT)?))
        }
    }

    fn parse_for(&mut self) -> Result<Stmt, ParserError> {
        self.eat(); // for
        self.expect_punct(TokenKind::LeftParen)?;
        let init = if self.eat_token(&TokenKind::Semicolon) {
            None
        } else if self.starts_type_specifier() {
            Some(Box::new(self.parse_declaration_stmt()?))
        } else {
            let expr = parse_expression(self, BindingPower::MIN)?;
            self.expect_punct(TokenKind::Semicolon)?;
            Some(Box::new(Stmt::Expr(expr)))
        };
        let cond = if self.eat_token(&TokenKind::Semicolon) {
            None
        } else {
            let expr = parse_expression(self, BindingPower::MIN)?;
            self.expect_punct(TokenKind::Semicolon)?;
            Some(expr)
        };
        let step = if self.current_kind()? == TokenKind::RightParen {
            None
        } else {
            Some(parse_expression(self, BindingPower::MIN)?)
        };
        self.expect_punct(TokenKind::RightParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Stmt::For(init, cond, step, body))
    }

    /// Parses a switch body as a sequence of case/default blocks, each
    /// collecting the statements up to the next label or the closing brace.
    fn parse_switch(&mut self) -> Result<Stmt, ParserError> {
        self.eat(); // switch
        self.expect_punct(TokenKind::LeftParen)?;
        let control = parse_expression(self, BindingPower::MIN)?;
        self.expect_punct(TokenKind::RightParen)?;
        self.expect_punct(TokenKind::LeftBrace)?;
        let mut cases = Vec::new();
        loop {
            let token = self.current_token()?;
            match token.kind {
                TokenKind::RightBrace => {
                    self.eat();
                    break;
                }
                TokenKind::Keyword(KeywordKind::Case) => {
                    self.eat();
                    let value = parse_expression(self, BindingPower::CONDITIONAL)?;
                    self.expect_punct(TokenKind::Colon)?;
                    let body = self.parse_case_body()?;
                    cases.push(CaseBlock {
                        value: Some(value),
                        body,
                    });
                }
                TokenKind::Keyword(KeywordKind::Default) => {
                    self.eat();
                    self.expect_punct(TokenKind::Colon)?;
                    let body = self.parse_case_body()?;
                    cases.push(CaseBlock { value: None, body });
                }
                _ => return Err(ParserError::UnexpectedToken(token)),
            }
        }
        Ok(Stmt::Switch(control, cases))
    }

    fn parse_case_body(&mut self) -> Result<Vec<Stmt>, ParserError> {
        let mut body = Vec::new();
        loop {
            let token = self.current_token()?;
            match token.kind {
                TokenKind::RightBrace
                | TokenKind::Keyword(KeywordKind::Case)
                | TokenKind::Keyword(KeywordKind::Default) => return Ok(body),
                _ => body.push(self.parse_stmt()?),
            }
        }
    }

    // ---- top level ------------------------------------------------------

    fn parse_toplevel(&mut self) -> Result<(), ParserError> {
        if self.eat_token(&TokenKind::Keyword(KeywordKind::Typedef)) {
            let spec = self.parse_type_specifier()?;
            let (ty, name) = self.parse_declarator(spec)?;
            self.types.typedefs.insert(name, ty);
            self.expect_punct(TokenKind::Semicolon)?;
            return Ok(());
        }
        let spec = self.parse_type_specifier()?;
        if self.eat_token(&TokenKind::Semicolon) {
            // Tag-only declaration.
            return Ok(());
        }
        let (ty, name) = self.parse_declarator(spec.clone())?;
        if self.current_kind()? == TokenKind::LeftParen {
            return self.parse_function(ty, name);
        }
        self.parse_global_tail(spec, ty, name)
    }

    /// Parses a function prototype or definition. Parameters become the
    /// first frame slots; array parameters decay to pointers.
    fn parse_function(&mut self, return_type: Type, name: String) -> Result<(), ParserError> {
        let paren = self.current_token()?;
        self.eat(); // '('
        self.locals.clear();
        self.stack_offset = 0;

        let mut params = Vec::new();
        if self.eat_token(&TokenKind::RightParen) {
            // Empty parameter list.
        } else if self.current_kind()? == TokenKind::Keyword(KeywordKind::Void)
            && self.tokens.get(self.position + 1).map(|t| &t.kind) == Some(&TokenKind::RightParen)
        {
            self.eat();
            self.eat();
        } else {
            loop {
                let spec = self.parse_type_specifier()?;
                let (ty, param_name) = self.parse_declarator(spec)?;
                let ty = ty.decay();
                let offset = align_up(self.stack_offset + ty.size(), ty.align());
                self.stack_offset = offset;
                self.locals.push(LocalVar {
                    name: param_name.clone(),
                    ty: ty.clone(),
                    offset,
                });
                params.push(Parameter {
                    name: param_name,
                    ty,
                });
                if !self.eat_token(&TokenKind::Comma) {
                    self.expect_punct(TokenKind::RightParen)?;
                    break;
                }
            }
        }
        if params.len() > MAX_ARG_REGS {
            return Err(ParserError::TooManyParameters(name, paren.loc));
        }

        self.func_types
            .entry(name.clone())
            .or_insert_with(|| return_type.clone());

        if self.eat_token(&TokenKind::Semicolon) {
            // Prototype only.
            self.locals.clear();
            self.stack_offset = 0;
            return Ok(());
        }

        self.expect_punct(TokenKind::LeftBrace)?;
        let body = self.parse_block()?;
        debug!("parsed function '{}'", name);
        let locals = mem::take(&mut self.locals);
        let stack_size = mem::replace(&mut self.stack_offset, 0);
        self.functions.push(Function {
            name,
            return_type,
            params,
            body,
            locals,
            stack_size,
        });
        Ok(())
    }

    /// Parses the rest of a global declaration after the first declarator.
    fn parse_global_tail(
        &mut self,
        spec: Type,
        first_ty: Type,
        first_name: String,
    ) -> Result<(), ParserError> {
        let mut ty = first_ty;
        let mut name = first_name;
        loop {
            let init = if self.eat_token(&TokenKind::Equal) {
                Some(self.parse_global_init()?)
            } else {
                None
            };
            self.globals.push(GlobalVar { name, ty, init });
            if !self.eat_token(&TokenKind::Comma) {
                break;
            }
            let (next_ty, next_name) = self.parse_declarator(spec.clone())?;
            ty = next_ty;
            name = next_name;
        }
        self.expect_punct(TokenKind::Semicolon)?;
        Ok(())
    }

    /// Global initializers are restricted to integer constants, scalar or
    /// brace-listed.
    fn parse_global_init(&mut self) -> Result<GlobalInit, ParserError> {
        if self.eat_token(&TokenKind::LeftBrace) {
            let mut values = Vec::new();
            while !self.eat_token(&TokenKind::RightBrace) {
                values.push(self.parse_const_expr()?);
                if !self.eat_token(&TokenKind::Comma) {
                    self.expect_punct(TokenKind::RightBrace)?;
                    break;
                }
            }
            Ok(GlobalInit::List(values))
        } else {
            Ok(GlobalInit::Scalar(self.parse_const_expr()?))
        }
    }

    fn parse_const_expr(&mut self) -> Result<i64, ParserError> {
        let token = self.current_token()?;
        let expr = parse_expression(self, BindingPower::ASSIGNMENT)?;
        self.const_int(&expr)
            .ok_or(ParserError::ExpectedConstant(token))
    }
}
