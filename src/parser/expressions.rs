//! Expression parsing: a precedence-climbing loop driven by a binding-power
//! table, with prefix, postfix and member forms handled in one place.

use super::Parser;
use crate::common::KeywordKind;
use crate::lexer::TokenKind;
use crate::parser::ast::{AssignOp, BinaryOp, Expr, ExprKind, UnaryOp};
use crate::parser::error::ParserError;
use log::trace;
use thin_vec::ThinVec;

/// Binding power for operator precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BindingPower(u8);

impl BindingPower {
    pub const MIN: Self = Self(0);
    pub const COMMA: Self = Self(1);
    pub const ASSIGNMENT: Self = Self(2);
    pub const CONDITIONAL: Self = Self(3);
    pub const LOGICAL_OR: Self = Self(4);
    pub const LOGICAL_AND: Self = Self(5);
    pub const EQUALITY: Self = Self(6);
    pub const RELATIONAL: Self = Self(7);
    pub const ADDITIVE: Self = Self(8);
    pub const MULTIPLICATIVE: Self = Self(9);
    pub const UNARY: Self = Self(10);
    pub const POSTFIX: Self = Self(11);
    pub const MEMBER: Self = Self(12);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

fn binding_power(kind: &TokenKind) -> Option<(BindingPower, Associativity)> {
    match kind {
        TokenKind::Comma => Some((BindingPower::COMMA, Associativity::Left)),
        TokenKind::Equal
        | TokenKind::PlusEqual
        | TokenKind::MinusEqual
        | TokenKind::AsteriskEqual
        | TokenKind::SlashEqual => Some((BindingPower::ASSIGNMENT, Associativity::Right)),
        TokenKind::Question => Some((BindingPower::CONDITIONAL, Associativity::Right)),
        TokenKind::PipePipe => Some((BindingPower::LOGICAL_OR, Associativity::Left)),
        TokenKind::AmpersandAmpersand => Some((BindingPower::LOGICAL_AND, Associativity::Left)),
        TokenKind::EqualEqual | TokenKind::BangEqual => {
            Some((BindingPower::EQUALITY, Associativity::Left))
        }
        TokenKind::LessThan
        | TokenKind::LessThanEqual
        | TokenKind::GreaterThan
        | TokenKind::GreaterThanEqual => Some((BindingPower::RELATIONAL, Associativity::Left)),
        TokenKind::Plus | TokenKind::Minus => Some((BindingPower::ADDITIVE, Associativity::Left)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => {
            Some((BindingPower::MULTIPLICATIVE, Associativity::Left))
        }
        TokenKind::PlusPlus
        | TokenKind::MinusMinus
        | TokenKind::LeftParen
        | TokenKind::LeftBracket => Some((BindingPower::POSTFIX, Associativity::Left)),
        TokenKind::Dot | TokenKind::Arrow => Some((BindingPower::MEMBER, Associativity::Left)),
        _ => None,
    }
}

/// Parses an expression whose operators all bind at least as tightly as
/// `min_bp`. Left-associative operators stop at their own level; a
/// right-associative operator consumes its own level again, which is what
/// makes `a = b = c` group to the right.
pub fn parse_expression(parser: &mut Parser, min_bp: BindingPower) -> Result<Expr, ParserError> {
    let mut left = parse_prefix(parser)?;

    loop {
        let kind = parser.current_kind()?;
        let Some((bp, assoc)) = binding_power(&kind) else {
            break;
        };
        if bp < min_bp || (bp == min_bp && assoc == Associativity::Left) {
            break;
        }
        trace!("infix {:?} at power {:?}", kind, bp);

        let op_loc = parser.current_token()?.loc;
        match kind {
            TokenKind::Question => {
                parser.eat();
                let then_expr = parse_expression(parser, BindingPower::MIN)?;
                parser.expect_punct(TokenKind::Colon)?;
                let else_expr = parse_expression(parser, BindingPower::CONDITIONAL)?;
                left = Expr::new(
                    ExprKind::Conditional(
                        Box::new(left),
                        Box::new(then_expr),
                        Box::new(else_expr),
                    ),
                    op_loc,
                );
            }
            TokenKind::PlusPlus => {
                parser.eat();
                left = Expr::new(ExprKind::PostIncrement(Box::new(left)), op_loc);
            }
            TokenKind::MinusMinus => {
                parser.eat();
                left = Expr::new(ExprKind::PostDecrement(Box::new(left)), op_loc);
            }
            TokenKind::LeftParen => {
                left = parse_call(parser, left)?;
            }
            TokenKind::LeftBracket => {
                // a[i] is *(a + i).
                parser.eat();
                let index = parse_expression(parser, BindingPower::MIN)?;
                parser.expect_punct(TokenKind::RightBracket)?;
                let sum = Expr::new(
                    ExprKind::Binary(BinaryOp::Add, Box::new(left), Box::new(index)),
                    op_loc.clone(),
                );
                left = Expr::new(ExprKind::Deref(Box::new(sum)), op_loc);
            }
            TokenKind::Dot | TokenKind::Arrow => {
                let arrow = kind == TokenKind::Arrow;
                parser.eat();
                let name = parser.expect_name()?;
                left = Expr::new(ExprKind::Member(Box::new(left), name, arrow), op_loc);
            }
            _ => {
                parser.eat();
                let rhs = parse_expression(parser, bp)?;
                left = make_binary(kind, left, rhs, op_loc);
            }
        }
    }
    Ok(left)
}

/// Builds the node for a consumed binary or assignment operator.
/// `>` and `>=` have no node of their own: the operands are swapped and the
/// mirrored comparison is used instead.
fn make_binary(
    kind: TokenKind,
    lhs: Expr,
    rhs: Expr,
    loc: crate::common::SourceLocation,
) -> Expr {
    let kind = match kind {
        TokenKind::Comma => ExprKind::Comma(Box::new(lhs), Box::new(rhs)),
        TokenKind::Equal => ExprKind::Assign(AssignOp::Plain, Box::new(lhs), Box::new(rhs)),
        TokenKind::PlusEqual => ExprKind::Assign(AssignOp::Add, Box::new(lhs), Box::new(rhs)),
        TokenKind::MinusEqual => ExprKind::Assign(AssignOp::Sub, Box::new(lhs), Box::new(rhs)),
        TokenKind::AsteriskEqual => ExprKind::Assign(AssignOp::Mul, Box::new(lhs), Box::new(rhs)),
        TokenKind::SlashEqual => ExprKind::Assign(AssignOp::Div, Box::new(lhs), Box::new(rhs)),
        TokenKind::Plus => ExprKind::Binary(BinaryOp::Add, Box::new(lhs), Box::new(rhs)),
        TokenKind::Minus => ExprKind::Binary(BinaryOp::Sub, Box::new(lhs), Box::new(rhs)),
        TokenKind::Star => ExprKind::Binary(BinaryOp::Mul, Box::new(lhs), Box::new(rhs)),
        TokenKind::Slash => ExprKind::Binary(BinaryOp::Div, Box::new(lhs), Box::new(rhs)),
        TokenKind::Percent => ExprKind::Binary(BinaryOp::Mod, Box::new(lhs), Box::new(rhs)),
        TokenKind::EqualEqual => ExprKind::Binary(BinaryOp::Equal, Box::new(lhs), Box::new(rhs)),
        TokenKind::BangEqual => ExprKind::Binary(BinaryOp::NotEqual, Box::new(lhs), Box::new(rhs)),
        TokenKind::LessThan => ExprKind::Binary(BinaryOp::LessThan, Box::new(lhs), Box::new(rhs)),
        TokenKind::LessThanEqual => {
            ExprKind::Binary(BinaryOp::LessThanOrEqual, Box::new(lhs), Box::new(rhs))
        }
        TokenKind::GreaterThan => {
            ExprKind::Binary(BinaryOp::LessThan, Box::new(rhs), Box::new(lhs))
        }
        TokenKind::GreaterThanEqual => {
            ExprKind::Binary(BinaryOp::LessThanOrEqual, Box::new(rhs), Box::new(lhs))
        }
        TokenKind::AmpersandAmpersand => {
            ExprKind::Binary(BinaryOp::LogicalAnd, Box::new(lhs), Box::new(rhs))
        }
        TokenKind::PipePipe => ExprKind::Binary(BinaryOp::LogicalOr, Box::new(lhs), Box::new(rhs)),
        _ => unreachable!("not a binary operator: {:?}", kind),
    };
    Expr::new(kind, loc)
}

/// Parses `f(args...)` once `f` has been parsed and `(` is current.
fn parse_call(parser: &mut Parser, callee: Expr) -> Result<Expr, ParserError> {
    let token = parser.current_token()?;
    let name = match callee.kind {
        ExprKind::Ident(name) => name,
        _ => return Err(ParserError::UnexpectedToken(token)),
    };
    parser.eat(); // '('
    let mut args = ThinVec::new();
    if !parser.eat_token(&TokenKind::RightParen) {
        loop {
            // Arguments bind above the comma operator.
            args.push(parse_expression(parser, BindingPower::ASSIGNMENT)?);
            if parser.eat_token(&TokenKind::RightParen) {
                break;
            }
            parser.expect_punct(TokenKind::Comma)?;
        }
    }
    Ok(Expr::new(ExprKind::Call(name, args), token.loc))
}

fn parse_prefix(parser: &mut Parser) -> Result<Expr, ParserError> {
    let token = parser.current_token()?;
    let loc = token.loc.clone();
    match token.kind {
        TokenKind::Minus => {
            parser.eat();
            let operand = parse_expression(parser, BindingPower::UNARY)?;
            Ok(Expr::new(ExprKind::Unary(UnaryOp::Neg, Box::new(operand)), loc))
        }
        TokenKind::Bang => {
            parser.eat();
            let operand = parse_expression(parser, BindingPower::UNARY)?;
            Ok(Expr::new(ExprKind::Unary(UnaryOp::Not, Box::new(operand)), loc))
        }
        TokenKind::PlusPlus => {
            parser.eat();
            let operand = parse_expression(parser, BindingPower::UNARY)?;
            Ok(Expr::new(
                ExprKind::Unary(UnaryOp::PreIncrement, Box::new(operand)),
                loc,
            ))
        }
        TokenKind::MinusMinus => {
            parser.eat();
            let operand = parse_expression(parser, BindingPower::UNARY)?;
            Ok(Expr::new(
                ExprKind::Unary(UnaryOp::PreDecrement, Box::new(operand)),
                loc,
            ))
        }
        TokenKind::Ampersand => {
            parser.eat();
            let operand = parse_expression(parser, BindingPower::UNARY)?;
            Ok(Expr::new(ExprKind::AddressOf(Box::new(operand)), loc))
        }
        TokenKind::Star => {
            parser.eat();
            let operand = parse_expression(parser, BindingPower::UNARY)?;
            Ok(Expr::new(ExprKind::Deref(Box::new(operand)), loc))
        }
        TokenKind::Keyword(KeywordKind::Sizeof) => {
            parser.eat();
            parse_sizeof(parser, loc)
        }
        _ => parse_primary(parser),
    }
}

/// `sizeof` takes either a parenthesized type name or an expression operand.
fn parse_sizeof(
    parser: &mut Parser,
    loc: crate::common::SourceLocation,
) -> Result<Expr, ParserError> {
    if parser.current_kind()? == TokenKind::LeftParen && parser.peek_is_type_specifier() {
        parser.eat(); // '('
        let ty = parser.parse_type_name()?;
        parser.expect_punct(TokenKind::RightParen)?;
        return Ok(Expr::new(ExprKind::SizeofType(ty), loc));
    }
    let operand = if parser.eat_token(&TokenKind::LeftParen) {
        let expr = parse_expression(parser, BindingPower::MIN)?;
        parser.expect_punct(TokenKind::RightParen)?;
        expr
    } else {
        parse_expression(parser, BindingPower::UNARY)?
    };
    Ok(Expr::new(ExprKind::SizeofExpr(Box::new(operand)), loc))
}

fn parse_primary(parser: &mut Parser) -> Result<Expr, ParserError> {
    let token = parser.current_token()?;
    let loc = token.loc.clone();
    match token.kind {
        TokenKind::Number(n) => {
            parser.eat();
            Ok(Expr::new(ExprKind::Number(n), loc))
        }
        TokenKind::String(s) => {
            parser.eat();
            let index = parser.intern_string(s);
            Ok(Expr::new(ExprKind::Str(index), loc))
        }
        TokenKind::Identifier(name) => {
            parser.eat();
            Ok(Expr::new(ExprKind::Ident(name), loc))
        }
        TokenKind::LeftParen => {
            parser.eat();
            let expr = parse_expression(parser, BindingPower::MIN)?;
            parser.expect_punct(TokenKind::RightParen)?;
            Ok(expr)
        }
        _ => Err(ParserError::UnexpectedToken(token)),
    }
}
