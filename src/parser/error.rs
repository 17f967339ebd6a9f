use crate::common::SourceLocation;
use crate::lexer::Token;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Unexpected token '{0}'")]
    UnexpectedToken(Token),
    #[error("Unexpected end of input")]
    UnexpectedEof,
    #[error("Expected a constant expression, got '{0}'")]
    ExpectedConstant(Token),
    #[error("Unknown type name '{0}'")]
    UnknownTypeName(Token),
    #[error("Unknown tag '{0}'")]
    UnknownTag(Token),
    #[error("Function '{0}' has more than six parameters")]
    TooManyParameters(String, SourceLocation),
}

impl ParserError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            ParserError::UnexpectedToken(token)
            | ParserError::ExpectedConstant(token)
            | ParserError::UnknownTypeName(token)
            | ParserError::UnknownTag(token) => Some(&token.loc),
            ParserError::TooManyParameters(_, loc) => Some(loc),
            ParserError::UnexpectedEof => None,
        }
    }
}
