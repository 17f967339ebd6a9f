use crate::codegen::error::CodegenError;
use crate::common::SourceLocation;
use crate::lexer::LexerError;
use crate::parser::error::ParserError;
use crate::preprocessor::error::PreprocessorError;
use crate::semantic::error::TypeError;

use thiserror::Error;

/// Any error a compilation can stop on, tagged by the stage it came from.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Lexer(#[from] LexerError),
    #[error("{0}")]
    Preprocessor(#[from] PreprocessorError),
    #[error("{0}")]
    Parser(#[from] ParserError),
    #[error("{0}")]
    Type(#[from] TypeError),
    #[error("{0}")]
    Codegen(#[from] CodegenError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Error::Lexer(e) => Some(e.location()),
            Error::Preprocessor(e) => e.location(),
            Error::Parser(e) => e.location(),
            Error::Type(e) => e.location(),
            Error::Codegen(e) => e.location(),
            Error::Io(_) => None,
        }
    }
}

/// A user-facing diagnostic.
#[derive(Debug, Clone)]
pub struct Report {
    msg: String,
    loc: Option<SourceLocation>,
}

impl Report {
    pub fn new(msg: String, loc: Option<SourceLocation>) -> Self {
        Self { msg, loc }
    }
}

impl From<&Error> for Report {
    fn from(error: &Error) -> Self {
        Report::new(error.to_string(), error.location().cloned())
    }
}

pub fn report(report: &Report) {
    eprintln!("\x1b[31mError\x1b[0m: {}", report.msg);
    if let Some(loc) = &report.loc {
        eprintln!(" --> {}", loc);
    }
}
