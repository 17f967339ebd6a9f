use crate::common::SourceLocation;
use crate::lexer::LexerError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PreprocessorError {
    #[error("{0}")]
    Lexer(#[from] LexerError),
    #[error("Expected a name and a replacement token after #define")]
    MalformedDefine(SourceLocation),
    #[error("Expected a file name after #include")]
    ExpectedFileName(SourceLocation),
    #[error("Cannot include '{0}': {1}")]
    Include(String, String),
    #[error("Conditional directives only support the __STDC__ name, got '{0}'")]
    UnsupportedCondition(String, SourceLocation),
    #[error("Unknown directive '#{0}'")]
    UnknownDirective(String, SourceLocation),
    #[error("Expected a directive name after '#'")]
    MissingDirective(SourceLocation),
    #[error("Missing #endif")]
    MissingEndif(SourceLocation),
    #[error("Malformed -D definition '{0}'")]
    MalformedCliDefine(String),
}

impl PreprocessorError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            PreprocessorError::Lexer(err) => Some(err.location()),
            PreprocessorError::MalformedDefine(loc)
            | PreprocessorError::ExpectedFileName(loc)
            | PreprocessorError::UnsupportedCondition(_, loc)
            | PreprocessorError::UnknownDirective(_, loc)
            | PreprocessorError::MissingDirective(loc)
            | PreprocessorError::MissingEndif(loc) => Some(loc),
            PreprocessorError::Include(..) | PreprocessorError::MalformedCliDefine(_) => None,
        }
    }
}
