use crate::common::SourceLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Expression is not an lvalue")]
    NotAnLvalue(SourceLocation),
    #[error("Call to '{0}' passes more than six arguments")]
    TooManyArguments(String, SourceLocation),
    #[error("Case label is not a constant")]
    NonConstantCase(SourceLocation),
    #[error("Unknown variable '{0}'")]
    UnknownVariable(String, SourceLocation),
    #[error("Expression reached code generation without a type")]
    UntypedExpression(SourceLocation),
    #[error("Struct and union values cannot be assigned whole")]
    AggregateAssignment(SourceLocation),
    #[error("Global '{0}' has an unsupported initializer")]
    UnsupportedGlobalInit(String),
    #[error("'break' outside of a loop or switch")]
    StrayBreak,
    #[error("'continue' outside of a loop")]
    StrayContinue,
}

impl CodegenError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            CodegenError::NotAnLvalue(loc)
            | CodegenError::NonConstantCase(loc)
            | CodegenError::UntypedExpression(loc)
            | CodegenError::AggregateAssignment(loc)
            | CodegenError::TooManyArguments(_, loc)
            | CodegenError::UnknownVariable(_, loc) => Some(loc),
            CodegenError::UnsupportedGlobalInit(_)
            | CodegenError::StrayBreak
            | CodegenError::StrayContinue => None,
        }
    }
}
