use crate::common::SourceLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypeError {
    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String, SourceLocation),
    #[error("Expected a pointer operand")]
    ExpectedPointer(SourceLocation),
    #[error("Expected an integer operand")]
    ExpectedInteger(SourceLocation),
    #[error("Incompatible types in assignment")]
    IncompatibleAssignment(SourceLocation),
    #[error("Invalid operand types for this operator")]
    InvalidOperands(SourceLocation),
    #[error("No member named '{0}'")]
    InvalidMemberAccess(String, SourceLocation),
    #[error("Initializer list requires an array, but '{0}' is not one")]
    ExpectedArray(String),
    #[error("Too many initializers")]
    TooManyInitializers(SourceLocation),
}

impl TypeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            TypeError::UndefinedVariable(_, loc)
            | TypeError::ExpectedPointer(loc)
            | TypeError::ExpectedInteger(loc)
            | TypeError::IncompatibleAssignment(loc)
            | TypeError::InvalidOperands(loc)
            | TypeError::InvalidMemberAccess(_, loc)
            | TypeError::TooManyInitializers(loc) => Some(loc),
            TypeError::ExpectedArray(_) => None,
        }
    }
}
