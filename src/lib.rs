//! A small C compiler that emits x86-64 assembly.

/// Contains the code generator.
pub mod codegen;
/// Contains common data structures and types.
pub mod common;
/// Contains the compiler driver.
pub mod compiler;
/// Contains the error types for the application.
pub mod error;
/// Contains the lexer.
pub mod lexer;
/// Contains the logger.
pub mod logger;
pub mod parser;
/// Contains the preprocessor.
pub mod preprocessor;
/// Contains the type checker.
pub mod semantic;

pub mod types;
