//! Shared helpers that drive the whole pipeline in process.

#![allow(dead_code)]

use kancil::codegen;
use kancil::error::Error;
use kancil::parser::Parser;
use kancil::preprocessor::Preprocessor;
use kancil::semantic;

/// Compiles a source snippet all the way to assembly text.
pub fn compile(input: &str, filename: &str) -> Result<String, Error> {
    let mut preprocessor = Preprocessor::default();
    let tokens = preprocessor.preprocess(input, filename)?;
    let mut program = Parser::new(tokens).parse()?;
    semantic::check_program(&mut program)?;
    Ok(codegen::generate(&program)?)
}

/// Like `compile`, but panics on failure.
pub fn assemble(input: &str) -> String {
    match compile(input, "test.c") {
        Ok(asm) => asm,
        Err(err) => panic!("compilation failed: {}", err),
    }
}

/// Counts non-overlapping occurrences of `needle` in the assembly.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
