use crate::codegen;
use crate::error::{self, Error, Report};
use crate::lexer::{Token, TokenKind};
use crate::logger::Logger;
use crate::parser::Parser;
use crate::preprocessor::Preprocessor;
use crate::semantic;
use clap::Parser as ClapParser;
use std::fs;
use std::io::Read;

/// Command-line arguments for the compiler.
#[derive(ClapParser, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The input C file, or '-' for stdin
    #[arg()]
    pub input_file: String,

    /// Output file
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Preprocess only
    #[arg(short = 'E')]
    pub preprocess_only: bool,

    /// Define a macro, as NAME or NAME=VALUE
    #[arg(short = 'D', long)]
    pub define: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub struct Compiler {
    cli: Cli,
    logger: Logger,
}

#[derive(Debug)]
pub struct CompilerError {
    pub reports: Vec<Report>,
}

impl CompilerError {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }
}

impl From<Error> for CompilerError {
    fn from(error: Error) -> Self {
        CompilerError::new(vec![Report::from(&error)])
    }
}

impl Compiler {
    pub fn new(cli: Cli) -> Self {
        let logger = Logger::new(cli.verbose);
        Self { cli, logger }
    }

    pub fn print_diagnostic(&self, reports: &[Report]) {
        for r in reports {
            error::report(r);
        }
    }

    /// Drives a compilation from the command-line arguments.
    pub fn run(&mut self) -> Result<(), CompilerError> {
        let (source, file_name) = if self.cli.input_file == "-" {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(Error::from)?;
            (buffer, "<stdin>".to_string())
        } else {
            let source = fs::read_to_string(&self.cli.input_file).map_err(Error::from)?;
            (source, self.cli.input_file.clone())
        };

        self.compile(&source, &file_name)
    }

    /// Compiles `source` as if it had been read from `file_name`.
    pub fn compile(&mut self, source: &str, file_name: &str) -> Result<(), CompilerError> {
        let mut preprocessor = Preprocessor::default();
        for def in &self.cli.define {
            preprocessor.define(def).map_err(Error::from)?;
        }
        let tokens = preprocessor
            .preprocess(source, file_name)
            .map_err(Error::from)?;
        self.logger
            .stage("preprocess", &format!("{} tokens", tokens.len()));

        if self.cli.preprocess_only {
            let output = format_tokens(&tokens);
            return self.write_output(&output);
        }

        let mut program = Parser::new(tokens).parse().map_err(Error::from)?;
        self.logger.stage(
            "parse",
            &format!(
                "{} functions, {} globals",
                program.functions.len(),
                program.globals.len()
            ),
        );

        semantic::check_program(&mut program).map_err(Error::from)?;
        self.logger.stage("typecheck", "passed");

        let asm = codegen::generate(&program).map_err(Error::from)?;
        self.logger
            .stage("codegen", &format!("{} lines", asm.lines().count()));
        self.write_output(&asm)
    }

    fn write_output(&self, content: &str) -> Result<(), CompilerError> {
        match &self.cli.output_file {
            Some(path) => {
                fs::write(path, content).map_err(Error::from)?;
                Ok(())
            }
            None => {
                print!("{}", content);
                Ok(())
            }
        }
    }
}

/// Renders a token stream back to text for `-E`, one source line per output
/// line with single spaces between tokens.
fn format_tokens(tokens: &[Token]) -> String {
    let mut result = String::new();
    let mut line = 0;
    let mut first = true;
    for token in tokens {
        if token.kind == TokenKind::Eof {
            break;
        }
        if token.loc.line != line {
            if !first {
                result.push('\n');
            }
            line = token.loc.line;
        } else if !first {
            result.push(' ');
        }
        result.push_str(&token.kind.to_string());
        first = false;
    }
    if !first {
        result.push('\n');
    }
    result
}
