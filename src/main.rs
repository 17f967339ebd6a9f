use clap::Parser as ClapParser;
use kancil::compiler::{Cli, Compiler};
use std::process::exit;

/// The main entry point for the application.
///
/// Parses command-line arguments and runs the compiler.
fn main() {
    if !run() {
        exit(1);
    }
}

/// Runs the compiler.
///
/// # Returns
///
/// `true` on success, `false` if compilation failed.
fn run() -> bool {
    let cli = Cli::parse();
    let mut compiler = Compiler::new(cli);
    match compiler.run() {
        Ok(()) => true,
        Err(e) => {
            compiler.print_diagnostic(&e.reports);
            false
        }
    }
}
