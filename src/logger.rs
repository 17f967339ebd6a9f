//! Verbose progress reporting for the compilation pipeline.

/// Prints one line per completed pipeline stage to stderr when
/// `--verbose` is set.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    verbose: bool,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Reports the outcome of one pipeline stage.
    pub fn stage(&self, stage: &str, detail: &str) {
        if self.verbose {
            eprintln!("{}", stage_line(stage, detail));
        }
    }
}

fn stage_line(stage: &str, detail: &str) -> String {
    format!("[VERBOSE] {}: {}", stage, detail)
}
