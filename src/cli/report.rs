use std::{
    fmt,
    io::{stdout, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;

use sourcetrace::{
    fs::{FileSystem, OsFileSystem},
    report_uncaught, rewrite_stack_trace, ThrownError,
};

use super::utils::input::read_input;

struct TextError {
    message: String,
    stack: String,
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ThrownError for TextError {
    fn stack(&self) -> Option<&str> {
        Some(&self.stack)
    }
}

/// Report a stack trace as an uncaught exception, showing the original source line
#[derive(Debug, Clone, Parser)]
pub struct ReportCommand {
    /// File containing the stack trace, reads from stdin if omitted or '-'
    path: Option<String>,
}

impl ReportCommand {
    pub fn run(self) -> Result<ExitCode> {
        let text = read_input(self.path.as_deref())?;
        let mut out = stdout().lock();
        let code = write_report(&OsFileSystem, &text, &mut out)?;
        out.flush().context("Failed to flush stdout")?;
        Ok(code)
    }
}

/**
    Writes an uncaught exception report for the given stack trace text.

    The trace is first mapped as a whole, the same way an installed trace
    formatter would have done it, and then handed to the uncaught reporter.
    The first line of the trace is used as the error message.

    Returns the exit code to use, which is always a failure, since
    reporting an uncaught exception means that something went wrong.

    # Errors

    Errors if writing the report fails.
*/
pub fn write_report(fs: &dyn FileSystem, text: &str, out: &mut impl Write) -> Result<ExitCode> {
    let stack = rewrite_stack_trace(fs, text.trim_end());
    let message = stack.lines().next().unwrap_or_default().to_string();
    let error = TextError { message, stack };

    report_uncaught(fs, out, Some(&error)).context("Failed to write report")?;

    Ok(ExitCode::FAILURE)
}
