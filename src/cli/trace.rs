use std::{
    io::{stdout, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;

use sourcetrace::{
    fs::{FileSystem, OsFileSystem},
    rewrite_stack_trace,
};

use super::utils::input::read_input;

/// Rewrite a stack trace so that every frame points at original sources
#[derive(Debug, Default, Clone, Parser)]
pub struct TraceCommand {
    /// File containing the stack trace, reads from stdin if omitted or '-'
    path: Option<String>,
}

impl TraceCommand {
    pub fn run(self) -> Result<ExitCode> {
        let text = read_input(self.path.as_deref())?;
        let mut out = stdout().lock();
        write_rewritten_trace(&OsFileSystem, &text, &mut out)?;
        out.flush().context("Failed to flush stdout")?;
        Ok(ExitCode::SUCCESS)
    }
}

/**
    Writes the given stack trace text with every frame mapped to original sources.

    # Errors

    Errors if writing fails.
*/
pub fn write_rewritten_trace(fs: &dyn FileSystem, text: &str, out: &mut impl Write) -> Result<()> {
    write!(out, "{}", rewrite_stack_trace(fs, text)).context("Failed to write stack trace")
}
