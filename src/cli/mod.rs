use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub(crate) mod map;
pub(crate) mod report;
pub(crate) mod trace;
pub(crate) mod utils;

#[cfg(test)]
mod tests;

pub use self::{map::MapCommand, report::ReportCommand, trace::TraceCommand};

#[derive(Debug, Clone, Subcommand)]
pub enum CliSubcommand {
    Map(MapCommand),
    Trace(TraceCommand),
    Report(ReportCommand),
}

impl Default for CliSubcommand {
    fn default() -> Self {
        Self::Trace(TraceCommand::default())
    }
}

/// Sourcetrace, maps stack traces from generated code back to original sources
#[derive(Parser, Debug, Default, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    subcommand: Option<CliSubcommand>,
}

impl Cli {
    pub fn run(self) -> Result<ExitCode> {
        match self.subcommand.unwrap_or_default() {
            CliSubcommand::Map(cmd) => cmd.run(),
            CliSubcommand::Trace(cmd) => cmd.run(),
            CliSubcommand::Report(cmd) => cmd.run(),
        }
    }
}
