use std::{
    io::{stdout, Write},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;

use sourcetrace::{
    fs::{FileSystem, OsFileSystem},
    map_source_position, Position, SourceMapCache,
};

/// Map positions in generated files back to original sources
#[derive(Debug, Clone, Parser)]
pub struct MapCommand {
    /// Positions to map, in the format 'file:line:column'
    #[clap(required = true)]
    positions: Vec<String>,
    /// Print mapped positions as json, one object per line
    #[clap(long)]
    json: bool,
}

impl MapCommand {
    pub fn run(self) -> Result<ExitCode> {
        let mut out = stdout().lock();
        write_mapped_positions(&OsFileSystem, &self.positions, self.json, &mut out)?;
        out.flush().context("Failed to flush stdout")?;
        Ok(ExitCode::SUCCESS)
    }
}

/**
    Maps each of the given `file:line:column` positions and writes
    them out, one per line, sharing a single source map cache.

    # Errors

    Errors if any position is malformed, or if writing fails.
*/
pub fn write_mapped_positions(
    fs: &dyn FileSystem,
    positions: &[String],
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut cache = SourceMapCache::new(fs);
    for position in positions {
        let generated = position
            .parse::<Position>()
            .with_context(|| format!("Invalid position '{position}'"))?;
        let original = map_source_position(&mut cache, &generated);
        if json {
            writeln!(out, "{}", serde_json::to_string(&original)?)?;
        } else {
            writeln!(out, "{original}")?;
        }
    }
    Ok(())
}
