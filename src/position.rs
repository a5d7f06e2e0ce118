use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/**
    A position inside of a source file.

    Lines are 1-based and columns are 0-based. The same shape is used both for
    positions reported by a runtime in generated code, and for positions that
    have been resolved back to original sources through a source map.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub source: String,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /**
        Creates a new position.
    */
    pub fn new(source: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePositionError {
    #[error("expected a position in the format 'source:line:column', got '{0}'")]
    InvalidFormat(String),
    #[error("invalid line number '{0}'")]
    InvalidLine(String),
    #[error("invalid column number '{0}'")]
    InvalidColumn(String),
}

impl FromStr for Position {
    type Err = ParsePositionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Split from the right, sources may contain colons (urls, windows drive letters)
        let mut parts = s.trim().rsplitn(3, ':');
        let (Some(column), Some(line), Some(source)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParsePositionError::InvalidFormat(s.to_string()));
        };
        if source.is_empty() {
            return Err(ParsePositionError::InvalidFormat(s.to_string()));
        }
        let line = line
            .parse()
            .map_err(|_| ParsePositionError::InvalidLine(line.to_string()))?;
        let column = column
            .parse()
            .map_err(|_| ParsePositionError::InvalidColumn(column.to_string()))?;
        Ok(Self::new(source, line, column))
    }
}
