use std::{
    fmt,
    io::{self, Write},
    path::Path,
    process,
    rc::Rc,
};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    fs::FileSystem,
    mapper::{map_source_position, SourceMapCache},
    position::Position,
};

static TOP_FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n    at [^(]+ \((.*):(\d+):(\d+)\)").expect("valid stack frame regex")
});

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("valid line break regex"));

/**
    An error that escaped all other handling, as seen by the uncaught-exception handler.
*/
pub trait ThrownError: fmt::Display {
    /**
        The fully formatted stack trace of the error, if it has one.

        When a trace formatter has been installed, this is expected to
        already be mapped back to original sources.
    */
    fn stack(&self) -> Option<&str>;
}

/**
    Handler called with errors that escaped all other handling.
*/
pub type UncaughtHandler = Box<dyn Fn(Option<&dyn ThrownError>)>;

fn top_frame_position(stack: &str) -> Option<Position> {
    let captures = TOP_FRAME.captures(stack)?;
    let line = captures[2].parse().ok()?;
    let column = captures[3].parse().ok()?;
    Some(Position::new(&captures[1], line, column))
}

fn source_line(fs: &dyn FileSystem, position: &Position) -> Option<String> {
    let path = Path::new(&position.source);
    if !fs.exists(path) {
        return None;
    }
    let contents = match fs.read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            debug!(source = %position.source, error = %e, "failed to read source file");
            return None;
        }
    };
    let index = usize::try_from(position.line.checked_sub(1)?).ok()?;
    LINE_BREAK
        .split(&contents)
        .nth(index)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
}

/**
    Writes a report for an error that escaped all other handling.

    The report starts with the source line that the top frame of the stack points
    at, mapped back to its original source, with a caret under the column:

    ```plaintext

    src/main.ts:5
        return helper();
        ^
    ```

    This is followed by the full stack trace of the error. Only the top frame is
    looked at here, the rest of the stack is written exactly as given.

    Errors without a stack only get a short message.

    # Errors

    Errors if writing to the output fails.
*/
pub fn report_uncaught(
    fs: &dyn FileSystem,
    out: &mut impl Write,
    error: Option<&dyn ThrownError>,
) -> io::Result<()> {
    let stack = error.and_then(|e| e.stack()).filter(|s| !s.is_empty());
    let (Some(error), Some(stack)) = (error, stack) else {
        match error {
            Some(error) => writeln!(out, "Uncaught exception: {error}")?,
            None => writeln!(out, "Uncaught exception: undefined")?,
        }
        return Ok(());
    };

    if let Some(position) = top_frame_position(stack) {
        let mut cache = SourceMapCache::new(fs);
        let position = map_source_position(&mut cache, &position);
        if let Some(line) = source_line(fs, &position) {
            writeln!(out)?;
            writeln!(out, "{}:{}", position.source, position.line)?;
            writeln!(out, "{line}")?;
            // The runtime reports 1-based columns here, the caret
            // never goes past the end of the line it points into
            let column = usize::try_from(position.column.saturating_sub(1)).unwrap_or(usize::MAX);
            let padding = " ".repeat(column.min(line.chars().count()));
            writeln!(out, "{padding}^")?;
        }
    } else {
        debug!(%error, "stack has no frame with a position");
    }

    writeln!(out, "{stack}")
}

/**
    Creates an uncaught-exception handler that reports to stdout and then exits.

    The process always exits with a failure status, after the report has
    been written, no matter if the report could be written or not.
*/
pub fn uncaught_handler(fs: Rc<dyn FileSystem>) -> UncaughtHandler {
    Box::new(move |error: Option<&dyn ThrownError>| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = report_uncaught(&*fs, &mut out, error) {
            debug!(error = %e, "failed to write uncaught exception report");
        }
        if let Err(e) = out.flush() {
            debug!(error = %e, "failed to flush uncaught exception report");
        }
        process::exit(1);
    })
}
