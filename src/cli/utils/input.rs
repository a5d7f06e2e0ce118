use std::{
    fs::read_to_string,
    io::{stdin, Read},
};

use anyhow::{Context, Result};

/**
    Reads text from the file at the given path.

    Reading from stdin is marked by passing no path,
    or a single "-" (dash) as the path, to the cli.
*/
pub fn read_input(path: Option<&str>) -> Result<String> {
    read_input_from(path, &mut stdin())
}

/**
    Same as [`read_input`], but reading from the given
    reader instead of stdin when no path is given.
*/
pub fn read_input_from(path: Option<&str>, reader: &mut impl Read) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut contents = String::new();
            reader
                .read_to_string(&mut contents)
                .context("Failed to read stack trace from stdin")?;
            Ok(contents)
        }
        Some(path) => read_to_string(path)
            .with_context(|| format!("Failed to read stack trace from '{path}'")),
    }
}
