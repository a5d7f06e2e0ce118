use std::str::FromStr;

use thiserror::Error;

use super::CallSite;

fn parse_numbers(s: &str) -> (&str, Option<u32>, Option<u32>) {
    // Try "file:line:column" first, then "file:line", splitting from the
    // right since file names may contain colons themselves (urls, drives)
    let mut parts = s.rsplitn(3, ':');
    if let (Some(column), Some(line), Some(file)) = (parts.next(), parts.next(), parts.next()) {
        if let (Ok(line), Ok(column)) = (line.parse(), column.parse()) {
            return (file, Some(line), Some(column));
        }
    }
    if let Some((file, line)) = s.rsplit_once(':') {
        if let Ok(line) = line.parse() {
            return (file, Some(line), None);
        }
    }
    (s, None, None)
}

fn parse_location(frame: &mut StackFrame, s: &str) {
    if s == "native" {
        frame.native = true;
        return;
    }

    // Eval frames look like "eval at f (file:1:2), <anonymous>:3:4"
    let s = match s.rsplit_once(", ") {
        Some((origin, rest)) if origin.starts_with("eval at ") => {
            frame.eval_origin = Some(origin.to_string());
            rest
        }
        _ => s,
    };

    let (file, line, column) = parse_numbers(s);
    if !file.is_empty() && file != "<anonymous>" {
        frame.file_name = Some(file.to_string());
    }
    frame.line_number = line;
    frame.column_number = column;
}

fn parse_function_name(frame: &mut StackFrame, s: &str) {
    if let Some(name) = s.strip_prefix("new ") {
        frame.constructor = true;
        frame.function_name = Some(name.to_string());
    } else {
        frame.function_name = Some(s.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFrameError {
    #[error("stack frame line is missing the 'at' prefix")]
    MissingPrefix,
    #[error("stack frame line is empty")]
    Empty,
}

/**
    A plain stack frame, holding all of its information as owned data.

    Can be built using the `with_*` methods, or parsed from a single line
    of a stack trace in the format that V8 uses when rendering stacks:

    ```plaintext
    at functionName (file.js:1:2)
    at file.js:1:2
    at new Constructor (file.js:1:2)
    at eval (eval at functionName (file.js:1:2), <anonymous>:3:4)
    at functionName (native)
    ```
*/
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StackFrame {
    file_name: Option<String>,
    source_url: Option<String>,
    line_number: Option<u32>,
    column_number: Option<u32>,
    eval_origin: Option<String>,
    function_name: Option<String>,
    type_name: Option<String>,
    method_name: Option<String>,
    method_call: bool,
    native: bool,
    constructor: bool,
}

impl StackFrame {
    /**
        Creates a new, empty, stack frame.

        An empty frame has no location information at all and renders as `<anonymous>`.
    */
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /**
        Sets the url given by a `//# sourceURL=` comment, used by code passed
        to `eval` and preferred over the file name when locating the frame.
    */
    #[must_use]
    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    #[must_use]
    pub fn with_position(mut self, line_number: u32, column_number: u32) -> Self {
        self.line_number = Some(line_number);
        self.column_number = Some(column_number);
        self
    }

    #[must_use]
    pub fn with_eval_origin(mut self, eval_origin: impl Into<String>) -> Self {
        self.eval_origin = Some(eval_origin.into());
        self
    }

    #[must_use]
    pub fn with_function_name(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = Some(function_name.into());
        self
    }

    /**
        Marks the frame as a method call on a value of the given type.
    */
    #[must_use]
    pub fn with_method(mut self, type_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self.method_name = Some(method_name.into());
        self.method_call = true;
        self
    }

    #[must_use]
    pub fn with_native(mut self, native: bool) -> Self {
        self.native = native;
        self
    }

    #[must_use]
    pub fn with_constructor(mut self, constructor: bool) -> Self {
        self.constructor = constructor;
        self
    }
}

impl CallSite for StackFrame {
    fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn line_number(&self) -> Option<u32> {
        self.line_number
    }

    fn column_number(&self) -> Option<u32> {
        self.column_number
    }

    fn eval_origin(&self) -> Option<&str> {
        self.eval_origin.as_deref()
    }

    fn script_name_or_source_url(&self) -> Option<&str> {
        self.source_url.as_deref().or(self.file_name.as_deref())
    }

    fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    fn method_name(&self) -> Option<&str> {
        self.method_name.as_deref()
    }

    fn is_toplevel(&self) -> bool {
        !self.method_call
    }

    fn is_native(&self) -> bool {
        self.native
    }

    fn is_constructor(&self) -> bool {
        self.constructor
    }
}

impl FromStr for StackFrame {
    type Err = ParseFrameError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseFrameError::Empty);
        }
        let body = s.strip_prefix("at ").ok_or(ParseFrameError::MissingPrefix)?;

        // NOTE: Method calls, aliases and async markers are all kept in the
        // function name as-is, since that renders back to the same text
        let mut frame = StackFrame::new();
        match body.strip_suffix(')').and_then(|b| b.split_once(" (")) {
            Some((function_name, location)) => {
                parse_function_name(&mut frame, function_name);
                parse_location(&mut frame, location);
            }
            None => parse_location(&mut frame, body),
        }
        Ok(frame)
    }
}
