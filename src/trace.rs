use std::{fmt, rc::Rc};

use crate::{
    frame::{wrap_call_site, CallSite, StackFrame},
    fs::FileSystem,
    mapper::SourceMapCache,
};

// NOTE: This matches the indentation that V8 uses for its
// own stack traces, tools parsing stacks rely on it
const FRAME_PREFIX: &str = "\n    at ";

/**
    Formats an error and its stack frames, with every frame mapped back to original sources.

    The output has the same shape as a default V8 stack trace:

    ```plaintext
    Error: message
        at innermost (file.ts:1:2)
        at outermost (file.ts:3:4)
    ```

    Source maps are cached for the duration of this call only.
*/
#[must_use]
pub fn prepare_stack_trace(
    fs: &dyn FileSystem,
    error: &dyn fmt::Display,
    frames: &[Rc<dyn CallSite>],
) -> String {
    let mut cache = SourceMapCache::new(fs);
    let mut trace = error.to_string();
    for frame in frames {
        let frame = wrap_call_site(&mut cache, frame);
        trace.push_str(FRAME_PREFIX);
        trace.push_str(&frame.to_string());
    }
    trace
}

/**
    Formats an error and its stack frames as-is, without any source mapping.
*/
#[must_use]
pub fn default_stack_trace(error: &dyn fmt::Display, frames: &[Rc<dyn CallSite>]) -> String {
    let mut trace = error.to_string();
    for frame in frames {
        trace.push_str(FRAME_PREFIX);
        trace.push_str(&frame.to_string());
    }
    trace
}

/**
    Rewrites a stack trace that has already been rendered as text.

    Every line in the format `at <frame>` is parsed, mapped, and rendered back out
    with its original indentation. Frames that do not map anywhere else, and all
    other lines such as the error message, are kept exactly as they were.
    One source map cache is shared by the whole trace.
*/
#[must_use]
pub fn rewrite_stack_trace(fs: &dyn FileSystem, text: &str) -> String {
    let mut cache = SourceMapCache::new(fs);
    text.split_inclusive('\n')
        .map(|line| {
            let content = line.trim_end_matches(['\r', '\n']);
            let ending = &line[content.len()..];
            let indent = &content[..content.len() - content.trim_start().len()];
            match content.parse::<StackFrame>() {
                Ok(frame) => {
                    let frame: Rc<dyn CallSite> = Rc::new(frame);
                    let mapped = wrap_call_site(&mut cache, &frame);
                    if same_location(&*frame, &*mapped) {
                        line.to_string()
                    } else {
                        format!("{indent}at {mapped}{ending}")
                    }
                }
                Err(_) => line.to_string(),
            }
        })
        .collect()
}

fn same_location(frame: &dyn CallSite, mapped: &dyn CallSite) -> bool {
    frame.script_name_or_source_url() == mapped.script_name_or_source_url()
        && frame.line_number() == mapped.line_number()
        && frame.column_number().unwrap_or_default() == mapped.column_number().unwrap_or_default()
        && frame.eval_origin() == mapped.eval_origin()
}
