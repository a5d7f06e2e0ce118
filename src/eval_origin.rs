use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    mapper::{map_source_position, SourceMapCache},
    position::Position,
};

// Eval origins nest once per level of eval, anything deeper
// than this is not something a real runtime will produce
const MAX_EVAL_DEPTH: usize = 100;

static EVAL_AT_POSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^eval at ([^(]+) \((.+):(\d+):(\d+)\)$").expect("valid eval origin regex")
});

static EVAL_AT_ORIGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^eval at ([^(]+) \((.+)\)$").expect("valid nested eval origin regex"));

/**
    Maps any position contained in an eval origin back to its original position.

    Eval origins are attached by the runtime to frames running code passed to `eval`,
    and come in one of two forms, with the second one nesting arbitrarily deep:

    ```plaintext
    eval at <label> (<file>:<line>:<column>)
    eval at <label> (<eval origin>)
    ```

    Labels are kept as-is. Anything that does not match either form is returned unchanged.
*/
#[must_use]
pub fn map_eval_origin(cache: &mut SourceMapCache<'_>, origin: &str) -> String {
    map_eval_origin_at_depth(cache, origin, 0)
}

fn map_eval_origin_at_depth(cache: &mut SourceMapCache<'_>, origin: &str, depth: usize) -> String {
    if depth >= MAX_EVAL_DEPTH {
        return origin.to_string();
    }

    if let Some(captures) = EVAL_AT_POSITION.captures(origin) {
        let line = captures[3].parse::<u32>().ok();
        let column = captures[4].parse::<u32>().ok();
        if let (Some(line), Some(column)) = (line, column) {
            let position = map_source_position(cache, &Position::new(&captures[2], line, column));
            return format!("eval at {} ({position})", &captures[1]);
        }
    }

    if let Some(captures) = EVAL_AT_ORIGIN.captures(origin) {
        let inner = map_eval_origin_at_depth(cache, &captures[2], depth + 1);
        return format!("eval at {} ({inner})", &captures[1]);
    }

    origin.to_string()
}
