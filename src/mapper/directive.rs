use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use path_clean::PathClean;
use regex::Regex;

static SOURCE_MAPPING_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)//[@#]\s*sourceMappingURL=(.*)\s*$").expect("valid source mapping url regex")
});

/**
    Where the source map for a generated file can be found.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMapLocation<'a> {
    /// The map is embedded in the directive itself.
    DataUrl(&'a str),
    /// The map lives in a separate file.
    File(PathBuf),
}

/**
    Finds the `sourceMappingURL` directive in the contents of a generated file.

    When the directive shows up more than once, the last one wins, which
    is the one appended by the tool that generated the file.
*/
pub fn find_source_mapping_url(contents: &str) -> Option<&str> {
    SOURCE_MAPPING_URL
        .captures_iter(contents)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|url| url.as_str().trim())
        .filter(|url| !url.is_empty())
}

/**
    Resolves a source mapping url relative to the generated file that referenced it.
*/
pub fn resolve_source_mapping_url<'a>(generated: &Path, url: &'a str) -> SourceMapLocation<'a> {
    if url.starts_with("data:") {
        return SourceMapLocation::DataUrl(url);
    }
    let url = Path::new(url);
    if url.is_absolute() {
        return SourceMapLocation::File(url.clean());
    }
    let dir = generated.parent().unwrap_or_else(|| Path::new(""));
    SourceMapLocation::File(dir.join(url).clean())
}
