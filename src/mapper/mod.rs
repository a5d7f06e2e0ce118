mod cache;
mod directive;
mod handle;

#[cfg(test)]
mod tests;

pub use self::cache::{MapLoadError, SourceMapCache};
pub use self::directive::{find_source_mapping_url, resolve_source_mapping_url, SourceMapLocation};
pub use self::handle::SourceMapHandle;

use crate::position::Position;

/**
    Maps a position in a generated file back to its original position.

    The source map for the generated file is looked up through the given cache,
    loading and parsing it on first use. If there is no usable source map, or the
    map has no mapping for the position, the position is returned unchanged.
*/
#[must_use]
pub fn map_source_position(cache: &mut SourceMapCache<'_>, position: &Position) -> Position {
    cache
        .source_map_for(&position.source)
        .and_then(|map| map.original_position_for(position))
        .unwrap_or_else(|| position.clone())
}
