use std::fmt;

use sourcemap::DecodedMap;

use crate::position::Position;

/**
    A parsed source map, ready for position lookups.

    This is a thin wrapper around a [`DecodedMap`] from the [`sourcemap`] crate,
    which does all of the actual decoding, indexed maps included.
*/
pub struct SourceMapHandle {
    map: DecodedMap,
}

impl SourceMapHandle {
    /**
        Parses serialized source map data.

        # Errors

        Errors if the data is not a valid source map.
    */
    pub fn from_slice(data: &[u8]) -> Result<Self, sourcemap::Error> {
        sourcemap::decode_slice(data).map(|map| Self { map })
    }

    /**
        Parses a source map embedded as a `data:` url.

        # Errors

        Errors if the url is not a base64 encoded json data url,
        or if the embedded data is not a valid source map.
    */
    pub fn from_data_url(url: &str) -> Result<Self, sourcemap::Error> {
        sourcemap::decode_data_url(url).map(|map| Self { map })
    }

    /**
        Resolves a generated position to its original position.

        Returns `None` if the map has no mapping on the generated line at or
        before the generated column, or if the closest mapping has no source.
    */
    #[must_use]
    pub fn original_position_for(&self, generated: &Position) -> Option<Position> {
        let line = generated.line.checked_sub(1)?;
        let token = self.map.lookup_token(line, generated.column)?;
        // Lookups fall back to the closest preceding token, which
        // may live on an earlier line, and that is not a match
        if token.get_dst_line() != line {
            return None;
        }
        let source = token.get_source()?;
        Some(Position::new(
            source,
            token.get_src_line() + 1,
            token.get_src_col(),
        ))
    }
}

impl fmt::Debug for SourceMapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceMapHandle").finish_non_exhaustive()
    }
}
