use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    rc::Rc,
};

use thiserror::Error;
use tracing::{debug, trace};

use crate::fs::FileSystem;

use super::{
    directive::{find_source_mapping_url, resolve_source_mapping_url, SourceMapLocation},
    handle::SourceMapHandle,
};

type CacheEntry = Option<Rc<SourceMapHandle>>;

/**
    Reasons a source map could not be loaded for a generated file.

    These never escape the mapper, a failed load always
    degrades to leaving positions unchanged.
*/
#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("source map '{0}' does not exist")]
    MissingMap(PathBuf),
    #[error("invalid source map data: {0}")]
    InvalidMap(#[from] sourcemap::Error),
}

/**
    Parsed source maps, keyed by the path of the generated file that referenced them.

    Files that turned out not to have a usable source map are also stored,
    as negative entries, so that they are never read or parsed twice.

    A cache is meant to live for a single formatting call and then be dropped,
    which makes sure that files changed on disk are picked up on the next call.
*/
pub struct SourceMapCache<'fs> {
    fs: &'fs dyn FileSystem,
    generated: HashMap<String, CacheEntry>,
    maps: HashMap<PathBuf, CacheEntry>,
}

impl<'fs> SourceMapCache<'fs> {
    /**
        Creates a new, empty, cache reading files from the given filesystem.
    */
    #[must_use]
    pub fn new(fs: &'fs dyn FileSystem) -> Self {
        Self {
            fs,
            generated: HashMap::new(),
            maps: HashMap::new(),
        }
    }

    /**
        Returns the source map for the given generated file, if it has one.

        Loads and parses the map on first use, later calls reuse the result.
    */
    pub fn source_map_for(&mut self, source: &str) -> Option<Rc<SourceMapHandle>> {
        if let Some(entry) = self.generated.get(source) {
            trace!(source, found = entry.is_some(), "source map cache hit");
            return entry.clone();
        }
        let entry = match self.load(Path::new(source)) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(source, error = %e, "no usable source map");
                None
            }
        };
        self.generated.insert(source.to_string(), entry.clone());
        entry
    }

    /**
        Returns the number of generated files that have been looked up so far.
    */
    #[must_use]
    pub fn len(&self) -> usize {
        self.generated.len()
    }

    /**
        Returns `true` if no generated files have been looked up yet.
    */
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }

    fn load(&mut self, generated: &Path) -> Result<CacheEntry, MapLoadError> {
        if !self.fs.exists(generated) {
            return Ok(None);
        }
        let contents = read(self.fs, generated)?;
        let Some(url) = find_source_mapping_url(&contents) else {
            return Ok(None);
        };
        match resolve_source_mapping_url(generated, url) {
            SourceMapLocation::DataUrl(url) => {
                let map = SourceMapHandle::from_data_url(url)?;
                Ok(Some(Rc::new(map)))
            }
            SourceMapLocation::File(path) => {
                if let Some(entry) = self.maps.get(&path) {
                    trace!(path = %path.display(), "source map file cache hit");
                    return Ok(entry.clone());
                }
                let result = self.load_map_file(&path);
                self.maps
                    .insert(path, result.as_ref().ok().and_then(Clone::clone));
                result
            }
        }
    }

    fn load_map_file(&self, path: &Path) -> Result<CacheEntry, MapLoadError> {
        if !self.fs.exists(path) {
            return Err(MapLoadError::MissingMap(path.to_path_buf()));
        }
        let data = read(self.fs, path)?;
        let map = SourceMapHandle::from_slice(data.as_bytes())?;
        debug!(path = %path.display(), "parsed source map");
        Ok(Some(Rc::new(map)))
    }
}

fn read(fs: &dyn FileSystem, path: &Path) -> Result<String, MapLoadError> {
    fs.read_to_string(path).map_err(|source| MapLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
