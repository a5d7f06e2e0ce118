use std::{
    cell::Cell,
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use path_clean::PathClean;

/**
    Blocking filesystem access used when looking up source maps and source lines.

    All paths given to a filesystem are used as-is, relative paths
    are resolved by the implementation (usually against the current
    working directory of the process).
*/
pub trait FileSystem {
    /**
        Returns `true` if a file exists at the given path.
    */
    fn exists(&self, path: &Path) -> bool;

    /**
        Reads the file at the given path as UTF-8 text.

        # Errors

        Errors if the file could not be read, or is not valid UTF-8.
    */
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/**
    The real filesystem, backed by [`std::fs`].
*/
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/**
    An in-memory filesystem.

    Keeps track of how many reads it has served, which makes
    it useful for checking that source maps are cached properly.
*/
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, String>,
    reads: Cell<usize>,
}

impl MemoryFileSystem {
    /**
        Creates a new, empty, in-memory filesystem.
    */
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Adds a file to the filesystem, replacing any existing file at the same path.
    */
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /**
        Adds a file to the filesystem, replacing any existing file at the same path.
    */
    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files.insert(path.as_ref().clean(), contents.into());
    }

    /**
        Returns the total number of successful reads served so far.
    */
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&path.clean())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let contents = self.files.get(&path.clean()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })?;
        self.reads.set(self.reads.get() + 1);
        Ok(contents.clone())
    }
}
