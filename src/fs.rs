//! Filesystem access used by the locator and the parser.
//!
//! Both components only ever need two operations: the entry names of a directory and the
//! text of a file. Keeping them behind [`FileSystem`] lets tests swap in in-memory trees.

use std::{ffi::OsString, fs, io, path::Path};

/// The minimal filesystem surface needed to find and read `.desktop` files.
pub trait FileSystem {
    /// Entry names of `dir`, in the order the filesystem returns them (not sorted).
    fn list_names(&self, dir: &Path) -> io::Result<Vec<OsString>>;

    /// Whole file content as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn list_names(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(dir)?
            .map(|ent| ent.map(|e| e.file_name()))
            .collect()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn list_names(&self, dir: &Path) -> io::Result<Vec<OsString>> {
        (**self).list_names(dir)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}
