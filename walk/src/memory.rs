use std::{
    cell::RefCell,
    collections::BTreeMap,
    io::{Error, ErrorKind, Result},
    path::{Path, PathBuf},
};

use crate::disk_interface::{EntryKind, FileSystem};

/// A tree that only exists in memory. Children are listed in sorted order, which makes traversal
/// order predictable in tests.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    entries: RefCell<BTreeMap<PathBuf, EntryKind>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `path` and any missing parent directories.
    pub fn with_entry<P: AsRef<Path>>(self, path: P, kind: EntryKind) -> Self {
        {
            let mut entries = self.entries.borrow_mut();
            let path = path.as_ref();
            for parent in path.ancestors().skip(1) {
                if parent.as_os_str().is_empty() {
                    break;
                }
                entries
                    .entry(parent.to_path_buf())
                    .or_insert(EntryKind::Directory);
            }
            entries.insert(path.to_path_buf(), kind);
        }
        self
    }

    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.with_entry(path, EntryKind::Regular)
    }

    pub fn with_dir<P: AsRef<Path>>(self, path: P) -> Self {
        self.with_entry(path, EntryKind::Directory)
    }

    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries.borrow().contains_key(path.as_ref())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.borrow().keys().cloned().collect()
    }
}

fn not_found(path: &Path) -> Error {
    Error::new(
        ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

impl FileSystem for MemoryFileSystem {
    fn classify(&self, path: &Path) -> Result<EntryKind> {
        self.entries
            .borrow()
            .get(path)
            .copied()
            .ok_or_else(|| not_found(path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.classify(path)? {
            EntryKind::Directory => Ok(self
                .entries
                .borrow()
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            _ => Err(Error::new(
                ErrorKind::Other,
                format!("{} is not a directory", path.display()),
            )),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        match entries.get(path).copied() {
            None => Err(not_found(path)),
            Some(EntryKind::Directory) => Err(Error::new(
                ErrorKind::Other,
                format!("{} is a directory", path.display()),
            )),
            Some(_) => {
                entries.remove(path);
                Ok(())
            }
        }
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        if self.classify(from)? != EntryKind::Regular {
            return Err(Error::new(
                ErrorKind::Other,
                format!("{} is not a file", from.display()),
            ));
        }
        match to.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !self.exists(dir) => Err(not_found(dir)),
            _ => {
                self.entries
                    .borrow_mut()
                    .insert(to.to_path_buf(), EntryKind::Regular);
                Ok(())
            }
        }
    }
}
