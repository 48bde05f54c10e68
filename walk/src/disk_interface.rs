use std::{
    fs,
    io::Result,
    path::{Path, PathBuf},
};

/// What a path turned out to be when it was looked at. Symlinks are reported as such and never
/// followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Regular,
    Symlink,
    Other,
}

pub trait FileSystem {
    fn classify(&self, path: &Path) -> Result<EntryKind>;
    /// Immediate children of `path`, joined onto it.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn classify(&self, path: &Path) -> Result<EntryKind> {
        let file_type = fs::symlink_metadata(path)?.file_type();
        Ok(if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::Regular
        } else {
            EntryKind::Other
        })
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to).map(|_| ())
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn classify(&self, path: &Path) -> Result<EntryKind> {
        (**self).classify(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        (**self).read_dir(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        (**self).remove_file(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        (**self).copy(from, to)
    }
}
