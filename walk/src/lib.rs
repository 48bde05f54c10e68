/*
 * Copyright 2020 Nikhil Marathe <nsm.nikhil@gmail.com>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Depth-first directory visitor.
//!
//! The visitor classifies every entry it reaches, recurses into directories and hands matching
//! entries to a callback. A directory's children are always finished before the directory itself
//! is offered to the callback, so a callback that deletes things can empty a directory and then
//! remove it. The path the walk starts from is never offered to the callback.

use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, error, warn};

use nob_metrics::timed;

mod disk_interface;
pub use disk_interface::{EntryKind, FileSystem, SystemFileSystem};

#[cfg(any(test, feature = "testing"))]
mod memory;
#[cfg(any(test, feature = "testing"))]
pub use memory::MemoryFileSystem;

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("could not inspect {}", .path.display())]
    Classify {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not list {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported type of file {}", .path.display())]
    Unsupported { path: PathBuf },
    #[error("callback failed on {}", .path.display())]
    Callback {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Walks `path`, calling `callback` on every regular file for which `predicate` returns `wanted`.
/// With `include_dirs`, directories below `path` are offered the same way once everything inside
/// them has been visited.
///
/// Symlinks are skipped with a warning. Anything that is neither a file, a directory nor a
/// symlink stops the walk, as does the first failing callback. Callbacks that already ran are not
/// undone.
pub fn visit<F, P, C>(
    fs: &F,
    path: &Path,
    predicate: P,
    mut callback: C,
    wanted: bool,
    include_dirs: bool,
) -> Result<(), WalkError>
where
    F: FileSystem + ?Sized,
    P: Fn(&Path) -> bool,
    C: FnMut(&Path) -> io::Result<()>,
{
    timed!("walk");
    let mut walker = Walker {
        fs,
        predicate,
        callback: &mut callback,
        wanted,
        include_dirs,
    };
    walker.visit_entry(path).map(|_| ())
}

/// [`visit`] restricted to paths ending in `suffix`.
pub fn visit_suffix<F, C>(
    fs: &F,
    path: &Path,
    suffix: &str,
    callback: C,
    include_dirs: bool,
) -> Result<(), WalkError>
where
    F: FileSystem + ?Sized,
    C: FnMut(&Path) -> io::Result<()>,
{
    visit(
        fs,
        path,
        |p| ends_with(p, suffix),
        callback,
        true,
        include_dirs,
    )
}

#[cfg(unix)]
fn ends_with(path: &Path, suffix: &str) -> bool {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().ends_with(suffix.as_bytes())
}

#[cfg(not(unix))]
fn ends_with(path: &Path, suffix: &str) -> bool {
    path.to_str().map_or(false, |p| p.ends_with(suffix))
}

/// [`visit`] with every entry matching.
pub fn visit_all<F, C>(fs: &F, path: &Path, callback: C, include_dirs: bool) -> Result<(), WalkError>
where
    F: FileSystem + ?Sized,
    C: FnMut(&Path) -> io::Result<()>,
{
    visit(fs, path, |_| true, callback, true, include_dirs)
}

struct Walker<'a, F: ?Sized, P, C> {
    fs: &'a F,
    predicate: P,
    callback: &'a mut C,
    wanted: bool,
    include_dirs: bool,
}

impl<'a, F, P, C> Walker<'a, F, P, C>
where
    F: FileSystem + ?Sized,
    P: Fn(&Path) -> bool,
    C: FnMut(&Path) -> io::Result<()>,
{
    fn matches(&self, path: &Path) -> bool {
        (self.predicate)(path) == self.wanted
    }

    fn call(&mut self, path: &Path) -> Result<(), WalkError> {
        debug!("visiting {}", path.display());
        (self.callback)(path).map_err(|source| WalkError::Callback {
            path: path.to_owned(),
            source,
        })
    }

    fn visit_entry(&mut self, path: &Path) -> Result<EntryKind, WalkError> {
        let kind = self
            .fs
            .classify(path)
            .map_err(|source| WalkError::Classify {
                path: path.to_owned(),
                source,
            })?;

        match kind {
            EntryKind::Directory => {
                let children = self.fs.read_dir(path).map_err(|source| WalkError::ReadDir {
                    path: path.to_owned(),
                    source,
                })?;
                for child in children.iter().filter(|c| !is_pseudo_entry(c)) {
                    let child_kind = self.visit_entry(child)?;
                    if child_kind == EntryKind::Directory && self.include_dirs && self.matches(child)
                    {
                        self.call(child)?;
                    }
                }
            }
            EntryKind::Regular => {
                if self.matches(path) {
                    self.call(path)?;
                }
            }
            EntryKind::Symlink => {
                warn!("skipping symlink {}: symlinks are not supported yet", path.display());
            }
            EntryKind::Other => {
                error!("unsupported type of file {}", path.display());
                return Err(WalkError::Unsupported {
                    path: path.to_owned(),
                });
            }
        }
        Ok(kind)
    }
}

fn is_pseudo_entry(path: &Path) -> bool {
    match path.file_name() {
        Some(name) => name == "." || name == "..",
        None => true,
    }
}
