use std::{io, path::PathBuf};

use thiserror::Error;

use nob_walk::WalkError;

mod action;
mod command;
mod executor;
mod invocation;
mod project;
mod queue;
mod report;

pub use action::Action;
pub use command::{CommandError, CommandResult, CommandRunner, SystemRunner};
pub use executor::Executor;
pub use invocation::Invocation;
pub use project::{Project, Toggles, VendorLibrary, DEFAULT_VENDOR_CXXFLAGS};
pub use queue::ActionQueue;
pub use report::Reporter;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("`{invocation}`")]
    Subprocess {
        invocation: String,
        #[source]
        source: CommandError,
    },
    #[error(transparent)]
    Traversal(WalkError),
    #[error("failed to remove {}, perhaps a permission issue?", .path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy {} to {}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Walks only ever delete, so a failing callback is a failed deletion.
impl From<WalkError> for BuildError {
    fn from(e: WalkError) -> Self {
        match e {
            WalkError::Callback { path, source } => BuildError::Deletion { path, source },
            other => BuildError::Traversal(other),
        }
    }
}

/// The action that stopped the queue. Nothing after it ran.
#[derive(Error, Debug)]
#[error("{} failed", .action.title())]
pub struct QueueError {
    pub action: Action,
    #[source]
    pub source: BuildError,
}
