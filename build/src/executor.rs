use nob_metrics::timed;
use nob_walk::{visit_all, FileSystem};

use crate::{
    action::Action,
    command::CommandRunner,
    invocation::Invocation,
    project::{Project, Toggles},
    queue::ActionQueue,
    report::Reporter,
    BuildError, QueueError,
};

/// Runs queued actions one after the other against a project.
pub struct Executor<R, F> {
    project: Project,
    toggles: Toggles,
    runner: R,
    fs: F,
    reporter: Reporter,
}

impl<R, F> Executor<R, F>
where
    R: CommandRunner,
    F: FileSystem,
{
    pub fn new(project: Project, toggles: Toggles, runner: R, fs: F) -> Self {
        Executor {
            project,
            toggles,
            runner,
            fs,
            reporter: Reporter::stdout(),
        }
    }

    /// Drains `queue` front to back. The first failure is returned and whatever was still queued
    /// is dropped.
    pub async fn run_queue(&self, mut queue: ActionQueue) -> Result<(), QueueError> {
        while let Some(action) = queue.pop_front() {
            self.execute(action)
                .await
                .map_err(|source| QueueError { action, source })?;
        }
        Ok(())
    }

    pub async fn execute(&self, action: Action) -> Result<(), BuildError> {
        timed!(action.verb());
        match action {
            Action::Build => {
                self.spawn(Invocation::build(&self.project, &self.toggles))
                    .await?;
                self.reporter.success("Build successful.");
            }
            Action::Run => {
                self.spawn(Invocation::run(&self.project)).await?;
                self.reporter.success("Run successful.");
            }
            Action::Check => {
                self.spawn(Invocation::check(&self.project, &self.toggles))
                    .await?;
                self.reporter.success("Syntax check passed.");
            }
            Action::Clean => {
                self.clean()?;
                self.reporter.success("Clean successful.");
            }
            Action::BuildVendor => self.build_vendor().await?,
            Action::CleanVendor => self.clean_vendor().await?,
        }
        Ok(())
    }

    async fn spawn(&self, invocation: Invocation) -> Result<(), BuildError> {
        self.reporter.command(&invocation);
        self.runner
            .run(&invocation)
            .await
            .map_err(|source| BuildError::Subprocess {
                invocation: invocation.to_string(),
                source,
            })
    }

    /// Removes every file below the destination. Directories, including the destination itself,
    /// stay.
    fn clean(&self) -> Result<(), BuildError> {
        let fs = &self.fs;
        visit_all(fs, &self.project.destination, |path| fs.remove_file(path), false)?;
        Ok(())
    }

    async fn build_vendor(&self) -> Result<(), BuildError> {
        if self.project.vendor.is_empty() {
            self.reporter.note("No vendor libraries configured.");
            return Ok(());
        }
        for lib in &self.project.vendor {
            for &debug in &[false, true] {
                self.spawn(Invocation::make_clean(lib)).await?;
                self.spawn(Invocation::make_static(lib, debug)).await?;
                let from = lib.archive();
                let to = lib.installed_archive(debug);
                self.fs
                    .copy(&from, &to)
                    .map_err(|source| BuildError::Copy { from, to, source })?;
            }
        }
        self.reporter.success("Vendor libraries built.");
        Ok(())
    }

    async fn clean_vendor(&self) -> Result<(), BuildError> {
        if self.project.vendor.is_empty() {
            self.reporter.note("No vendor libraries configured.");
            return Ok(());
        }
        for lib in &self.project.vendor {
            self.spawn(Invocation::make_clean(lib)).await?;
        }
        self.reporter.success("Vendor libraries cleaned.");
        Ok(())
    }
}
