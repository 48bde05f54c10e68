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

use std::process::ExitStatus;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use crate::invocation::Invocation;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("could not be started")]
    SpawnFailed(#[from] std::io::Error),
    #[error("failed with {0}")]
    CommandFailed(ExitStatus),
}

pub type CommandResult = Result<(), CommandError>;

/// Runs one invocation to completion. Only the exit status matters; output goes straight to the
/// terminal.
#[async_trait(?Send)]
pub trait CommandRunner {
    async fn run(&self, invocation: &Invocation) -> CommandResult;
}

#[async_trait(?Send)]
impl<'a, T> CommandRunner for &'a T
where
    T: CommandRunner + ?Sized,
{
    async fn run(&self, invocation: &Invocation) -> CommandResult {
        (**self).run(invocation).await
    }
}

/// Spawns real processes. Needs to be polled from within a tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait(?Send)]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> CommandResult {
        debug!("spawning {}", invocation);
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .await?;
        if !status.success() {
            return Err(CommandError::CommandFailed(status));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod test {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime")
            .block_on(f)
    }

    #[test]
    fn test_success() {
        block_on(SystemRunner.run(&Invocation::new("true"))).expect("true succeeds");
    }

    #[test]
    fn test_exit_status() {
        let mut cmd = Invocation::new("sh");
        cmd.arg("-c").arg("exit 3");
        match block_on(SystemRunner.run(&cmd)) {
            Err(CommandError::CommandFailed(status)) => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_program() {
        let err = block_on(SystemRunner.run(&Invocation::new("./definitely/not/here")))
            .expect_err("spawn fails");
        assert!(matches!(err, CommandError::SpawnFailed(_)));
    }
}
