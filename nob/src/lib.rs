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

use std::ffi::OsString;

use anyhow::{self, Context};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nob_builder::{Action, ActionQueue, Executor, Project, SystemRunner, Toggles};
use nob_walk::SystemFileSystem;

pub const USAGE: &str = "\
Usage: nob [commands] [options] [-- compiler arguments]
Note that you can use multiple commands.
Example: nob build run (Builds and runs the project)

Commands:
  build          Build the project
  run            Run the project
  check          Check the syntax of the project
  clean          Clean the project
  build-vendor   Build the vendored libraries
  clean-vendor   Clean the vendored libraries
  help           Show this help message

Build options:
  -dbg           Enable debug mode and keep asserts
  -asan          Enable address sanitizer
  -msan          Enable memory sanitizer
  -tsan          Enable thread sanitizer
  -bench         Enable benchmarks
  -stats         Print how long each action took
  -C <dir>       Change to <dir> before doing anything
  --             Passes all arguments after it to the compiler
";

pub const NO_ARGUMENTS: &str = "No arguments given.\nUse `nob help` for info.";

const SEPARATOR: &str = "--";

#[derive(Debug)]
pub struct Config {
    pub execution_dir: Option<String>,
    pub project: Project,
    pub toggles: Toggles,
    pub actions: ActionQueue,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Command {
    Help,
    NoArguments,
    Execute(Config),
}

/// Interprets everything after the program name.
///
/// Tokens after the first `--` are handed to the compiler untouched. Before it, `help` anywhere
/// wins over everything else, verbs queue their action in order of first mention, flags switch
/// their toggle on and anything unknown is ignored.
pub fn parse_args(args: Vec<OsString>, project: Project) -> Result<Command, pico_args::Error> {
    if args.is_empty() {
        return Ok(Command::NoArguments);
    }

    let mut head = args;
    let passthrough = match head.iter().position(|a| a == SEPARATOR) {
        Some(i) => {
            let rest = head.split_off(i + 1);
            head.pop();
            rest
        }
        None => vec![],
    };

    if head.iter().any(|a| a == "help") {
        return Ok(Command::Help);
    }

    let mut pargs = pico_args::Arguments::from_vec(head);
    let execution_dir: Option<String> = pargs.opt_value_from_str("-C")?;

    let mut toggles = Toggles {
        passthrough,
        ..Toggles::default()
    };
    let mut actions = ActionQueue::new();
    for token in pargs.finish() {
        let token = match token.to_str() {
            Some(t) => t,
            None => {
                debug!("ignoring non-UTF-8 argument {:?}", token);
                continue;
            }
        };
        match token {
            "-dbg" => toggles.debug = true,
            "-asan" => toggles.sanitize_address = true,
            "-msan" => toggles.sanitize_memory = true,
            "-tsan" => toggles.sanitize_thread = true,
            "-bench" => toggles.benchmarks = true,
            "-stats" => toggles.stats = true,
            verb => match Action::from_verb(verb) {
                Some(Action::Run) if project.run_implies_build => {
                    actions.enqueue(Action::Build);
                    actions.enqueue(Action::Run);
                }
                Some(action) => {
                    actions.enqueue(action);
                }
                None => debug!("ignoring unknown argument {:?}", verb),
            },
        }
    }

    Ok(Command::Execute(Config {
        execution_dir,
        project,
        toggles,
        actions,
    }))
}

/// Logs go to stdout next to the status lines. `NOB_LOG` takes a tracing filter; the default only
/// shows warnings and errors.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("NOB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(console::colors_enabled())
        .without_time()
        .with_target(false)
        .try_init();
}

pub fn run(config: Config) -> anyhow::Result<()> {
    if let Some(dir) = &config.execution_dir {
        std::env::set_current_dir(&dir).with_context(|| format!("changing to {} for -C", &dir))?;
    }

    if config.toggles.stats {
        nob_metrics::enable();
    }

    let destination = &config.project.destination;
    std::fs::create_dir_all(destination)
        .with_context(|| format!("creating output directory {}", destination.display()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting the process runtime")?;

    let executor = Executor::new(
        config.project,
        config.toggles,
        SystemRunner,
        SystemFileSystem,
    );
    let result = runtime.block_on(executor.run_queue(config.actions));

    if nob_metrics::is_enabled() {
        nob_metrics::dump();
    }
    Ok(result?)
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<OsString> {
        tokens.iter().map(OsString::from).collect()
    }

    fn config(tokens: &[&str]) -> Config {
        match parse_args(args(tokens), Project::default()).expect("parses") {
            Command::Execute(config) => config,
            other => panic!("expected a config, got {:?}", other),
        }
    }

    #[test]
    fn test_separator_alone() {
        let config = config(&["build", "--"]);
        assert!(config.toggles.passthrough.is_empty());
        assert_eq!(config.actions.iter().collect::<Vec<_>>(), vec![Action::Build]);
    }

    #[test]
    fn test_repeated_flags() {
        let config = config(&["-dbg", "-dbg", "check"]);
        assert!(config.toggles.debug);
        assert_eq!(config.actions.iter().collect::<Vec<_>>(), vec![Action::Check]);
    }

    #[test]
    fn test_execution_dir() {
        let config = config(&["clean", "-C", "game"]);
        assert_eq!(config.execution_dir.as_deref(), Some("game"));
        assert_eq!(config.actions.iter().collect::<Vec<_>>(), vec![Action::Clean]);
    }

    #[test]
    fn test_execution_dir_without_value() {
        parse_args(args(&["build", "-C"]), Project::default()).expect_err("-C needs a value");
    }
}
