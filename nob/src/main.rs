use std::process::ExitCode;

use nob_builder::{Project, Reporter};
use nobrs::{init_logging, parse_args, run, Command, NO_ARGUMENTS, USAGE};

fn main() -> ExitCode {
    init_logging();
    let reporter = Reporter::stdout();

    let args = std::env::args_os().skip(1).collect();
    let result = match parse_args(args, Project::from_env()) {
        Ok(Command::Help) => {
            print!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(Command::NoArguments) => {
            println!("{}", NO_ARGUMENTS);
            return ExitCode::SUCCESS;
        }
        Ok(Command::Execute(config)) => run(config),
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            reporter.failure(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
