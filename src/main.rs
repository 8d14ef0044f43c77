#![allow(non_snake_case)]
use RustedExpr::Utils::cli::{CliArgs, CliTask, run};
use RustedExpr::Utils::logger::init_logger;
use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        // --help and --version land here too
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };
    let task = match CliTask::from_cli(args) {
        Ok(task) => task,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logger(task.log_level, task.log_file.as_deref()) {
        eprintln!("Error: cannot open log file: {}", err);
        return ExitCode::FAILURE;
    }
    info!("task: {:?}", task);

    match run(&task) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
