use std::process::ExitCode;

use clap::Parser;

mod cli;
mod logging;
mod progress;
mod run;
mod size;

fn main() -> ExitCode {
    let app = cli::App::parse();

    if let Err(err) = logging::init(app.verbose, app.quiet) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    match run::run(&app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
