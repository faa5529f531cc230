use clap::Parser;
use console::style;
use std::process::ExitCode;

use fsd_analyzer_launcher::cli::{self, Args};
use fsd_analyzer_launcher::LauncherError;

fn main() -> ExitCode {
    match cli::run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", style("✗").red(), err);
            // Mirror the analyzer's own exit code when it ran and failed
            let code = err
                .downcast_ref::<LauncherError>()
                .and_then(LauncherError::exit_code)
                .and_then(|c| u8::try_from(c).ok())
                .filter(|c| *c != 0)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
