//! Launcher for the FSD analyzer.
//!
//! Picks the analyzer build for the running OS and CPU out of a `bin/`
//! directory (falling back to a generic `fsd-analyzer` build), then runs it
//! with an optional `--config <path>`.

pub mod cli;
pub mod error;
pub mod locator;
pub mod platform;
pub mod report;
pub mod runner;

pub use error::LauncherError;
pub use locator::{locate_binary, BinaryKind, BinaryLocation};
pub use platform::{resolve_executable_name, Target};
pub use runner::{run, LaunchPlan, Launcher, RunOptions, RunOutput};
