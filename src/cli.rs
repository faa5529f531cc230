use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use crate::locator;
use crate::report;
use crate::runner::{Launcher, RunOptions};

#[derive(Debug, Parser)]
#[command(
    name = "fsd-analyzer-launcher",
    version,
    about = "Runs the FSD analyzer build for this platform"
)]
pub struct Args {
    /// Config file passed to the analyzer as `--config <PATH>`
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Discard the analyzer's output
    #[arg(long, short)]
    pub silent: bool,

    /// Directory holding the analyzer builds (default: `bin/` next to this executable)
    #[arg(
        long,
        value_name = "DIR",
        env = "FSD_ANALYZER_BIN_DIR",
        value_parser = clap::builder::NonEmptyStringValueParser::new()
    )]
    pub bin_dir: Option<String>,

    /// Print how the analyzer was resolved before running it
    #[arg(long, short)]
    pub verbose: bool,

    /// Show what would be run without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// List the analyzer builds in the bin directory and exit
    #[arg(long, conflicts_with_all = ["dry_run", "config", "silent"])]
    pub list_builds: bool,
}

impl Args {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            config: self.config.clone(),
            silent: self.silent,
        }
    }
}

fn launcher(args: &Args) -> Result<Launcher> {
    match &args.bin_dir {
        Some(dir) => {
            let expanded = shellexpand::full(dir)
                .with_context(|| format!("Failed to expand bin directory {}", dir))?;
            Ok(Launcher::new(PathBuf::from(expanded.as_ref())))
        }
        None => Launcher::from_current_exe().context("Failed to locate the bin directory"),
    }
}

pub fn run(args: Args) -> Result<()> {
    let launcher = launcher(&args)?;

    if args.list_builds {
        let builds = locator::list_builds(launcher.bin_dir());
        let selected = launcher.locate().ok();
        report::print_builds(launcher.bin_dir(), &builds, selected.as_ref());
        return Ok(());
    }

    let options = args.run_options();

    if args.dry_run {
        let plan = launcher.plan(&options)?;
        if args.json {
            println!("{}", report::plan_json(&plan, launcher.target())?);
        } else {
            report::print_plan(&plan, launcher.target());
        }
        return Ok(());
    }

    if args.verbose {
        eprintln!(
            "{} Bin directory: {}",
            style("▸").cyan(),
            style(launcher.bin_dir().display()).bold()
        );
        eprintln!(
            "{} Looking for: {}",
            style("▸").cyan(),
            launcher.target().executable_name()
        );
    }

    let output = launcher.run(&options)?;

    if args.verbose {
        eprintln!(
            "{} {} finished ({})",
            style("✓").green(),
            output.binary.display(),
            output.status
        );
    }

    Ok(())
}
