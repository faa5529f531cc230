use console::style;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::LauncherError;
use crate::locator::{self, BinaryKind, BinaryLocation};
use crate::platform::Target;

const CONFIG_FLAG: &str = "--config";

/// Options for a single analyzer run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Forwarded verbatim as `--config <path>`.
    pub config: Option<PathBuf>,
    /// Discard the analyzer's standard streams instead of inheriting them.
    pub silent: bool,
}

/// Command line the launcher is about to spawn.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub kind: BinaryKind,
    pub config: Option<PathBuf>,
    pub silent: bool,
}

impl LaunchPlan {
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if let Some(config) = &self.config {
            args.push(OsString::from(CONFIG_FLAG));
            args.push(config.clone().into_os_string());
        }
        args
    }

    /// Human-readable command line, for display only.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

#[derive(Debug)]
pub struct RunOutput {
    pub binary: PathBuf,
    pub used_fallback: bool,
    pub status: ExitStatus,
}

/// Resolves and runs the analyzer build for one target out of one directory.
#[derive(Debug, Clone)]
pub struct Launcher {
    bin_dir: PathBuf,
    target: Target,
}

impl Launcher {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
            target: Target::current(),
        }
    }

    /// Launcher using `bin/` next to the running executable.
    pub fn from_current_exe() -> Result<Self, LauncherError> {
        Ok(Self::new(locator::default_bin_dir()?))
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn locate(&self) -> Result<BinaryLocation, LauncherError> {
        locator::locate_binary(&self.bin_dir, &self.target)
    }

    pub fn plan(&self, options: &RunOptions) -> Result<LaunchPlan, LauncherError> {
        Ok(plan_for(self.locate()?, options))
    }

    /// Locate the analyzer and run it to completion in the current directory.
    pub fn run(&self, options: &RunOptions) -> Result<RunOutput, LauncherError> {
        let location = self.locate()?;
        if let Some(warning) = location.warning(&self.target) {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
        execute(&plan_for(location, options))
    }
}

fn plan_for(location: BinaryLocation, options: &RunOptions) -> LaunchPlan {
    LaunchPlan {
        program: location.path,
        kind: location.kind,
        config: options.config.clone(),
        silent: options.silent,
    }
}

/// Spawn the planned command and wait for it.
pub fn execute(plan: &LaunchPlan) -> Result<RunOutput, LauncherError> {
    let mut command = Command::new(&plan.program);
    command.args(plan.args());

    if plan.silent {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
    } else {
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
    }

    let status = command
        .status()
        .map_err(|e| LauncherError::ExecutionFailure {
            message: format!("{}: {}", plan.program.display(), e),
            code: None,
        })?;

    if !status.success() {
        return Err(LauncherError::ExecutionFailure {
            message: format!("command failed: {} ({})", plan.command_line(), status),
            code: status.code(),
        });
    }

    Ok(RunOutput {
        binary: plan.program.clone(),
        used_fallback: plan.kind == BinaryKind::Fallback,
        status,
    })
}

/// Run the analyzer shipped next to this executable.
pub fn run(options: &RunOptions) -> Result<RunOutput, LauncherError> {
    Launcher::from_current_exe()?.run(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::tests::scratch_dir;
    use std::fs;
    use std::sync::Mutex;

    // Writing a script while another test forks can make exec fail with ETXTBSY
    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    fn linux_x64() -> Target {
        Target::new("linux", "x64")
    }

    #[test]
    fn test_config_flag_appended_once() {
        let dir = scratch_dir("plan_config");
        fs::write(dir.join("fsd-analyzer-linux-amd64"), b"").unwrap();
        let launcher = Launcher::new(&dir).with_target(linux_x64());

        let options = RunOptions {
            config: Some(PathBuf::from("fsd-crawler.yml")),
            silent: false,
        };
        let plan = launcher.plan(&options).unwrap();
        let args = plan.args();
        assert_eq!(args, vec![OsString::from("--config"), OsString::from("fsd-crawler.yml")]);
        assert_eq!(args.iter().filter(|a| *a == "--config").count(), 1);
        assert!(plan.command_line().ends_with("fsd-analyzer-linux-amd64 --config fsd-crawler.yml"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_no_config_flag_without_config() {
        let dir = scratch_dir("plan_no_config");
        fs::write(dir.join("fsd-analyzer"), b"").unwrap();
        let launcher = Launcher::new(&dir).with_target(linux_x64());

        let plan = launcher.plan(&RunOptions::default()).unwrap();
        assert!(plan.args().is_empty());
        assert_eq!(plan.kind, BinaryKind::Fallback);
        assert!(!plan.silent);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_binary_fails_before_spawn() {
        let dir = scratch_dir("run_missing");
        let launcher = Launcher::new(&dir).with_target(linux_x64());

        let err = launcher.run(&RunOptions::default()).unwrap_err();
        assert!(matches!(err, LauncherError::BinaryNotFound { .. }));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_spawn_failure_wraps_system_error() {
        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let plan = LaunchPlan {
            program: scratch_dir("spawn_failure").join("missing-binary"),
            kind: BinaryKind::Platform,
            config: None,
            silent: true,
        };
        let err = execute(&plan).unwrap_err();
        match &err {
            LauncherError::ExecutionFailure { message, code } => {
                assert!(message.contains("missing-binary"));
                assert!(code.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("failed to run analyzer:"));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn write_script(path: &Path, body: &str) {
            fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            let mut perms = fs::metadata(path).unwrap().permissions();
            perms.set_mode(0o755);
            fs::set_permissions(path, perms).unwrap();
        }

        #[test]
        fn test_runs_platform_build_with_config() {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let dir = scratch_dir("run_config");
            let args_file = dir.join("args.txt");
            write_script(
                &dir.join("fsd-analyzer-linux-amd64"),
                &format!("printf '%s\\n' \"$@\" > '{}'", args_file.display()),
            );

            let launcher = Launcher::new(&dir).with_target(linux_x64());
            let options = RunOptions {
                config: Some(PathBuf::from("configs/fsd crawler.yml")),
                silent: true,
            };
            let output = launcher.run(&options).unwrap();
            assert!(output.status.success());
            assert!(!output.used_fallback);

            let recorded = fs::read_to_string(&args_file).unwrap();
            assert_eq!(recorded, "--config\nconfigs/fsd crawler.yml\n");

            fs::remove_dir_all(&dir).ok();
        }

        #[test]
        fn test_runs_fallback_in_current_dir() {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let dir = scratch_dir("run_fallback");
            let cwd_file = dir.join("cwd.txt");
            write_script(
                &dir.join("fsd-analyzer"),
                &format!("pwd -P > '{}'\n[ $# -eq 0 ]", cwd_file.display()),
            );

            let launcher = Launcher::new(&dir).with_target(linux_x64());
            let output = launcher.run(&RunOptions::default()).unwrap();
            assert!(output.used_fallback);
            assert_eq!(output.binary, dir.join("fsd-analyzer"));

            let recorded = fs::read_to_string(&cwd_file).unwrap();
            let expected = std::env::current_dir().unwrap().canonicalize().unwrap();
            assert_eq!(PathBuf::from(recorded.trim()), expected);

            fs::remove_dir_all(&dir).ok();
        }

        #[cfg(target_os = "linux")]
        fn stream_targets(silent: bool) -> Vec<PathBuf> {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let dir = scratch_dir(if silent { "stdio_silent" } else { "stdio_inherit" });
            let record = dir.join("fds.txt");
            // Redirect per command so the shell's own fds (/proc/$$) stay untouched
            write_script(
                &dir.join("fsd-analyzer-linux-amd64"),
                &format!(
                    "for fd in 0 1 2; do readlink /proc/$$/fd/$fd >> '{}'; done",
                    record.display()
                ),
            );

            let launcher = Launcher::new(&dir).with_target(linux_x64());
            let options = RunOptions { config: None, silent };
            launcher.run(&options).unwrap();

            let targets = fs::read_to_string(&record)
                .unwrap()
                .lines()
                .map(PathBuf::from)
                .collect();
            fs::remove_dir_all(&dir).ok();
            targets
        }

        #[cfg(target_os = "linux")]
        #[test]
        fn test_silent_discards_streams() {
            let targets = stream_targets(true);
            assert_eq!(targets, vec![PathBuf::from("/dev/null"); 3]);
        }

        #[cfg(target_os = "linux")]
        #[test]
        fn test_default_inherits_streams() {
            let own: Vec<PathBuf> = (0..3)
                .map(|fd| fs::read_link(format!("/proc/self/fd/{}", fd)).unwrap())
                .collect();
            assert_eq!(stream_targets(false), own);
        }

        #[test]
        fn test_nonzero_exit_reports_code() {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            let dir = scratch_dir("run_exit_code");
            write_script(&dir.join("fsd-analyzer-linux-amd64"), "echo broken >&2\nexit 3");

            let launcher = Launcher::new(&dir).with_target(linux_x64());
            let options = RunOptions {
                config: None,
                silent: true,
            };
            let err = launcher.run(&options).unwrap_err();
            assert_eq!(err.exit_code(), Some(3));
            assert!(err.to_string().contains("fsd-analyzer-linux-amd64"));

            fs::remove_dir_all(&dir).ok();
        }
    }
}
