use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::LauncherError;
use crate::platform::{self, Target};

/// Directory holding analyzer builds, relative to the launcher executable.
pub const BIN_DIR_NAME: &str = "bin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryKind {
    Platform,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryLocation {
    pub path: PathBuf,
    pub kind: BinaryKind,
}

impl BinaryLocation {
    pub fn is_fallback(&self) -> bool {
        self.kind == BinaryKind::Fallback
    }

    /// Warning to show the user when the generic build is used.
    pub fn warning(&self, target: &Target) -> Option<String> {
        if !self.is_fallback() {
            return None;
        }
        Some(format!(
            "No build for {}-{} found, using generic {}. Consider adding {}",
            target.os_token(),
            target.arch_token(),
            self.path.display(),
            target.executable_name()
        ))
    }
}

/// `bin/` next to the running executable.
pub fn default_bin_dir() -> Result<PathBuf, LauncherError> {
    let exe = std::env::current_exe().map_err(LauncherError::LauncherLocation)?;
    let dir = exe.parent().ok_or_else(|| {
        LauncherError::LauncherLocation(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        ))
    })?;
    Ok(dir.join(BIN_DIR_NAME))
}

pub fn fallback_path(dir: &Path, target: &Target) -> PathBuf {
    search_dir(dir).join(target.fallback_name())
}

// A bare file name would make `Command` search PATH instead of running the checked file
fn search_dir(dir: &Path) -> PathBuf {
    if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.to_path_buf()
    }
}

/// Find the analyzer build for `target` in `dir`, falling back to the generic build.
pub fn locate_binary(dir: &Path, target: &Target) -> Result<BinaryLocation, LauncherError> {
    let platform_path = search_dir(dir).join(target.executable_name());
    if platform_path.exists() {
        return Ok(BinaryLocation {
            path: platform_path,
            kind: BinaryKind::Platform,
        });
    }

    let fallback_path = fallback_path(dir, target);
    if fallback_path.exists() {
        return Ok(BinaryLocation {
            path: fallback_path,
            kind: BinaryKind::Fallback,
        });
    }

    Err(LauncherError::BinaryNotFound {
        platform_path,
        fallback_path,
    })
}

/// Analyzer builds present in `dir`, sorted by file name.
pub fn list_builds(dir: &Path) -> Vec<PathBuf> {
    let mut builds: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .filter(|e| platform::is_analyzer_build(&e.file_name().to_string_lossy()))
        .map(|e| e.path().to_path_buf())
        .collect();
    builds.sort();
    builds
}
