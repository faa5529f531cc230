use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LauncherError {
    #[error(
        "analyzer binary not found: checked {} and {}. \
         Build the analyzer for this platform or place a generic `{}` binary in {}",
        .platform_path.display(),
        .fallback_path.display(),
        file_name_of(.fallback_path),
        bin_dir_of(.fallback_path)
    )]
    BinaryNotFound {
        platform_path: PathBuf,
        fallback_path: PathBuf,
    },

    #[error("failed to run analyzer: {message}")]
    ExecutionFailure { message: String, code: Option<i32> },

    #[error("cannot determine launcher location: {0}")]
    LauncherLocation(#[source] std::io::Error),
}

impl LauncherError {
    /// Exit code of the analyzer, when it ran and exited unsuccessfully.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            LauncherError::ExecutionFailure { code, .. } => *code,
            _ => None,
        }
    }
}

fn bin_dir_of(path: &std::path::Path) -> String {
    path.parent()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string())
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
