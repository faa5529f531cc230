use serde::Serialize;

/// Base name shared by every analyzer build.
pub const TOOL_NAME: &str = "fsd-analyzer";

const WINDOWS_OS: &[&str] = &["win32", "windows"];
const DARWIN_OS: &[&str] = &["darwin", "macos"];

const AMD64_ARCHES: &[&str] = &["x64", "ia32", "x86_64", "x86"];
const ARM64_ARCHES: &[&str] = &["arm64", "aarch64"];

const DEFAULT_ARCH_TOKEN: &str = "amd64";

/// Operating system and CPU architecture an analyzer build targets.
///
/// Accepts both Node-style identifiers (`win32`, `x64`) and the ones Rust
/// reports through `std::env::consts` (`windows`, `x86_64`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub os: String,
    pub arch: String,
}

impl Target {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The host this launcher is running on.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn os_token(&self) -> String {
        os_token(&self.os)
    }

    pub fn arch_token(&self) -> &'static str {
        arch_token(&self.arch)
    }

    pub fn is_windows(&self) -> bool {
        self.os_token() == "windows"
    }

    pub fn executable_name(&self) -> String {
        resolve_executable_name(&self.os, &self.arch)
    }

    /// Generic build name, used when no platform build exists.
    pub fn fallback_name(&self) -> String {
        if self.is_windows() {
            format!("{}.exe", TOOL_NAME)
        } else {
            TOOL_NAME.to_string()
        }
    }
}

fn matches_any(value: &str, names: &[&str]) -> bool {
    names.iter().any(|n| n.eq_ignore_ascii_case(value))
}

fn os_token(os: &str) -> String {
    if matches_any(os, WINDOWS_OS) {
        "windows".to_string()
    } else if matches_any(os, DARWIN_OS) {
        "darwin".to_string()
    } else {
        os.to_lowercase()
    }
}

fn arch_token(arch: &str) -> &'static str {
    if matches_any(arch, AMD64_ARCHES) {
        "amd64"
    } else if matches_any(arch, ARM64_ARCHES) {
        "arm64"
    } else {
        DEFAULT_ARCH_TOKEN
    }
}

/// File name of the analyzer build for `os`/`arch`.
///
/// Never fails: unknown architectures map to `amd64`, unknown operating
/// systems are used as-is.
pub fn resolve_executable_name(os: &str, arch: &str) -> String {
    let os = os_token(os);
    let suffix = if os == "windows" { ".exe" } else { "" };
    format!("{}-{}-{}{}", TOOL_NAME, os, arch_token(arch), suffix)
}

/// Whether `filename` looks like an analyzer build (platform-specific or generic).
pub fn is_analyzer_build(filename: &str) -> bool {
    let stem = filename.strip_suffix(".exe").unwrap_or(filename);
    stem == TOOL_NAME || stem.starts_with(&format!("{}-", TOOL_NAME))
}
