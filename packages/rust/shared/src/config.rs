//! Application configuration for kbdocs.
//!
//! User config lives at `~/.kbdocs/kbdocs.toml`.
//! CLI flags override environment variables, which override config file
//! values, which override defaults.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KbDocsError, Result};
use crate::types::{FailurePolicy, Language};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "kbdocs.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".kbdocs";

/// Pages written to each C++ draft text file unless configured otherwise.
pub const DEFAULT_PAGES_PER_FILE: NonZeroUsize = match NonZeroUsize::new(200) {
    Some(n) => n,
    None => panic!("default page batch size must be non-zero"),
};

/// Command that downloads the raw artifacts, quoted in missing-input errors.
pub const DEFAULT_FETCH_COMMAND: &str = "./rag-ml/kb/pull-docs.sh";

/// Directory name the corpus root normally carries.
pub const DEFAULT_EXPECTED_ROOT_NAME: &str = "kb";

// ---------------------------------------------------------------------------
// Config structs (matching kbdocs.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Build settings.
    #[serde(default)]
    pub build: BuildSection,
}

/// `[build]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    /// Corpus root (the directory holding `languages/`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Pages per C++ draft text file.
    #[serde(default = "default_pages_per_file")]
    pub cpp_pages_per_file: NonZeroUsize,

    /// Stop at the first failed language, or build the rest anyway.
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Fetch command named in missing-prerequisite errors.
    #[serde(default = "default_fetch_command")]
    pub fetch_command: String,

    /// Expected final component of the root; anything else logs a warning.
    #[serde(default = "default_expected_root_name")]
    pub expected_root_name: String,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            root: None,
            cpp_pages_per_file: default_pages_per_file(),
            failure_policy: FailurePolicy::default(),
            fetch_command: default_fetch_command(),
            expected_root_name: default_expected_root_name(),
        }
    }
}

fn default_pages_per_file() -> NonZeroUsize {
    DEFAULT_PAGES_PER_FILE
}
fn default_fetch_command() -> String {
    DEFAULT_FETCH_COMMAND.into()
}
fn default_expected_root_name() -> String {
    DEFAULT_EXPECTED_ROOT_NAME.into()
}

// ---------------------------------------------------------------------------
// Build config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime build configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Absolute corpus root.
    pub root: PathBuf,
    /// Pages per C++ draft text file.
    pub pages_per_file: NonZeroUsize,
    /// Behavior when a target fails.
    pub failure_policy: FailurePolicy,
    /// Fetch command quoted in missing-prerequisite errors.
    pub fetch_command: String,
    /// Expected final component of `root`.
    pub expected_root_name: String,
    /// Targets to build. Always run in [`Language::ALL`] order.
    pub languages: Vec<Language>,
}

impl BuildConfig {
    /// Defaults for every knob, rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_app(&AppConfig::default(), root)
    }

    /// Runtime config from the loaded file, rooted at `root`.
    pub fn from_app(config: &AppConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pages_per_file: config.build.cpp_pages_per_file,
            failure_policy: config.build.failure_policy,
            fetch_command: config.build.fetch_command.clone(),
            expected_root_name: config.build.expected_root_name.clone(),
            languages: Language::ALL.to_vec(),
        }
    }

    /// True when `root`'s last component is not the expected name.
    pub fn root_looks_unusual(&self) -> bool {
        self.root
            .file_name()
            .and_then(|name| name.to_str())
            .is_none_or(|name| name != self.expected_root_name)
    }
}

/// Pick the corpus root: an explicit path wins, then the config file, then
/// the current directory. The result is absolute.
pub fn resolve_root(explicit: Option<&Path>, config: &AppConfig) -> Result<PathBuf> {
    let chosen = match (explicit, config.build.root.as_deref()) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(path)) => PathBuf::from(path),
        (None, None) => std::env::current_dir().map_err(|e| KbDocsError::io(".", e))?,
    };
    std::path::absolute(&chosen).map_err(|e| KbDocsError::io(&chosen, e))
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.kbdocs/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| KbDocsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.kbdocs/kbdocs.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| KbDocsError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| KbDocsError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| KbDocsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| KbDocsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| KbDocsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
