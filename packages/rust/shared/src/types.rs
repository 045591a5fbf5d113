//! Core domain types for the kbdocs corpus.

use serde::{Deserialize, Serialize};

use crate::error::KbDocsError;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A language target of the corpus. Each one owns exactly one output
/// directory under `languages/<name>/docs/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Swift,
    Cpp,
}

impl Language {
    /// Every target, in build order.
    pub const ALL: [Language; 4] = [
        Language::Python,
        Language::Javascript,
        Language::Swift,
        Language::Cpp,
    ];

    /// Lowercase name, also the directory name under `languages/`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Swift => "swift",
            Self::Cpp => "cpp",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = KbDocsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                KbDocsError::config(format!(
                    "unknown language '{s}': expected one of python, javascript, swift, cpp"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// FailurePolicy
// ---------------------------------------------------------------------------

/// What the driver does when one language target fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failed target.
    #[default]
    FailFast,
    /// Record the failure and build the remaining targets.
    KeepGoing,
}
