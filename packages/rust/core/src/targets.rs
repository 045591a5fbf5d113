//! The fixed language targets and their on-disk layout.
//!
//! All paths are relative to the corpus root:
//!
//! ```text
//! languages/python/raw/python-docs-text/         -> languages/python/docs/python-docs-text/
//! languages/javascript/raw/ecma262/ecma262.txt   -> languages/javascript/docs/ecma-262/ecma262.txt
//! languages/swift/raw/swift-book/TSPL.docc/**.md -> languages/swift/docs/swift-book-repo/TSPL.docc/
//! languages/cpp/downloads/cpp-draft.pdf          -> languages/cpp/docs/cpp-working-draft-pdf/
//! ```

use std::path::{Path, PathBuf};

use kbdocs_shared::Language;
use serde::Serialize;

/// How a target turns its raw input into output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Mirror the raw directory; report how many files carry `count_extensions`.
    Mirror { count_extensions: &'static [&'static str] },
    /// Copy the raw file into the output directory as `out_name`.
    SingleFile { out_name: &'static str },
    /// Copy `extensions` files of `subtree`, plus an attribution file.
    Filtered {
        subtree: &'static str,
        extensions: &'static [&'static str],
        attribution: &'static str,
    },
    /// Split the raw PDF into page-batch text files.
    Paginate,
}

/// One language's raw input, output directory, and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub language: Language,
    /// Raw input whose existence is the step's precondition.
    pub raw: PathBuf,
    /// Output directory, reset on every build.
    pub output: PathBuf,
    pub action: Action,
}

impl Target {
    /// The target for `language` under `root`.
    pub fn for_language(root: &Path, language: Language) -> Self {
        let lang = root.join("languages").join(language.as_str());
        let (raw, output, action) = match language {
            Language::Python => (
                lang.join("raw/python-docs-text"),
                lang.join("docs/python-docs-text"),
                Action::Mirror {
                    count_extensions: &["txt"],
                },
            ),
            Language::Javascript => (
                lang.join("raw/ecma262/ecma262.txt"),
                lang.join("docs/ecma-262"),
                Action::SingleFile {
                    out_name: "ecma262.txt",
                },
            ),
            Language::Swift => (
                lang.join("raw/swift-book"),
                lang.join("docs/swift-book-repo"),
                Action::Filtered {
                    subtree: "TSPL.docc",
                    extensions: &["md"],
                    attribution: "LICENSE.txt",
                },
            ),
            Language::Cpp => (
                lang.join("downloads/cpp-draft.pdf"),
                lang.join("docs/cpp-working-draft-pdf"),
                Action::Paginate,
            ),
        };

        Self {
            language,
            raw,
            output,
            action,
        }
    }

    /// Every target under `root`, in build order.
    pub fn all(root: &Path) -> Vec<Self> {
        Language::ALL
            .into_iter()
            .map(|lang| Self::for_language(root, lang))
            .collect()
    }

    /// Progress line describing what the build step does.
    pub fn description(&self) -> &'static str {
        match self.language {
            Language::Python => "copy raw text archive -> docs/python-docs-text/",
            Language::Javascript => "copy ecma262.txt -> docs/ecma-262/",
            Language::Swift => "copy TSPL.docc markdown -> docs/swift-book-repo/",
            Language::Cpp => "extract pdf -> docs/cpp-working-draft-pdf/ (split by pages)",
        }
    }
}

/// A target plus whether its raw input is currently present.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedTarget {
    pub language: Language,
    pub raw: PathBuf,
    pub output: PathBuf,
    pub present: bool,
}

/// Inspect every target under `root` without modifying anything.
pub fn plan(root: &Path) -> Vec<PlannedTarget> {
    Target::all(root)
        .into_iter()
        .map(|t| PlannedTarget {
            present: t.raw.exists(),
            language: t.language,
            raw: t.raw,
            output: t.output,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let root = Path::new("/srv/kb");

        let py = Target::for_language(root, Language::Python);
        assert_eq!(py.raw, root.join("languages/python/raw/python-docs-text"));
        assert_eq!(py.output, root.join("languages/python/docs/python-docs-text"));

        let js = Target::for_language(root, Language::Javascript);
        assert_eq!(js.raw, root.join("languages/javascript/raw/ecma262/ecma262.txt"));
        assert_eq!(js.output, root.join("languages/javascript/docs/ecma-262"));

        let swift = Target::for_language(root, Language::Swift);
        assert_eq!(swift.raw, root.join("languages/swift/raw/swift-book"));
        assert_eq!(swift.output, root.join("languages/swift/docs/swift-book-repo"));

        let cpp = Target::for_language(root, Language::Cpp);
        assert_eq!(cpp.raw, root.join("languages/cpp/downloads/cpp-draft.pdf"));
        assert_eq!(cpp.output, root.join("languages/cpp/docs/cpp-working-draft-pdf"));
        assert_eq!(cpp.action, Action::Paginate);
    }

    #[test]
    fn all_targets_in_build_order() {
        let langs: Vec<_> = Target::all(Path::new("/kb"))
            .into_iter()
            .map(|t| t.language)
            .collect();
        assert_eq!(langs, Language::ALL.to_vec());
    }

    #[test]
    fn plan_reports_presence() {
        let tmp = tempfile::tempdir().unwrap();
        let js = tmp.path().join("languages/javascript/raw/ecma262");
        std::fs::create_dir_all(&js).unwrap();
        std::fs::write(js.join("ecma262.txt"), "spec").unwrap();

        let planned = plan(tmp.path());
        let present: Vec<_> = planned.iter().map(|p| (p.language, p.present)).collect();
        assert_eq!(
            present,
            vec![
                (Language::Python, false),
                (Language::Javascript, true),
                (Language::Swift, false),
                (Language::Cpp, false),
            ]
        );
        assert!(!tmp.path().join("languages/javascript/docs").exists());
    }
}
