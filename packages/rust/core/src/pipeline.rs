//! Sequential corpus build: for each selected language, check the raw input,
//! reset the output directory, and run the language's build step.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use kbdocs_shared::{BuildConfig, FailurePolicy, Language, Result};

use crate::fsops::count_files_with_extension;
use crate::steps::{self, FilterSpec};
use crate::targets::{Action, Target};

/// Summary of one completed build step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepReport {
    /// Number of document files in the output.
    Files { count: usize },
    /// Size of the single copied file.
    Bytes { size: u64 },
    /// PDF pagination figures.
    Pages {
        total: usize,
        pages_per_file: usize,
        batches: usize,
    },
}

impl std::fmt::Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Files { count } => write!(f, "files={count}"),
            Self::Bytes { size } => write!(f, "bytes={size}"),
            Self::Pages {
                total,
                pages_per_file,
                batches,
            } => write!(f, "pages={total}, pages_per_file={pages_per_file}, files={batches}"),
        }
    }
}

/// Outcome of one language target.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetStatus {
    Built { report: StepReport },
    Failed { error: String },
}

/// Result of one language target within a build.
#[derive(Debug, Clone, Serialize)]
pub struct TargetReport {
    pub language: Language,
    pub output: PathBuf,
    #[serde(flatten)]
    pub status: TargetStatus,
}

impl TargetReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, TargetStatus::Failed { .. })
    }
}

/// Result of [`build_corpus`].
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub root: PathBuf,
    pub targets: Vec<TargetReport>,
    #[serde(serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl BuildSummary {
    /// Languages whose build failed (only populated under `keep-going`).
    pub fn failed(&self) -> Vec<Language> {
        self.targets
            .iter()
            .filter(|t| t.is_failed())
            .map(|t| t.language)
            .collect()
    }
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called before a language target runs.
    fn target_started(&self, language: Language, action: &str);
    /// Called after each PDF page-batch file is written.
    fn batch_written(&self, language: Language, path: &Path, current: usize, total: usize);
    /// Called after a language target succeeds or (under `keep-going`) fails.
    fn target_finished(&self, report: &TargetReport);
    /// Called when every selected target has run.
    fn done(&self, summary: &BuildSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn target_started(&self, _language: Language, _action: &str) {}
    fn batch_written(&self, _language: Language, _path: &Path, _current: usize, _total: usize) {}
    fn target_finished(&self, _report: &TargetReport) {}
    fn done(&self, _summary: &BuildSummary) {}
}

/// Run one target's build step.
#[instrument(skip_all, fields(language = %target.language))]
pub fn run_target(
    target: &Target,
    config: &BuildConfig,
    progress: &dyn ProgressReporter,
) -> Result<StepReport> {
    let hint = config.fetch_command.as_str();

    match target.action {
        Action::Mirror { count_extensions } => {
            steps::copy_verbatim(&target.raw, &target.output, hint)?;
            let count = count_files_with_extension(&target.output, count_extensions)?;
            Ok(StepReport::Files { count })
        }
        Action::SingleFile { out_name } => {
            let size = steps::copy_single_file(&target.raw, &target.output, out_name, hint)?;
            Ok(StepReport::Bytes { size })
        }
        Action::Filtered {
            subtree,
            extensions,
            attribution,
        } => {
            let spec = FilterSpec {
                extensions,
                subtree: Some(subtree),
                attribution: Some(attribution),
            };
            let count = steps::copy_filtered(&target.raw, &target.output, &spec, hint)?;
            Ok(StepReport::Files { count })
        }
        Action::Paginate => {
            info!(pages_per_file = config.pages_per_file.get(), "paginating PDF");
            let outcome = steps::paginate_pdf(
                &target.raw,
                &target.output,
                config.pages_per_file,
                hint,
                |path, current, total| {
                    progress.batch_written(target.language, path, current, total);
                },
            )?;
            Ok(StepReport::Pages {
                total: outcome.total_pages,
                pages_per_file: outcome.pages_per_file.get(),
                batches: outcome.files.len(),
            })
        }
    }
}

/// Build every selected language target under `config.root`, in fixed order.
///
/// Under [`FailurePolicy::FailFast`] the first failure is returned wrapped
/// with its language and later targets are not attempted. Under
/// [`FailurePolicy::KeepGoing`] failures are recorded in the summary.
#[instrument(skip_all, fields(root = %config.root.display()))]
pub fn build_corpus(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<BuildSummary> {
    let start = Instant::now();

    if config.root_looks_unusual() {
        warn!(
            root = %config.root.display(),
            expected = %config.expected_root_name,
            "root looks unusual"
        );
    }

    let mut targets = Vec::new();
    let selected = Language::ALL
        .into_iter()
        .filter(|lang| config.languages.contains(lang));

    for language in selected {
        let target = Target::for_language(&config.root, language);
        info!(%language, "{}", target.description());
        progress.target_started(language, target.description());

        let status = match run_target(&target, config, progress) {
            Ok(report) => {
                info!(%language, %report, "target built");
                TargetStatus::Built { report }
            }
            Err(e) => match config.failure_policy {
                FailurePolicy::FailFast => return Err(e.for_target(language)),
                FailurePolicy::KeepGoing => {
                    error!(%language, error = %e, "target failed, continuing");
                    TargetStatus::Failed {
                        error: e.to_string(),
                    }
                }
            },
        };

        let report = TargetReport {
            language,
            output: target.output,
            status,
        };
        progress.target_finished(&report);
        targets.push(report);
    }

    let summary = BuildSummary {
        root: config.root.clone(),
        targets,
        elapsed: start.elapsed(),
    };

    info!(
        targets = summary.targets.len(),
        failed = summary.failed().len(),
        "done"
    );
    progress.done(&summary);

    Ok(summary)
}
