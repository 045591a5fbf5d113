//! The four corpus build operations.
//!
//! Every operation checks its raw input first and fails with
//! [`KbDocsError::MissingPrerequisite`] before touching the output
//! directory. Once the check passes the output directory is destroyed and
//! recreated, so the result never contains files from an earlier run.

use std::io;
use std::num::NonZeroUsize;
use std::path::Path;

use kbdocs_pdf::{PaginateOutcome, PdfDocument, write_batches};
use kbdocs_shared::{KbDocsError, Result};
use tracing::{debug, instrument};

use crate::fsops::{copy_file, copy_matching_files, copy_tree, reset_dir};

/// Fail unless `path` exists.
pub fn require(path: &Path, hint: &str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(KbDocsError::missing_prerequisite(path, hint))
    }
}

/// Fail unless `path` exists and is a directory.
pub fn require_dir(path: &Path, hint: &str) -> Result<()> {
    require(path, hint)?;
    if path.is_dir() {
        Ok(())
    } else {
        Err(KbDocsError::io(
            path,
            io::Error::new(
                io::ErrorKind::NotADirectory,
                "expected a directory of raw documentation",
            ),
        ))
    }
}

/// Mirror `raw_dir` into a fresh `out_dir`. Returns the number of files copied.
#[instrument(skip_all, fields(raw = %raw_dir.display(), out = %out_dir.display()))]
pub fn copy_verbatim(raw_dir: &Path, out_dir: &Path, hint: &str) -> Result<usize> {
    require_dir(raw_dir, hint)?;
    reset_dir(out_dir)?;
    copy_tree(raw_dir, out_dir)
}

/// Copy `raw_file` to `out_dir/out_name` in a fresh `out_dir`. Returns the
/// copied size in bytes.
#[instrument(skip_all, fields(raw = %raw_file.display(), out = %out_dir.display()))]
pub fn copy_single_file(
    raw_file: &Path,
    out_dir: &Path,
    out_name: &str,
    hint: &str,
) -> Result<u64> {
    require(raw_file, hint)?;
    reset_dir(out_dir)?;
    copy_file(raw_file, &out_dir.join(out_name))
}

/// What [`copy_filtered`] copies out of a raw directory.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec<'a> {
    /// Allowed extensions, without the dot, compared case-insensitively.
    pub extensions: &'a [&'a str],
    /// Sub-tree to walk, relative to both the raw and output directories.
    /// `None` walks the whole raw directory.
    pub subtree: Option<&'a str>,
    /// File at the raw directory's top level copied whatever its extension.
    pub attribution: Option<&'a str>,
}

/// Copy the files of `raw_dir` allowed by `spec` into a fresh `out_dir`.
/// Returns the number of files the extension filter copied; the
/// attribution file is not counted.
#[instrument(skip_all, fields(raw = %raw_dir.display(), out = %out_dir.display()))]
pub fn copy_filtered(
    raw_dir: &Path,
    out_dir: &Path,
    spec: &FilterSpec<'_>,
    hint: &str,
) -> Result<usize> {
    require_dir(raw_dir, hint)?;
    reset_dir(out_dir)?;

    let (src, dst) = match spec.subtree {
        Some(sub) => (raw_dir.join(sub), out_dir.join(sub)),
        None => (raw_dir.to_path_buf(), out_dir.to_path_buf()),
    };
    let copied = copy_matching_files(&src, &dst, spec.extensions)?;

    if let Some(name) = spec.attribution {
        let attribution = raw_dir.join(name);
        if attribution.is_file() {
            copy_file(&attribution, &out_dir.join(name))?;
        } else {
            debug!(path = %attribution.display(), "attribution file absent");
        }
    }

    Ok(copied)
}

/// Split `raw_pdf` into text files of `pages_per_file` pages inside a fresh
/// `out_dir`. Files are named after the PDF's stem. `on_batch` receives
/// `(path, current, total)` after each file.
#[instrument(skip_all, fields(raw = %raw_pdf.display(), out = %out_dir.display()))]
pub fn paginate_pdf(
    raw_pdf: &Path,
    out_dir: &Path,
    pages_per_file: NonZeroUsize,
    hint: &str,
    on_batch: impl FnMut(&Path, usize, usize),
) -> Result<PaginateOutcome> {
    require(raw_pdf, hint)?;
    reset_dir(out_dir)?;

    let stem = raw_pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into());

    let doc = PdfDocument::open(raw_pdf)?;
    write_batches(&doc, &stem, out_dir, pages_per_file, on_batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HINT: &str = "./fetch.sh";

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn missing_raw_dir_leaves_output_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        write(&out.join("previous.txt"), "kept");

        let err = copy_verbatim(&tmp.path().join("raw"), &out, HINT).unwrap_err();

        assert!(err.is_missing_prerequisite());
        assert!(err.to_string().contains(HINT));
        assert_eq!(fs::read_to_string(out.join("previous.txt")).unwrap(), "kept");
    }

    #[test]
    fn every_step_checks_its_prerequisite() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("missing");
        let out = tmp.path().join("out");
        let spec = FilterSpec {
            extensions: &["md"],
            subtree: None,
            attribution: None,
        };

        assert!(copy_single_file(&raw, &out, "x.txt", HINT).unwrap_err().is_missing_prerequisite());
        assert!(copy_filtered(&raw, &out, &spec, HINT).unwrap_err().is_missing_prerequisite());
        let err = paginate_pdf(&raw, &out, NonZeroUsize::MIN, HINT, |_, _, _| {}).unwrap_err();
        assert!(err.is_missing_prerequisite());
        assert!(!out.exists());
    }

    #[test]
    fn raw_file_where_directory_expected_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("python-docs-text");
        fs::write(&raw, "downloaded archive, not extracted").unwrap();
        let out = tmp.path().join("out");
        write(&out.join("previous.txt"), "kept");
        let spec = FilterSpec {
            extensions: &["md"],
            subtree: None,
            attribution: None,
        };

        for err in [
            copy_verbatim(&raw, &out, HINT).unwrap_err(),
            copy_filtered(&raw, &out, &spec, HINT).unwrap_err(),
        ] {
            assert!(!err.is_missing_prerequisite());
            let KbDocsError::Io { source, .. } = &err else {
                panic!("expected an I/O error, got {err:?}");
            };
            assert_eq!(source.kind(), io::ErrorKind::NotADirectory);
            assert!(err.to_string().contains("expected a directory"));
        }
        assert_eq!(fs::read_to_string(out.join("previous.txt")).unwrap(), "kept");
    }

    #[test]
    fn verbatim_copy_replaces_stale_output() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        write(&raw.join("library/os.txt"), "os module");
        let out = tmp.path().join("out");
        write(&out.join("stale.txt"), "stale");

        let copied = copy_verbatim(&raw, &out, HINT).unwrap();

        assert_eq!(copied, 1);
        assert!(!out.join("stale.txt").exists());
        assert_eq!(fs::read_to_string(out.join("library/os.txt")).unwrap(), "os module");
    }

    #[test]
    fn single_file_reports_size() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("ecma262.txt");
        fs::write(&raw, "ECMAScript").unwrap();
        let out = tmp.path().join("out");

        let size = copy_single_file(&raw, &out, "ecma262.txt", HINT).unwrap();

        assert_eq!(size, 10);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
    }

    #[test]
    fn filtered_copy_with_subtree_and_attribution() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("swift-book");
        write(&raw.join("TSPL.docc/LanguageGuide/Closures.md"), "# Closures");
        write(&raw.join("TSPL.docc/Assets/diagram.png"), "png");
        write(&raw.join("README.md"), "outside the subtree");
        write(&raw.join("LICENSE.txt"), "Apache");
        let out = tmp.path().join("out");

        let spec = FilterSpec {
            extensions: &["md"],
            subtree: Some("TSPL.docc"),
            attribution: Some("LICENSE.txt"),
        };
        let copied = copy_filtered(&raw, &out, &spec, HINT).unwrap();

        assert_eq!(copied, 1);
        assert!(out.join("TSPL.docc/LanguageGuide/Closures.md").is_file());
        assert!(!out.join("README.md").exists());
        assert!(!out.join("TSPL.docc/Assets").exists());
        assert_eq!(fs::read_to_string(out.join("LICENSE.txt")).unwrap(), "Apache");
    }

    #[test]
    fn filtered_copy_without_attribution_file() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("raw");
        write(&raw.join("a.md"), "a");
        let out = tmp.path().join("out");

        let spec = FilterSpec {
            extensions: &["md"],
            subtree: None,
            attribution: Some("LICENSE.txt"),
        };
        assert_eq!(copy_filtered(&raw, &out, &spec, HINT).unwrap(), 1);
        assert!(!out.join("LICENSE.txt").exists());
    }

    #[test]
    fn unreadable_pdf_fails_after_reset() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = tmp.path().join("cpp-draft.pdf");
        fs::write(&raw, "not a pdf").unwrap();
        let out = tmp.path().join("out");
        write(&out.join("cpp-draft.p0001-p0200.txt"), "stale");

        let err = paginate_pdf(&raw, &out, NonZeroUsize::MIN, HINT, |_, _, _| {}).unwrap_err();

        assert!(matches!(err, KbDocsError::Pdf { .. }));
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }
}
