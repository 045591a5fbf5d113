//! Batch file writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use kbdocs_shared::{KbDocsError, Result};
use tracing::{debug, info, instrument};

use crate::batch::{page_marker, plan_batches};
use crate::source::PageSource;

/// What [`write_batches`] produced.
#[derive(Debug, Clone)]
pub struct PaginateOutcome {
    /// Page count of the source document.
    pub total_pages: usize,
    /// Batch size used.
    pub pages_per_file: NonZeroUsize,
    /// Written files, in page order.
    pub files: Vec<PathBuf>,
}

/// Write one text file per page batch into `out_dir`, which must exist.
///
/// Each page contributes its [`page_marker`] followed by its text. A page
/// whose extraction fails or yields nothing contributes the marker only.
/// `on_batch` is called after each file with `(path, current, total)`.
#[instrument(
    skip_all,
    fields(out_dir = %out_dir.display(), stem = %stem, pages_per_file = per_file.get())
)]
pub fn write_batches<S>(
    source: &S,
    stem: &str,
    out_dir: &Path,
    per_file: NonZeroUsize,
    mut on_batch: impl FnMut(&Path, usize, usize),
) -> Result<PaginateOutcome>
where
    S: PageSource + ?Sized,
{
    let total_pages = source.page_count();
    let batches = plan_batches(total_pages, per_file);
    let mut files = Vec::with_capacity(batches.len());

    for (i, batch) in batches.iter().enumerate() {
        let path = out_dir.join(batch.file_name(stem));
        info!(file = %batch.file_name(stem), "writing page batch");

        let file = File::create(&path).map_err(|e| KbDocsError::io(&path, e))?;
        let mut out = BufWriter::new(file);

        for index in batch.pages() {
            let text = match source.page_text(index) {
                Ok(text) => text,
                Err(e) => {
                    debug!(page = index + 1, error = %e, "no text extracted");
                    String::new()
                }
            };
            out.write_all(page_marker(index + 1).as_bytes())
                .and_then(|()| out.write_all(text.as_bytes()))
                .map_err(|e| KbDocsError::io(&path, e))?;
        }

        out.flush().map_err(|e| KbDocsError::io(&path, e))?;
        on_batch(&path, i + 1, batches.len());
        files.push(path);
    }

    Ok(PaginateOutcome {
        total_pages,
        pages_per_file: per_file,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pages held in memory; `None` simulates an extraction failure.
    struct FakePages(Vec<Option<&'static str>>);

    impl PageSource for FakePages {
        fn page_count(&self) -> usize {
            self.0.len()
        }

        fn page_text(&self, index: usize) -> Result<String> {
            self.0[index]
                .map(str::to_owned)
                .ok_or_else(|| KbDocsError::pdf("fake.pdf", "unreadable page"))
        }
    }

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn writes_one_file_per_batch_with_markers() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakePages(vec![Some("alpha"), Some("beta"), Some("gamma")]);

        let outcome = write_batches(&source, "draft", dir.path(), nz(2), |_, _, _| {}).unwrap();

        assert_eq!(outcome.total_pages, 3);
        assert_eq!(outcome.files.len(), 2);

        let first = std::fs::read_to_string(dir.path().join("draft.p0001-p0002.txt")).unwrap();
        assert_eq!(
            first,
            "\n\n===== PAGE 1 =====\n\nalpha\n\n===== PAGE 2 =====\n\nbeta"
        );

        let second = std::fs::read_to_string(dir.path().join("draft.p0003-p0003.txt")).unwrap();
        assert_eq!(second, "\n\n===== PAGE 3 =====\n\ngamma");
    }

    #[test]
    fn failed_page_writes_empty_text() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakePages(vec![Some("one"), None, Some("")]);

        write_batches(&source, "draft", dir.path(), nz(10), |_, _, _| {}).unwrap();

        let content = std::fs::read_to_string(dir.path().join("draft.p0001-p0003.txt")).unwrap();
        assert_eq!(
            content,
            "\n\n===== PAGE 1 =====\n\none\n\n===== PAGE 2 =====\n\n\n\n===== PAGE 3 =====\n\n"
        );
    }

    #[test]
    fn zero_pages_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakePages(Vec::new());

        let outcome = write_batches(&source, "draft", dir.path(), nz(200), |_, _, _| {}).unwrap();

        assert_eq!(outcome.total_pages, 0);
        assert!(outcome.files.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn reports_progress_per_batch() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakePages(vec![Some("x"); 5]);
        let mut seen = Vec::new();

        write_batches(&source, "d", dir.path(), nz(2), |path, current, total| {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            seen.push((name, current, total));
        })
        .unwrap();

        assert_eq!(
            seen,
            vec![
                ("d.p0001-p0002.txt".to_string(), 1, 3),
                ("d.p0003-p0004.txt".to_string(), 2, 3),
                ("d.p0005-p0005.txt".to_string(), 3, 3),
            ]
        );
    }

    #[test]
    fn missing_output_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakePages(vec![Some("x")]);

        let err = write_batches(&source, "d", &dir.path().join("absent"), nz(1), |_, _, _| {})
            .unwrap_err();
        assert!(matches!(err, KbDocsError::Io { .. }));
    }
}
