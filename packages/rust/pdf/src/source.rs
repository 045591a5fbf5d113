//! Page text sources.

use std::path::{Path, PathBuf};

use kbdocs_shared::{KbDocsError, Result};
use tracing::debug;

/// A paginated document that can yield the text of each page.
pub trait PageSource {
    /// Total number of pages.
    fn page_count(&self) -> usize;

    /// Extracted text of the page at 0-based `index`.
    fn page_text(&self, index: usize) -> Result<String>;
}

/// A PDF loaded with `lopdf`.
///
/// The file is read fully on [`PdfDocument::open`]; no handle is kept open
/// afterwards.
pub struct PdfDocument {
    path: PathBuf,
    doc: lopdf::Document,
    /// `lopdf` page numbers (1-based) in document order.
    pages: Vec<u32>,
}

impl PdfDocument {
    /// Load and parse the PDF at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = lopdf::Document::load(path).map_err(|e| KbDocsError::pdf(path, e))?;
        let pages: Vec<u32> = doc.get_pages().into_keys().collect();

        debug!(path = %path.display(), pages = pages.len(), "opened PDF");

        Ok(Self {
            path: path.to_path_buf(),
            doc,
            pages,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let number = self.pages.get(index).copied().ok_or_else(|| {
            KbDocsError::pdf(
                &self.path,
                format!("page index {index} out of range ({} pages)", self.pages.len()),
            )
        })?;

        self.doc
            .extract_text(&[number])
            .map_err(|e| KbDocsError::pdf(&self.path, e))
    }
}
