//! PDF pagination for the kbdocs corpus.
//!
//! Splits a PDF's page sequence into fixed-size batches and writes one text
//! file per batch, each page prefixed with a `===== PAGE <n> =====` marker.
//! Text extraction is delegated to a [`PageSource`]; [`PdfDocument`] is the
//! `lopdf`-backed implementation.

pub mod batch;
pub mod source;
pub mod writer;

pub use batch::{PageBatch, page_marker, plan_batches};
pub use source::{PageSource, PdfDocument};
pub use writer::{PaginateOutcome, write_batches};
