//! Page-batch planning and naming.

use std::num::NonZeroUsize;
use std::ops::RangeInclusive;

/// A contiguous run of pages written to one output file.
///
/// `start` and `end` are 0-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBatch {
    pub start: usize,
    pub end: usize,
}

impl PageBatch {
    /// Number of pages in the batch, never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// 0-based page indices covered by this batch.
    pub fn pages(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Output file name embedding the 1-based page range, e.g.
    /// `cpp-draft.p0001-p0200.txt`.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.p{:04}-p{:04}.txt", self.start + 1, self.end + 1)
    }
}

/// Partition pages `[0, total)` into consecutive batches of `per_file`
/// pages. The last batch may be shorter; `total == 0` yields no batches.
pub fn plan_batches(total: usize, per_file: NonZeroUsize) -> Vec<PageBatch> {
    let step = per_file.get();
    (0..total)
        .step_by(step)
        .map(|start| PageBatch {
            start,
            end: start.saturating_add(step - 1).min(total - 1),
        })
        .collect()
}

/// Separator written before each page's text; `number` is 1-based.
pub fn page_marker(number: usize) -> String {
    format!("\n\n===== PAGE {number} =====\n\n")
}
