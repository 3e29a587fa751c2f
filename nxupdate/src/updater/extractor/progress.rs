//! Entry-count based extraction progress.

/// Callback invoked after every processed entry.
pub type ExtractionProgressCallback = Box<dyn Fn(&ExtractionProgress) + Send + Sync>;

/// Progress of an extraction, measured in entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionProgress {
    total: usize,
    processed: usize,
}

impl ExtractionProgress {
    /// Start tracking an extraction of `total` entries.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Count one more processed entry. Saturates at the total.
    pub fn advance(&mut self) {
        if self.processed < self.total {
            self.processed += 1;
        }
    }

    /// `floor(processed * 100 / total)`; an empty archive is 100% done.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.processed as u128 * 100) / self.total as u128) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.processed == self.total
    }
}
