pub trait ProgressReporter {
    /// Called after each processed row (`current` starts at 1).
    fn report(&mut self, current: usize, total: usize);
}

/// Discards all progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _: usize, _: usize) {}
}
