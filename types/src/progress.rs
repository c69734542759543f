/// How far the sequence has advanced, as `completed / total`.
///
/// Always derived from the driver position; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    completed: usize,
    total: usize,
}

impl Progress {
    #[must_use]
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed: completed.min(total),
            total,
        }
    }

    #[must_use]
    pub fn completed(self) -> usize {
        self.completed
    }

    /// Fraction in `0.0..=1.0`. An empty sequence reports `0.0`.
    #[must_use]
    pub fn ratio(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    #[must_use]
    pub fn percent(self) -> f64 {
        self.ratio() * 100.0
    }

    /// Percentage rounded down, as shown in the footer.
    #[must_use]
    pub fn whole_percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u8
    }
}
