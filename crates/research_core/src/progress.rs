pub const PROGRESS_STEP: u8 = 10;
pub const PROGRESS_CAP: u8 = 90;

/// Cosmetic progress bar value.
///
/// The backend reports no real progress, so each in-progress poll nudges the
/// bar forward by [`PROGRESS_STEP`] up to [`PROGRESS_CAP`]. Only a completed
/// job takes it to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressIndicator {
    percent: u8,
}

impl ProgressIndicator {
    pub fn percent(self) -> u8 {
        self.percent
    }

    pub fn reset(&mut self) {
        self.percent = 0;
    }

    pub fn advance(&mut self) {
        let next = self.percent.saturating_add(PROGRESS_STEP).min(PROGRESS_CAP);
        self.percent = self.percent.max(next);
    }

    pub fn complete(&mut self) {
        self.percent = 100;
    }
}
