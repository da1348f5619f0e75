/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    /// 0-based cursor into the question set.
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    pub is_submitted: bool,
}

impl SessionProgress {
    /// `"n / total"` with a 1-based question number.
    #[must_use]
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.current + 1, self.total)
    }
}
