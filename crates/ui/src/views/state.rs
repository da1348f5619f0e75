#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    LoadFailed,
    InvalidAnswer,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::LoadFailed => "Could not load questions. Pick a topic to try again.",
            ViewError::InvalidAnswer => "That answer does not belong to this question.",
        }
    }
}
