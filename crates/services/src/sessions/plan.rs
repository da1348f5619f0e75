use rand::Rng;

use quiz_core::model::Question;

/// Maximum number of questions asked in one session.
pub const QUESTION_SET_SIZE: usize = 10;

/// The randomized, size-capped subsequence of a pool used for one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    /// Keep the pool's order and only apply the size cap.
    #[must_use]
    pub fn in_order(mut questions: Vec<Question>) -> Self {
        questions.truncate(QUESTION_SET_SIZE);
        Self { questions }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Question> {
        self.questions
    }
}

/// Shuffle the whole pool, then keep the first `min(QUESTION_SET_SIZE, len)` questions.
///
/// Pools smaller than the cap are returned whole (shuffled, never padded).
pub fn prepare_set<R: Rng + ?Sized>(mut pool: Vec<Question>, rng: &mut R) -> QuestionSet {
    shuffle(&mut pool, rng);
    QuestionSet::in_order(pool)
}

/// Unbiased in-place Fisher–Yates permutation.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
