use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

use quiz_core::model::{Question, Review, Topic};
use quiz_core::{Countdown, TickOutcome};

use super::plan::QuestionSet;
use super::progress::SessionProgress;
use crate::error::SessionError;

/// Coarse lifecycle stage of the quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    InProgress,
    Submitted,
}

/// What ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitReason {
    Manual,
    TimeUp,
}

/// Result of feeding one timer tick into a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTick {
    Running { remaining: u32 },
    /// The countdown hit zero and the session was submitted.
    AutoSubmitted,
    /// No running countdown for this tick to act on.
    Ignored,
}

impl SessionTick {
    /// Whether the driver should keep delivering ticks.
    #[must_use]
    pub fn keeps_running(self) -> bool {
        matches!(self, SessionTick::Running { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub review: Review,
    pub reason: SubmitReason,
    pub submitted_at: DateTime<Utc>,
    /// Seconds of the countdown consumed before submission.
    pub time_used_secs: u32,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed quiz run over a prepared question set.
///
/// All mutations go through these methods; rendering reads the state through
/// accessors only.
pub struct QuizSession {
    topic: Topic,
    questions: Vec<Question>,
    current: usize,
    answers: BTreeMap<usize, String>,
    countdown: Countdown,
    started_at: DateTime<Utc>,
    submission: Option<Submission>,
}

impl QuizSession {
    /// Create a session positioned on the first question with no answers.
    ///
    /// The countdown is created stopped; call [`QuizSession::start_timer`] to run it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the set has no questions.
    pub fn new(
        topic: Topic,
        set: QuestionSet,
        countdown: Countdown,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if set.is_empty() {
            return Err(SessionError::Empty);
        }

        Ok(Self {
            topic,
            questions: set.into_inner(),
            current: 0,
            answers: BTreeMap::new(),
            countdown,
            started_at,
            submission: None,
        })
    }

    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submission(&self) -> Option<&Submission> {
        self.submission.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.submission.is_some() {
            Phase::Submitted
        } else {
            Phase::InProgress
        }
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            current: self.current,
            total: self.questions.len(),
            answered: self.answers.len(),
            is_submitted: self.is_submitted(),
        }
    }

    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.questions.len()
    }

    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.current > 0
    }

    /// Move to the next question. Returns `false` (and does nothing) on the last one.
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move to the previous question. Returns `false` (and does nothing) on the first one.
    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Record `option` as the answer to question `index`, replacing any earlier pick.
    ///
    /// Does not move the cursor.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission.
    /// Returns `SessionError::QuestionOutOfRange` or `SessionError::UnknownOption`
    /// when the pick does not belong to the set.
    pub fn select_answer(
        &mut self,
        index: usize,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        let option = option.into();
        let question = self
            .questions
            .get(index)
            .ok_or(SessionError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            })?;
        if !question.has_option(&option) {
            return Err(SessionError::UnknownOption { index, option });
        }

        self.answers.insert(index, option);
        Ok(())
    }

    /// Record an answer for the question under the cursor.
    ///
    /// Restart the countdown from the full duration.
    pub fn start_timer(&mut self) {
        self.countdown.start();
    }

    pub fn cancel_timer(&mut self) {
        self.countdown.cancel();
    }

    /// Advance the countdown by one second, submitting when it reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> SessionTick {
        match self.countdown.tick() {
            TickOutcome::Running { remaining } => SessionTick::Running { remaining },
            TickOutcome::Expired => {
                self.submit(SubmitReason::TimeUp, now);
                SessionTick::AutoSubmitted
            }
            TickOutcome::Ignored => SessionTick::Ignored,
        }
    }

    /// Stop the timer and score the current answers.
    ///
    /// Calling again rescores the unchanged answers and keeps the first reason and timestamp.
    pub fn submit(&mut self, reason: SubmitReason, now: DateTime<Utc>) -> &Submission {
        self.countdown.cancel();
        let review = Review::build(&self.questions, &self.answers);

        let submission = match self.submission.take() {
            Some(previous) => Submission { review, ..previous },
            None => Submission {
                review,
                reason,
                submitted_at: now,
                time_used_secs: self.countdown.elapsed(),
            },
        };
        self.submission.insert(submission)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("topic", &self.topic)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("remaining", &self.countdown.remaining())
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
