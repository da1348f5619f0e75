use std::fmt;

use quiz_core::model::Topic;
use quiz_core::{Clock, Countdown};

use super::plan::QuestionSet;
use super::service::{Phase, QuizSession, SessionTick, Submission, SubmitReason};
use super::workflow::QuizLoopService;
use crate::error::{LoadError, SessionError};

/// Identifies one topic selection. Work tagged with an older ticket is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionTicket(u64);

/// A topic whose pool could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub topic: Topic,
    pub message: String,
}

/// Owns the single live quiz session and its countdown.
///
/// Selecting a topic is split in three steps so callers can await the load
/// without holding the controller: [`QuizController::begin_topic`] cancels and
/// discards the current session synchronously, then the prepared set is handed
/// to [`QuizController::install`] (or the error to [`QuizController::fail`]).
pub struct QuizController {
    clock: Clock,
    duration_secs: u32,
    generation: u64,
    pending: Option<Topic>,
    session: Option<QuizSession>,
    last_failure: Option<LoadFailure>,
}

impl Default for QuizController {
    fn default() -> Self {
        Self::new(Clock::default())
    }
}

impl QuizController {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            duration_secs: Countdown::default().duration(),
            generation: 0,
            pending: None,
            session: None,
            last_failure: None,
        }
    }

    /// Override the countdown length used for new sessions.
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Idle, QuizSession::phase)
    }

    /// Topic whose pool is being fetched, if any.
    #[must_use]
    pub fn pending_topic(&self) -> Option<Topic> {
        self.pending
    }

    /// Topic of the live session, or of the pending load.
    #[must_use]
    pub fn active_topic(&self) -> Option<Topic> {
        self.pending
            .or_else(|| self.session.as_ref().map(QuizSession::topic))
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<&LoadFailure> {
        self.last_failure.as_ref()
    }

    #[must_use]
    pub fn current_ticket(&self) -> SessionTicket {
        SessionTicket(self.generation)
    }

    #[must_use]
    pub fn is_current(&self, ticket: SessionTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Cancel the running countdown, drop the current session and start a new
    /// generation for `topic`. The controller is `Idle` until a set is installed.
    pub fn begin_topic(&mut self, topic: Topic) -> SessionTicket {
        if let Some(mut previous) = self.session.take() {
            previous.cancel_timer();
            log::info!(
                "abandoning {} quiz at question {} with {} answers",
                previous.topic(),
                previous.current_index() + 1,
                previous.answers().len()
            );
        }
        self.generation += 1;
        self.pending = Some(topic);
        self.last_failure = None;
        log::info!("selected topic {topic}");
        SessionTicket(self.generation)
    }

    /// Install a prepared set for `ticket`, start the countdown and show question 1.
    ///
    /// Returns `Ok(false)` when a newer topic was selected in the meantime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the set has no questions.
    pub fn install(
        &mut self,
        ticket: SessionTicket,
        set: QuestionSet,
    ) -> Result<bool, SessionError> {
        if !self.is_current(ticket) {
            log::debug!("dropping stale question set for ticket {}", ticket.0);
            return Ok(false);
        }
        let Some(topic) = self.pending else {
            return Ok(false);
        };

        let mut session = QuizSession::new(
            topic,
            set,
            Countdown::new(self.duration_secs),
            self.clock.now(),
        )?;
        session.start_timer();
        self.pending = None;
        log::info!(
            "started {topic} quiz with {} questions",
            session.total_questions()
        );
        self.session = Some(session);
        Ok(true)
    }

    /// Record a failed load for `ticket`. The controller stays `Idle`.
    pub fn fail(&mut self, ticket: SessionTicket, err: &LoadError) {
        if !self.is_current(ticket) {
            return;
        }
        let Some(topic) = self.pending.take() else {
            return;
        };
        log::error!("failed to load {topic} questions: {err}");
        self.last_failure = Some(LoadFailure {
            topic,
            message: err.to_string(),
        });
    }

    /// Discard any session, fetch a fresh set for `topic` and start it.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the pool cannot be fetched or prepared.
    pub async fn select_topic(
        &mut self,
        topic: Topic,
        loader: &QuizLoopService,
    ) -> Result<(), LoadError> {
        let ticket = self.begin_topic(topic);
        let result = match loader.load_set(topic).await {
            Ok(set) => self.install(ticket, set).map(|_| ()).map_err(LoadError::from),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            self.fail(ticket, err);
        }
        result
    }

    /// Deliver one timer tick. Ticks from an older generation are ignored.
    pub fn tick(&mut self, ticket: SessionTicket) -> SessionTick {
        if !self.is_current(ticket) {
            return SessionTick::Ignored;
        }
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return SessionTick::Ignored;
        };
        let outcome = session.tick(now);
        if outcome == SessionTick::AutoSubmitted {
            log::info!("time is up, {} quiz submitted automatically", session.topic());
        }
        outcome
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoSession` when no quiz is running.
    pub fn next(&mut self) -> Result<bool, SessionError> {
        Ok(self.session_mut()?.next())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoSession` when no quiz is running.
    pub fn previous(&mut self) -> Result<bool, SessionError> {
        Ok(self.session_mut()?.previous())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoSession` when no quiz is running, or any
    /// error from [`QuizSession::select_answer`].
    pub fn select_answer(
        &mut self,
        index: usize,
        option: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.session_mut()?.select_answer(index, option)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoSession` when no quiz is running.
    pub fn submit(&mut self) -> Result<&Submission, SessionError> {
        let now = self.clock.now();
        let session = self.session_mut()?;
        let submission = session.submit(SubmitReason::Manual, now);
        log::info!(
            "submitted quiz, score {}",
            submission.review.score()
        );
        Ok(submission)
    }

    fn session_mut(&mut self) -> Result<&mut QuizSession, SessionError> {
        self.session.as_mut().ok_or(SessionError::NoSession)
    }
}

impl fmt::Debug for QuizController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizController")
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .field("session", &self.session)
            .field("last_failure", &self.last_failure)
            .finish_non_exhaustive()
    }
}
