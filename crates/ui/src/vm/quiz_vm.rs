use quiz_core::Clock;
use quiz_core::model::Topic;
use services::{
    LoadError, Phase, QuestionSet, QuizController, QuizViewModel, SessionError, SessionTick,
    SessionTicket, render,
};

use crate::views::ViewError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    SelectTopic(Topic),
    Previous,
    Next,
    Choose { index: usize, option: String },
    Submit,
}

/// UI-side owner of the quiz controller.
pub struct QuizVm {
    controller: QuizController,
}

impl QuizVm {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            controller: QuizController::new(clock),
        }
    }

    #[must_use]
    pub fn controller(&self) -> &QuizController {
        &self.controller
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    #[must_use]
    pub fn active_topic(&self) -> Option<Topic> {
        self.controller.active_topic()
    }

    #[must_use]
    pub fn view_model(&self) -> QuizViewModel {
        render(&self.controller)
    }

    /// Drop the running quiz and open a new generation for `topic`.
    pub fn begin_topic(&mut self, topic: Topic) -> SessionTicket {
        self.controller.begin_topic(topic)
    }

    /// Apply the outcome of a pool load. Returns `true` when a quiz was started.
    pub fn finish_load(
        &mut self,
        ticket: SessionTicket,
        result: Result<QuestionSet, LoadError>,
    ) -> bool {
        let installed = result.and_then(|set| {
            self.controller
                .install(ticket, set)
                .map_err(LoadError::from)
        });
        match installed {
            Ok(started) => started,
            Err(err) => {
                self.controller.fail(ticket, &err);
                false
            }
        }
    }

    pub fn tick(&mut self, ticket: SessionTicket) -> SessionTick {
        self.controller.tick(ticket)
    }

    /// Apply a synchronous intent. Topic selection goes through [`QuizVm::begin_topic`].
    ///
    /// # Errors
    ///
    /// Returns `ViewError::InvalidAnswer` for a pick that does not belong to the question.
    /// Returns `ViewError::Unknown` when no quiz is running or for a topic selection.
    pub fn apply(&mut self, intent: QuizIntent) -> Result<(), ViewError> {
        let result = match intent {
            QuizIntent::SelectTopic(topic) => {
                log::warn!("selecting {topic} must go through begin_topic");
                return Err(ViewError::Unknown);
            }
            QuizIntent::Previous => self.controller.previous().map(drop),
            QuizIntent::Next => self.controller.next().map(drop),
            QuizIntent::Choose { index, option } => self.controller.select_answer(index, option),
            QuizIntent::Submit => self.controller.submit().map(drop),
        };
        result.map_err(|err| match err {
            SessionError::UnknownOption { .. } | SessionError::QuestionOutOfRange { .. } => {
                ViewError::InvalidAnswer
            }
            _ => ViewError::Unknown,
        })
    }
}
