use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question title must not be empty")]
    EmptyTitle,

    #[error("correct answer {answer:?} is not one of the options")]
    CorrectAnswerNotAnOption { answer: String },
}

/// A multiple-choice question. Immutable once built.
///
/// `options` keep their source order, which is also the display order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    title: String,
    options: [String; OPTION_COUNT],
    correct_answer: String,
}

impl Question {
    /// Build a question, checking that the correct answer is one of the options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyTitle` for a blank title.
    /// Returns `QuestionError::CorrectAnswerNotAnOption` if `correct_answer` matches no option.
    pub fn new(
        title: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuestionError::EmptyTitle);
        }

        let correct_answer = correct_answer.into();
        if !options.iter().any(|option| *option == correct_answer) {
            return Err(QuestionError::CorrectAnswerNotAnOption {
                answer: correct_answer,
            });
        }

        Ok(Self {
            title,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }
}
