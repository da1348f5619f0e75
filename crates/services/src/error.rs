//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, Topic};
use storage::StorageError;

/// Errors raised while fetching and preparing a topic's question set.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A record failed validation; the whole pool is rejected.
    #[error("question {index} in the {topic} pool is malformed: {source}")]
    Malformed {
        topic: Topic,
        index: usize,
        #[source]
        source: QuestionError,
    },

    #[error("the {0} pool has no questions")]
    Empty(Topic),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted by quiz session operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,

    #[error("no quiz in progress")]
    NoSession,

    #[error("question {index} is out of range for a set of {len}")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("{option:?} is not an option of question {index}")]
    UnknownOption { index: usize, option: String },

    #[error("quiz already submitted")]
    AlreadySubmitted,
}
