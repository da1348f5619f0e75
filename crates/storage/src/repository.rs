use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, Topic};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::http::HttpQuestionSource;
use crate::json::JsonDirQuestionSource;

/// Errors surfaced by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("no question pool for topic {0}")]
    NotFound(Topic),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Wire shape of one question as stored in the per-topic JSON pools.
///
/// Extra fields are ignored; a missing field fails deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub title: String,
    pub answer_1: String,
    pub answer_2: String,
    pub answer_3: String,
    pub answer_4: String,
    pub right_answer: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let [a1, a2, a3, a4] = question.options().clone();
        Self {
            title: question.title().to_owned(),
            answer_1: a1,
            answer_2: a2,
            answer_3: a3,
            answer_4: a4,
            right_answer: question.correct_answer().to_owned(),
        }
    }

    /// Convert the record into a domain `Question`, keeping option order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the title is blank or `right_answer` matches no option.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            self.title,
            [self.answer_1, self.answer_2, self.answer_3, self.answer_4],
            self.right_answer,
        )
    }
}

/// Read-only contract for fetching a topic's question pool.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch every record for `topic`, in source order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the pool is missing, unreachable or not valid JSON.
    async fn load_pool(&self, topic: Topic) -> Result<Vec<QuestionRecord>, StorageError>;

    /// Human-readable location used in diagnostics.
    fn describe(&self) -> String;
}

/// Simple in-memory source for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryQuestionSource {
    pools: Arc<Mutex<HashMap<Topic, Vec<QuestionRecord>>>>,
}

impl InMemoryQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool served for `topic`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn set_pool(&self, topic: Topic, records: Vec<QuestionRecord>) -> Result<(), StorageError> {
        let mut guard = self
            .pools
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(topic, records);
        Ok(())
    }
}

#[async_trait]
impl QuestionSource for InMemoryQuestionSource {
    async fn load_pool(&self, topic: Topic) -> Result<Vec<QuestionRecord>, StorageError> {
        let guard = self
            .pools
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&topic).cloned().ok_or(StorageError::NotFound(topic))
    }

    fn describe(&self) -> String {
        "in-memory".to_owned()
    }
}

/// Bundles the question source behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(source: InMemoryQuestionSource) -> Self {
        Self {
            questions: Arc::new(source),
        }
    }

    #[must_use]
    pub fn json_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            questions: Arc::new(JsonDirQuestionSource::new(dir)),
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the HTTP client cannot be built.
    pub fn http(base_url: impl Into<String>) -> Result<Self, StorageError> {
        Ok(Self {
            questions: Arc::new(HttpQuestionSource::new(base_url)?),
        })
    }
}
