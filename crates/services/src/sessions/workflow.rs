use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Question, Topic};
use storage::QuestionSource;

use super::plan::{QuestionSet, prepare_set};
use crate::error::LoadError;

/// Fetches a topic's pool and turns it into a session-ready question set.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    shuffle_seed: Option<u64>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            shuffle_seed: None,
        }
    }

    /// Use a fixed seed for shuffling so sets are reproducible.
    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn source(&self) -> &Arc<dyn QuestionSource> {
        &self.source
    }

    /// Fetch and validate the full pool for `topic`, in source order.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Storage` if the source fails.
    /// Returns `LoadError::Malformed` if any record is invalid.
    /// Returns `LoadError::Empty` if the pool has no questions.
    pub async fn load_pool(&self, topic: Topic) -> Result<Vec<Question>, LoadError> {
        let records = self.source.load_pool(topic).await?;
        if records.is_empty() {
            return Err(LoadError::Empty(topic));
        }

        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .into_question()
                    .map_err(|source| LoadError::Malformed {
                        topic,
                        index,
                        source,
                    })
            })
            .collect()
    }

    /// Fetch the pool for `topic` and prepare a shuffled, capped question set.
    ///
    /// # Errors
    ///
    /// See [`QuizLoopService::load_pool`].
    pub async fn load_set(&self, topic: Topic) -> Result<QuestionSet, LoadError> {
        let pool = self.load_pool(topic).await?;
        let pool_len = pool.len();
        let set = match self.shuffle_seed {
            Some(seed) => prepare_set(pool, &mut StdRng::seed_from_u64(seed)),
            None => prepare_set(pool, &mut rand::rng()),
        };
        log::debug!(
            "prepared {} of {pool_len} {topic} questions from {}",
            set.len(),
            self.source.describe()
        );
        Ok(set)
    }
}
