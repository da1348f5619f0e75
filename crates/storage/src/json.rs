use async_trait::async_trait;
use quiz_core::model::Topic;
use std::path::{Path, PathBuf};

use crate::repository::{QuestionRecord, QuestionSource, StorageError};

/// Parse a JSON array of question records.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for invalid JSON or a record missing a field.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<QuestionRecord>, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Reads `<dir>/<topic source name>` from the local filesystem.
#[derive(Debug, Clone)]
pub struct JsonDirQuestionSource {
    dir: PathBuf,
}

impl JsonDirQuestionSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, topic: Topic) -> PathBuf {
        self.dir.join(topic.source_name())
    }
}

#[async_trait]
impl QuestionSource for JsonDirQuestionSource {
    async fn load_pool(&self, topic: Topic) -> Result<Vec<QuestionRecord>, StorageError> {
        let path = self.path_for(topic);
        log::debug!("reading question pool {}", path.display());
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(topic),
            _ => StorageError::Connection(format!("{}: {e}", path.display())),
        })?;
        parse_records(&bytes)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}
