use async_trait::async_trait;
use quiz_core::model::Topic;

use crate::repository::{QuestionRecord, QuestionSource, StorageError};

/// Fetches `<base_url>/<topic source name>` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpQuestionSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuestionSource {
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    #[must_use]
    pub fn url_for(&self, topic: Topic) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            topic.source_name()
        )
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn load_pool(&self, topic: Topic) -> Result<Vec<QuestionRecord>, StorageError> {
        let url = self.url_for(topic);
        log::debug!("fetching question pool {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(topic));
        }
        if !status.is_success() {
            return Err(StorageError::Connection(format!("{url} returned {status}")));
        }

        response
            .json::<Vec<QuestionRecord>>()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}
