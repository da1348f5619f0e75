#![forbid(unsafe_code)]

pub mod http;
pub mod json;
pub mod repository;

pub use http::HttpQuestionSource;
pub use json::{JsonDirQuestionSource, parse_records};
pub use repository::{InMemoryQuestionSource, QuestionRecord, QuestionSource, Storage, StorageError};
