use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown topic: {raw}")]
pub struct TopicParseError {
    pub raw: String,
}

/// One of the fixed quiz subjects, each backed by its own question source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    Html,
    Css,
    JavaScript,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Html, Topic::Css, Topic::JavaScript];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Topic::Html => "HTML",
            Topic::Css => "CSS",
            Topic::JavaScript => "JavaScript",
        }
    }

    /// File (or URL path segment) holding this topic's question pool.
    #[must_use]
    pub fn source_name(self) -> &'static str {
        match self {
            Topic::Html => "HtmlQuestions.json",
            Topic::Css => "CssQuestions.json",
            Topic::JavaScript => "JsQuestions.json",
        }
    }

    /// Short lowercase key, stable for CLI flags and element ids.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Topic::Html => "html",
            Topic::Css => "css",
            Topic::JavaScript => "js",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Topic::Html),
            "css" => Ok(Topic::Css),
            "js" | "javascript" => Ok(Topic::JavaScript),
            _ => Err(TopicParseError { raw: s.to_owned() }),
        }
    }
}
