mod question;
mod review;
mod topic;

pub use question::{OPTION_COUNT, Question, QuestionError};
pub use review::{OptionMark, Review, ReviewItem, ReviewOption, Score};
pub use topic::{Topic, TopicParseError};
