use std::collections::BTreeMap;
use std::fmt;

use crate::model::Question;

/// How an option is highlighted in the post-submission review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    /// The question's correct option, whether picked or not.
    Correct,
    /// The user's pick, when it was wrong.
    IncorrectPick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOption {
    pub text: String,
    pub mark: OptionMark,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    /// 1-based position in the question set.
    pub number: usize,
    pub title: String,
    pub options: Vec<ReviewOption>,
    pub chosen: Option<String>,
    pub is_correct: bool,
}

/// Correct answers over total questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    correct: usize,
    total: usize,
}

impl Score {
    #[must_use]
    pub fn new(correct: usize, total: usize) -> Self {
        Self {
            correct: correct.min(total),
            total,
        }
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whole-number percentage, rounded to nearest. Zero for an empty set.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let scaled = (self.correct * 200 + self.total) / (self.total * 2);
        u32::try_from(scaled).unwrap_or(100)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.correct, self.total)
    }
}

/// Full post-submission listing: every question with correctness annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    items: Vec<ReviewItem>,
    score: Score,
}

impl Review {
    /// Score `questions` against `answers` (question index to chosen option).
    ///
    /// Unanswered questions count as incorrect.
    #[must_use]
    pub fn build(questions: &[Question], answers: &BTreeMap<usize, String>) -> Self {
        let items: Vec<ReviewItem> = questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let chosen = answers.get(&index).map(String::as_str);
                review_item(index, question, chosen)
            })
            .collect();

        let correct = items.iter().filter(|item| item.is_correct).count();
        let score = Score::new(correct, questions.len());

        Self { items, score }
    }

    #[must_use]
    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }
}

fn review_item(index: usize, question: &Question, chosen: Option<&str>) -> ReviewItem {
    let options = question
        .options()
        .iter()
        .map(|text| {
            let selected = chosen == Some(text.as_str());
            let mark = if question.is_correct(text) {
                OptionMark::Correct
            } else if selected {
                OptionMark::IncorrectPick
            } else {
                OptionMark::Neutral
            };
            ReviewOption {
                text: text.clone(),
                mark,
                selected,
            }
        })
        .collect();

    ReviewItem {
        number: index + 1,
        title: question.title().to_owned(),
        options,
        chosen: chosen.map(str::to_owned),
        is_correct: chosen.is_some_and(|c| question.is_correct(c)),
    }
}
