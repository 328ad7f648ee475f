use crate::{ChatId, MessageId, QuizId};
use alloc::{string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// Location of the submission that authored a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Question content as submitted by its author.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_index: u16,
    pub explanation: Option<String>,
}

/// A question needs text and a correct option that exists.
fn is_valid(question: &str, options: &[String], correct_option_index: u16) -> bool {
    !question.is_empty() && usize::from(correct_option_index) < options.len()
}

impl Draft {
    pub fn is_valid(&self) -> bool {
        is_valid(&self.question, &self.options, self.correct_option_index)
    }

    /// Attaches storage metadata to this draft.
    pub fn into_raw(self, origin: Origin, images: Vec<String>) -> RawQuiz {
        let Self { question, options, correct_option_index, explanation } = self;
        RawQuiz { question, options, correct_option_index, explanation, images, origin }
    }
}

/// Acceptable schema for stored questions.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuiz {
    /// Question to be displayed in chat.
    pub question: String,
    /// Possible answers to select from.
    pub options: Vec<String>,
    /// Index of the option with the correct answer.
    pub correct_option_index: u16,
    /// Revealed to the respondent after answering.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Opaque image references sent ahead of the question.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub origin: Origin,
}

impl RawQuiz {
    pub fn is_valid(&self) -> bool {
        is_valid(&self.question, &self.options, self.correct_option_index)
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(usize::from(self.correct_option_index)).map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: QuizId,
    #[serde(flatten)]
    pub raw: RawQuiz,
}
