//! Subset of the Telegram Bot API schema used by the bot.

use model::{
    event::{AnswerEvent, Command, Event, Submission, SubmissionEvent},
    ChatId, Draft, MessageId, Origin,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    /// New state of a poll sent by the bot.
    pub poll: Option<Poll>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub chat: Chat,
    pub text: Option<String>,
    pub poll: Option<Poll>,
    /// Available sizes of an attached photo.
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollKind {
    Regular,
    Quiz,
}

#[derive(Debug, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub voter_count: u32,
}

#[derive(Debug, Deserialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    pub is_closed: bool,
    #[serde(rename = "type")]
    pub kind: PollKind,
    #[serde(default)]
    pub allows_multiple_answers: bool,
    pub correct_option_id: Option<u16>,
    pub explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

/// Body of `sendPoll`.
#[derive(Debug, Serialize)]
pub struct SendPoll<'a> {
    pub chat_id: ChatId,
    pub question: &'a str,
    pub options: Vec<InputPollOption<'a>>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub correct_option_id: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_period: Option<u16>,
    pub is_closed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<MessageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct InputPollOption<'a> {
    pub text: &'a str,
}

impl Message {
    fn origin(&self) -> Origin {
        Origin { chat_id: self.chat.id, message_id: self.message_id }
    }
}

impl Poll {
    fn into_submission(self) -> Submission {
        let correct_option_index = match (self.kind, self.correct_option_id, self.allows_multiple_answers) {
            (PollKind::Quiz, Some(index), false) => index,
            (PollKind::Quiz, None, false) => return Submission::Undisclosed,
            _ => return Submission::Unsupported,
        };

        Submission::Question(Draft {
            question: self.question,
            options: self.options.into_iter().map(|option| option.text).collect(),
            correct_option_index,
            explanation: self.explanation,
        })
    }
}

impl Update {
    /// Classifies the update into one of the events the bot reacts to.
    pub fn into_event(self) -> Option<Event> {
        if let Some(Poll { id, options, is_closed, .. }) = self.poll {
            let voters = options.into_iter().map(|option| option.voter_count).collect();
            return Some(Event::Answer(AnswerEvent { poll: id.into_boxed_str(), voters, closed: is_closed }));
        }

        let message = self.message?;
        let chat = message.chat.id;
        let reply_to = message.reply_to_message.as_deref().map(Message::origin);

        if let Some(poll) = message.poll {
            let submission = poll.into_submission();
            return Some(Event::Submission(SubmissionEvent { chat, message: message.message_id, reply_to, submission }));
        }

        // Telegram sends every photo in several resolutions. Keep the largest one.
        if let Some(largest) = message.photo.iter().max_by_key(|size| u64::from(size.width) * u64::from(size.height)) {
            let submission = Submission::Photo { images: vec![largest.file_id.clone()] };
            return Some(Event::Submission(SubmissionEvent { chat, message: message.message_id, reply_to, submission }));
        }

        let command = message.text.as_deref().and_then(Command::parse)?;
        Some(Event::Command { chat, command })
    }
}
