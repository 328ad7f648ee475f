use crate::{ChatId, Draft, MessageId, Origin, PollId};
use alloc::{string::String, vec::Vec};

/// Text commands understood by the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a new quiz run in the chat.
    Start,
    /// Gives up on the outstanding question and moves on.
    Skip,
    /// Asks the chat to compose a new question.
    Create,
    Help,
}

impl Command {
    /// Parses the leading `/command` of a message, ignoring any `@botname` suffix and arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let name = word.split_once('@').map_or(word, |(name, _)| name);
        Some(match name {
            "quiz" => Self::Start,
            "next" => Self::Skip,
            "create" | "preview" => Self::Create,
            "help" | "start" => Self::Help,
            _ => return None,
        })
    }
}

/// Response distribution reported for a prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerEvent {
    pub poll: PollId,
    /// Number of voters per option, in option order.
    pub voters: Vec<u32>,
    /// Whether the prompt no longer accepts answers.
    pub closed: bool,
}

impl AnswerEvent {
    pub fn respondents(&self) -> u32 {
        self.voters.iter().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// A question with exactly one correct option.
    Question(Draft),
    /// Images to be attached to a previously submitted question.
    Photo { images: Vec<String> },
    /// A quiz whose correct option was withheld, as happens for quizzes sent in group chats.
    Undisclosed,
    /// Anything else, such as a regular poll.
    Unsupported,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionEvent {
    pub chat: ChatId,
    pub message: MessageId,
    /// The message this submission replies to, if any.
    pub reply_to: Option<Origin>,
    pub submission: Submission,
}

/// Inbound event, decided once at the transport boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Command { chat: ChatId, command: Command },
    Submission(SubmissionEvent),
    Answer(AnswerEvent),
}
