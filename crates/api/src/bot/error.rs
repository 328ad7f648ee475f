use crate::transport;
use core::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The answer belongs to a prompt that has been superseded or finalized.
    Stale,
    /// The chat has no quiz run in progress.
    NoSession,
    /// The repository has no question to start a run with.
    NoQuestions,
    /// Only quizzes with a single correct option can be authored.
    UnsupportedKind,
    /// The chat service withheld the correct option of the submitted quiz.
    UndisclosedAnswer,
    /// The replied-to message did not author any question.
    UnknownQuiz,
    /// Images must be sent in reply to an authored question.
    NoReplyTarget,
    /// The question or its options are malformed.
    InvalidQuiz,
    /// The submission has already been saved.
    Duplicate,
    Transport,
    Database,
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Self {
        use db::error::Error as DbError;
        match err {
            DbError::BadInput => Self::InvalidQuiz,
            DbError::NotFound => Self::UnknownQuiz,
            DbError::AlreadyExists => Self::Duplicate,
            DbError::Fatal => Self::Database,
        }
    }
}

impl From<transport::Error> for Error {
    fn from(_: transport::Error) -> Self {
        Self::Transport
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stale => "Sorry! Your quiz session is too old. Please send /quiz to start a new one.",
            Self::NoSession => "Sorry! No previous quiz session found. Please send /quiz to start a new one.",
            Self::NoQuestions => "Sorry! No questions are available yet. Send a quiz poll to author one.",
            Self::UnsupportedKind => {
                "Sorry! Only quiz polls are supported. Make sure to select quiz mode when building your poll."
            }
            Self::UndisclosedAnswer => {
                "Sorry! The correct answer of quizzes sent in groups is hidden from bots. \
                 Please author quizzes in a private chat with the bot."
            }
            Self::UnknownQuiz => "Sorry! The quiz you replied to was not found.",
            Self::NoReplyTarget => "Please select a quiz first by replying to it.",
            Self::InvalidQuiz => "The quiz needs a question and a valid correct option.",
            Self::Duplicate => "This quiz has already been saved.",
            Self::Transport => "We could not reach the chat service. Please try again.",
            Self::Database => "Oops! We encountered an unexpected database error on our end.",
        })
    }
}

pub type Result<T> = core::result::Result<T, Error>;
