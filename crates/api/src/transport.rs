use core::{
    fmt::{self, Display},
    future::Future,
};
use model::{ChatId, MessageId, PollId, RawQuiz};

#[derive(Debug)]
pub enum Error {
    /// The chat service could not be reached.
    Network,
    /// The chat service refused the request.
    Rejected(Box<str>),
    /// The chat service replied with an unexpected schema.
    Schema,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => f.write_str("chat service unreachable"),
            Self::Rejected(reason) => write!(f, "chat service rejected the request: {reason}"),
            Self::Schema => f.write_str("unexpected reply from the chat service"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;

/// Handle to a freshly sent choice prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub poll: PollId,
    pub message: MessageId,
}

/// Outbound operations of the chat service.
pub trait Transport: Send + Sync {
    /// Sends an interactive choice prompt that closes by itself after `open_period` seconds.
    fn create_prompt(
        &self,
        chat: ChatId,
        quiz: &RawQuiz,
        open_period: u16,
    ) -> impl Future<Output = Result<Prompt>> + Send;

    /// Stops a prompt from accepting further answers. Closing an already closed prompt may fail.
    fn close_prompt(&self, chat: ChatId, message: MessageId) -> impl Future<Output = Result<()>> + Send;

    fn send_text(&self, chat: ChatId, text: &str) -> impl Future<Output = Result<()>> + Send;

    fn send_photo(&self, chat: ChatId, image: &str) -> impl Future<Output = Result<()>> + Send;

    /// Echoes a saved submission back as a closed prompt in reply to the submitting message.
    fn send_preview(&self, chat: ChatId, reply_to: MessageId, quiz: &RawQuiz)
        -> impl Future<Output = Result<()>> + Send;

    /// Invites the chat to compose a new question with the service's native editor.
    fn request_submission(&self, chat: ChatId) -> impl Future<Output = Result<()>> + Send;
}
