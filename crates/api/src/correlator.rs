use crate::store::SessionStore;
use model::{ChatId, Session};

/// Outcome of matching an answer to the run it belongs to.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The answer targets the outstanding prompt of an active session.
    Current(Session),
    /// The answer targets a prompt that has since been superseded in this chat.
    Superseded(ChatId),
    /// Nothing is known about the prompt.
    Unknown,
}

/// Matches a prompt identifier against the chat's current run.
pub fn resolve(store: &SessionStore, poll: &str) -> Resolution {
    let Some(session) = store.get(poll) else {
        return store.chat_of(poll).map_or(Resolution::Unknown, Resolution::Superseded);
    };

    // Key presence alone is not enough: the session must still be running and be its chat's current one.
    if !session.is_active() || store.current(session.chat).as_deref() != Some(poll) {
        return Resolution::Superseded(session.chat);
    }

    Resolution::Current(session)
}
