use dashmap::DashMap;
use model::{ChatId, PollId, Session};

/// Registry of all in-flight quiz runs, one per chat.
#[derive(Default)]
pub struct SessionStore {
    /// Sessions keyed by their outstanding prompt.
    sessions: DashMap<PollId, Session>,
    /// Outstanding prompt of each chat's current session.
    current: DashMap<ChatId, PollId>,
    /// Every prompt issued during a chat's current run, superseded ones included.
    issued: DashMap<PollId, ChatId>,
}

impl SessionStore {
    /// Registers a fresh run. Any previous run in the same chat is discarded and returned.
    pub fn create(&self, session: Session) -> Option<Session> {
        let previous = self.clear(session.chat);
        self.issued.insert(session.poll.clone(), session.chat);
        self.current.insert(session.chat, session.poll.clone());
        self.sessions.insert(session.poll.clone(), session);
        previous
    }

    pub fn get(&self, poll: &str) -> Option<Session> {
        self.sessions.get(poll).map(|entry| entry.value().clone())
    }

    /// Stores `session` under its current prompt, dropping the entry keyed by `previous`.
    pub fn update(&self, previous: &str, session: Session) {
        self.sessions.remove(previous);
        self.issued.insert(session.poll.clone(), session.chat);
        self.current.insert(session.chat, session.poll.clone());
        self.sessions.insert(session.poll.clone(), session);
    }

    /// Outstanding prompt of the chat's current run.
    pub fn current(&self, chat: ChatId) -> Option<PollId> {
        self.current.get(&chat).map(|entry| entry.value().clone())
    }

    /// Chat whose current run issued the prompt.
    pub fn chat_of(&self, poll: &str) -> Option<ChatId> {
        self.issued.get(poll).map(|entry| *entry.value())
    }

    /// Forgets everything about the chat's current run.
    pub fn clear(&self, chat: ChatId) -> Option<Session> {
        let (_, poll) = self.current.remove(&chat)?;
        self.issued.retain(|_, owner| *owner != chat);
        self.sessions.remove(&poll).map(|(_, session)| session)
    }

    /// Discards every run in every chat. Returns the number of discarded sessions.
    pub fn clear_all(&self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        self.current.clear();
        self.issued.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
