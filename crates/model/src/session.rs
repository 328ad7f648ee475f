use crate::{ChatId, MessageId, PollId, Quiz, QuizId};
use alloc::{vec, vec::Vec};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum State {
    /// Waiting for an answer to the outstanding prompt.
    Active,
    /// The results have been reported. No further transitions.
    Finalized,
}

/// One in-progress quiz run for a chat.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    /// Identifier of the outstanding prompt. This is also the key under which the session is stored.
    pub poll: PollId,
    /// Chat in which the run takes place.
    pub chat: ChatId,
    /// Message carrying the outstanding prompt, closed once it has been answered.
    pub message: MessageId,
    /// Index of the correct option of the outstanding prompt.
    pub answer: u16,
    /// Zero-based index of the outstanding question. Equivalently, the number of answered questions.
    pub index: u16,
    /// Number of correct answers so far.
    pub marks: u16,
    /// Questions used in this run in the order they were asked.
    pub asked: Vec<QuizId>,
    pub state: State,
}

impl Session {
    pub fn new(poll: PollId, chat: ChatId, message: MessageId, quiz: &Quiz) -> Self {
        Self {
            poll,
            chat,
            message,
            answer: quiz.raw.correct_option_index,
            index: 0,
            marks: 0,
            asked: vec![quiz.id],
            state: State::Active,
        }
    }

    pub const fn is_active(&self) -> bool {
        matches!(self.state, State::Active)
    }

    pub fn has_asked(&self, id: QuizId) -> bool {
        self.asked.contains(&id)
    }

    /// Moves on to the next question, now outstanding as `poll`. Returns the superseded prompt identifier.
    pub fn advance(&mut self, poll: PollId, message: MessageId, quiz: &Quiz) -> PollId {
        debug_assert!(self.is_active());
        debug_assert!(!self.has_asked(quiz.id));
        self.asked.push(quiz.id);
        self.index += 1;
        self.answer = quiz.raw.correct_option_index;
        self.message = message;
        core::mem::replace(&mut self.poll, poll)
    }

    pub fn finalize(&mut self) {
        self.state = State::Finalized;
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, State};
    use crate::{Origin, Quiz, RawQuiz};
    use alloc::{string::String, vec, vec::Vec};

    fn quiz(id: i64, correct_option_index: u16) -> Quiz {
        Quiz {
            id,
            raw: RawQuiz {
                question: String::from("Pick one"),
                options: vec![String::from("a"), String::from("b"), String::from("c")],
                correct_option_index,
                explanation: None,
                images: Vec::new(),
                origin: Origin { chat_id: 1, message_id: id },
            },
        }
    }

    #[test]
    fn advance_rekeys_and_records_history() {
        let mut session = Session::new("first".into(), 10, 100, &quiz(3, 1));
        assert!(session.is_active());
        assert_eq!(session.asked, [3]);
        assert_eq!(session.answer, 1);

        session.marks += 1;
        let previous = session.advance("second".into(), 101, &quiz(5, 2));
        assert_eq!(previous.as_ref(), "first");
        assert_eq!(session.poll.as_ref(), "second");
        assert_eq!(session.message, 101);
        assert_eq!(session.index, 1);
        assert_eq!(session.answer, 2);
        assert_eq!(session.asked, [3, 5]);
        assert!(session.marks <= session.index);

        session.finalize();
        assert_eq!(session.state, State::Finalized);
        assert!(!session.is_active());
    }
}
