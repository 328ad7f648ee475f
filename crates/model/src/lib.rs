#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod event;
pub mod quiz;
pub mod session;

pub use quiz::{Draft, Origin, Quiz, RawQuiz};
pub use session::{Session, State};

/// Repository-assigned identifier of an authored question.
pub type QuizId = i64;
/// Chat identifier as issued by the transport.
pub type ChatId = i64;
/// Message identifier, unique within its chat.
pub type MessageId = i64;
/// Opaque identifier of an outstanding prompt.
pub type PollId = alloc::boxed::Box<str>;
