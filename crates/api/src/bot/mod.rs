mod authoring;
pub mod error;


use crate::{
    correlator::{self, Resolution},
    lifecycle::{self, Report, Step},
    sampler, scorer,
    store::SessionStore,
    transport::{Prompt, Transport},
};
use core::num::NonZeroU16;
use dashmap::DashMap;
use db::Repository;
use error::Error;
use model::{
    event::{AnswerEvent, Command, Event},
    ChatId, Quiz, Session,
};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

const HELP: &str = "Send /quiz to start a quiz, /next to skip the current question, or /create to author a new quiz. \
                    Reply to one of your quizzes with an amended quiz poll or a photo to update it.";

/// Parameters of every quiz run.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Number of questions per run.
    pub session_length: NonZeroU16,
    /// How long each prompt accepts answers (in seconds).
    pub open_period: u16,
}

pub struct Bot<R, T> {
    repo: R,
    transport: T,
    sessions: SessionStore,
    /// Serializes session operations within a chat.
    locks: DashMap<ChatId, Arc<Mutex<()>>>,
    config: Config,
}

impl<R: Repository, T: Transport> Bot<R, T> {
    pub fn new(repo: R, transport: T, config: Config) -> Self {
        Self { repo, transport, config, sessions: SessionStore::default(), locks: DashMap::new() }
    }

    /// Reacts to an inbound event. Failures are reported back to the originating chat.
    pub async fn on_event(&self, event: Event) {
        let (chat, result) = match event {
            Event::Command { chat, command } => (Some(chat), self.on_command(chat, command).await),
            Event::Submission(submission) => (Some(submission.chat), self.submit(submission).await),
            Event::Answer(answer) => {
                let poll = answer.poll.clone();
                let result = self.answer(answer).await;
                (self.sessions.chat_of(&poll), result)
            }
        };

        let Err(err) = result else {
            return;
        };

        let Some(chat) = chat else {
            log::info!("dropped notice without a recipient: {err}");
            return;
        };

        if let Err(failure) = self.transport.send_text(chat, &err.to_string()).await {
            log::warn!("cannot notify chat {chat}: {failure}");
        }
    }

    async fn on_command(&self, chat: ChatId, command: Command) -> error::Result<()> {
        match command {
            Command::Start => self.start(chat).await,
            Command::Skip => self.skip(chat).await,
            Command::Create => Ok(self.transport.request_submission(chat).await?),
            Command::Help => Ok(self.transport.send_text(chat, HELP).await?),
        }
    }

    async fn lock(&self, chat: ChatId) -> OwnedMutexGuard<()> {
        let mutex = Arc::clone(&self.locks.entry(chat).or_default());
        mutex.lock_owned().await
    }

    /// Releases the chat's lock. The lock itself is forgotten once the chat has no run and
    /// nobody else is waiting on it.
    fn unlock(&self, chat: ChatId, guard: OwnedMutexGuard<()>) {
        drop(guard);
        if self.sessions.current(chat).is_none() {
            self.locks.remove_if(&chat, |_, mutex| Arc::strong_count(mutex) == 1);
        }
    }

    /// Starts a new run in the chat, discarding the one in progress.
    pub async fn start(&self, chat: ChatId) -> error::Result<()> {
        let guard = self.lock(chat).await;
        let result = self.begin(chat).await;
        self.unlock(chat, guard);
        result
    }

    async fn begin(&self, chat: ChatId) -> error::Result<()> {
        let quiz = sampler::draw(&self.repo, &[]).await?.ok_or(Error::NoQuestions)?;
        let Prompt { poll, message } = self.ask(chat, &quiz).await?;
        log::info!("chat {chat} started a run with question {} as prompt {poll}", quiz.id);

        if let Some(previous) = self.sessions.create(Session::new(poll, chat, message, &quiz)) {
            log::info!("chat {chat} abandoned its previous run at question {}", previous.index + 1);
            self.close(&previous).await;
        }

        Ok(())
    }

    /// Gives up on the outstanding question, which counts as answered incorrectly.
    pub async fn skip(&self, chat: ChatId) -> error::Result<()> {
        let guard = self.lock(chat).await;
        let result = self.pass(chat).await;
        self.unlock(chat, guard);
        result
    }

    async fn pass(&self, chat: ChatId) -> error::Result<()> {
        let poll = self.sessions.current(chat).ok_or(Error::NoSession)?;
        let Resolution::Current(session) = correlator::resolve(&self.sessions, &poll) else {
            return Err(Error::NoSession);
        };

        log::info!("chat {chat} skipped question {}", session.index + 1);
        self.proceed(session).await
    }

    /// Scores a response and moves the matching run along.
    pub async fn answer(&self, event: AnswerEvent) -> error::Result<()> {
        let Some(chat) = self.sessions.chat_of(&event.poll) else {
            return Self::stale(&event);
        };

        let guard = self.lock(chat).await;
        let result = self.score(event).await;
        self.unlock(chat, guard);
        result
    }

    async fn score(&self, event: AnswerEvent) -> error::Result<()> {
        // The run may have moved on while we waited for the lock.
        let mut session = match correlator::resolve(&self.sessions, &event.poll) {
            Resolution::Current(session) => session,
            Resolution::Superseded(_) | Resolution::Unknown => return Self::stale(&event),
        };

        let respondents = event.respondents();
        if respondents == 0 && !event.closed {
            log::debug!("prompt {} has no response yet", event.poll);
            return Ok(());
        }

        if respondents > 1 {
            log::warn!("prompt {} has {respondents} respondents but only one is supported", event.poll);
        }

        let correct = scorer::is_correct(&event, session.answer);
        scorer::apply(&mut session, correct);
        log::debug!("chat {} answered question {} (correct: {correct})", session.chat, session.index + 1);
        self.proceed(session).await
    }

    fn stale(event: &AnswerEvent) -> error::Result<()> {
        // Our own close of a superseded prompt comes back as a closed poll.
        if event.closed {
            log::debug!("ignoring closure of stale prompt {}", event.poll);
            return Ok(());
        }

        log::info!("stale answer for prompt {}", event.poll);
        Err(Error::Stale)
    }

    /// Sends the images of a question followed by its prompt.
    async fn ask(&self, chat: ChatId, quiz: &Quiz) -> error::Result<Prompt> {
        for image in &quiz.raw.images {
            if let Err(err) = self.transport.send_photo(chat, image).await {
                log::warn!("cannot send image of question {} to chat {chat}: {err}", quiz.id);
            }
        }

        Ok(self.transport.create_prompt(chat, &quiz.raw, self.config.open_period).await?)
    }

    async fn close(&self, session: &Session) {
        if let Err(err) = self.transport.close_prompt(session.chat, session.message).await {
            log::debug!("prompt {} in chat {} not closed: {err}", session.poll, session.chat);
        }
    }

    /// Asks the next question of the run, or reports the results after the last one. The session
    /// is only written back once the next prompt is out.
    async fn proceed(&self, mut session: Session) -> error::Result<()> {
        self.close(&session).await;

        let length = match lifecycle::next_step(&session, self.config.session_length) {
            Step::Finalize => self.config.session_length,
            Step::Advance => match sampler::draw(&self.repo, &session.asked).await? {
                Some(quiz) => {
                    let Prompt { poll, message } = self.ask(session.chat, &quiz).await?;
                    let previous = session.advance(poll, message, &quiz);
                    self.sessions.update(&previous, session);
                    return Ok(());
                }
                None => {
                    log::warn!("chat {} ran out of questions after {}", session.chat, session.asked.len());
                    NonZeroU16::MIN.saturating_add(session.index)
                }
            },
        };

        self.finalize(session, length).await
    }

    async fn finalize(&self, mut session: Session, length: NonZeroU16) -> error::Result<()> {
        session.finalize();
        self.sessions.clear(session.chat);

        let report = Report { marks: session.marks, length };
        log::info!("chat {} finished a run with {} over {length}", session.chat, session.marks);
        self.transport.send_text(session.chat, &report.to_string()).await?;
        Ok(())
    }

    /// Discards every run in progress. Returns how many there were.
    pub fn clear_sessions(&self) -> usize {
        let count = self.sessions.clear_all();
        self.locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        count
    }
}
