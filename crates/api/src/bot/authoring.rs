use super::{
    error::{self, Error},
    Bot,
};
use crate::transport::Transport;
use db::Repository;
use model::{
    event::{Submission, SubmissionEvent},
    ChatId, MessageId, Origin, Quiz, RawQuiz,
};

pub(super) const QUIZ_SAVED: &str = "All done, great! Quiz saved successfully.";
const QUIZ_UPDATED: &str = "All done, great! Quiz updated successfully.";
const IMAGES_ATTACHED: &str = "All done, great! Images attached to the quiz.";

impl<R: Repository, T: Transport> Bot<R, T> {
    /// Saves a new question, amends the one replied to, or attaches images to it.
    pub async fn submit(&self, event: SubmissionEvent) -> error::Result<()> {
        let SubmissionEvent { chat, message, reply_to, submission } = event;
        let draft = match submission {
            Submission::Question(draft) => draft,
            Submission::Photo { images } => {
                let target = reply_to.ok_or(Error::NoReplyTarget)?;
                let quiz = self.repo.find_by_origin(target).await?.ok_or(Error::NoReplyTarget)?;
                self.repo.append_images(quiz.id, &images).await?;
                log::info!("attached {} images to question {}", images.len(), quiz.id);
                return Ok(self.transport.send_text(chat, IMAGES_ATTACHED).await?);
            }
            Submission::Undisclosed => return Err(Error::UndisclosedAnswer),
            Submission::Unsupported => return Err(Error::UnsupportedKind),
        };

        if !draft.is_valid() {
            return Err(Error::InvalidQuiz);
        }

        let Some(target) = reply_to else {
            let raw = draft.into_raw(Origin { chat_id: chat, message_id: message }, Vec::new());
            let id = self.repo.insert(&raw).await?;
            log::info!("chat {chat} authored question {id}");
            return self.acknowledge(chat, message, &raw, QUIZ_SAVED).await;
        };

        let Quiz { id, raw: existing } = self.repo.find_by_origin(target).await?.ok_or(Error::UnknownQuiz)?;
        let quiz = Quiz { id, raw: draft.into_raw(existing.origin, existing.images) };
        self.repo.replace(&quiz).await?;
        log::info!("chat {chat} amended question {id}");
        self.acknowledge(chat, message, &quiz.raw, QUIZ_UPDATED).await
    }

    async fn acknowledge(&self, chat: ChatId, message: MessageId, raw: &RawQuiz, notice: &str) -> error::Result<()> {
        if let Err(err) = self.transport.send_preview(chat, message, raw).await {
            log::warn!("cannot preview the submission in chat {chat}: {err}");
        }

        Ok(self.transport.send_text(chat, notice).await?)
    }
}
