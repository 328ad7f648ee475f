#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
mod memory;

use alloc::string::String;
use core::future::Future;
use model::{Origin, Quiz, QuizId, RawQuiz};
use tokio_postgres::{error::SqlState, types::FromSql, Row};

pub use memory::Memory;
pub use tokio_postgres::{tls::NoTls, Client, Config};

/// Storage of authored questions.
pub trait Repository: Send + Sync {
    /// Draws a uniformly random question whose identifier is not in `exclude`.
    fn sample(&self, exclude: &[QuizId]) -> impl Future<Output = error::Result<Option<Quiz>>> + Send;

    /// Looks up the question authored by the submission at `origin`.
    fn find_by_origin(&self, origin: Origin) -> impl Future<Output = error::Result<Option<Quiz>>> + Send;

    /// Stores a new question and returns its assigned identifier.
    fn insert(&self, raw: &RawQuiz) -> impl Future<Output = error::Result<QuizId>> + Send;

    /// Overwrites the content of an existing question. Its identifier and origin are kept.
    fn replace(&self, quiz: &Quiz) -> impl Future<Output = error::Result<()>> + Send;

    fn append_images(&self, id: QuizId, images: &[String]) -> impl Future<Output = error::Result<()>> + Send;
}

pub struct Database(Client);

impl From<Client> for Database {
    fn from(client: Client) -> Self {
        Self(client)
    }
}

fn classify(err: tokio_postgres::Error) -> error::Error {
    let Some(db) = err.as_db_error() else {
        log::error!("database request failed: {err}");
        return error::Error::Fatal;
    };

    let code = db.code();
    if *code == SqlState::UNIQUE_VIOLATION && db.constraint() == Some("quiz_origin_key") {
        return error::Error::AlreadyExists;
    }

    if *code == SqlState::CHECK_VIOLATION || *code == SqlState::NOT_NULL_VIOLATION {
        return error::Error::BadInput;
    }

    log::error!("unexpected database error: {db}");
    error::Error::Fatal
}

fn column<'row, T: FromSql<'row>>(row: &'row Row, name: &str) -> error::Result<T> {
    row.try_get(name).map_err(|err| {
        log::error!("cannot read column `{name}`: {err}");
        error::Error::Fatal
    })
}

fn deserialize_raw_quiz_from_row(row: &Row) -> error::Result<RawQuiz> {
    let answer: i16 = column(row, "correct_option_index")?;
    Ok(RawQuiz {
        question: column(row, "question")?,
        options: column(row, "options")?,
        correct_option_index: u16::try_from(answer).map_err(|_| error::Error::Fatal)?,
        explanation: column(row, "explanation")?,
        images: column(row, "images")?,
        origin: Origin { chat_id: column(row, "chat_id")?, message_id: column(row, "message_id")? },
    })
}

fn deserialize_quiz_from_row(row: &Row) -> error::Result<Quiz> {
    let id = column(row, "id")?;
    let raw = deserialize_raw_quiz_from_row(row)?;
    Ok(Quiz { id, raw })
}

impl Repository for Database {
    async fn sample(&self, exclude: &[QuizId]) -> error::Result<Option<Quiz>> {
        let row = self
            .0
            .query_opt(
                "SELECT id, question, options, correct_option_index, explanation, images, chat_id, message_id \
                 FROM quiz WHERE NOT (id = ANY($1)) ORDER BY random() LIMIT 1",
                &[&exclude],
            )
            .await
            .map_err(classify)?;
        row.as_ref().map(deserialize_quiz_from_row).transpose()
    }

    async fn find_by_origin(&self, origin: Origin) -> error::Result<Option<Quiz>> {
        let row = self
            .0
            .query_opt(
                "SELECT id, question, options, correct_option_index, explanation, images, chat_id, message_id \
                 FROM quiz WHERE chat_id = $1 AND message_id = $2",
                &[&origin.chat_id, &origin.message_id],
            )
            .await
            .map_err(classify)?;
        row.as_ref().map(deserialize_quiz_from_row).transpose()
    }

    async fn insert(&self, raw: &RawQuiz) -> error::Result<QuizId> {
        let answer = i16::try_from(raw.correct_option_index).map_err(|_| error::Error::BadInput)?;
        let row = self
            .0
            .query_one(
                "INSERT INTO quiz (question, options, correct_option_index, explanation, images, chat_id, message_id) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
                &[
                    &raw.question,
                    &raw.options,
                    &answer,
                    &raw.explanation,
                    &raw.images,
                    &raw.origin.chat_id,
                    &raw.origin.message_id,
                ],
            )
            .await
            .map_err(classify)?;
        column(&row, "id")
    }

    async fn replace(&self, quiz: &Quiz) -> error::Result<()> {
        let Quiz { id, raw } = quiz;
        let answer = i16::try_from(raw.correct_option_index).map_err(|_| error::Error::BadInput)?;
        match self
            .0
            .execute(
                "UPDATE quiz SET question = $2, options = $3, correct_option_index = $4, explanation = $5, images = $6 \
                 WHERE id = $1",
                &[id, &raw.question, &raw.options, &answer, &raw.explanation, &raw.images],
            )
            .await
        {
            Ok(1) => Ok(()),
            Ok(0) => Err(error::Error::NotFound),
            Ok(_) => Err(error::Error::Fatal),
            Err(err) => Err(classify(err)),
        }
    }

    async fn append_images(&self, id: QuizId, images: &[String]) -> error::Result<()> {
        match self.0.execute("UPDATE quiz SET images = images || $2 WHERE id = $1", &[&id, &images]).await {
            Ok(1) => Ok(()),
            Ok(0) => Err(error::Error::NotFound),
            Ok(_) => Err(error::Error::Fatal),
            Err(err) => Err(classify(err)),
        }
    }
}
