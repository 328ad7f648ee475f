use crate::{error, Repository};
use alloc::{string::String, vec::Vec};
use core::sync::atomic::{AtomicI64, Ordering};
use dashmap::DashMap;
use model::{Origin, Quiz, QuizId, RawQuiz};
use rand::seq::SliceRandom;

/// Process-local question store.
#[derive(Default)]
pub struct Memory {
    /// Last assigned identifier.
    last: AtomicI64,
    quizzes: DashMap<QuizId, RawQuiz>,
}

impl Memory {
    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }

    pub fn get(&self, id: QuizId) -> Option<Quiz> {
        self.quizzes.get(&id).map(|raw| Quiz { id, raw: raw.clone() })
    }

    fn pick(&self, exclude: &[QuizId]) -> Option<Quiz> {
        let eligible: Vec<_> =
            self.quizzes.iter().map(|entry| *entry.key()).filter(|id| !exclude.contains(id)).collect();
        let id = *eligible.choose(&mut rand::thread_rng())?;
        self.get(id)
    }
}

impl Repository for Memory {
    async fn sample(&self, exclude: &[QuizId]) -> error::Result<Option<Quiz>> {
        Ok(self.pick(exclude))
    }

    async fn find_by_origin(&self, origin: Origin) -> error::Result<Option<Quiz>> {
        Ok(self
            .quizzes
            .iter()
            .find(|entry| entry.value().origin == origin)
            .map(|entry| Quiz { id: *entry.key(), raw: entry.value().clone() }))
    }

    async fn insert(&self, raw: &RawQuiz) -> error::Result<QuizId> {
        if !raw.is_valid() {
            return Err(error::Error::BadInput);
        }

        if self.quizzes.iter().any(|entry| entry.value().origin == raw.origin) {
            return Err(error::Error::AlreadyExists);
        }

        let id = self.last.fetch_add(1, Ordering::Relaxed) + 1;
        self.quizzes.insert(id, raw.clone());
        Ok(id)
    }

    async fn replace(&self, quiz: &Quiz) -> error::Result<()> {
        if !quiz.raw.is_valid() {
            return Err(error::Error::BadInput);
        }

        let mut entry = self.quizzes.get_mut(&quiz.id).ok_or(error::Error::NotFound)?;
        let origin = entry.origin;
        *entry = RawQuiz { origin, ..quiz.raw.clone() };
        Ok(())
    }

    async fn append_images(&self, id: QuizId, images: &[String]) -> error::Result<()> {
        let mut entry = self.quizzes.get_mut(&id).ok_or(error::Error::NotFound)?;
        entry.images.extend_from_slice(images);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Memory, Origin, RawQuiz, Repository};
    use std::collections::HashMap;

    fn raw(message_id: i64) -> RawQuiz {
        RawQuiz {
            question: format!("Question #{message_id}"),
            options: vec![String::from("yes"), String::from("no")],
            correct_option_index: 0,
            explanation: None,
            images: Vec::new(),
            origin: Origin { chat_id: 7, message_id },
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn insert_and_amend() {
        let repo = Memory::default();
        let id = repo.insert(&raw(1)).await.unwrap();
        assert!(matches!(repo.insert(&raw(1)).await, Err(crate::error::Error::AlreadyExists)));
        assert_eq!(repo.len(), 1);

        let mut quiz = repo.find_by_origin(Origin { chat_id: 7, message_id: 1 }).await.unwrap().unwrap();
        assert_eq!(quiz.id, id);
        quiz.raw.question = String::from("Amended");
        quiz.raw.origin = Origin { chat_id: 8, message_id: 8 };
        repo.replace(&quiz).await.unwrap();

        repo.append_images(id, &[String::from("first")]).await.unwrap();
        repo.append_images(id, &[String::from("second")]).await.unwrap();
        let stored = repo.get(id).unwrap();
        assert_eq!(stored.raw.question, "Amended");
        assert_eq!(stored.raw.origin, Origin { chat_id: 7, message_id: 1 });
        assert_eq!(stored.raw.images, ["first", "second"]);
        assert_eq!(repo.len(), 1);

        assert!(matches!(repo.append_images(99, &[]).await, Err(crate::error::Error::NotFound)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejects_invalid_questions() {
        let repo = Memory::default();
        let mut bad = raw(1);
        bad.correct_option_index = 2;
        assert!(matches!(repo.insert(&bad).await, Err(crate::error::Error::BadInput)));
        assert!(repo.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sampling_excludes_and_covers() {
        let repo = Memory::default();
        let mut ids = Vec::new();
        for message in 1..=4 {
            ids.push(repo.insert(&raw(message)).await.unwrap());
        }

        let mut seen = HashMap::new();
        for _ in 0..400 {
            let quiz = repo.sample(&ids[..2]).await.unwrap().unwrap();
            assert!(!ids[..2].contains(&quiz.id));
            *seen.entry(quiz.id).or_insert(0) += 1;
        }

        // Both eligible questions come up with a fair share.
        assert_eq!(seen.len(), 2);
        assert!(seen.values().all(|&count| count > 100));

        assert!(repo.sample(&ids).await.unwrap().is_none());
    }
}
