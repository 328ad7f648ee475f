use db::{error, Repository};
use model::{Quiz, QuizId};

/// Draws a question that has not been asked in this run. Returns `None` once the pool is exhausted.
pub async fn draw<R: Repository>(repo: &R, exclude: &[QuizId]) -> error::Result<Option<Quiz>> {
    let Some(quiz) = repo.sample(exclude).await? else {
        log::debug!("no eligible question left after excluding {} asked", exclude.len());
        return Ok(None);
    };

    if exclude.contains(&quiz.id) {
        log::error!("repository returned excluded question {}", quiz.id);
        return Err(error::Error::Fatal);
    }

    Ok(Some(quiz))
}

#[cfg(test)]
mod tests {
    use super::draw;
    use db::{Memory, Repository};
    use model::{Origin, RawQuiz};

    fn raw(message_id: i64) -> RawQuiz {
        RawQuiz {
            question: String::from("Which one?"),
            options: vec![String::from("this"), String::from("that")],
            correct_option_index: 1,
            explanation: None,
            images: Vec::new(),
            origin: Origin { chat_id: 1, message_id },
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn exhausted_pool_yields_nothing() {
        let repo = Memory::default();
        assert!(draw(&repo, &[]).await.unwrap().is_none());

        let only = repo.insert(&raw(7)).await.unwrap();
        assert!(draw(&repo, &[only]).await.unwrap().is_none());
        assert_eq!(draw(&repo, &[]).await.unwrap().unwrap().id, only);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn never_repeats_within_a_run() {
        let repo = Memory::default();
        for message in 0..6 {
            repo.insert(&raw(message)).await.unwrap();
        }

        let mut asked = Vec::new();
        while let Some(quiz) = draw(&repo, &asked).await.unwrap() {
            assert!(!asked.contains(&quiz.id));
            asked.push(quiz.id);
        }
        assert_eq!(asked.len(), 6);
    }
}
