use model::{event::AnswerEvent, Session};

/// Whether the sole respondent picked the correct option.
///
/// Only a single designated respondent per session is supported. A distribution with any other
/// vote, including a second vote for the correct option, is never correct.
pub fn is_correct(event: &AnswerEvent, answer: u16) -> bool {
    let answer = usize::from(answer);
    answer < event.voters.len()
        && event.voters.iter().enumerate().all(|(index, &count)| count == u32::from(index == answer))
}

pub fn apply(session: &mut Session, correct: bool) {
    if correct {
        session.marks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, is_correct};
    use model::{event::AnswerEvent, Origin, Quiz, RawQuiz, Session};

    fn event(voters: &[u32]) -> AnswerEvent {
        AnswerEvent { poll: "p".into(), voters: voters.to_vec(), closed: false }
    }

    #[test]
    fn single_respondent_distributions() {
        assert!(is_correct(&event(&[0, 0, 1, 0]), 2));
        assert!(!is_correct(&event(&[0, 1, 0, 0]), 2));
        assert!(!is_correct(&event(&[0, 0, 0, 0]), 2));
        assert!(!is_correct(&event(&[0, 0, 2, 0]), 2));
        assert!(!is_correct(&event(&[1, 0, 1, 0]), 2));
        assert!(!is_correct(&event(&[1, 0]), 2));
    }

    #[test]
    fn marks_only_grow_on_correct_answers() {
        let quiz = Quiz {
            id: 1,
            raw: RawQuiz {
                question: String::from("?"),
                options: vec![String::from("a")],
                correct_option_index: 0,
                explanation: None,
                images: Vec::new(),
                origin: Origin { chat_id: 0, message_id: 0 },
            },
        };
        let mut session = Session::new("p".into(), 1, 1, &quiz);
        apply(&mut session, false);
        assert_eq!(session.marks, 0);
        apply(&mut session, true);
        assert_eq!(session.marks, 1);
    }
}
