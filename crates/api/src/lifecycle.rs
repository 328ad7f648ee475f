use core::{
    cmp::Ordering,
    fmt::{self, Display},
    num::NonZeroU16,
};
use model::Session;

/// What happens to a session once its outstanding prompt has been scored.
#[derive(Debug, PartialEq, Eq)]
pub enum Step {
    /// Ask another question.
    Advance,
    /// That was the last question of the run.
    Finalize,
}

pub fn next_step(session: &Session, length: NonZeroU16) -> Step {
    if u32::from(session.index) + 1 < u32::from(length.get()) {
        Step::Advance
    } else {
        Step::Finalize
    }
}

/// Final results of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    pub marks: u16,
    pub length: NonZeroU16,
}

impl Report {
    /// Share of correct answers, rounded to the nearest integer. Ties go to the even neighbor.
    pub fn percentage(&self) -> u32 {
        let length = u32::from(self.length.get());
        let scaled = u32::from(self.marks) * 100;
        let (quotient, remainder) = (scaled / length, scaled % length);
        match (2 * remainder).cmp(&length) {
            Ordering::Greater => quotient + 1,
            Ordering::Equal if quotient % 2 == 1 => quotient + 1,
            _ => quotient,
        }
    }

    /// At least four in five answers were correct.
    pub fn passed(&self) -> bool {
        u32::from(self.marks) * 5 >= u32::from(self.length.get()) * 4
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { marks, length } = self;
        let percentage = self.percentage();
        if self.passed() {
            write!(f, "WHOOWW, Great Work! You got {marks} over {length} -> {percentage}%")
        } else {
            write!(f, "Sorry, Need more work! You got {marks} over {length} -> {percentage}%")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{next_step, Report, Step};
    use core::num::NonZeroU16;
    use model::{Origin, Quiz, RawQuiz, Session};

    fn report(marks: u16, length: u16) -> Report {
        Report { marks, length: NonZeroU16::new(length).unwrap() }
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(report(5, 5).percentage(), 100);
        assert_eq!(report(3, 5).percentage(), 60);
        assert_eq!(report(0, 5).percentage(), 0);
        assert_eq!(report(1, 3).percentage(), 33);
        assert_eq!(report(2, 3).percentage(), 67);
    }

    #[test]
    fn ties_round_to_even() {
        let eighths: Vec<_> = [1, 3, 5, 7].into_iter().map(|marks| report(marks, 8).percentage()).collect();
        assert_eq!(eighths, [12, 38, 62, 88]);
        assert_eq!(report(1, 40).percentage(), 2);
        assert_eq!(report(3, 40).percentage(), 8);
        assert_eq!(report(1, 200).percentage(), 0);
        assert_eq!(report(3, 200).percentage(), 2);
        assert_eq!(report(5, 8).to_string(), "Sorry, Need more work! You got 5 over 8 -> 62%");
    }

    #[test]
    fn pass_threshold_is_four_fifths() {
        assert!(report(5, 5).passed());
        assert!(report(4, 5).passed());
        assert!(!report(3, 5).passed());
        assert!(report(8, 10).passed());
        assert!(!report(7, 10).passed());
        assert!(report(1, 1).passed());
    }

    #[test]
    fn messages_carry_the_numbers() {
        assert_eq!(report(5, 5).to_string(), "WHOOWW, Great Work! You got 5 over 5 -> 100%");
        assert_eq!(report(3, 5).to_string(), "Sorry, Need more work! You got 3 over 5 -> 60%");
    }

    #[test]
    fn last_question_finalizes() {
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
        let length = NonZeroU16::new(2).unwrap();
        let mut session = Session::new("p".into(), 1, 1, &quiz);
        assert_eq!(next_step(&session, length), Step::Advance);
        session.index = 1;
        assert_eq!(next_step(&session, length), Step::Finalize);
        assert_eq!(next_step(&session, NonZeroU16::MIN), Step::Finalize);
    }
}
