//! The linear quiz-progression state machine.
//!
//! Pure and synchronous. The generation call that precedes a session and the
//! feedback dwell timer both belong to the driver that owns the session, so
//! every transition here is a plain method call and the whole walk is
//! testable without a runtime.

use serde::{Deserialize, Serialize};

use crate::question::QuestionRecord;

/// Result of scoring one answer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

/// Where the session currently is in its walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// The current question is on display and no selection was made yet.
    AwaitingAnswer,
    /// A selection was scored; the outcome holds until the driver advances.
    Feedback,
    /// Every index was consumed. Terminal for this question set.
    Finished,
}

/// State for one walk through a generated question set.
///
/// The set is immutable once the session exists; restarting means discarding
/// the session and generating a new set.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuestionRecord>,
    current_index: usize,
    score: u32,
    outcome: Option<AnswerOutcome>,
}

impl QuizSession {
    /// Starts a session over `questions`.
    ///
    /// An empty set is already `Finished` at 0/0 rather than presenting
    /// anything.
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            outcome: None,
        }
    }

    pub fn phase(&self) -> QuizPhase {
        if self.current_index == self.questions.len() {
            QuizPhase::Finished
        } else if self.outcome.is_some() {
            QuizPhase::Feedback
        } else {
            QuizPhase::AwaitingAnswer
        }
    }

    /// The question on display, while one is.
    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Outcome of the current question's selection, cleared on advance.
    pub fn last_outcome(&self) -> Option<AnswerOutcome> {
        self.outcome
    }

    /// Scores a selection against the current question by exact string match.
    ///
    /// The first selection per question counts; every later one is ignored
    /// (`None`), as is any selection after the walk ended.
    pub fn select(&mut self, option: &str) -> Option<AnswerOutcome> {
        if self.phase() != QuizPhase::AwaitingAnswer {
            return None;
        }
        let question = &self.questions[self.current_index];
        let outcome = if option == question.correct_option {
            self.score += 1;
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }

    /// Leaves `Feedback`: clears the outcome and moves to the next question,
    /// or finishes after the last one. A no-op in any other phase.
    pub fn advance(&mut self) -> QuizPhase {
        if self.phase() == QuizPhase::Feedback {
            self.outcome = None;
            self.current_index += 1;
        }
        self.phase()
    }

    /// Accuracy rounded to the nearest whole percent, 0 for an empty set.
    pub fn percent(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        (f64::from(self.score) * 100.0 / self.questions.len() as f64).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, correct: &str, wrong: [&str; 3]) -> QuestionRecord {
        QuestionRecord {
            text: text.to_string(),
            options: vec![
                wrong[0].to_string(),
                correct.to_string(),
                wrong[1].to_string(),
                wrong[2].to_string(),
            ],
            correct_option: correct.to_string(),
        }
    }

    fn math_quiz() -> Vec<QuestionRecord> {
        vec![
            question("2+2?", "4", ["3", "5", "6"]),
            question("3+3?", "6", ["5", "7", "8"]),
            question("5-2?", "3", ["1", "2", "4"]),
        ]
    }

    #[test]
    fn walks_the_mathematics_scenario() {
        let mut session = QuizSession::new(math_quiz());

        assert_eq!(session.phase(), QuizPhase::AwaitingAnswer);
        assert_eq!(session.select("4"), Some(AnswerOutcome::Correct));
        assert_eq!(session.phase(), QuizPhase::Feedback);
        assert_eq!(session.advance(), QuizPhase::AwaitingAnswer);

        assert_eq!(session.select("6"), Some(AnswerOutcome::Correct));
        assert_eq!(session.advance(), QuizPhase::AwaitingAnswer);

        assert_eq!(session.select("1"), Some(AnswerOutcome::Incorrect));
        assert_eq!(session.advance(), QuizPhase::Finished);

        assert_eq!(session.score(), 2);
        assert_eq!(session.total(), 3);
        assert_eq!(session.percent(), 67);
    }

    #[test]
    fn score_counts_exact_matches_only() {
        let mut session = QuizSession::new(math_quiz());

        // Whitespace and case differences are not matches.
        session.select(" 4");
        session.advance();
        session.select("6");
        session.advance();
        session.select("3");
        session.advance();

        assert_eq!(session.score(), 2);
        assert_eq!(session.phase(), QuizPhase::Finished);
    }

    #[test]
    fn second_selection_is_an_idempotent_no_op() {
        let mut session = QuizSession::new(math_quiz());

        assert_eq!(session.select("3"), Some(AnswerOutcome::Incorrect));
        // A follow-up selection, correct or not, changes nothing.
        assert_eq!(session.select("4"), None);
        assert_eq!(session.score(), 0);
        assert_eq!(session.last_outcome(), Some(AnswerOutcome::Incorrect));
    }

    #[test]
    fn selection_after_finish_is_ignored() {
        let mut session = QuizSession::new(vec![question("2+2?", "4", ["3", "5", "6"])]);

        session.select("4");
        session.advance();
        assert_eq!(session.phase(), QuizPhase::Finished);

        assert_eq!(session.select("4"), None);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn advance_outside_feedback_is_a_no_op() {
        let mut session = QuizSession::new(math_quiz());

        assert_eq!(session.advance(), QuizPhase::AwaitingAnswer);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn empty_set_finishes_immediately() {
        let session = QuizSession::new(Vec::new());

        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(session.score(), 0);
        assert_eq!(session.total(), 0);
        assert_eq!(session.percent(), 0);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn outcome_clears_between_questions() {
        let mut session = QuizSession::new(math_quiz());

        session.select("4");
        assert_eq!(session.last_outcome(), Some(AnswerOutcome::Correct));
        session.advance();
        assert_eq!(session.last_outcome(), None);
    }

    #[test]
    fn finished_exactly_when_every_index_is_consumed() {
        let mut session = QuizSession::new(math_quiz());

        for index in 0..3 {
            assert_eq!(session.current_index(), index);
            assert_ne!(session.phase(), QuizPhase::Finished);
            session.select("never right");
            session.advance();
        }
        assert_eq!(session.phase(), QuizPhase::Finished);
        assert_eq!(session.current_index(), session.total());
    }

    #[test]
    fn percent_rounds_to_nearest() {
        let mut session = QuizSession::new(math_quiz());
        session.select("4");
        session.advance();
        session.select("wrong");
        session.advance();
        session.select("wrong");
        session.advance();

        // 1/3 rounds to 33, 2/3 to 67.
        assert_eq!(session.percent(), 33);
    }
}
