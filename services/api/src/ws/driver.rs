//! Socket-free quiz driver: the per-event transition logic behind a
//! WebSocket quiz session.
//!
//! Keeping the walk here leaves `session.rs` as pure IO wiring and makes the
//! epoch guard testable: results of spawned work (generation calls, dwell
//! timers) carry the epoch they were started under and are discarded when a
//! restart has bumped it since, so nothing from an abandoned quiz can mutate
//! a newer one.

use tracing::debug;

use quizgen_core::{
    error::GenerationError,
    question::QuestionRecord,
    session::{AnswerOutcome, QuizPhase, QuizSession},
};

use super::protocol::ServerMessage;

/// Follow-up work the connection loop must schedule after a transition.
#[derive(Debug, PartialEq, Eq)]
pub enum Effect {
    /// Run the generation call and feed the result back under this epoch.
    SpawnGeneration { epoch: u64 },
    /// Start the feedback dwell timer and feed its expiry back under this epoch.
    ScheduleDwell { epoch: u64 },
}

/// Connection-scoped quiz state: at most one walk, guarded by an epoch.
#[derive(Debug, Default)]
pub struct QuizDriver {
    session: Option<QuizSession>,
    loading: bool,
    epoch: u64,
}

impl QuizDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a fresh load, superseding whatever was running.
    pub fn start(&mut self) -> (ServerMessage, Effect) {
        self.epoch += 1;
        self.session = None;
        self.loading = true;
        (
            ServerMessage::Loading,
            Effect::SpawnGeneration { epoch: self.epoch },
        )
    }

    /// Applies a generation result. Stale epochs are dropped without effect.
    pub fn loaded(
        &mut self,
        epoch: u64,
        result: Result<Vec<QuestionRecord>, GenerationError>,
    ) -> Option<ServerMessage> {
        if epoch != self.epoch || !self.loading {
            debug!(epoch, current = self.epoch, "Dropping stale generation result");
            return None;
        }
        self.loading = false;

        match result {
            Ok(questions) => {
                let session = QuizSession::new(questions);
                let message = match session.phase() {
                    QuizPhase::Finished => finished_message(&session),
                    _ => question_message(&session),
                };
                self.session = Some(session);
                Some(message)
            }
            // The load failed; the error text is user-facing, and the
            // connection stays in this failed state until a restart.
            Err(err) => Some(ServerMessage::Error {
                message: err.to_string(),
            }),
        }
    }

    /// Scores a selection against the question on display.
    ///
    /// Ignored while loading, in feedback, after the walk ended, or when no
    /// quiz exists: input strictly serializes, and a repeated selection for
    /// the same question is an idempotent no-op.
    pub fn answer(&mut self, option: &str) -> Option<(ServerMessage, Effect)> {
        let session = self.session.as_mut()?;
        let outcome = session.select(option)?;
        let correct_option = match outcome {
            AnswerOutcome::Incorrect => session
                .current_question()
                .map(|question| question.correct_option.clone()),
            AnswerOutcome::Correct => None,
        };
        Some((
            ServerMessage::Feedback {
                outcome,
                correct_option,
                score: session.score(),
            },
            Effect::ScheduleDwell { epoch: self.epoch },
        ))
    }

    /// Applies a dwell expiry: advances past feedback to the next question
    /// or the final tally. Stale epochs are dropped.
    pub fn dwell_elapsed(&mut self, epoch: u64) -> Option<ServerMessage> {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, "Dropping stale dwell expiry");
            return None;
        }
        let session = self.session.as_mut()?;
        if session.phase() != QuizPhase::Feedback {
            return None;
        }
        match session.advance() {
            QuizPhase::Finished => Some(finished_message(session)),
            _ => Some(question_message(session)),
        }
    }

    /// Discards the current walk and invalidates all pending task results.
    pub fn restart(&mut self) {
        self.epoch += 1;
        self.session = None;
        self.loading = false;
    }
}

fn question_message(session: &QuizSession) -> ServerMessage {
    match session.current_question() {
        Some(question) => ServerMessage::Question {
            index: session.current_index(),
            total: session.total(),
            text: question.text.clone(),
            options: question.options.clone(),
            score: session.score(),
        },
        None => finished_message(session),
    }
}

fn finished_message(session: &QuizSession) -> ServerMessage {
    ServerMessage::Finished {
        score: session.score(),
        total: session.total(),
        percent: session.percent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math_quiz() -> Vec<QuestionRecord> {
        vec![
            record("2+2?", &["3", "4", "5", "6"], "4"),
            record("3+3?", &["5", "6", "7", "8"], "6"),
            record("5-2?", &["1", "2", "3", "4"], "3"),
        ]
    }

    fn record(text: &str, options: &[&str], correct: &str) -> QuestionRecord {
        QuestionRecord {
            text: text.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option: correct.to_string(),
        }
    }

    fn started(questions: Vec<QuestionRecord>) -> QuizDriver {
        let mut driver = QuizDriver::new();
        let (_, Effect::SpawnGeneration { epoch }) = driver.start() else {
            panic!("start must request generation");
        };
        driver.loaded(epoch, Ok(questions));
        driver
    }

    #[test]
    fn start_enters_loading_and_requests_generation() {
        let mut driver = QuizDriver::new();

        let (message, effect) = driver.start();
        assert_eq!(message, ServerMessage::Loading);
        assert_eq!(effect, Effect::SpawnGeneration { epoch: 1 });
    }

    #[test]
    fn successful_load_presents_the_first_question() {
        let mut driver = started(math_quiz());

        // started() already consumed the load; walk one answer to prove the
        // session is live.
        let (feedback, _) = driver.answer("4").unwrap();
        assert!(matches!(
            feedback,
            ServerMessage::Feedback {
                outcome: AnswerOutcome::Correct,
                ..
            }
        ));
    }

    #[test]
    fn load_message_carries_question_zero() {
        let mut driver = QuizDriver::new();
        let (_, Effect::SpawnGeneration { epoch }) = driver.start() else {
            panic!("start must request generation");
        };

        let message = driver.loaded(epoch, Ok(math_quiz())).unwrap();
        assert_eq!(
            message,
            ServerMessage::Question {
                index: 0,
                total: 3,
                text: "2+2?".to_string(),
                options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
                score: 0,
            }
        );
    }

    #[test]
    fn failed_load_reports_the_error() {
        let mut driver = QuizDriver::new();
        let (_, Effect::SpawnGeneration { epoch }) = driver.start() else {
            panic!("start must request generation");
        };

        let message = driver
            .loaded(epoch, Err(GenerationError::Parse("no array found")))
            .unwrap();
        assert!(matches!(message, ServerMessage::Error { .. }));

        // Load failure is terminal: answers go nowhere until a restart.
        assert!(driver.answer("4").is_none());
    }

    #[test]
    fn empty_batch_finishes_immediately() {
        let mut driver = QuizDriver::new();
        let (_, Effect::SpawnGeneration { epoch }) = driver.start() else {
            panic!("start must request generation");
        };

        let message = driver.loaded(epoch, Ok(Vec::new())).unwrap();
        assert_eq!(
            message,
            ServerMessage::Finished {
                score: 0,
                total: 0,
                percent: 0,
            }
        );
    }

    #[test]
    fn stale_generation_result_is_dropped() {
        let mut driver = QuizDriver::new();
        let (_, Effect::SpawnGeneration { epoch: old }) = driver.start() else {
            panic!("start must request generation");
        };
        driver.restart();

        assert!(driver.loaded(old, Ok(math_quiz())).is_none());
        assert!(driver.answer("4").is_none());
    }

    #[test]
    fn late_result_cannot_reach_a_superseding_quiz() {
        let mut driver = QuizDriver::new();
        let (_, Effect::SpawnGeneration { epoch: old }) = driver.start() else {
            panic!("start must request generation");
        };
        // A second start supersedes the first before its result lands.
        let (_, Effect::SpawnGeneration { epoch: new }) = driver.start() else {
            panic!("start must request generation");
        };

        assert!(driver.loaded(old, Ok(Vec::new())).is_none());
        let message = driver.loaded(new, Ok(math_quiz())).unwrap();
        assert!(matches!(message, ServerMessage::Question { index: 0, .. }));
    }

    #[test]
    fn incorrect_answer_reveals_the_correct_option() {
        let mut driver = started(math_quiz());

        let (message, effect) = driver.answer("3").unwrap();
        assert_eq!(
            message,
            ServerMessage::Feedback {
                outcome: AnswerOutcome::Incorrect,
                correct_option: Some("4".to_string()),
                score: 0,
            }
        );
        assert_eq!(effect, Effect::ScheduleDwell { epoch: 1 });
    }

    #[test]
    fn input_is_refused_during_feedback() {
        let mut driver = started(math_quiz());

        assert!(driver.answer("4").is_some());
        // Still dwelling: the second selection must not score or reschedule.
        assert!(driver.answer("4").is_none());
    }

    #[test]
    fn dwell_advances_to_the_next_question() {
        let mut driver = started(math_quiz());
        let (_, Effect::ScheduleDwell { epoch }) = driver.answer("4").unwrap() else {
            panic!("answer must schedule the dwell");
        };

        let message = driver.dwell_elapsed(epoch).unwrap();
        assert_eq!(
            message,
            ServerMessage::Question {
                index: 1,
                total: 3,
                text: "3+3?".to_string(),
                options: vec!["5".into(), "6".into(), "7".into(), "8".into()],
                score: 1,
            }
        );
    }

    #[test]
    fn stale_dwell_expiry_is_dropped() {
        let mut driver = started(math_quiz());
        let (_, Effect::ScheduleDwell { epoch }) = driver.answer("4").unwrap() else {
            panic!("answer must schedule the dwell");
        };

        driver.restart();
        assert!(driver.dwell_elapsed(epoch).is_none());
    }

    #[test]
    fn dwell_without_feedback_is_a_no_op() {
        let mut driver = started(math_quiz());

        // Nothing was answered yet, so there is nothing to advance past.
        assert!(driver.dwell_elapsed(1).is_none());
    }

    #[test]
    fn walks_the_mathematics_scenario_end_to_end() {
        let mut driver = started(math_quiz());

        for (selection, expected_score) in [("4", 1), ("6", 2), ("1", 2)] {
            let (feedback, Effect::ScheduleDwell { epoch }) =
                driver.answer(selection).unwrap()
            else {
                panic!("answer must schedule the dwell");
            };
            match feedback {
                ServerMessage::Feedback { score, .. } => assert_eq!(score, expected_score),
                other => panic!("expected feedback, got {other:?}"),
            }
            let advanced = driver.dwell_elapsed(epoch).unwrap();
            if selection == "1" {
                assert_eq!(
                    advanced,
                    ServerMessage::Finished {
                        score: 2,
                        total: 3,
                        percent: 67,
                    }
                );
            }
        }
    }
}
