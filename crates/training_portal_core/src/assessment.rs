//! crates/training_portal_core/src/assessment.rs
//!
//! Grades a module quiz and, on a pass, drives the sequencer's completion
//! transition. Failed attempts leave no trace and may be retaken freely.

use tracing::info;

use crate::catalog::TrainingModule;
use crate::domain::Score;
use crate::sequencer::ModuleSequencer;

/// Minimum score, inclusive, that completes a module.
pub const PASS_THRESHOLD: u8 = 80;

/// A multiple-choice question; `correct` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    pub correct: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub correct: usize,
    pub total: usize,
    pub score: Score,
}

impl Grade {
    pub fn passed(&self) -> bool {
        self.score.percent() >= PASS_THRESHOLD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentOutcome {
    /// `newly_completed` is false when the module had already been completed.
    Passed { grade: Grade, newly_completed: bool },
    Failed { grade: Grade },
}

impl AssessmentOutcome {
    pub fn grade(&self) -> Grade {
        match self {
            AssessmentOutcome::Passed { grade, .. } | AssessmentOutcome::Failed { grade } => *grade,
        }
    }
}

/// Scores `answers` against `questions` position by position.
/// Missing or out-of-range answers count as wrong.
pub fn grade(questions: &[Question], answers: &[Option<usize>]) -> Grade {
    let correct = questions
        .iter()
        .zip(answers.iter().copied().chain(std::iter::repeat(None)))
        .filter(|(question, answer)| *answer == Some(question.correct))
        .count();

    Grade {
        correct,
        total: questions.len(),
        score: Score::from_ratio(correct, questions.len()),
    }
}

/// Grades an attempt at `questions` and completes `module` when it passes.
pub async fn submit_answers(
    sequencer: &mut ModuleSequencer,
    module: TrainingModule,
    questions: &[Question],
    answers: &[Option<usize>],
) -> AssessmentOutcome {
    let grade = grade(questions, answers);
    if !grade.passed() {
        info!(
            "Module {} assessment failed with {} ({}/{} correct).",
            module.number(),
            grade.score,
            grade.correct,
            grade.total
        );
        return AssessmentOutcome::Failed { grade };
    }

    info!("Module {} assessment passed with {}.", module.number(), grade.score);
    let newly_completed = sequencer.complete_module(module, grade.score).await;
    AssessmentOutcome::Passed {
        grade,
        newly_completed,
    }
}

/// Grades an attempt at the module's own quiz.
pub async fn submit_assessment(
    sequencer: &mut ModuleSequencer,
    module: TrainingModule,
    answers: &[Option<usize>],
) -> AssessmentOutcome {
    submit_answers(sequencer, module, module.lesson().quiz, answers).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryProgressStore, RecordingObserver};
    use std::sync::Arc;

    const TWO_QUESTIONS: &[Question] = &[
        Question {
            prompt: "First?",
            options: &["a", "b"],
            correct: 1,
        },
        Question {
            prompt: "Second?",
            options: &["a", "b"],
            correct: 1,
        },
    ];

    #[test]
    fn grade_counts_only_matching_answers() {
        let grade = grade(TWO_QUESTIONS, &[Some(1), Some(0)]);
        assert_eq!(grade.correct, 1);
        assert_eq!(grade.score.percent(), 50);
        assert!(!grade.passed());
    }

    #[test]
    fn missing_answers_count_as_wrong() {
        assert_eq!(grade(TWO_QUESTIONS, &[Some(1)]).score.percent(), 50);
        assert_eq!(grade(TWO_QUESTIONS, &[None, None]).score.percent(), 0);
        assert_eq!(grade(TWO_QUESTIONS, &[]).score.percent(), 0);
    }

    #[test]
    fn empty_quiz_never_passes() {
        let grade = grade(&[], &[]);
        assert_eq!(grade.score, Score::ZERO);
        assert!(!grade.passed());
    }

    #[test]
    fn eighty_percent_is_a_pass() {
        let five: Vec<Question> = (0..5)
            .map(|_| Question {
                prompt: "q",
                options: &["a", "b"],
                correct: 0,
            })
            .collect();
        let grade = grade(&five, &[Some(0), Some(0), Some(0), Some(0), Some(1)]);
        assert_eq!(grade.score.percent(), 80);
        assert!(grade.passed());
    }

    #[tokio::test]
    async fn failing_attempt_leaves_progress_untouched() {
        let store = Arc::new(MemoryProgressStore::default());
        let observer = Arc::new(RecordingObserver::default());
        let mut sequencer = ModuleSequencer::load(store.clone())
            .await
            .with_observer(observer.clone());

        let outcome = submit_answers(
            &mut sequencer,
            TrainingModule::IntroContext,
            TWO_QUESTIONS,
            &[Some(1), Some(0)],
        )
        .await;

        assert!(matches!(outcome, AssessmentOutcome::Failed { .. }));
        assert!(sequencer.progress().completed_modules.is_empty());
        assert_eq!(store.save_count(), 0);
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn passing_attempt_completes_with_the_computed_score() {
        let store = Arc::new(MemoryProgressStore::default());
        let observer = Arc::new(RecordingObserver::default());
        let mut sequencer = ModuleSequencer::load(store.clone())
            .await
            .with_observer(observer.clone());

        let outcome = submit_answers(
            &mut sequencer,
            TrainingModule::IntroContext,
            TWO_QUESTIONS,
            &[Some(1), Some(1)],
        )
        .await;

        assert_eq!(
            outcome,
            AssessmentOutcome::Passed {
                grade: Grade {
                    correct: 2,
                    total: 2,
                    score: Score::MAX
                },
                newly_completed: true
            }
        );
        assert_eq!(
            observer.events(),
            vec![(TrainingModule::IntroContext, Score::MAX)]
        );
        assert_eq!(
            sequencer.progress().score(TrainingModule::IntroContext),
            Some(Score::MAX)
        );
    }

    #[tokio::test]
    async fn module_quiz_comes_from_the_catalog() {
        let store = Arc::new(MemoryProgressStore::default());
        let mut sequencer = ModuleSequencer::load(store).await;

        // Emergency response answers are [1, 2].
        let outcome = submit_assessment(
            &mut sequencer,
            TrainingModule::EmergencyResponse,
            &[Some(1), Some(1)],
        )
        .await;
        assert_eq!(outcome.grade().score.percent(), 50);

        let outcome = submit_assessment(
            &mut sequencer,
            TrainingModule::EmergencyResponse,
            &[Some(1), Some(2)],
        )
        .await;
        assert!(matches!(
            outcome,
            AssessmentOutcome::Passed {
                newly_completed: true,
                ..
            }
        ));
    }
}
