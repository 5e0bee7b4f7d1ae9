//! crates/training_portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the training portal.
//! These structs are independent of any storage or serialization format.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::catalog::TrainingModule;
use crate::forms::FormId;

/// Number of modules in the curriculum.
pub const MODULE_COUNT: usize = 10;

/// Estimated study time credited per completed module, in hours.
pub const HOURS_PER_MODULE: f64 = 1.75;

//=========================================================================================
// Progress
//=========================================================================================

/// An assessment result as a whole percentage in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const MAX: Score = Score(100);

    /// Returns `None` when `percent` is above 100.
    pub fn new(percent: u32) -> Option<Self> {
        u8::try_from(percent).ok().filter(|p| *p <= 100).map(Self)
    }

    /// `round(100 * correct / total)`, rounding halves up. An empty quiz scores zero.
    pub fn from_ratio(correct: usize, total: usize) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        let correct = correct.min(total);
        let percent = (100.0 * correct as f64 / total as f64).round() as u8;
        Self(percent)
    }

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// The local user's training progress. There is exactly one of these per user.
///
/// Invariants maintained by the sequencer:
/// - a module has a score iff it is completed;
/// - `current_module` is greater than every completed module number and never decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProgress {
    pub completed_modules: BTreeSet<TrainingModule>,
    pub current_module: u32,
    pub scores: BTreeMap<TrainingModule, Score>,
    /// Carried for future use; nothing updates it yet.
    pub total_watch_time: u64,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            completed_modules: BTreeSet::new(),
            current_module: 1,
            scores: BTreeMap::new(),
            total_watch_time: 0,
        }
    }
}

impl UserProgress {
    pub fn is_completed(&self, module: TrainingModule) -> bool {
        self.completed_modules.contains(&module)
    }

    pub fn score(&self, module: TrainingModule) -> Option<Score> {
        self.scores.get(&module).copied()
    }
}

/// The derived per-module state shown on module cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Locked,
    Unlocked,
    InProgress,
    Completed,
}

impl ModuleState {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleState::Locked => "locked",
            ModuleState::Unlocked => "unlocked",
            ModuleState::InProgress => "in_progress",
            ModuleState::Completed => "completed",
        }
    }
}

/// Course-level numbers for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub remaining: usize,
    pub percentage: u8,
    pub estimated_hours: u32,
}

impl ProgressSummary {
    pub fn from_progress(progress: &UserProgress) -> Self {
        let completed = progress.completed_modules.len().min(MODULE_COUNT);
        Self {
            completed,
            total: MODULE_COUNT,
            remaining: MODULE_COUNT - completed,
            percentage: Score::from_ratio(completed, MODULE_COUNT).percent(),
            estimated_hours: (completed as f64 * HOURS_PER_MODULE).round() as u32,
        }
    }
}

//=========================================================================================
// Case analysis
//=========================================================================================

/// Details pulled out of a free-text case description. Both are best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedInfo {
    pub client_name: Option<String>,
    pub address: Option<String>,
}

/// The result of running the keyword mapper over a case description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseAnalysis {
    pub extracted_info: ExtractedInfo,
    /// Ordered and free of duplicates.
    pub suggested_forms: Vec<FormId>,
    pub actions: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    Generated,
}

impl CaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Generated => "Generated",
        }
    }
}

/// One entry of the case history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub id: String,
    pub description: String,
    pub forms: Vec<FormId>,
    pub timestamp: DateTime<Utc>,
    pub status: CaseStatus,
}

//=========================================================================================
// Form filling
//=========================================================================================

/// A single filled-in value. Checkbox groups carry every ticked option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Single(value) => value.trim().is_empty(),
            FieldValue::Multiple(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }
}

/// Field name to value, as submitted from a fillable form.
pub type FormData = BTreeMap<String, FieldValue>;

/// A partially filled form kept for later. At most one per form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub form_id: FormId,
    pub data: FormData,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Submitted,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "Submitted",
        }
    }
}

/// A completed form, as recorded after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedForm {
    pub form_id: FormId,
    pub data: FormData,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub confirmation_number: String,
}
