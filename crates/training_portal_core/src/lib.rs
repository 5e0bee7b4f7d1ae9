pub mod analyzer;
pub mod assessment;
pub mod case_log;
pub mod catalog;
pub mod domain;
pub mod filing;
pub mod forms;
pub mod ports;
pub mod progress;
pub mod sequencer;

#[cfg(test)]
mod testing;

pub use assessment::{submit_assessment, AssessmentOutcome, Grade, Question, PASS_THRESHOLD};
pub use case_log::{CaseError, CaseLog, RECENT_CASES};
pub use catalog::{CaseTemplate, ModuleOutline, ModuleRef, TrainingModule, VideoLesson};
pub use domain::{
    CaseAnalysis, CaseRecord, FieldValue, FormData, FormDraft, ModuleState, ProgressSummary, Score,
    SubmittedForm, UserProgress,
};
pub use filing::{FilingError, FormDesk};
pub use forms::{FieldError, FormError, FormFilter, FormId, FormLookup, FormTemplate};
pub use ports::{
    CaseHistoryStore, FormRecordStore, PortError, PortResult, ProgressObserver, ProgressStore,
};
pub use sequencer::{ModuleSequencer, SequenceError};
