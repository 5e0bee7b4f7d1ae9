//! crates/training_portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the portal's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of where records are kept and of who is listening for changes.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::catalog::TrainingModule;
use crate::domain::{CaseRecord, FormDraft, Score, SubmittedForm, UserProgress};
use crate::forms::FormId;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Returns the persisted progress, or the default record when nothing is
    /// stored or the stored value cannot be read. Never fails.
    async fn load(&self) -> UserProgress;

    /// Replaces the whole persisted record. Callers treat failures as non-fatal.
    async fn save(&self, progress: &UserProgress) -> PortResult<()>;
}

#[async_trait]
pub trait CaseHistoryStore: Send + Sync {
    /// Most-recent-first. Unreadable history comes back empty.
    async fn load_history(&self) -> Vec<CaseRecord>;

    async fn save_history(&self, history: &[CaseRecord]) -> PortResult<()>;
}

#[async_trait]
pub trait FormRecordStore: Send + Sync {
    // --- Drafts ---
    async fn load_drafts(&self) -> PortResult<BTreeMap<FormId, FormDraft>>;

    /// Stores the draft, replacing any earlier draft of the same form.
    async fn save_draft(&self, draft: &FormDraft) -> PortResult<()>;

    async fn remove_draft(&self, form_id: FormId) -> PortResult<()>;

    // --- Submissions ---
    async fn append_submission(&self, submission: &SubmittedForm) -> PortResult<()>;

    async fn list_submissions(&self) -> PortResult<Vec<SubmittedForm>>;
}

//=========================================================================================
// Notification Port
//=========================================================================================

/// Receives a callback after every module completion that changed progress.
pub trait ProgressObserver: Send + Sync {
    fn module_completed(&self, module: TrainingModule, score: Score, progress: &UserProgress);
}
