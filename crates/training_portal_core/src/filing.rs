//! crates/training_portal_core/src/filing.rs
//!
//! Draft keeping and submission of filled-in forms.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::{FormData, FormDraft, SubmissionStatus, SubmittedForm};
use crate::forms::{validate, FormError, FormId};
use crate::ports::{FormRecordStore, PortError};

#[derive(Debug, thiserror::Error)]
pub enum FilingError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Could not store the form: {0}")]
    Storage(#[from] PortError),
}

/// `NHH-YYYYMMDD-TTTT`, where `TTTT` are the last four digits of the epoch milliseconds.
pub fn generate_confirmation_number(now: DateTime<Utc>) -> String {
    format!(
        "NHH-{}-{:04}",
        now.format("%Y%m%d"),
        now.timestamp_millis().rem_euclid(10_000)
    )
}

pub struct FormDesk {
    store: Arc<dyn FormRecordStore>,
}

impl FormDesk {
    pub fn new(store: Arc<dyn FormRecordStore>) -> Self {
        Self { store }
    }

    /// Keeps the values as they are, replacing any earlier draft of the same form.
    /// Drafts are not validated.
    pub async fn save_draft(
        &self,
        form_id: FormId,
        data: FormData,
        now: DateTime<Utc>,
    ) -> Result<FormDraft, FilingError> {
        let draft = FormDraft {
            form_id,
            data,
            saved_at: now,
        };
        self.store.save_draft(&draft).await?;
        info!("Draft saved for form '{}'.", form_id);
        Ok(draft)
    }

    pub async fn drafts(&self) -> Result<BTreeMap<FormId, FormDraft>, FilingError> {
        Ok(self.store.load_drafts().await?)
    }

    pub async fn draft(&self, form_id: FormId) -> Result<Option<FormDraft>, FilingError> {
        Ok(self.drafts().await?.remove(&form_id))
    }

    /// Validates and records the form. Nothing is stored when validation fails.
    pub async fn submit(
        &self,
        form_id: FormId,
        data: FormData,
        now: DateTime<Utc>,
    ) -> Result<SubmittedForm, FilingError> {
        validate(form_id.template(), &data)?;

        let submission = SubmittedForm {
            form_id,
            data,
            submitted_at: now,
            status: SubmissionStatus::Submitted,
            confirmation_number: generate_confirmation_number(now),
        };
        self.store.append_submission(&submission).await?;

        // The submission is already recorded; a stale draft is only a nuisance.
        if let Err(e) = self.store.remove_draft(form_id).await {
            warn!("Failed to discard draft of form '{}': {}", form_id, e);
        }

        info!(
            "Form '{}' submitted. Confirmation number {}.",
            form_id, submission.confirmation_number
        );
        Ok(submission)
    }

    pub async fn submissions(&self) -> Result<Vec<SubmittedForm>, FilingError> {
        Ok(self.store.list_submissions().await?)
    }
}
