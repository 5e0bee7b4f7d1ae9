//! crates/training_portal_core/src/case_log.rs
//!
//! The history of analysed cases, kept most-recent-first.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::domain::{CaseAnalysis, CaseRecord, CaseStatus};
use crate::ports::CaseHistoryStore;

/// How many records the portal shows in its history panel.
pub const RECENT_CASES: usize = 5;

const SUFFIXES_PER_DAY: u16 = 1000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CaseError {
    #[error("Please enter a case description first")]
    EmptyDescription,
}

/// Rejects descriptions that are empty once trimmed.
pub fn validate_description(description: &str) -> Result<&str, CaseError> {
    match description.trim() {
        "" => Err(CaseError::EmptyDescription),
        trimmed => Ok(trimmed),
    }
}

/// Builds a `CASE-YYYYMMDD-NNN` id for the UTC day of `now`. The suffix is random but
/// avoids every suffix in `history` from the same day while one is still free.
pub fn generate_case_id<R: Rng + ?Sized>(
    now: DateTime<Utc>,
    history: &[CaseRecord],
    rng: &mut R,
) -> String {
    let prefix = format!("CASE-{}-", now.format("%Y%m%d"));
    let taken: BTreeSet<u16> = history
        .iter()
        .filter_map(|record| record.id.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse().ok())
        .collect();

    let free: Vec<u16> = (0..SUFFIXES_PER_DAY)
        .filter(|suffix| !taken.contains(suffix))
        .collect();
    let suffix = if free.is_empty() {
        warn!("All case numbers for {} are taken; reusing one.", now.format("%Y-%m-%d"));
        rng.gen_range(0..SUFFIXES_PER_DAY)
    } else {
        free[rng.gen_range(0..free.len())]
    };

    format!("{prefix}{suffix:03}")
}

pub struct CaseLog {
    store: Arc<dyn CaseHistoryStore>,
    records: Vec<CaseRecord>,
}

impl CaseLog {
    pub async fn load(store: Arc<dyn CaseHistoryStore>) -> Self {
        let records = store.load_history().await;
        info!("Loaded case history with {} record(s).", records.len());
        Self { store, records }
    }

    /// Adds the analysed case at the front of the history and persists it.
    /// Persistence failures are logged; the in-memory history keeps the record.
    pub async fn record(
        &mut self,
        description: &str,
        analysis: &CaseAnalysis,
        now: DateTime<Utc>,
    ) -> CaseRecord {
        let id = generate_case_id(now, &self.records, &mut rand::thread_rng());
        let record = CaseRecord {
            id,
            description: description.to_string(),
            forms: analysis.suggested_forms.clone(),
            timestamp: now,
            status: CaseStatus::Generated,
        };
        self.records.insert(0, record.clone());
        info!(
            "Case {} recorded with {} suggested form(s).",
            record.id,
            record.forms.len()
        );

        if let Err(e) = self.store.save_history(&self.records).await {
            warn!("Failed to persist case history: {}", e);
        }
        record
    }

    pub fn recent(&self, limit: usize) -> &[CaseRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
