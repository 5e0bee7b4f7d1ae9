//! In-memory port implementations for the unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::TrainingModule;
use crate::domain::{CaseRecord, FormDraft, Score, SubmittedForm, UserProgress};
use crate::forms::FormId;
use crate::ports::{
    CaseHistoryStore, FormRecordStore, PortError, PortResult, ProgressObserver, ProgressStore,
};

#[derive(Default)]
pub struct MemoryProgressStore {
    initial: UserProgress,
    saved: Mutex<Option<UserProgress>>,
    saves: Mutex<usize>,
    fail: bool,
}

impl MemoryProgressStore {
    pub fn with(progress: UserProgress) -> Self {
        Self {
            initial: progress,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Option<UserProgress> {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn load(&self) -> UserProgress {
        self.saved().unwrap_or_else(|| self.initial.clone())
    }

    async fn save(&self, progress: &UserProgress) -> PortResult<()> {
        if self.fail {
            return Err(PortError::Unexpected("storage unavailable".to_string()));
        }
        *self.saves.lock().unwrap() += 1;
        *self.saved.lock().unwrap() = Some(progress.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(TrainingModule, Score)>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<(TrainingModule, Score)> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressObserver for RecordingObserver {
    fn module_completed(&self, module: TrainingModule, score: Score, _progress: &UserProgress) {
        self.events.lock().unwrap().push((module, score));
    }
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    history: Mutex<Vec<CaseRecord>>,
    fail: bool,
}

impl MemoryHistoryStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Vec<CaseRecord> {
        self.history.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaseHistoryStore for MemoryHistoryStore {
    async fn load_history(&self) -> Vec<CaseRecord> {
        self.stored()
    }

    async fn save_history(&self, history: &[CaseRecord]) -> PortResult<()> {
        if self.fail {
            return Err(PortError::Unexpected("storage unavailable".to_string()));
        }
        *self.history.lock().unwrap() = history.to_vec();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryFormStore {
    drafts: Mutex<BTreeMap<FormId, FormDraft>>,
    submissions: Mutex<Vec<SubmittedForm>>,
}

#[async_trait]
impl FormRecordStore for MemoryFormStore {
    async fn load_drafts(&self) -> PortResult<BTreeMap<FormId, FormDraft>> {
        Ok(self.drafts.lock().unwrap().clone())
    }

    async fn save_draft(&self, draft: &FormDraft) -> PortResult<()> {
        self.drafts
            .lock()
            .unwrap()
            .insert(draft.form_id, draft.clone());
        Ok(())
    }

    async fn remove_draft(&self, form_id: FormId) -> PortResult<()> {
        self.drafts.lock().unwrap().remove(&form_id);
        Ok(())
    }

    async fn append_submission(&self, submission: &SubmittedForm) -> PortResult<()> {
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }

    async fn list_submissions(&self) -> PortResult<Vec<SubmittedForm>> {
        Ok(self.submissions.lock().unwrap().clone())
    }
}
