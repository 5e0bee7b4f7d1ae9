//! crates/training_portal_core/src/sequencer.rs
//!
//! The module state machine: `Locked -> Unlocked -> InProgress -> Completed`.
//!
//! Locked/Unlocked are derived from the unlock policy on every read. InProgress is
//! session state kept in memory. Completed is the only persisted transition, and
//! the sequencer's in-memory copy of the progress stays authoritative even when
//! the store fails to write it.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::TrainingModule;
use crate::domain::{ModuleState, ProgressSummary, Score, UserProgress};
use crate::ports::{ProgressObserver, ProgressStore};
use crate::progress::{is_unlocked, module_state};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Module {0} is locked. Please complete the previous modules first.")]
    Locked(u32),
}

pub struct ModuleSequencer {
    store: Arc<dyn ProgressStore>,
    observers: Vec<Arc<dyn ProgressObserver>>,
    progress: UserProgress,
    opened: BTreeSet<TrainingModule>,
}

impl ModuleSequencer {
    /// Creates a sequencer from whatever the store currently holds.
    pub async fn load(store: Arc<dyn ProgressStore>) -> Self {
        let progress = store.load().await;
        info!(
            "Loaded training progress: {} module(s) completed, current module {}.",
            progress.completed_modules.len(),
            progress.current_module
        );
        Self {
            store,
            observers: Vec::new(),
            progress,
            opened: BTreeSet::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn is_unlocked(&self, module: TrainingModule) -> bool {
        is_unlocked(module, &self.progress)
    }

    pub fn state_of(&self, module: TrainingModule) -> ModuleState {
        module_state(module, &self.progress, self.opened.contains(&module))
    }

    /// Every module of the curriculum with its current state, in order.
    pub fn snapshot(&self) -> Vec<(TrainingModule, ModuleState)> {
        TrainingModule::ALL
            .into_iter()
            .map(|module| (module, self.state_of(module)))
            .collect()
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary::from_progress(&self.progress)
    }

    /// Marks `module` as being studied. Completed modules may be reopened for review
    /// and stay completed.
    pub fn open_module(&mut self, module: TrainingModule) -> Result<ModuleState, SequenceError> {
        if !self.is_unlocked(module) {
            debug!("Refused to open locked module {}.", module.number());
            return Err(SequenceError::Locked(module.number()));
        }
        if self.opened.insert(module) {
            info!("Module {} opened.", module.number());
        }
        Ok(self.state_of(module))
    }

    /// Records the completion of `module` with `score`.
    ///
    /// Returns `false` and does nothing when the module is already completed.
    /// Otherwise updates progress, persists it, and notifies every observer.
    pub async fn complete_module(&mut self, module: TrainingModule, score: Score) -> bool {
        if self.progress.is_completed(module) {
            debug!("Module {} already completed; ignoring.", module.number());
            return false;
        }

        self.progress.completed_modules.insert(module);
        self.progress.scores.insert(module, score);
        self.progress.current_module = self.progress.current_module.max(module.number() + 1);
        self.opened.remove(&module);
        info!(
            "Module {} completed with {}. Current module is now {}.",
            module.number(),
            score,
            self.progress.current_module
        );

        if let Err(e) = self.store.save(&self.progress).await {
            warn!("Failed to persist training progress: {}", e);
        }

        for observer in &self.observers {
            observer.module_completed(module, score, &self.progress);
        }
        true
    }
}
