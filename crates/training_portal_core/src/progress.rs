//! crates/training_portal_core/src/progress.rs
//!
//! The unlock policy and the derived module states. Everything here is a pure
//! function of a `UserProgress`; nothing is stored.

use crate::catalog::TrainingModule;
use crate::domain::{ModuleState, UserProgress};

/// Module 1 is always open; every later module opens once its predecessor is completed.
pub fn is_unlocked(module: TrainingModule, progress: &UserProgress) -> bool {
    match module.previous() {
        None => true,
        Some(previous) => progress.is_completed(previous),
    }
}

/// Derives the card state of `module`. `opened` is whether the module was
/// opened during this session, which is not persisted.
pub fn module_state(module: TrainingModule, progress: &UserProgress, opened: bool) -> ModuleState {
    if progress.is_completed(module) {
        ModuleState::Completed
    } else if !is_unlocked(module, progress) {
        ModuleState::Locked
    } else if opened {
        ModuleState::InProgress
    } else {
        ModuleState::Unlocked
    }
}
