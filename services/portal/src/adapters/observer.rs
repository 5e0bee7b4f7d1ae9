//! services/portal/src/adapters/observer.rs
//!
//! Forwards progress notifications from the core onto the event channel that the
//! `/events` WebSocket subscribers listen to.

use crate::web::protocol::ServerMessage;
use tokio::sync::broadcast;
use tracing::debug;
use training_portal_core::{
    catalog::TrainingModule,
    domain::{Score, UserProgress},
    ports::ProgressObserver,
};

pub struct BroadcastObserver {
    sender: broadcast::Sender<ServerMessage>,
}

impl BroadcastObserver {
    pub fn new(sender: broadcast::Sender<ServerMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for BroadcastObserver {
    fn module_completed(&self, module: TrainingModule, score: Score, progress: &UserProgress) {
        let message = ServerMessage::ModuleCompleted {
            module_id: module.number(),
            score: score.percent(),
            current_module: progress.current_module,
            completed_count: progress.completed_modules.len(),
        };
        // A send error only means nobody is listening right now.
        if self.sender.send(message).is_err() {
            debug!("No event subscribers for module {} completion.", module.number());
        }
    }
}
