//! services/portal/src/web/state.rs
//!
//! Defines the application's shared state and how it is assembled at startup.

use crate::adapters::{BroadcastObserver, LocalStore};
use crate::config::Config;
use crate::web::protocol::ServerMessage;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use training_portal_core::{CaseLog, FormDesk, ModuleSequencer};

/// Capacity of the event channel behind `/events`.
const EVENT_CAPACITY: usize = 64;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// The sequencer and the case log are behind async mutexes so every
/// read-modify-write of progress or history completes before the next one starts.
pub struct AppState {
    pub config: Arc<Config>,
    pub sequencer: Mutex<ModuleSequencer>,
    pub case_log: Mutex<CaseLog>,
    pub form_desk: FormDesk,
    pub events: broadcast::Sender<ServerMessage>,
}

impl AppState {
    /// Loads every persisted record from the configured data directory and wires
    /// the observer that feeds `/events`.
    pub async fn build(config: Arc<Config>) -> Arc<Self> {
        let store = Arc::new(LocalStore::new(config.data_dir.clone()));
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let sequencer = ModuleSequencer::load(store.clone())
            .await
            .with_observer(Arc::new(BroadcastObserver::new(events.clone())));
        let case_log = CaseLog::load(store.clone()).await;
        let form_desk = FormDesk::new(store);

        Arc::new(Self {
            config,
            sequencer: Mutex::new(sequencer),
            case_log: Mutex::new(case_log),
            form_desk,
            events,
        })
    }

    /// Publishes an event to every `/events` subscriber, if there are any.
    pub fn publish(&self, message: ServerMessage) {
        let _ = self.events.send(message);
    }
}
