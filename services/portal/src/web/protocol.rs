//! services/portal/src/web/protocol.rs
//!
//! Defines the messages pushed to the browser over the `/events` WebSocket.

use serde::Serialize;

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A module was completed for the first time. The UI refreshes its cards and
    /// progress bar.
    ModuleCompleted {
        module_id: u32,
        score: u8,
        current_module: u32,
        completed_count: usize,
    },

    /// A case analysis finished and was added to the history.
    CaseGenerated { case_id: String },

    /// A form was submitted.
    FormSubmitted {
        form_id: String,
        confirmation_number: String,
    },

    /// Reports an error to the client, which should display an error message.
    Error { message: String },
}
