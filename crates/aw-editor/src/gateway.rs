//! Persistence Gateway boundary.
//!
//! The backend call itself is the host's job (an async RPC in the
//! browser); the controller's side of the boundary is two synchronous
//! steps (build a payload, accept a result), so input handling never
//! blocks on a save, and abandoning the callback cancels the operation
//! with no state to unwind. The trait below is the same boundary for
//! native composition and tests.

use aw_core::document::GraphDocument;
use serde_json::json;
use thiserror::Error;

/// Backend record id of a saved workflow.
pub type WorkflowId = i64;

/// Gateway failures are recoverable: the caller surfaces the reason and
/// leaves the in-memory graph untouched so the user can retry.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("save failed: {0}")]
    Save(String),
    #[error("load failed: {0}")]
    Load(String),
}

/// Everything the backend needs to create or update a workflow record.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePayload {
    /// Present when updating an existing record.
    pub id: Option<WorkflowId>,
    pub name: String,
    pub description: String,
    pub document: GraphDocument,
}

impl SavePayload {
    /// The backend wire shape: the document travels as an embedded JSON
    /// string under `workflow_data`.
    pub fn to_json(&self) -> String {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "workflow_data": self.document.to_json(),
        })
        .to_string()
    }
}

/// The save/load boundary consumed by the Graph Controller.
pub trait PersistenceGateway {
    fn save(&mut self, payload: &SavePayload) -> Result<WorkflowId, GatewayError>;
    fn load(&mut self, id: WorkflowId) -> Result<GraphDocument, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_embeds_the_document_as_a_string() {
        let payload = SavePayload {
            id: Some(7),
            name: "Users sync".to_string(),
            description: "API Workflow created from workflow builder".to_string(),
            document: GraphDocument::new(vec![], vec![], "2024-05-01T00:00:00Z".into()),
        };
        let v: serde_json::Value = serde_json::from_str(&payload.to_json()).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["name"], "Users sync");
        assert!(v["workflow_data"].is_string());
        let inner: serde_json::Value =
            serde_json::from_str(v["workflow_data"].as_str().unwrap()).unwrap();
        assert_eq!(inner["metadata"]["version"], "1.0");
    }
}
