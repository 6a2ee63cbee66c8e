//! Graph Document: the serializable snapshot exchanged with the
//! persistence gateway and the import/export file boundary.
//!
//! Wire shape (JSON):
//!
//! ```json
//! {
//!   "nodes": [{"id": "node-1", "type": "get", "x": 80, "y": 120, "config": {…}}],
//!   "connections": [{"id": "conn-1", "source": "node-1", "target": "node-2"}],
//!   "metadata": {"version": "1.0", "exportedAt": "…", "totalNodes": 1, "totalConnections": 1}
//! }
//! ```
//!
//! Import is permissive where it can be (missing coordinates fall back to
//! a diagonal cascade, unknown config fields default) and strict where it
//! must be (the `nodes` field has to be an array, or the whole import is
//! rejected before any state is touched).

use crate::config::NodeConfig;
use crate::id::NodeId;
use crate::model::{Connection, Node, NodeType, Position};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Format version tag written into every exported document.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document has no `nodes` array")]
    MissingNodes,
}

/// Non-semantic document envelope fields. All defaulted on import so an
/// exported-by-hand file without metadata still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetadata {
    pub version: String,
    pub exported_at: String,
    pub total_nodes: usize,
    pub total_connections: usize,
}

/// The serializable snapshot of nodes + connections + metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
    pub metadata: DocumentMetadata,
}

impl GraphDocument {
    /// Assemble a document, computing the metadata counts. The export
    /// timestamp is caller-supplied (the wasm bridge uses the host clock).
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>, exported_at: String) -> Self {
        let metadata = DocumentMetadata {
            version: FORMAT_VERSION.to_string(),
            exported_at,
            total_nodes: nodes.len(),
            total_connections: connections.len(),
        };
        Self {
            nodes,
            connections,
            metadata,
        }
    }

    /// Pretty-printed JSON for file export and gateway payloads.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A parsed document plus what permissive import had to drop.
#[derive(Debug)]
pub struct ParsedDocument {
    pub document: GraphDocument,
    /// Node records skipped because their `type` was unrecognized.
    pub skipped_nodes: usize,
    /// Connection records skipped because they were structurally invalid.
    pub skipped_connections: usize,
}

/// Parse a document from JSON. Fails only on malformed JSON or a missing/
/// non-array `nodes` field; individually bad records are skipped and
/// counted so callers can surface a warning instead of a crash.
pub fn parse_document(input: &str) -> Result<ParsedDocument, DocumentError> {
    let raw: Value = serde_json::from_str(input)?;
    let raw_nodes = raw
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(DocumentError::MissingNodes)?;

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut skipped_nodes = 0;
    for (index, entry) in raw_nodes.iter().enumerate() {
        match parse_node(entry, index) {
            Some(node) => nodes.push(node),
            None => {
                log::warn!("skipping unrecognized node record at index {index}");
                skipped_nodes += 1;
            }
        }
    }

    let mut connections = Vec::new();
    let mut skipped_connections = 0;
    if let Some(raw_conns) = raw.get("connections").and_then(Value::as_array) {
        for entry in raw_conns {
            match serde_json::from_value::<Connection>(entry.clone()) {
                Ok(conn) => connections.push(conn),
                Err(err) => {
                    log::warn!("skipping malformed connection record: {err}");
                    skipped_connections += 1;
                }
            }
        }
    }

    let metadata = raw
        .get("metadata")
        .and_then(|m| serde_json::from_value(m.clone()).ok())
        .unwrap_or_default();

    Ok(ParsedDocument {
        document: GraphDocument {
            nodes,
            connections,
            metadata,
        },
        skipped_nodes,
        skipped_connections,
    })
}

/// Timestamp-based export filename, e.g. `workflow-1714070000000.json`.
pub fn export_filename(now_millis: u64) -> String {
    format!("workflow-{now_millis}.json")
}

fn parse_node(entry: &Value, index: usize) -> Option<Node> {
    let id = entry.get("id").and_then(Value::as_str)?;
    let node_type = NodeType::from_wire(entry.get("type").and_then(Value::as_str)?)?;

    // Records without coordinates cascade down a diagonal so they stay
    // visible and individually grabbable.
    let fallback = 100.0 + (index as f32) * 20.0;
    let x = entry
        .get("x")
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(fallback);
    let y = entry
        .get("y")
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(fallback);

    let config = entry
        .get("config")
        .map(|c| NodeConfig::from_value(node_type, c))
        .unwrap_or_else(|| crate::catalog::default_config(node_type));

    Some(Node::new(
        NodeId::intern(id),
        node_type,
        Position::new(x, y),
        config,
    ))
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Node", 5)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("type", self.node_type.wire_name())?;
        s.serialize_field("x", &self.position.x)?;
        s.serialize_field("y", &self.position.y)?;
        s.serialize_field("config", &self.config.to_value())?;
        s.end()
    }
}
