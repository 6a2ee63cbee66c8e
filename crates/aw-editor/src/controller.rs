//! The Graph Controller: composition root of the canvas engine.
//!
//! Owns the Node Store, Connection Store, bounds registry, drag
//! controller, and redraw scheduler, and is the only writer to any of
//! them. Raw UI events (palette drops, node presses, global pointer
//! moves, canvas clicks) arrive here and are translated into store
//! mutations; the host reads back the connection layer, notices, and
//! panel state.
//!
//! Gesture rules enforced here:
//! - one active gesture at a time: a press on a node body either resolves
//!   an in-flight connection (commit at the press point) or starts a drag;
//! - deleting a node mid-gesture cancels whatever referenced it;
//! - a click on empty canvas cancels an in-flight connection.

use crate::drag::{DragAffordances, DragController, DragRegion};
use crate::frame::RedrawScheduler;
use crate::gateway::{GatewayError, PersistenceGateway, SavePayload, WorkflowId};
use crate::registry::BoundsRegistry;
use crate::testrun;
use aw_core::config::{FormFieldPart, KeyValue};
use aw_core::connections::ConnectionStore;
use aw_core::document::{DocumentError, GraphDocument, parse_document};
use aw_core::id::{ConnectionId, NodeId};
use aw_core::lint::{self, LintDiagnostic, LintSeverity};
use aw_core::model::{NodeBounds, NodeStatus, NodeType, Position};
use aw_core::store::NodeStore;
use aw_render::layer::ConnectionLayer;
use aw_render::{hit, redraw_all};
use serde_json::Value;
use std::collections::HashMap;

const DEFAULT_DESCRIPTION: &str = "API Workflow created from workflow builder";

// ─── Notices ─────────────────────────────────────────────────────────────

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Danger,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Danger => "danger",
        }
    }
}

/// A transient notification for the host to display and discard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

// ─── Controller ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct GraphController {
    nodes: NodeStore,
    connections: ConnectionStore,
    registry: BoundsRegistry,
    drag: DragController,
    redraw: RedrawScheduler,
    selected: Option<NodeId>,
    notices: Vec<Notice>,
    workflow_id: Option<WorkflowId>,
    workflow_name: Option<String>,
}

impl GraphController {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Node lifecycle ──────────────────────────────────────────────────

    /// Drop a new node onto the canvas at (x, y).
    pub fn drop_node(&mut self, node_type: NodeType, x: f32, y: f32) -> NodeId {
        self.nodes.create(node_type, x, y, None)
    }

    /// Record the host-measured size of a node element.
    pub fn set_node_size(&mut self, id: NodeId, width: f32, height: f32) {
        if !self.nodes.contains(id) {
            log::warn!("size report for unknown node {id}; ignoring");
            return;
        }
        self.registry.set_size(id, width, height);
        self.redraw.request();
    }

    /// Delete a node, cascading into its connections. Returns the removed
    /// connection ids. Idempotent.
    pub fn delete_node(&mut self, id: NodeId) -> Vec<ConnectionId> {
        let removed = self.connections.remove_by_endpoint(id);
        if self.nodes.delete(id) {
            self.registry.remove(id);
            self.drag.cancel_if(id);
            if self.selected == Some(id) {
                self.selected = None;
            }
            self.redraw.request();
        }
        removed
    }

    /// Remove a single connection by id (the edge's context control).
    pub fn remove_connection(&mut self, id: ConnectionId) -> bool {
        let removed = self.connections.remove_by_id(id);
        if removed {
            self.redraw.request();
        }
        removed
    }

    /// Empty the canvas: nodes, connections, gestures, selection, and the
    /// id counters all reset.
    pub fn clear_canvas(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.registry.clear();
        self.drag.cancel();
        self.selected = None;
        self.redraw.request();
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_node(&mut self, id: NodeId) {
        if self.nodes.contains(id) {
            self.selected = Some(id);
        } else {
            log::warn!("select of unknown node {id}; ignoring");
        }
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Pointer-down on a node. The region tells the gesture apart:
    /// anchors begin a connection, the delete control deletes, and the
    /// body selects + starts a drag, unless a connection is in flight,
    /// in which case the press resolves it at the press point.
    pub fn press_node(&mut self, id: NodeId, region: DragRegion, x: f32, y: f32) {
        let Some(node) = self.nodes.get(id) else {
            log::warn!("press on unknown node {id}; ignoring");
            return;
        };
        let position = node.position;
        match region {
            DragRegion::DeleteControl => {
                self.delete_node(id);
            }
            DragRegion::InputAnchor => self.start_connection(id, false),
            DragRegion::OutputAnchor => self.start_connection(id, true),
            DragRegion::Body => {
                if self.connections.temp().is_some() {
                    self.finish_connection_at(x, y);
                } else {
                    self.selected = Some(id);
                    self.drag
                        .pointer_down(id, DragRegion::Body, Position::new(x, y), position);
                }
            }
        }
    }

    /// Begin a connection gesture from a node's anchor.
    pub fn start_connection(&mut self, id: NodeId, from_output: bool) {
        let Some(node) = self.nodes.get(id) else {
            log::warn!("connection start from unknown node {id}; ignoring");
            return;
        };
        let bounds = self.registry.bounds_of(node);
        let anchor = if from_output {
            aw_render::geometry::output_anchor(&bounds)
        } else {
            aw_render::geometry::input_anchor(&bounds)
        };
        if self.connections.begin(id, from_output, anchor) {
            self.redraw.request();
        }
    }

    /// Global pointer move: feeds whichever gesture is active.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some((node, position)) = self.drag.pointer_move(Position::new(x, y)) {
            self.nodes.reposition(node, position.x, position.y);
            self.redraw.request();
        }
        if self.connections.temp().is_some() {
            self.connections.update_cursor(x, y);
            self.redraw.request();
        }
    }

    /// Global pointer up: commits the drag's final position (already
    /// persisted by the last move) and releases the gesture.
    pub fn pointer_up(&mut self) {
        if self.drag.pointer_up().is_some() {
            self.redraw.request();
        }
    }

    /// A click that reached the canvas. Resolves an in-flight connection:
    /// over a node commits (hit test at the release point, not the click
    /// target), over empty canvas cancels.
    pub fn click_canvas(&mut self, x: f32, y: f32) {
        if self.connections.temp().is_some() {
            self.finish_connection_at(x, y);
        }
    }

    fn finish_connection_at(&mut self, x: f32, y: f32) {
        let bounds = self.registry.snapshot(&self.nodes);
        match hit::node_at_position(self.nodes.order(), &bounds, x, y) {
            Some(target) => {
                self.connections.commit(target);
            }
            None => self.connections.cancel(),
        }
        self.redraw.request();
    }

    pub fn affordances(&self) -> DragAffordances {
        self.drag.affordances()
    }

    // ─── Configuration panel ─────────────────────────────────────────────

    /// Mutate one config field on a node. Unknown nodes/fields log and
    /// no-op (panel edits race deletions routinely).
    pub fn update_config(&mut self, id: NodeId, key: &str, value: &str) {
        self.nodes.update_config(id, key, value);
    }

    /// Add a key/value entry (params or headers) to the selected node.
    /// Empty keys or values are rejected with a warning notice.
    pub fn add_list_entry(&mut self, key: &str, value: &str) -> bool {
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            self.push_notice(NoticeLevel::Warning, "Key and Value cannot be empty");
            return false;
        }
        let Some(node) = self.selected.and_then(|id| self.nodes.get_mut(id)) else {
            log::warn!("list entry add with no selected node; ignoring");
            return false;
        };
        match node.config.key_value_list_mut() {
            Some(list) => {
                list.push(KeyValue::new(key, value));
                true
            }
            None => {
                log::warn!("selected node {} has no key/value list", node.id);
                false
            }
        }
    }

    /// Remove a key/value entry by index from the selected node.
    pub fn remove_list_entry(&mut self, index: usize) -> bool {
        let Some(node) = self.selected.and_then(|id| self.nodes.get_mut(id)) else {
            log::warn!("list entry remove with no selected node; ignoring");
            return false;
        };
        match node.config.key_value_list_mut() {
            Some(list) if index < list.len() => {
                list.remove(index);
                true
            }
            Some(_) => {
                log::warn!("list entry index {index} out of bounds on {}", node.id);
                false
            }
            None => false,
        }
    }

    /// Switch the selected node's body editing mode (`"json"`/`"form"`).
    pub fn set_body_type(&mut self, kind: &str) {
        if let Some(id) = self.selected {
            self.nodes.update_config(id, "bodyType", kind);
        }
    }

    pub fn body_add_field(&mut self) -> bool {
        self.with_request_body(|body| body.add_field())
    }

    pub fn body_update_field(&mut self, index: usize, part: FormFieldPart, text: &str) -> bool {
        self.with_request_body(|body| body.update_field(index, part, text))
    }

    pub fn body_remove_field(&mut self, index: usize) -> bool {
        self.with_request_body(|body| body.remove_field(index))
    }

    pub fn body_clear_fields(&mut self) -> bool {
        self.with_request_body(|body| body.clear_fields())
    }

    /// Render the selected node's form fields as a JSON object string.
    pub fn body_fields_as_json(&self) -> Option<String> {
        let node = self.selected.and_then(|id| self.nodes.get(id))?;
        match &node.config {
            aw_core::config::NodeConfig::Http(cfg) => {
                cfg.body.as_ref().map(|b| b.fields_to_json())
            }
            _ => None,
        }
    }

    /// Replace the selected node's body text with a starter template.
    pub fn apply_body_template(&mut self, kind: &str) -> bool {
        let Some(template) = aw_core::config::body_template(kind) else {
            log::warn!("unknown body template `{kind}`");
            return false;
        };
        let Some(id) = self.selected else {
            return false;
        };
        self.nodes.update_config(id, "body", template);
        true
    }

    fn with_request_body(&mut self, f: impl FnOnce(&mut aw_core::config::RequestBody)) -> bool {
        let Some(node) = self.selected.and_then(|id| self.nodes.get_mut(id)) else {
            log::warn!("body edit with no selected node; ignoring");
            return false;
        };
        match node.config.request_body_mut() {
            Some(body) => {
                f(body);
                true
            }
            None => {
                log::warn!("selected node {} has no request body", node.id);
                false
            }
        }
    }

    // ─── Reads for the host ──────────────────────────────────────────────

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn connections(&self) -> &ConnectionStore {
        &self.connections
    }

    pub fn node_status(&self, id: NodeId) -> Option<NodeStatus> {
        self.nodes.get(id).map(|n| n.status())
    }

    pub fn bounds_snapshot(&self) -> HashMap<NodeId, NodeBounds> {
        self.registry.snapshot(&self.nodes)
    }

    /// Rebuild the connection layer from current state.
    pub fn connection_layer(&self) -> ConnectionLayer {
        let bounds = self.bounds_snapshot();
        redraw_all(self.connections.all(), &bounds, self.connections.temp())
    }

    /// Consume the coalesced redraw flag (once per animation frame).
    pub fn take_redraw(&mut self) -> bool {
        self.redraw.take()
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint::lint_workflow(&self.nodes, &self.connections)
    }

    /// The pre-save/pre-test validation gate. Warnings surface as
    /// notices; info findings do not block.
    pub fn validate(&mut self) -> bool {
        let mut ok = true;
        for diag in self.lint() {
            if diag.severity == LintSeverity::Warning {
                self.push_notice(NoticeLevel::Warning, diag.message);
                ok = false;
            }
        }
        ok
    }

    /// Run the mocked API test for a method node.
    pub fn run_api_test(&mut self, id: NodeId, timestamp: &str) -> Option<Value> {
        let node = self.nodes.get(id)?;
        let response = testrun::mock_response(node, timestamp);
        if response.is_some() {
            self.push_notice(NoticeLevel::Success, "API test completed successfully!");
        } else {
            log::warn!("API test requested for non-method node {id}");
        }
        response
    }

    // ─── Serialization boundary ──────────────────────────────────────────

    /// Snapshot the graph into a document.
    pub fn serialize(&self, exported_at: String) -> GraphDocument {
        GraphDocument::new(
            self.nodes.iter().cloned().collect(),
            self.connections.all().to_vec(),
            exported_at,
        )
    }

    /// Replace the graph with a document's contents. Ids are preserved;
    /// connections whose endpoints did not survive import are dropped.
    pub fn deserialize(&mut self, document: &GraphDocument) {
        self.clear_canvas();
        for node in &document.nodes {
            self.nodes.insert(node.clone());
        }
        let mut dropped = 0;
        for conn in &document.connections {
            if self.nodes.contains(conn.source) && self.nodes.contains(conn.target) {
                self.connections.insert(*conn);
            } else {
                log::warn!(
                    "dropping connection {} -> {}: endpoint missing after load",
                    conn.source,
                    conn.target
                );
                dropped += 1;
            }
        }
        if dropped > 0 {
            self.push_notice(
                NoticeLevel::Warning,
                format!("Dropped {dropped} connection(s) referencing missing nodes"),
            );
        }
        self.redraw.request();
    }

    /// Export the graph as pretty-printed JSON.
    pub fn export_json(&self, exported_at: String) -> String {
        self.serialize(exported_at).to_json()
    }

    /// Import a user-selected file's contents. On parse failure the
    /// in-memory graph is untouched.
    pub fn import_json(&mut self, input: &str) -> Result<(), DocumentError> {
        match parse_document(input) {
            Ok(parsed) => {
                self.deserialize(&parsed.document);
                if parsed.skipped_nodes > 0 || parsed.skipped_connections > 0 {
                    self.push_notice(
                        NoticeLevel::Warning,
                        format!(
                            "Skipped {} unrecognized record(s) during import",
                            parsed.skipped_nodes + parsed.skipped_connections
                        ),
                    );
                }
                self.push_notice(NoticeLevel::Success, "Workflow imported successfully!");
                Ok(())
            }
            Err(err) => {
                log::warn!("import rejected: {err}");
                self.push_notice(NoticeLevel::Danger, "Invalid workflow file");
                Err(err)
            }
        }
    }

    // ─── Persistence gateway ─────────────────────────────────────────────

    /// Build the save payload, or explain why there is nothing to save.
    /// A workflow that has been saved before keeps its name and id
    /// (update); a new one requires `name`.
    pub fn save_payload(&mut self, name: Option<&str>, exported_at: String) -> Option<SavePayload> {
        if self.nodes.is_empty() {
            self.push_notice(NoticeLevel::Warning, "Cannot save empty workflow");
            return None;
        }
        let name = match (&self.workflow_name, name) {
            (Some(existing), _) => existing.clone(),
            (None, Some(provided)) if !provided.trim().is_empty() => provided.trim().to_string(),
            _ => {
                self.push_notice(NoticeLevel::Warning, "Workflow name is required");
                return None;
            }
        };
        Some(SavePayload {
            id: self.workflow_id,
            name,
            description: DEFAULT_DESCRIPTION.to_string(),
            document: self.serialize(exported_at),
        })
    }

    /// Record the gateway's answer to a save. Returns the saved id.
    pub fn apply_save_result(
        &mut self,
        name: &str,
        result: Result<WorkflowId, GatewayError>,
    ) -> Option<WorkflowId> {
        match result {
            Ok(id) => {
                let updating = self.workflow_id.is_some();
                self.workflow_id = Some(id);
                self.workflow_name = Some(name.to_string());
                self.push_notice(
                    NoticeLevel::Success,
                    format!(
                        "Workflow \"{name}\" {} successfully!",
                        if updating { "updated" } else { "created" }
                    ),
                );
                Some(id)
            }
            Err(err) => {
                self.push_notice(NoticeLevel::Danger, format!("{err}"));
                None
            }
        }
    }

    /// Save through a synchronous gateway (native composition / tests).
    pub fn save_with(
        &mut self,
        gateway: &mut dyn PersistenceGateway,
        name: Option<&str>,
        exported_at: String,
    ) -> Option<WorkflowId> {
        let payload = self.save_payload(name, exported_at)?;
        let name = payload.name.clone();
        let result = gateway.save(&payload);
        self.apply_save_result(&name, result)
    }

    /// Record the gateway's answer to a load. On success the graph is
    /// replaced; on failure it is untouched.
    pub fn apply_load_result(
        &mut self,
        id: WorkflowId,
        name: Option<&str>,
        result: Result<GraphDocument, GatewayError>,
    ) -> bool {
        match result {
            Ok(document) => {
                self.deserialize(&document);
                self.workflow_id = Some(id);
                self.workflow_name = name.map(str::to_string);
                self.push_notice(NoticeLevel::Success, "Workflow loaded successfully!");
                true
            }
            Err(err) => {
                self.push_notice(NoticeLevel::Danger, format!("{err}"));
                false
            }
        }
    }

    /// Load through a synchronous gateway (native composition / tests).
    pub fn load_with(&mut self, gateway: &mut dyn PersistenceGateway, id: WorkflowId) -> bool {
        let result = gateway.load(id);
        self.apply_load_result(id, None, result)
    }

    pub fn workflow_id(&self) -> Option<WorkflowId> {
        self.workflow_id
    }

    // ─── Notices ─────────────────────────────────────────────────────────

    pub fn push_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    /// Hand the queued notices to the host for display.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FakeGateway {
        next_id: WorkflowId,
        stored: Option<GraphDocument>,
        fail: bool,
    }

    impl FakeGateway {
        fn new() -> Self {
            Self {
                next_id: 41,
                stored: None,
                fail: false,
            }
        }
    }

    impl PersistenceGateway for FakeGateway {
        fn save(&mut self, payload: &SavePayload) -> Result<WorkflowId, GatewayError> {
            if self.fail {
                return Err(GatewayError::Save("backend unavailable".into()));
            }
            self.stored = Some(payload.document.clone());
            self.next_id += 1;
            Ok(payload.id.unwrap_or(self.next_id))
        }

        fn load(&mut self, _id: WorkflowId) -> Result<GraphDocument, GatewayError> {
            if self.fail {
                return Err(GatewayError::Load("record not found".into()));
            }
            self.stored
                .clone()
                .ok_or_else(|| GatewayError::Load("record not found".into()))
        }
    }

    #[test]
    fn body_press_selects_and_drags() {
        let mut c = GraphController::new();
        let id = c.drop_node(NodeType::Get, 100.0, 80.0);
        c.press_node(id, DragRegion::Body, 140.0, 100.0);
        assert_eq!(c.selected_node(), Some(id));
        assert!(c.affordances().grabbing_cursor);

        c.pointer_move(160.0, 130.0);
        c.pointer_up();
        assert_eq!(
            c.nodes().get(id).unwrap().position,
            Position::new(120.0, 110.0)
        );
    }

    #[test]
    fn empty_list_entries_are_rejected_with_a_notice() {
        let mut c = GraphController::new();
        let id = c.drop_node(NodeType::Params, 0.0, 0.0);
        c.select_node(id);

        assert!(!c.add_list_entry("  ", "v"));
        assert!(!c.add_list_entry("k", ""));
        let notices = c.drain_notices();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Warning));

        assert!(c.add_list_entry(" page ", " 1 "));
        assert_eq!(
            c.node_status(id).unwrap(),
            NodeStatus::new(true, "1 Set")
        );
    }

    #[test]
    fn save_requires_content_and_a_name() {
        let mut c = GraphController::new();
        let mut gateway = FakeGateway::new();

        assert_eq!(c.save_with(&mut gateway, Some("wf"), "t".into()), None);
        assert_eq!(
            c.drain_notices()[0].message,
            "Cannot save empty workflow"
        );

        c.drop_node(NodeType::Start, 0.0, 0.0);
        assert_eq!(c.save_with(&mut gateway, None, "t".into()), None);
        assert_eq!(c.drain_notices()[0].message, "Workflow name is required");

        let id = c.save_with(&mut gateway, Some("My Flow"), "t".into());
        assert_eq!(id, Some(42));
        assert_eq!(c.workflow_id(), Some(42));
        let notices = c.drain_notices();
        assert!(notices[0].message.contains("created"));

        // Second save updates the same record under the same name.
        let id = c.save_with(&mut gateway, None, "t".into());
        assert_eq!(id, Some(42));
        assert!(c.drain_notices()[0].message.contains("updated"));
    }

    #[test]
    fn gateway_failure_leaves_graph_untouched() {
        let mut c = GraphController::new();
        let mut gateway = FakeGateway::new();
        gateway.fail = true;

        c.drop_node(NodeType::Start, 10.0, 10.0);
        c.drop_node(NodeType::End, 200.0, 10.0);

        assert!(!c.load_with(&mut gateway, 99));
        assert_eq!(c.nodes().len(), 2);
        let notices = c.drain_notices();
        assert_eq!(notices[0].level, NoticeLevel::Danger);
        assert!(notices[0].message.contains("record not found"));
    }

    #[test]
    fn save_then_load_roundtrips_through_the_gateway() {
        let mut c = GraphController::new();
        let mut gateway = FakeGateway::new();

        let start = c.drop_node(NodeType::Start, 0.0, 0.0);
        let end = c.drop_node(NodeType::End, 300.0, 100.0);
        c.start_connection(start, true);
        c.click_canvas(310.0, 110.0); // inside end (default size)
        assert_eq!(c.connections().len(), 1);

        c.save_with(&mut gateway, Some("Flow"), "t".into()).unwrap();

        let mut c2 = GraphController::new();
        assert!(c2.load_with(&mut gateway, 42));
        assert_eq!(c2.nodes().len(), 2);
        assert_eq!(c2.connections().len(), 1);
        assert_eq!(c2.connections().all()[0].source, start);
        assert_eq!(c2.connections().all()[0].target, end);
    }

    #[test]
    fn validate_surfaces_missing_entry_points() {
        let mut c = GraphController::new();
        c.drop_node(NodeType::Get, 0.0, 0.0);
        assert!(!c.validate());
        let notices = c.drain_notices();
        assert!(notices.iter().any(|n| n.message.contains("Start node")));
        assert!(notices.iter().any(|n| n.message.contains("End node")));
    }

    #[test]
    fn import_failure_keeps_existing_graph() {
        let mut c = GraphController::new();
        c.drop_node(NodeType::Start, 0.0, 0.0);
        assert!(c.import_json("{ not json").is_err());
        assert_eq!(c.nodes().len(), 1);
        assert_eq!(c.drain_notices()[0].level, NoticeLevel::Danger);
    }
}
