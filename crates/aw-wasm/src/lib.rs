//! WASM bridge for AW — exposes the workflow canvas engine to the host page.
//!
//! Compiled via `wasm-pack build --target web`. The host owns the DOM: it
//! renders node elements, reports their measured sizes, forwards pointer
//! and touch events (touch-start/move/end call the same three gesture
//! entry points), and drops the returned connection-layer SVG into the
//! canvas once per animation frame when `take_redraw()` says so.
//!
//! Structured data crosses the boundary as JSON strings; simple results
//! as booleans. The persistence gateway is split into discrete steps
//! (`save_payload_json` → host RPC → `apply_save_result`/`save_failed`)
//! so the async transport never blocks input handling.

use aw_core::config::FormFieldPart;
use aw_core::document;
use aw_core::id::{ConnectionId, NodeId};
use aw_core::model::NodeType;
use aw_editor::controller::GraphController;
use aw_editor::drag::DragRegion;
use aw_editor::gateway::{GatewayError, WorkflowId};
use serde_json::json;
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct WorkflowCanvas {
    controller: GraphController,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl WorkflowCanvas {
    /// Create a new canvas controller with the given dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console_error_panic_hook_setup();
        Self {
            controller: GraphController::new(),
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // ─── Node lifecycle ──────────────────────────────────────────────────

    /// Drop a palette node onto the canvas. Returns the new node id, or
    /// an empty string for an unrecognized type.
    pub fn drop_node(&mut self, node_type: &str, x: f32, y: f32) -> String {
        match NodeType::from_wire(node_type) {
            Some(ty) => self.controller.drop_node(ty, x, y).as_str().to_string(),
            None => {
                log::warn!("palette drop with unknown node type `{node_type}`");
                String::new()
            }
        }
    }

    /// Report a node element's measured size after layout.
    pub fn set_node_size(&mut self, node_id: &str, width: f32, height: f32) {
        self.controller
            .set_node_size(NodeId::intern(node_id), width, height);
    }

    /// Delete a node (delete-button click). Returns whether it existed.
    pub fn delete_node(&mut self, node_id: &str) -> bool {
        let id = NodeId::intern(node_id);
        let existed = self.controller.nodes().contains(id);
        self.controller.delete_node(id);
        existed
    }

    /// Remove a single connection by its id.
    pub fn remove_connection(&mut self, connection_id: &str) -> bool {
        self.controller
            .remove_connection(ConnectionId::intern(connection_id))
    }

    pub fn clear_canvas(&mut self) {
        self.controller.clear_canvas();
    }

    pub fn node_count(&self) -> usize {
        self.controller.nodes().len()
    }

    pub fn connection_count(&self) -> usize {
        self.controller.connections().len()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_node(&mut self, node_id: &str) {
        self.controller.select_node(NodeId::intern(node_id));
    }

    pub fn deselect(&mut self) {
        self.controller.deselect();
    }

    /// The selected node id, or empty string if none.
    pub fn selected_node_id(&self) -> String {
        self.controller
            .selected_node()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Pointer-down on a node. `region` names the press target:
    /// `"body"`, `"input"`, `"output"`, or `"delete"`.
    pub fn press_node(&mut self, node_id: &str, region: &str, x: f32, y: f32) {
        let Some(region) = DragRegion::from_name(region) else {
            log::warn!("press with unknown region `{region}`");
            return;
        };
        self.controller
            .press_node(NodeId::intern(node_id), region, x, y);
    }

    /// Global pointer/touch move, in canvas coordinates.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.controller.pointer_move(x, y);
    }

    /// Global pointer/touch release.
    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    /// A click that reached the canvas (resolves an in-flight connection).
    pub fn click_canvas(&mut self, x: f32, y: f32) {
        self.controller.click_canvas(x, y);
    }

    /// Cursor/selection affordances the host applies to `<body>`:
    /// `{"grabbingCursor":bool,"suppressSelection":bool}`.
    pub fn ui_state_json(&self) -> String {
        let a = self.controller.affordances();
        json!({
            "grabbingCursor": a.grabbing_cursor,
            "suppressSelection": a.suppress_selection,
        })
        .to_string()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Consume the coalesced redraw flag. Call once per animation frame.
    pub fn take_redraw(&mut self) -> bool {
        self.controller.take_redraw()
    }

    /// The connection layer as standalone SVG markup.
    pub fn connection_layer_svg(&self) -> String {
        self.controller
            .connection_layer()
            .to_svg(self.width as f32, self.height as f32)
    }

    // ─── Node presentation ───────────────────────────────────────────────

    /// `{"icon":…, "title":…}` for a node type (palette + node header).
    pub fn node_template_json(&self, node_type: &str) -> String {
        match NodeType::from_wire(node_type) {
            Some(ty) => {
                let t = aw_core::catalog::template(ty);
                json!({"icon": t.icon, "title": t.title}).to_string()
            }
            None => "{}".to_string(),
        }
    }

    /// The wire keys the side panel may edit for a node type, as a JSON
    /// array.
    pub fn editable_fields_json(&self, node_type: &str) -> String {
        match NodeType::from_wire(node_type) {
            Some(ty) => serde_json::to_string(aw_core::catalog::editable_fields(ty))
                .unwrap_or_else(|_| "[]".to_string()),
            None => "[]".to_string(),
        }
    }

    /// `{"configured":bool, "text":…}` for the node badge.
    pub fn node_status_json(&self, node_id: &str) -> String {
        match self.controller.node_status(NodeId::intern(node_id)) {
            Some(status) => {
                json!({"configured": status.configured, "text": status.text}).to_string()
            }
            None => "{}".to_string(),
        }
    }

    /// The node's config object for the side panel, or `{}`.
    pub fn node_config_json(&self, node_id: &str) -> String {
        self.controller
            .nodes()
            .get(NodeId::intern(node_id))
            .map(|n| n.config.to_value().to_string())
            .unwrap_or_else(|| "{}".to_string())
    }

    // ─── Configuration panel ─────────────────────────────────────────────

    pub fn update_config(&mut self, node_id: &str, key: &str, value: &str) {
        self.controller
            .update_config(NodeId::intern(node_id), key, value);
    }

    /// Add a params/headers entry to the selected node.
    pub fn add_list_entry(&mut self, key: &str, value: &str) -> bool {
        self.controller.add_list_entry(key, value)
    }

    pub fn remove_list_entry(&mut self, index: usize) -> bool {
        self.controller.remove_list_entry(index)
    }

    /// Switch the selected node's body mode (`"json"` / `"form"`).
    pub fn set_body_type(&mut self, kind: &str) {
        self.controller.set_body_type(kind);
    }

    pub fn body_add_field(&mut self) -> bool {
        self.controller.body_add_field()
    }

    /// Edit a form field; `part` is `"key"` or `"value"`.
    pub fn body_update_field(&mut self, index: usize, part: &str, text: &str) -> bool {
        let part = match part {
            "key" => FormFieldPart::Key,
            "value" => FormFieldPart::Value,
            other => {
                log::warn!("unknown form field part `{other}`");
                return false;
            }
        };
        self.controller.body_update_field(index, part, text)
    }

    pub fn body_remove_field(&mut self, index: usize) -> bool {
        self.controller.body_remove_field(index)
    }

    pub fn body_clear_fields(&mut self) -> bool {
        self.controller.body_clear_fields()
    }

    /// The selected node's form fields rendered as a JSON object string.
    pub fn body_fields_as_json(&self) -> String {
        self.controller.body_fields_as_json().unwrap_or_default()
    }

    pub fn apply_body_template(&mut self, kind: &str) -> bool {
        self.controller.apply_body_template(kind)
    }

    // ─── Validation & test run ───────────────────────────────────────────

    /// Lint diagnostics as a JSON array.
    pub fn lint_json(&self) -> String {
        let diags: Vec<_> = self
            .controller
            .lint()
            .into_iter()
            .map(|d| {
                json!({
                    "nodeId": d.node_id.map(|id| id.as_str().to_string()),
                    "message": d.message,
                    "severity": match d.severity {
                        aw_core::lint::LintSeverity::Warning => "warning",
                        aw_core::lint::LintSeverity::Info => "info",
                    },
                    "rule": d.rule,
                })
            })
            .collect();
        serde_json::to_string(&diags).unwrap_or_else(|_| "[]".to_string())
    }

    /// The pre-save validation gate; failures queue warning notices.
    pub fn validate(&mut self) -> bool {
        self.controller.validate()
    }

    /// Run the mocked API test for a method node. Returns the simulated
    /// response JSON, or empty string.
    pub fn run_api_test(&mut self, node_id: &str) -> String {
        self.controller
            .run_api_test(NodeId::intern(node_id), &now_iso())
            .map(|v| serde_json::to_string_pretty(&v).unwrap_or_default())
            .unwrap_or_default()
    }

    // ─── Notices ─────────────────────────────────────────────────────────

    /// Drain queued notices: `[{"level":…, "message":…}, …]`.
    pub fn drain_notices_json(&mut self) -> String {
        let notices: Vec<_> = self
            .controller
            .drain_notices()
            .into_iter()
            .map(|n| json!({"level": n.level.as_str(), "message": n.message}))
            .collect();
        serde_json::to_string(&notices).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── File exchange ───────────────────────────────────────────────────

    /// Export the graph as pretty-printed JSON for download.
    pub fn export_json(&self) -> String {
        self.controller.export_json(now_iso())
    }

    /// Timestamp-based download filename.
    pub fn export_filename(&self) -> String {
        document::export_filename(now_millis())
    }

    /// Import a user-selected file's contents. Returns `false` (and
    /// queues a danger notice) on malformed input; the graph is untouched.
    pub fn import_json(&mut self, input: &str) -> bool {
        self.controller.import_json(input).is_ok()
    }

    // ─── Persistence gateway steps ───────────────────────────────────────

    /// Build the backend save payload, or empty string if there is
    /// nothing to save (a notice explains why). Pass an empty `name`
    /// when updating an already-saved workflow.
    pub fn save_payload_json(&mut self, name: &str) -> String {
        let name = (!name.trim().is_empty()).then_some(name);
        self.controller
            .save_payload(name, now_iso())
            .map(|p| p.to_json())
            .unwrap_or_default()
    }

    /// Record a successful backend save.
    pub fn apply_save_result(&mut self, name: &str, saved_id: f64) {
        self.controller
            .apply_save_result(name, Ok(saved_id as WorkflowId));
    }

    /// Record a failed backend save.
    pub fn save_failed(&mut self, message: &str) {
        self.controller
            .apply_save_result("", Err(GatewayError::Save(message.to_string())));
    }

    /// Record a successful backend load: parses the stored document and
    /// replaces the graph. Returns `false` if the stored data is
    /// malformed (graph untouched).
    pub fn apply_load_result(&mut self, id: f64, name: &str, document_json: &str) -> bool {
        match document::parse_document(document_json) {
            Ok(parsed) => self.controller.apply_load_result(
                id as WorkflowId,
                (!name.is_empty()).then_some(name),
                Ok(parsed.document),
            ),
            Err(err) => self.controller.apply_load_result(
                id as WorkflowId,
                None,
                Err(GatewayError::Load(err.to_string())),
            ),
        }
    }

    /// Record a failed backend load.
    pub fn load_failed(&mut self, message: &str) {
        let _ = self
            .controller
            .apply_load_result(0, None, Err(GatewayError::Load(message.to_string())));
    }
}

// ─── Clocks ──────────────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
fn now_iso() -> String {
    js_sys::Date::new_0()
        .to_iso_string()
        .as_string()
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn now_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_iso() -> String {
    format!("epoch-ms:{}", now_millis())
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("AW WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
