//! Integration tests: full gesture flows through the Graph Controller.
//!
//! Drives the controller with the same event sequences the browser host
//! produces (palette drop → anchor press → pointer moves → click) and
//! checks the resulting store state, cascade rules, and redraw batching.

use aw_core::model::{NodeType, Position};
use aw_editor::controller::GraphController;
use aw_editor::drag::DragRegion;
use pretty_assertions::assert_eq;

// Nodes render at the registry's default 180×80 until measured, so a node
// dropped at (x, y) is hittable anywhere in [x, x+180] × [y, y+80].

// ─── Connection gestures ─────────────────────────────────────────────────

#[test]
fn connect_start_to_end_via_output_anchor() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);
    let b = c.drop_node(NodeType::End, 300.0, 100.0);

    c.start_connection(a, true);
    assert!(c.connections().temp().is_some());
    // The anchor pins to A's right-center edge.
    assert_eq!(
        c.connections().temp().unwrap().start,
        Position::new(180.0, 40.0)
    );

    c.pointer_move(240.0, 120.0);
    c.pointer_move(300.0, 140.0);
    c.click_canvas(300.0, 140.0); // inside B

    assert!(c.connections().temp().is_none());
    assert_eq!(c.connections().len(), 1);
    let conn = c.connections().all()[0];
    assert_eq!(conn.source, a);
    assert_eq!(conn.target, b);
}

#[test]
fn connect_via_input_anchor_reverses_direction() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);
    let b = c.drop_node(NodeType::Get, 300.0, 100.0);

    // Gesture starts at B's input anchor and ends on A: edge is A → B.
    c.start_connection(b, false);
    c.click_canvas(90.0, 40.0); // inside A

    assert_eq!(c.connections().len(), 1);
    let conn = c.connections().all()[0];
    assert_eq!(conn.source, a);
    assert_eq!(conn.target, b);
}

#[test]
fn self_connection_never_commits() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);

    c.start_connection(a, true);
    c.click_canvas(90.0, 40.0); // inside A itself

    assert_eq!(c.connections().len(), 0);
    assert!(c.connections().temp().is_none());
}

#[test]
fn duplicate_connection_is_a_silent_noop() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);
    let b = c.drop_node(NodeType::End, 300.0, 0.0);

    for _ in 0..2 {
        c.start_connection(a, true);
        c.click_canvas(310.0, 40.0);
    }
    assert_eq!(c.connections().len(), 1);

    // Resolved direction matters: B → A is a different pair.
    c.start_connection(b, true);
    c.click_canvas(10.0, 40.0);
    assert_eq!(c.connections().len(), 2);
}

#[test]
fn click_on_empty_canvas_cancels_the_gesture() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);

    c.start_connection(a, true);
    c.pointer_move(500.0, 400.0);
    c.click_canvas(500.0, 400.0);

    assert!(c.connections().temp().is_none());
    assert_eq!(c.connections().len(), 0);
}

#[test]
fn only_one_connection_gesture_at_a_time() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);
    let b = c.drop_node(NodeType::End, 300.0, 0.0);

    c.start_connection(a, true);
    c.start_connection(b, true); // rejected: gesture already active
    assert_eq!(c.connections().temp().unwrap().source, a);

    c.click_canvas(310.0, 40.0);
    let conn = c.connections().all()[0];
    assert_eq!(conn.source, a);
    assert_eq!(conn.target, b);
}

#[test]
fn commit_resolves_by_position_not_press_order() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);
    // Two overlapping nodes; the later one is on top.
    let lower = c.drop_node(NodeType::Get, 300.0, 0.0);
    let upper = c.drop_node(NodeType::Post, 390.0, 40.0);

    c.start_connection(a, true);
    // Point inside both: the topmost (latest-created) node wins.
    c.click_canvas(400.0, 50.0);
    let conn = c.connections().all()[0];
    assert_eq!(conn.target, upper);

    // Point only inside the lower node.
    c.start_connection(a, true);
    c.click_canvas(310.0, 10.0);
    assert_eq!(c.connections().all()[1].target, lower);
}

// ─── Drag gestures ───────────────────────────────────────────────────────

#[test]
fn drag_commits_the_pointer_delta() {
    let mut c = GraphController::new();
    let id = c.drop_node(NodeType::Get, 50.0, 60.0);

    c.press_node(id, DragRegion::Body, 100.0, 100.0);
    // A storm of intermediate moves must not accumulate error.
    for i in 0..500 {
        let t = i as f32;
        c.pointer_move(100.0 + t * 0.1, 100.0 - t * 0.05);
    }
    c.pointer_move(175.0, 40.0); // final pointer position: Δ = (75, -60)
    c.pointer_up();

    assert_eq!(
        c.nodes().get(id).unwrap().position,
        Position::new(125.0, 0.0)
    );
}

#[test]
fn anchor_and_delete_presses_do_not_drag() {
    let mut c = GraphController::new();
    let id = c.drop_node(NodeType::Get, 50.0, 60.0);

    c.press_node(id, DragRegion::OutputAnchor, 230.0, 100.0);
    c.pointer_move(400.0, 300.0);
    c.pointer_up();
    // The node did not move; the gesture was a connection drag.
    assert_eq!(
        c.nodes().get(id).unwrap().position,
        Position::new(50.0, 60.0)
    );
    assert!(c.connections().temp().is_some());
    c.click_canvas(700.0, 700.0); // cancel for cleanliness

    c.press_node(id, DragRegion::DeleteControl, 60.0, 70.0);
    assert!(c.nodes().get(id).is_none());
}

#[test]
fn deleting_the_dragged_node_cancels_the_drag() {
    let mut c = GraphController::new();
    let id = c.drop_node(NodeType::Get, 50.0, 60.0);

    c.press_node(id, DragRegion::Body, 100.0, 100.0);
    c.delete_node(id);
    // Further moves must not resurrect or reposition anything.
    c.pointer_move(500.0, 500.0);
    c.pointer_up();
    assert!(c.nodes().is_empty());
    assert!(!c.affordances().grabbing_cursor);
}

#[test]
fn remove_connection_by_id() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);
    c.drop_node(NodeType::End, 300.0, 0.0);
    c.start_connection(a, true);
    c.click_canvas(310.0, 40.0);

    let id = c.connections().all()[0].id;
    assert!(c.remove_connection(id));
    assert!(!c.remove_connection(id));
    assert!(c.connections().is_empty());
}

// ─── Deletion cascades ───────────────────────────────────────────────────

#[test]
fn deleting_a_node_removes_every_incident_connection() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);
    let b = c.drop_node(NodeType::Get, 300.0, 0.0);
    let d = c.drop_node(NodeType::End, 300.0, 200.0);

    c.start_connection(a, true);
    c.click_canvas(310.0, 40.0); // A → B
    c.start_connection(a, true);
    c.click_canvas(310.0, 240.0); // A → D
    assert_eq!(c.connections().len(), 2);

    let removed = c.delete_node(a);
    assert_eq!(removed.len(), 2);
    assert_eq!(c.connections().len(), 0);

    // Survivors keep their positions.
    assert_eq!(c.nodes().get(b).unwrap().position, Position::new(300.0, 0.0));
    assert_eq!(
        c.nodes().get(d).unwrap().position,
        Position::new(300.0, 200.0)
    );

    // The layer never references the deleted node again.
    let layer = c.connection_layer();
    assert!(layer.paths.is_empty());
}

// ─── Redraw batching ─────────────────────────────────────────────────────

#[test]
fn a_burst_of_moves_coalesces_into_one_redraw() {
    let mut c = GraphController::new();
    let id = c.drop_node(NodeType::Get, 0.0, 0.0);
    c.press_node(id, DragRegion::Body, 10.0, 10.0);

    c.take_redraw(); // drain whatever the press queued
    for i in 0..100 {
        c.pointer_move(10.0 + i as f32, 10.0);
    }
    assert!(c.take_redraw());
    assert!(!c.take_redraw());
}

// ─── Serialization round-trip ────────────────────────────────────────────

#[test]
fn export_import_preserves_the_graph() {
    let mut c = GraphController::new();
    let start = c.drop_node(NodeType::Start, 20.0, 30.0);
    let post = c.drop_node(NodeType::Post, 300.0, 30.0);
    let end = c.drop_node(NodeType::End, 600.0, 30.0);

    c.update_config(post, "url", "/api/orders");
    c.update_config(post, "body", r#"{"sku": "A-1"}"#);
    c.start_connection(start, true);
    c.click_canvas(310.0, 60.0); // start → post
    c.start_connection(post, true);
    c.click_canvas(610.0, 60.0); // post → end

    let json = c.export_json("2024-05-01T00:00:00Z".to_string());

    let mut c2 = GraphController::new();
    c2.import_json(&json).unwrap();

    assert_eq!(c2.nodes().len(), 3);
    assert_eq!(c2.connections().len(), 2);
    assert_eq!(c2.nodes().order(), &[start, post, end]);
    assert_eq!(c2.nodes().get(post).unwrap(), c.nodes().get(post).unwrap());

    // Restored controllers keep allocating fresh, collision-free ids.
    let fresh = c2.drop_node(NodeType::Headers, 0.0, 0.0);
    assert!(c2.nodes().order().iter().filter(|id| **id == fresh).count() == 1);
    assert_eq!(fresh.as_str(), "node-4");
}

#[test]
fn import_replaces_the_previous_graph_entirely() {
    let mut c = GraphController::new();
    let a = c.drop_node(NodeType::Start, 0.0, 0.0);
    let b = c.drop_node(NodeType::End, 300.0, 0.0);
    c.start_connection(a, true);
    c.click_canvas(310.0, 40.0);
    let json = c.export_json("t".to_string());

    // Build an unrelated graph, then import over it mid-gesture.
    let mut c2 = GraphController::new();
    let x = c2.drop_node(NodeType::Auth, 50.0, 50.0);
    c2.start_connection(x, true);
    c2.import_json(&json).unwrap();

    assert!(c2.connections().temp().is_none());
    assert_eq!(c2.nodes().len(), 2);
    // The auth node is gone; ids now describe the imported graph.
    assert!(c2.nodes().iter().all(|n| n.node_type != NodeType::Auth));
    assert_eq!(c2.nodes().get(a).unwrap().node_type, NodeType::Start);
    assert_eq!(c2.nodes().get(b).unwrap().node_type, NodeType::End);
    assert_eq!(c2.connections().len(), 1);
}
