//! Hit testing: point → node lookup.
//!
//! Commit-time resolution cannot trust the click target element (the
//! release can land on a child icon or label), so it scans every node's
//! bounding box for containment, topmost first. Creation order doubles as
//! z-order: later nodes render above earlier ones.

use aw_core::id::NodeId;
use aw_core::model::NodeBounds;
use std::collections::HashMap;

/// Find the topmost node at position (px, py).
/// Returns `None` if the point lands on empty canvas.
pub fn node_at_position(
    order: &[NodeId],
    bounds: &HashMap<NodeId, NodeBounds>,
    px: f32,
    py: f32,
) -> Option<NodeId> {
    for id in order.iter().rev() {
        if let Some(b) = bounds.get(id)
            && b.contains(px, py)
        {
            return Some(*id);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::model::{Position, Size};

    fn setup() -> (Vec<NodeId>, HashMap<NodeId, NodeBounds>) {
        let size = Size {
            width: 100.0,
            height: 50.0,
        };
        let a = NodeId::intern("node-1");
        let b = NodeId::intern("node-2");
        let mut bounds = HashMap::new();
        bounds.insert(a, NodeBounds::new(Position::new(0.0, 0.0), size));
        // b overlaps a's right half
        bounds.insert(b, NodeBounds::new(Position::new(50.0, 0.0), size));
        (vec![a, b], bounds)
    }

    #[test]
    fn topmost_wins_in_overlap() {
        let (order, bounds) = setup();
        // (60, 25) is inside both; node-2 was created later.
        assert_eq!(
            node_at_position(&order, &bounds, 60.0, 25.0),
            Some(NodeId::intern("node-2"))
        );
        // (10, 25) is only inside node-1.
        assert_eq!(
            node_at_position(&order, &bounds, 10.0, 25.0),
            Some(NodeId::intern("node-1"))
        );
    }

    #[test]
    fn empty_canvas_misses() {
        let (order, bounds) = setup();
        assert_eq!(node_at_position(&order, &bounds, 400.0, 400.0), None);
    }

    #[test]
    fn edges_of_the_box_count_as_inside() {
        let (order, bounds) = setup();
        assert_eq!(
            node_at_position(&order, &bounds, 0.0, 0.0),
            Some(NodeId::intern("node-1"))
        );
        assert_eq!(
            node_at_position(&order, &bounds, 150.0, 50.0),
            Some(NodeId::intern("node-2"))
        );
    }
}
