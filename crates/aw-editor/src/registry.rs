//! Bounds registry: node id → bounding box.
//!
//! The host measures each node element after layout and reports its size
//! here; positions come from the Node Store. Consumers (hit testing, the
//! connection layer) take a snapshot map instead of querying the DOM.
//! The registry is owned by the Graph Controller and torn down with the
//! nodes it describes.

use aw_core::id::NodeId;
use aw_core::model::{Node, NodeBounds, Size};
use aw_core::store::NodeStore;
use std::collections::HashMap;

/// Size a node renders at before the host reports a measurement, so
/// anchors and hit tests are well-defined from the moment of creation.
pub const DEFAULT_NODE_SIZE: Size = Size {
    width: 180.0,
    height: 80.0,
};

#[derive(Debug)]
pub struct BoundsRegistry {
    sizes: HashMap<NodeId, Size>,
    default_size: Size,
}

impl Default for BoundsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundsRegistry {
    pub fn new() -> Self {
        Self {
            sizes: HashMap::new(),
            default_size: DEFAULT_NODE_SIZE,
        }
    }

    /// Record a measured size for a node.
    pub fn set_size(&mut self, id: NodeId, width: f32, height: f32) {
        self.sizes.insert(id, Size { width, height });
    }

    /// Forget a deleted node's measurement.
    pub fn remove(&mut self, id: NodeId) {
        self.sizes.remove(&id);
    }

    pub fn clear(&mut self) {
        self.sizes.clear();
    }

    /// The bounding box for a node: stored position + measured size.
    pub fn bounds_of(&self, node: &Node) -> NodeBounds {
        let size = self.sizes.get(&node.id).copied().unwrap_or(self.default_size);
        NodeBounds::new(node.position, size)
    }

    /// Snapshot every node's bounds for render/hit consumers.
    pub fn snapshot(&self, nodes: &NodeStore) -> HashMap<NodeId, NodeBounds> {
        nodes
            .iter()
            .map(|node| (node.id, self.bounds_of(node)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::model::{NodeType, Position};

    #[test]
    fn unmeasured_nodes_use_the_default_size() {
        let mut nodes = NodeStore::new();
        let id = nodes.create(NodeType::Start, 50.0, 60.0, None);
        let registry = BoundsRegistry::new();

        let b = registry.bounds_of(nodes.get(id).unwrap());
        assert_eq!(b.x, 50.0);
        assert_eq!(b.y, 60.0);
        assert_eq!(b.width, DEFAULT_NODE_SIZE.width);
        assert_eq!(b.height, DEFAULT_NODE_SIZE.height);
    }

    #[test]
    fn measured_sizes_override_the_default() {
        let mut nodes = NodeStore::new();
        let id = nodes.create(NodeType::Get, 0.0, 0.0, None);
        let mut registry = BoundsRegistry::new();
        registry.set_size(id, 220.0, 96.0);

        let snapshot = registry.snapshot(&nodes);
        assert_eq!(snapshot[&id].width, 220.0);
        assert_eq!(snapshot[&id].height, 96.0);
    }

    #[test]
    fn snapshot_tracks_positions() {
        let mut nodes = NodeStore::new();
        let id = nodes.create(NodeType::Get, 0.0, 0.0, None);
        let registry = BoundsRegistry::new();

        nodes.reposition(id, 33.0, 44.0);
        let snapshot = registry.snapshot(&nodes);
        assert_eq!(snapshot[&id].x, 33.0);
        assert_eq!(snapshot[&id].y, 44.0);
        assert_eq!(
            nodes.get(id).unwrap().position,
            Position::new(33.0, 44.0)
        );
    }
}
