//! Node Store: owns the id → node map and the ordered id list.
//!
//! The two structures are kept in lockstep: every id in the order list
//! has exactly one map entry and vice versa. Operations that reference a
//! vanished node log and no-op instead of failing: config edits racing a
//! deletion are routine with async panel updates.

use crate::catalog;
use crate::id::NodeId;
use crate::model::{Node, NodeType, Position};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: HashMap<NodeId, Node>,
    /// Creation order; drives rendering z-order and document output.
    order: Vec<NodeId>,
    /// Next counter value for `node-N` allocation. Reset by `clear`.
    next_id: u32,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node and return its id.
    ///
    /// `explicit_id` preserves cross-references when restoring from a
    /// document; the counter is advanced past any restored `node-N`
    /// suffix so later allocations cannot collide with restored ids.
    pub fn create(
        &mut self,
        node_type: NodeType,
        x: f32,
        y: f32,
        explicit_id: Option<NodeId>,
    ) -> NodeId {
        let id = match explicit_id {
            Some(id) => {
                if let Some(n) = id.counter_suffix() {
                    self.next_id = self.next_id.max(n);
                }
                id
            }
            None => {
                self.next_id += 1;
                NodeId::from_counter(self.next_id)
            }
        };

        let node = Node::new(
            id,
            node_type,
            Position::new(x, y),
            catalog::default_config(node_type),
        );
        if self.nodes.insert(id, node).is_none() {
            self.order.push(id);
        } else {
            log::warn!("node {id} created twice; replacing in place");
        }
        id
    }

    /// Insert a fully-formed node (restore path, keeping its config).
    pub fn insert(&mut self, node: Node) {
        let id = node.id;
        if let Some(n) = id.counter_suffix() {
            self.next_id = self.next_id.max(n);
        }
        if self.nodes.insert(id, node).is_none() {
            self.order.push(id);
        } else {
            log::warn!("node {id} restored twice; replacing in place");
        }
    }

    /// Mutate one config field. Unknown node or field: log and no-op.
    pub fn update_config(&mut self, id: NodeId, key: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(&id) else {
            log::warn!("config update for unknown node {id} (key {key}); ignoring");
            return;
        };
        if let Err(err) = node.config.set_field(key, value) {
            log::warn!("config update rejected for {id}: {err}");
        }
    }

    /// Remove a node. Idempotent; returns whether the node existed.
    /// Cascading connection removal is the caller's responsibility
    /// (the Graph Controller pairs this with the Connection Store).
    pub fn delete(&mut self, id: NodeId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|n| *n != id);
        true
    }

    /// Empty the store and reset the id counter. Used for "clear canvas"
    /// and as the first step of loading a new graph.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.next_id = 0;
    }

    /// Update position only. O(1); called continuously during drag.
    pub fn reposition(&mut self, id: NodeId, x: f32, y: f32) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = Position::new(x, y);
        } else {
            log::warn!("reposition for unknown node {id}; ignoring");
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Ids in creation order.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
