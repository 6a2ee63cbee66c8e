//! Connection Store: committed edges plus the single in-flight edge.
//!
//! Only one connection gesture can be active at a time: `begin` while a
//! temporary connection exists is a no-op, and `commit`/`cancel` always
//! clear the slot. Commit applies the direction rule: a gesture started
//! at an output anchor runs source → target; one started at an input
//! anchor is reversed.

use crate::id::{ConnectionId, NodeId};
use crate::model::{Connection, Position, TempConnection};

#[derive(Debug, Default)]
pub struct ConnectionStore {
    connections: Vec<Connection>,
    temp: Option<TempConnection>,
    /// Next counter value for `conn-N` allocation. Reset by `clear`.
    next_id: u32,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a connection gesture from a node's anchor. Returns `false`
    /// (and changes nothing) if a gesture is already active.
    ///
    /// The caller guarantees `source` exists; the Graph Controller
    /// computes `anchor` from the node's bounds before delegating here.
    pub fn begin(&mut self, source: NodeId, from_output: bool, anchor: Position) -> bool {
        if self.temp.is_some() {
            log::debug!("connection gesture already active; ignoring begin from {source}");
            return false;
        }
        self.temp = Some(TempConnection {
            source,
            from_output,
            start: anchor,
            cursor: anchor,
        });
        true
    }

    /// Track the pointer during a gesture. No-op when idle. Called at
    /// pointer-move frequency.
    pub fn update_cursor(&mut self, x: f32, y: f32) {
        if let Some(temp) = &mut self.temp {
            temp.cursor = Position::new(x, y);
        }
    }

    /// Resolve the gesture into a committed edge. Self-loops and
    /// duplicate (source, target) pairs are rejected silently. The
    /// temporary connection is cleared either way.
    pub fn commit(&mut self, target: NodeId) -> Option<ConnectionId> {
        let temp = self.temp.take()?;

        let (source, target) = if temp.from_output {
            (temp.source, target)
        } else {
            (target, temp.source)
        };

        if source == target {
            log::debug!("rejecting self-loop on {source}");
            return None;
        }
        if self.contains_pair(source, target) {
            log::debug!("connection {source} -> {target} already exists");
            return None;
        }

        self.next_id += 1;
        let id = ConnectionId::from_counter(self.next_id);
        self.connections.push(Connection { id, source, target });
        Some(id)
    }

    /// Abandon the gesture without creating an edge (release over empty
    /// canvas).
    pub fn cancel(&mut self) {
        self.temp = None;
    }

    /// Insert a committed edge directly (restore path, keeping its id).
    /// Duplicate pairs and self-loops are dropped, matching `commit`.
    pub fn insert(&mut self, connection: Connection) {
        if connection.source == connection.target
            || self.contains_pair(connection.source, connection.target)
        {
            log::warn!(
                "dropping invalid restored connection {} -> {}",
                connection.source,
                connection.target
            );
            return;
        }
        if let Some(n) = connection.id.counter_suffix() {
            self.next_id = self.next_id.max(n);
        }
        self.connections.push(connection);
    }

    /// Remove one edge by id. Returns whether it existed.
    pub fn remove_by_id(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != id);
        before != self.connections.len()
    }

    /// Cascade removal when a node is deleted: removes every edge where
    /// the node is source or target and returns their ids. Also cancels
    /// an in-flight gesture anchored to the node.
    pub fn remove_by_endpoint(&mut self, node: NodeId) -> Vec<ConnectionId> {
        let mut removed = Vec::new();
        self.connections.retain(|c| {
            if c.source == node || c.target == node {
                removed.push(c.id);
                false
            } else {
                true
            }
        });
        if self.temp.is_some_and(|t| t.source == node) {
            self.temp = None;
        }
        removed
    }

    /// Drop all edges and the gesture slot; reset the id counter.
    pub fn clear(&mut self) {
        self.connections.clear();
        self.temp = None;
        self.next_id = 0;
    }

    pub fn contains_pair(&self, source: NodeId, target: NodeId) -> bool {
        self.connections
            .iter()
            .any(|c| c.source == source && c.target == target)
    }

    pub fn temp(&self) -> Option<&TempConnection> {
        self.temp.as_ref()
    }

    pub fn all(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
