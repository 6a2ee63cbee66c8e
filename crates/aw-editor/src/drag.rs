//! Per-node pointer-drag state machine.
//!
//! `idle → dragging → idle`. A drag starts on pointer-down on the node
//! body; pointer-downs on a connection anchor or the delete control are
//! separate gestures and never reach here. The press snapshots the
//! pointer and the node's position once; every move computes
//! `node_start + (pointer − pointer_start)`, so position is a pure delta
//! from the press and cannot drift no matter how many move events fire.
//!
//! Touch input uses the same three entry points: the bridge maps
//! touch-start/move/end onto pointer_down/move/up with identical delta
//! semantics.

use aw_core::id::NodeId;
use aw_core::model::Position;

/// Where on a node a pointer-down landed. Only `Body` starts a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRegion {
    Body,
    InputAnchor,
    OutputAnchor,
    DeleteControl,
}

impl DragRegion {
    /// Parse the region name the host derives from the event target
    /// element's class.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "body" => DragRegion::Body,
            "input" => DragRegion::InputAnchor,
            "output" => DragRegion::OutputAnchor,
            "delete" => DragRegion::DeleteControl,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        node: NodeId,
        pointer_start: Position,
        node_start: Position,
    },
}

/// Global UI affordances held for the duration of a drag: the host sets
/// a grabbing cursor and suppresses text selection while either is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragAffordances {
    pub grabbing_cursor: bool,
    pub suppress_selection: bool,
}

#[derive(Debug)]
pub struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Begin a drag. Returns `true` when the gesture actually started
    /// (body press while idle).
    pub fn pointer_down(
        &mut self,
        node: NodeId,
        region: DragRegion,
        pointer: Position,
        node_position: Position,
    ) -> bool {
        if region != DragRegion::Body {
            return false;
        }
        if let DragState::Dragging { node: active, .. } = self.state {
            log::debug!("drag of {active} still active; ignoring press on {node}");
            return false;
        }
        self.state = DragState::Dragging {
            node,
            pointer_start: pointer,
            node_start: node_position,
        };
        true
    }

    /// Track a pointer move. Returns the dragged node and its new
    /// position, or `None` when idle.
    pub fn pointer_move(&mut self, pointer: Position) -> Option<(NodeId, Position)> {
        let DragState::Dragging {
            node,
            pointer_start,
            node_start,
        } = self.state
        else {
            return None;
        };
        let new_position = Position::new(
            node_start.x + (pointer.x - pointer_start.x),
            node_start.y + (pointer.y - pointer_start.y),
        );
        Some((node, new_position))
    }

    /// End the drag. Returns the node whose final position the caller
    /// persists (release always commits; there is no escape-to-abort).
    pub fn pointer_up(&mut self) -> Option<NodeId> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { node, .. } => Some(node),
            DragState::Idle => None,
        }
    }

    /// Abort the drag if it references `node`. Invoked when a node is
    /// deleted mid-gesture (e.g. an async load replacing the canvas).
    pub fn cancel_if(&mut self, node: NodeId) -> bool {
        if matches!(self.state, DragState::Dragging { node: active, .. } if active == node) {
            self.state = DragState::Idle;
            true
        } else {
            false
        }
    }

    /// Abort unconditionally (canvas cleared or replaced).
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// The node currently being dragged, if any.
    pub fn active(&self) -> Option<NodeId> {
        match self.state {
            DragState::Dragging { node, .. } => Some(node),
            DragState::Idle => None,
        }
    }

    pub fn affordances(&self) -> DragAffordances {
        let dragging = matches!(self.state, DragState::Dragging { .. });
        DragAffordances {
            grabbing_cursor: dragging,
            suppress_selection: dragging,
        }
    }
}
