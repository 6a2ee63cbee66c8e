//! Core data model for workflow graphs.
//!
//! A workflow is a flat, ordered collection of typed nodes joined by
//! directed connections. Nodes carry canvas-local pixel positions (purely
//! user-dragged; there is no layout engine) and a strongly-typed
//! configuration per node kind. Connections record which side was the
//! output anchor at creation time; there is no cycle restriction.

use crate::config::NodeConfig;
use crate::id::{ConnectionId, NodeId};
use serde::{Deserialize, Serialize};

// ─── Node types ──────────────────────────────────────────────────────────

/// The closed set of node kinds a workflow can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Entry point of the workflow.
    Start,
    /// Exit point of the workflow.
    End,
    /// Base URL + authentication for the whole workflow.
    Endpoint,
    /// Standalone authentication step.
    Auth,
    Get,
    Post,
    Put,
    Delete,
    /// Query-parameter key/value set.
    Params,
    /// Custom header key/value set.
    Headers,
    /// Raw request body.
    Body,
}

impl NodeType {
    /// The wire name used in documents and DOM datasets (`"endpoint"`, …).
    pub fn wire_name(&self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Endpoint => "endpoint",
            NodeType::Auth => "auth",
            NodeType::Get => "get",
            NodeType::Post => "post",
            NodeType::Put => "put",
            NodeType::Delete => "delete",
            NodeType::Params => "params",
            NodeType::Headers => "headers",
            NodeType::Body => "body",
        }
    }

    /// Parse a wire name. Returns `None` for unrecognized types.
    pub fn from_wire(s: &str) -> Option<Self> {
        Some(match s {
            "start" => NodeType::Start,
            "end" => NodeType::End,
            "endpoint" => NodeType::Endpoint,
            "auth" => NodeType::Auth,
            "get" => NodeType::Get,
            "post" => NodeType::Post,
            "put" => NodeType::Put,
            "delete" => NodeType::Delete,
            "params" => NodeType::Params,
            "headers" => NodeType::Headers,
            "body" => NodeType::Body,
            _ => return None,
        })
    }

    /// Whether this is one of the four HTTP method nodes.
    pub fn is_http_method(&self) -> bool {
        matches!(
            self,
            NodeType::Get | NodeType::Post | NodeType::Put | NodeType::Delete
        )
    }

    /// Whether the method node carries a request body (POST and PUT).
    pub fn has_request_body(&self) -> bool {
        matches!(self, NodeType::Post | NodeType::Put)
    }
}

// ─── Geometry primitives ─────────────────────────────────────────────────

/// A canvas-local position in pixels (top-left of a node's bounding box).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A node's rendered size in pixels. Reported by the host after layout;
/// the bounds registry falls back to a default until measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// An axis-aligned bounding box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeBounds {
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A positioned, typed, configurable unit in the workflow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub node_type: NodeType,
    pub position: Position,
    pub config: NodeConfig,
}

impl Node {
    pub fn new(id: NodeId, node_type: NodeType, position: Position, config: NodeConfig) -> Self {
        Self {
            id,
            node_type,
            position,
            config,
        }
    }

    /// Derive the node's badge status from its configuration.
    pub fn status(&self) -> NodeStatus {
        self.config.status(self.node_type)
    }
}

/// The configuration badge shown on a node: whether the node is usable as
/// configured, and the short text summarizing why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    pub configured: bool,
    pub text: String,
}

impl NodeStatus {
    pub fn new(configured: bool, text: impl Into<String>) -> Self {
        Self {
            configured,
            text: text.into(),
        }
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A directed edge between two nodes' anchors. Direction encodes which
/// side was the output anchor when the edge was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub source: NodeId,
    pub target: NodeId,
}

/// The single in-flight edge being dragged by the user. Exists only
/// between a connection-point press and its commit or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempConnection {
    /// The node the gesture started from.
    pub source: NodeId,
    /// Whether the gesture started at the output anchor (right-center).
    pub from_output: bool,
    /// The computed anchor point the curve is pinned to.
    pub start: Position,
    /// The live cursor position the curve follows.
    pub cursor: Position,
}
