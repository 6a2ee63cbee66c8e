use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner shared by node and connection ids — fast
/// comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for workflow nodes (`node-3`).
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
///
/// Allocation is owned by the `NodeStore` (a per-session counter that
/// `clear()` resets); this type only interns and resolves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing handle.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// The id for slot `n` of the node counter: `node-{n}`.
    pub fn from_counter(n: u32) -> Self {
        Self::intern(&format!("node-{n}"))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The numeric suffix of a counter-allocated id, if this id has one.
    /// Used to advance the allocator past ids restored from a document.
    pub fn counter_suffix(&self) -> Option<u32> {
        self.as_str().strip_prefix("node-")?.parse().ok()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

/// An interned identifier for connections (`conn-1`). Counter-allocated by
/// the `ConnectionStore`; unique within a session.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Spur);

impl ConnectionId {
    pub fn intern(s: &str) -> Self {
        ConnectionId(INTERNER.get_or_intern(s))
    }

    /// The id for slot `n` of the connection counter: `conn-{n}`.
    pub fn from_counter(n: u32) -> Self {
        Self::intern(&format!("conn-{n}"))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// The numeric suffix of a counter-allocated id, if this id has one.
    pub fn counter_suffix(&self) -> Option<u32> {
        self.as_str().strip_prefix("conn-")?.parse().ok()
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ConnectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConnectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ConnectionId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("node-7");
        let b = NodeId::intern("node-7");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "node-7");
    }

    #[test]
    fn counter_ids() {
        assert_eq!(NodeId::from_counter(3).as_str(), "node-3");
        assert_eq!(ConnectionId::from_counter(1).as_str(), "conn-1");
    }

    #[test]
    fn counter_suffix_parses() {
        assert_eq!(NodeId::intern("node-12").counter_suffix(), Some(12));
        assert_eq!(NodeId::intern("imported-a").counter_suffix(), None);
        assert_eq!(ConnectionId::intern("conn-4").counter_suffix(), Some(4));
        assert_eq!(ConnectionId::intern("conn-xyz").counter_suffix(), None);
    }
}
