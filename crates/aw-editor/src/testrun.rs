//! Mocked API test for HTTP method nodes.
//!
//! The real request never fires; the "Run API Test" button produces a
//! simulated response echoing the node's method, url, and config, so the
//! panel has something realistic to display.

use aw_core::config::NodeConfig;
use aw_core::model::Node;
use serde_json::{Value, json};

/// Build the simulated response for a method node. Returns `None` for
/// nodes that are not HTTP methods.
pub fn mock_response(node: &Node, timestamp: &str) -> Option<Value> {
    if !node.node_type.is_http_method() {
        return None;
    }
    let url = match &node.config {
        NodeConfig::Http(cfg) if !cfg.url.is_empty() => cfg.url.clone(),
        _ => "/api/test".to_string(),
    };
    Some(json!({
        "status": 200,
        "statusText": "OK (Mocked)",
        "requestUrl": url,
        "data": {
            "message": "This is a simulated API response.",
            "method": node.node_type.wire_name().to_uppercase(),
            "time": timestamp,
            "config": node.config.to_value(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_core::catalog;
    use aw_core::id::NodeId;
    use aw_core::model::{NodeType, Position};

    #[test]
    fn echoes_method_and_url() {
        let mut node = Node::new(
            NodeId::intern("node-1"),
            NodeType::Post,
            Position::default(),
            catalog::default_config(NodeType::Post),
        );
        node.config.set_field("url", "/api/users").unwrap();

        let v = mock_response(&node, "2024-05-01T00:00:00Z").unwrap();
        assert_eq!(v["status"], 200);
        assert_eq!(v["statusText"], "OK (Mocked)");
        assert_eq!(v["requestUrl"], "/api/users");
        assert_eq!(v["data"]["method"], "POST");
        assert_eq!(v["data"]["config"]["url"], "/api/users");
    }

    #[test]
    fn non_method_nodes_have_no_test_run() {
        let node = Node::new(
            NodeId::intern("node-2"),
            NodeType::Auth,
            Position::default(),
            catalog::default_config(NodeType::Auth),
        );
        assert!(mock_response(&node, "t").is_none());
    }

    #[test]
    fn empty_url_falls_back() {
        let node = Node::new(
            NodeId::intern("node-3"),
            NodeType::Get,
            Position::default(),
            catalog::default_config(NodeType::Get),
        );
        let v = mock_response(&node, "t").unwrap();
        assert_eq!(v["requestUrl"], "/api/test");
    }
}
