//! Node Form Catalog: per-type presentation and default configuration.
//!
//! The canvas engine is agnostic to field semantics: it only needs the
//! catalog to pick an icon/title for a node and to default-construct the
//! config when a node is dropped onto the canvas.

use crate::config::{AuthScheme, EndpointConfig, HttpConfig, NodeConfig};
use crate::model::NodeType;
use smallvec::SmallVec;

/// Presentation metadata for a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTemplate {
    pub icon: &'static str,
    pub title: &'static str,
}

/// Icon and title shown in the node header and the palette.
pub fn template(node_type: NodeType) -> NodeTemplate {
    match node_type {
        NodeType::Start => NodeTemplate {
            icon: "▶️",
            title: "Start Workflow",
        },
        NodeType::End => NodeTemplate {
            icon: "🏁",
            title: "End Workflow",
        },
        NodeType::Endpoint => NodeTemplate {
            icon: "🌐",
            title: "API Endpoint",
        },
        NodeType::Auth => NodeTemplate {
            icon: "🔐",
            title: "Authentication",
        },
        NodeType::Get => NodeTemplate {
            icon: "📥",
            title: "GET Request",
        },
        NodeType::Post => NodeTemplate {
            icon: "📤",
            title: "POST Request",
        },
        NodeType::Put => NodeTemplate {
            icon: "✏️",
            title: "PUT Request",
        },
        NodeType::Delete => NodeTemplate {
            icon: "🗑️",
            title: "DELETE Request",
        },
        NodeType::Params => NodeTemplate {
            icon: "❓",
            title: "Query Parameters",
        },
        NodeType::Headers => NodeTemplate {
            icon: "📋",
            title: "Custom Headers",
        },
        NodeType::Body => NodeTemplate {
            icon: "📝",
            title: "Request Body",
        },
    }
}

/// The default configuration a freshly-dropped node starts with.
pub fn default_config(node_type: NodeType) -> NodeConfig {
    match node_type {
        NodeType::Start => NodeConfig::Start,
        NodeType::End => NodeConfig::End,
        NodeType::Endpoint => NodeConfig::Endpoint(EndpointConfig::default()),
        NodeType::Auth => NodeConfig::Auth(AuthScheme::None),
        NodeType::Get | NodeType::Post | NodeType::Put | NodeType::Delete => {
            NodeConfig::Http(HttpConfig::for_type(node_type))
        }
        NodeType::Params => NodeConfig::Params {
            params: SmallVec::new(),
        },
        NodeType::Headers => NodeConfig::Headers {
            headers: SmallVec::new(),
        },
        NodeType::Body => NodeConfig::Body {
            body: String::new(),
        },
    }
}

/// The wire keys the configuration panel may edit for a node type.
pub fn editable_fields(node_type: NodeType) -> &'static [&'static str] {
    match node_type {
        NodeType::Start | NodeType::End => &[],
        NodeType::Endpoint => &[
            "baseUrl",
            "authType",
            "username",
            "password",
            "token",
            "apiKey",
            "keyLocation",
        ],
        NodeType::Auth => &[
            "authType",
            "username",
            "password",
            "token",
            "apiKey",
            "keyLocation",
        ],
        NodeType::Get | NodeType::Delete => &["url", "timeout"],
        NodeType::Post | NodeType::Put => &["url", "timeout", "body", "bodyType"],
        NodeType::Params | NodeType::Headers => &[],
        NodeType::Body => &["body"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TIMEOUT_MS;

    #[test]
    fn defaults_match_type_shape() {
        match default_config(NodeType::Post) {
            NodeConfig::Http(cfg) => {
                assert_eq!(cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
                assert!(cfg.body.is_some());
            }
            other => panic!("unexpected default for post: {other:?}"),
        }
        match default_config(NodeType::Get) {
            NodeConfig::Http(cfg) => assert!(cfg.body.is_none()),
            other => panic!("unexpected default for get: {other:?}"),
        }
        assert_eq!(default_config(NodeType::Start), NodeConfig::Start);
    }

    #[test]
    fn every_type_has_a_template() {
        for ty in [
            NodeType::Start,
            NodeType::End,
            NodeType::Endpoint,
            NodeType::Auth,
            NodeType::Get,
            NodeType::Post,
            NodeType::Put,
            NodeType::Delete,
            NodeType::Params,
            NodeType::Headers,
            NodeType::Body,
        ] {
            let t = template(ty);
            assert!(!t.icon.is_empty());
            assert!(!t.title.is_empty());
        }
    }

    #[test]
    fn editable_fields_cover_defaults() {
        // Every editable key must be accepted by the default config.
        for ty in [NodeType::Endpoint, NodeType::Get, NodeType::Post, NodeType::Body] {
            let mut cfg = default_config(ty);
            for key in editable_fields(ty) {
                // `authType` and `keyLocation`/`bodyType` need valid values;
                // credential fields only resolve under their scheme. Probe
                // with values that are always legal for the key.
                let value = match *key {
                    "authType" => "none",
                    "keyLocation" => "header",
                    "bodyType" => "json",
                    "timeout" => "1000",
                    _ => "probe",
                };
                if matches!(*key, "username" | "password" | "token" | "apiKey" | "keyLocation") {
                    continue; // scheme-dependent keys probed in config tests
                }
                assert!(
                    cfg.set_field(key, value).is_ok(),
                    "{ty:?} rejected editable key {key}"
                );
            }
        }
    }
}
