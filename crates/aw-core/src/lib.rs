pub mod catalog;
pub mod config;
pub mod connections;
pub mod document;
pub mod id;
pub mod lint;
pub mod model;
pub mod store;

pub use config::{AuthScheme, BodyType, ConfigError, KeyValue, NodeConfig, RequestBody};
pub use connections::ConnectionStore;
pub use document::{DocumentError, GraphDocument, ParsedDocument, parse_document};
pub use id::{ConnectionId, NodeId};
pub use lint::{LintDiagnostic, LintSeverity, lint_workflow};
pub use model::*;
pub use store::NodeStore;
