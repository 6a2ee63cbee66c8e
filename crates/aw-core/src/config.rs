//! Strongly-typed per-node configuration.
//!
//! Each `NodeType` carries its own config variant instead of an untyped
//! key/value bag. Panel edits still arrive as `(key, value)` string pairs
//! from form inputs, so every variant exposes `set_field` keyed by the
//! wire field names (`baseUrl`, `authType`, `timeout`, …). Unknown keys
//! and malformed values produce a `ConfigError` which callers log and
//! drop rather than propagate.
//!
//! The JSON mapping is hand-written (`to_value` / `from_value`) so the
//! wire shape stays flat per node type and deserialization stays
//! permissive: missing fields fall back to catalog defaults, never error.

use crate::model::{NodeStatus, NodeType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use smallvec::SmallVec;
use thiserror::Error;

/// Error raised by config field mutation. Callers treat these as
/// log-and-drop (the panel keeps its previous value).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown config field `{0}` for this node type")]
    UnknownField(String),
    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },
}

// ─── Key/value pairs ─────────────────────────────────────────────────────

/// A single key/value entry in a params, headers, or form-field list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyValue {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Short key/value lists live inline; four covers typical forms.
pub type KeyValueList = SmallVec<[KeyValue; 4]>;

// ─── Authentication ──────────────────────────────────────────────────────

/// Where an API key is injected into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyLocation {
    #[default]
    Header,
    Query,
}

impl KeyLocation {
    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "header" => Some(KeyLocation::Header),
            "query" => Some(KeyLocation::Query),
            _ => None,
        }
    }

    fn wire_name(&self) -> &'static str {
        match self {
            KeyLocation::Header => "header",
            KeyLocation::Query => "query",
        }
    }
}

/// Authentication scheme. Switching schemes replaces the variant wholesale,
/// so credential fields from the previous scheme cannot leak through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthScheme {
    #[default]
    None,
    Basic {
        username: String,
        password: String,
    },
    Bearer {
        token: String,
    },
    ApiKey {
        api_key: String,
        key_location: KeyLocation,
    },
}

impl AuthScheme {
    /// The wire value of the `authType` field.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthScheme::None => "none",
            AuthScheme::Basic { .. } => "basic",
            AuthScheme::Bearer { .. } => "bearer",
            AuthScheme::ApiKey { .. } => "api-key",
        }
    }

    /// A fresh default scheme for a wire `authType` value.
    pub fn from_kind(kind: &str) -> Option<Self> {
        Some(match kind {
            "none" => AuthScheme::None,
            "basic" => AuthScheme::Basic {
                username: String::new(),
                password: String::new(),
            },
            "bearer" => AuthScheme::Bearer {
                token: String::new(),
            },
            "api-key" => AuthScheme::ApiKey {
                api_key: String::new(),
                key_location: KeyLocation::default(),
            },
            _ => return None,
        })
    }

    /// Whether the scheme has everything it needs to authenticate.
    pub fn configured(&self) -> bool {
        match self {
            AuthScheme::None => false,
            AuthScheme::Basic { username, password } => {
                !username.is_empty() && !password.is_empty()
            }
            AuthScheme::Bearer { token } => !token.is_empty(),
            AuthScheme::ApiKey { api_key, .. } => !api_key.is_empty(),
        }
    }

    fn set_field(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if key == "authType" {
            *self = AuthScheme::from_kind(value).ok_or_else(|| ConfigError::InvalidValue {
                field: "authType".into(),
                message: format!("unknown auth type `{value}`"),
            })?;
            return Ok(());
        }
        match (key, self) {
            ("username", AuthScheme::Basic { username, .. }) => {
                *username = value.to_string();
                Ok(())
            }
            ("password", AuthScheme::Basic { password, .. }) => {
                *password = value.to_string();
                Ok(())
            }
            ("token", AuthScheme::Bearer { token }) => {
                *token = value.to_string();
                Ok(())
            }
            ("apiKey", AuthScheme::ApiKey { api_key, .. }) => {
                *api_key = value.to_string();
                Ok(())
            }
            ("keyLocation", AuthScheme::ApiKey { key_location, .. }) => {
                *key_location =
                    KeyLocation::from_wire(value).ok_or_else(|| ConfigError::InvalidValue {
                        field: "keyLocation".into(),
                        message: format!("unknown key location `{value}`"),
                    })?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownField(key.to_string())),
        }
    }

    fn write_value(&self, out: &mut Map<String, Value>) {
        out.insert("authType".into(), json!(self.kind()));
        match self {
            AuthScheme::None => {}
            AuthScheme::Basic { username, password } => {
                out.insert("username".into(), json!(username));
                out.insert("password".into(), json!(password));
            }
            AuthScheme::Bearer { token } => {
                out.insert("token".into(), json!(token));
            }
            AuthScheme::ApiKey {
                api_key,
                key_location,
            } => {
                out.insert("apiKey".into(), json!(api_key));
                out.insert("keyLocation".into(), json!(key_location.wire_name()));
            }
        }
    }

    fn from_value(v: &Value) -> Self {
        match v.get("authType").and_then(Value::as_str) {
            Some("basic") => AuthScheme::Basic {
                username: str_field(v, "username"),
                password: str_field(v, "password"),
            },
            Some("bearer") => AuthScheme::Bearer {
                token: str_field(v, "token"),
            },
            Some("api-key") => AuthScheme::ApiKey {
                api_key: str_field(v, "apiKey"),
                key_location: v
                    .get("keyLocation")
                    .and_then(Value::as_str)
                    .and_then(KeyLocation::from_wire)
                    .unwrap_or_default(),
            },
            _ => AuthScheme::None,
        }
    }
}

// ─── Request body ────────────────────────────────────────────────────────

/// How the request body is edited: raw JSON text or key/value form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    #[default]
    Json,
    Form,
}

/// Which half of a form field an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFieldPart {
    Key,
    Value,
}

/// The editable request body carried by POST and PUT nodes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestBody {
    pub body_type: BodyType,
    /// Raw JSON payload text (the `body` wire field).
    pub text: String,
    pub form_fields: KeyValueList,
}

impl RequestBody {
    /// Switch the editing mode. Entering form mode seeds one empty field
    /// and converts any existing flat-object JSON text into fields.
    pub fn set_body_type(&mut self, body_type: BodyType) {
        self.body_type = body_type;
        if body_type == BodyType::Form {
            if !self.text.trim().is_empty() {
                self.json_to_fields();
            }
            if self.form_fields.is_empty() {
                self.form_fields.push(KeyValue::default());
            }
        }
    }

    /// Convert the JSON text into form fields. Only flat objects convert;
    /// anything else leaves the current fields untouched.
    pub fn json_to_fields(&mut self) {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&self.text) else {
            return;
        };
        self.form_fields = map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                KeyValue::new(key, value)
            })
            .collect();
    }

    /// Render the form fields as a pretty-printed JSON object string,
    /// skipping fields whose key is blank.
    pub fn fields_to_json(&self) -> String {
        let mut map = Map::new();
        for field in &self.form_fields {
            let key = field.key.trim();
            if key.is_empty() {
                continue;
            }
            map.insert(key.to_string(), json!(field.value));
        }
        serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
    }

    /// Append an empty field for the user to fill in.
    pub fn add_field(&mut self) {
        self.form_fields.push(KeyValue::default());
    }

    /// Edit one half of a field in place. Out-of-range indices are a no-op.
    pub fn update_field(&mut self, index: usize, part: FormFieldPart, text: &str) {
        if let Some(field) = self.form_fields.get_mut(index) {
            match part {
                FormFieldPart::Key => field.key = text.to_string(),
                FormFieldPart::Value => field.value = text.to_string(),
            }
        }
    }

    /// Remove a field; the form never goes below one (empty) row.
    pub fn remove_field(&mut self, index: usize) {
        if index < self.form_fields.len() {
            self.form_fields.remove(index);
            if self.form_fields.is_empty() {
                self.form_fields.push(KeyValue::default());
            }
        }
    }

    /// Drop every field and re-seed one empty row.
    pub fn clear_fields(&mut self) {
        self.form_fields.clear();
        self.form_fields.push(KeyValue::default());
    }

    fn write_value(&self, out: &mut Map<String, Value>) {
        out.insert("body".into(), json!(self.text));
        out.insert(
            "bodyType".into(),
            serde_json::to_value(self.body_type).unwrap_or(Value::Null),
        );
        out.insert(
            "formFields".into(),
            serde_json::to_value(&self.form_fields).unwrap_or_else(|_| json!([])),
        );
    }

    fn from_value(v: &Value) -> Self {
        Self {
            body_type: v
                .get("bodyType")
                .and_then(|t| serde_json::from_value(t.clone()).ok())
                .unwrap_or_default(),
            text: str_field(v, "body"),
            form_fields: kv_list_field(v, "formFields"),
        }
    }
}

/// Starter snippets for the body editor's template buttons.
pub fn body_template(kind: &str) -> Option<&'static str> {
    match kind {
        "object" => Some("{\n  \"name\": \"New Item\",\n  \"status\": \"pending\"\n}"),
        "array" => Some("[\n  {\n    \"id\": 1,\n    \"value\": \"initial\"\n  }\n]"),
        _ => None,
    }
}

// ─── Per-type configs ────────────────────────────────────────────────────

pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Config for the endpoint node: workflow-wide base URL + auth.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub auth: AuthScheme,
}

/// Config shared by the four HTTP method nodes. `body` is `Some` only for
/// POST and PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub url: String,
    pub timeout_ms: u32,
    pub body: Option<RequestBody>,
}

impl HttpConfig {
    pub fn for_type(node_type: NodeType) -> Self {
        Self {
            url: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            body: node_type.has_request_body().then(RequestBody::default),
        }
    }
}

/// The tagged configuration carried by every node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
    Start,
    End,
    Endpoint(EndpointConfig),
    Auth(AuthScheme),
    Http(HttpConfig),
    Params { params: KeyValueList },
    Headers { headers: KeyValueList },
    Body { body: String },
}

impl NodeConfig {
    /// Mutate a single field by its wire key. The auth `authType` key
    /// switches the scheme variant, discarding stale credential fields.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match self {
            NodeConfig::Start | NodeConfig::End => Err(ConfigError::UnknownField(key.to_string())),
            NodeConfig::Endpoint(cfg) => match key {
                "baseUrl" => {
                    cfg.base_url = value.to_string();
                    Ok(())
                }
                _ => cfg.auth.set_field(key, value),
            },
            NodeConfig::Auth(scheme) => scheme.set_field(key, value),
            NodeConfig::Http(cfg) => match key {
                "url" => {
                    cfg.url = value.to_string();
                    Ok(())
                }
                // Matches the form's number input: unparseable → 0.
                "timeout" => {
                    cfg.timeout_ms = value.trim().parse().unwrap_or(0);
                    Ok(())
                }
                "body" => match &mut cfg.body {
                    Some(body) => {
                        body.text = value.to_string();
                        Ok(())
                    }
                    None => Err(ConfigError::UnknownField(key.to_string())),
                },
                "bodyType" => match &mut cfg.body {
                    Some(body) => {
                        let ty = serde_json::from_value(json!(value)).map_err(|_| {
                            ConfigError::InvalidValue {
                                field: "bodyType".into(),
                                message: format!("unknown body type `{value}`"),
                            }
                        })?;
                        body.set_body_type(ty);
                        Ok(())
                    }
                    None => Err(ConfigError::UnknownField(key.to_string())),
                },
                _ => Err(ConfigError::UnknownField(key.to_string())),
            },
            NodeConfig::Params { .. } | NodeConfig::Headers { .. } => {
                // Lists are edited through add/remove operations, not fields.
                Err(ConfigError::UnknownField(key.to_string()))
            }
            NodeConfig::Body { body } => match key {
                "body" => {
                    *body = value.to_string();
                    Ok(())
                }
                _ => Err(ConfigError::UnknownField(key.to_string())),
            },
        }
    }

    /// The request body editor, where the node type carries one.
    pub fn request_body_mut(&mut self) -> Option<&mut RequestBody> {
        match self {
            NodeConfig::Http(cfg) => cfg.body.as_mut(),
            _ => None,
        }
    }

    /// The key/value list edited by the params/headers panel.
    pub fn key_value_list_mut(&mut self) -> Option<&mut KeyValueList> {
        match self {
            NodeConfig::Params { params } => Some(params),
            NodeConfig::Headers { headers } => Some(headers),
            _ => None,
        }
    }

    /// Derive the badge status for a node of the given type.
    pub fn status(&self, node_type: NodeType) -> NodeStatus {
        match self {
            NodeConfig::Start => NodeStatus::new(true, "Ready"),
            NodeConfig::End => NodeStatus::new(true, "End Point"),
            NodeConfig::Endpoint(cfg) => {
                let configured = !cfg.base_url.is_empty();
                NodeStatus::new(
                    configured,
                    if configured {
                        "Base URL Set"
                    } else {
                        "Missing Base URL"
                    },
                )
            }
            NodeConfig::Auth(scheme) => {
                let configured = scheme.configured();
                NodeStatus::new(
                    configured,
                    if configured {
                        "Auth Configured"
                    } else {
                        "Missing Auth Detail"
                    },
                )
            }
            NodeConfig::Http(cfg) => {
                let mut configured = !cfg.url.is_empty();
                if node_type.has_request_body()
                    && !cfg.body.as_ref().is_some_and(|b| !b.text.is_empty())
                {
                    configured = false;
                }
                NodeStatus::new(
                    configured,
                    if configured {
                        "Ready to Run"
                    } else {
                        "Missing URL/Body"
                    },
                )
            }
            NodeConfig::Params { params } => list_status(params.len()),
            NodeConfig::Headers { headers } => list_status(headers.len()),
            NodeConfig::Body { body } => {
                let configured = !body.trim().is_empty();
                NodeStatus::new(configured, if configured { "Body Set" } else { "Empty Body" })
            }
        }
    }

    // ─── JSON mapping ────────────────────────────────────────────────────

    /// Serialize to the flat per-type wire object.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        match self {
            NodeConfig::Start | NodeConfig::End => {}
            NodeConfig::Endpoint(cfg) => {
                out.insert("baseUrl".into(), json!(cfg.base_url));
                cfg.auth.write_value(&mut out);
            }
            NodeConfig::Auth(scheme) => scheme.write_value(&mut out),
            NodeConfig::Http(cfg) => {
                out.insert("url".into(), json!(cfg.url));
                out.insert("timeout".into(), json!(cfg.timeout_ms));
                if let Some(body) = &cfg.body {
                    body.write_value(&mut out);
                }
            }
            NodeConfig::Params { params } => {
                out.insert(
                    "params".into(),
                    serde_json::to_value(params).unwrap_or_else(|_| json!([])),
                );
            }
            NodeConfig::Headers { headers } => {
                out.insert(
                    "headers".into(),
                    serde_json::to_value(headers).unwrap_or_else(|_| json!([])),
                );
            }
            NodeConfig::Body { body } => {
                out.insert("body".into(), json!(body));
            }
        }
        Value::Object(out)
    }

    /// Deserialize from a wire object, permissively: missing or mistyped
    /// fields fall back to the type's defaults.
    pub fn from_value(node_type: NodeType, v: &Value) -> Self {
        match node_type {
            NodeType::Start => NodeConfig::Start,
            NodeType::End => NodeConfig::End,
            NodeType::Endpoint => NodeConfig::Endpoint(EndpointConfig {
                base_url: str_field(v, "baseUrl"),
                auth: AuthScheme::from_value(v),
            }),
            NodeType::Auth => NodeConfig::Auth(AuthScheme::from_value(v)),
            NodeType::Get | NodeType::Post | NodeType::Put | NodeType::Delete => {
                NodeConfig::Http(HttpConfig {
                    url: str_field(v, "url"),
                    timeout_ms: v
                        .get("timeout")
                        .and_then(Value::as_u64)
                        .map(|t| t as u32)
                        .unwrap_or(DEFAULT_TIMEOUT_MS),
                    body: node_type
                        .has_request_body()
                        .then(|| RequestBody::from_value(v)),
                })
            }
            NodeType::Params => NodeConfig::Params {
                params: kv_list_field(v, "params"),
            },
            NodeType::Headers => NodeConfig::Headers {
                headers: kv_list_field(v, "headers"),
            },
            NodeType::Body => NodeConfig::Body {
                body: str_field(v, "body"),
            },
        }
    }
}

fn list_status(len: usize) -> NodeStatus {
    if len > 0 {
        NodeStatus::new(true, format!("{len} Set"))
    } else {
        NodeStatus::new(false, "No items set")
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn kv_list_field(v: &Value, key: &str) -> KeyValueList {
    v.get(key)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| serde_json::from_value(e.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
