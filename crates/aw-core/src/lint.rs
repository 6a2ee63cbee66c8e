//! Lint diagnostics for workflow graphs.
//!
//! Reports structural issues without modifying the graph. Results feed
//! the pre-save validation banner and the node badge tooltips.

use crate::connections::ConnectionStore;
use crate::id::NodeId;
use crate::model::NodeType;
use crate::store::NodeStore;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Should be fixed — the workflow will not run as intended.
    Warning,
    /// Informational — likely incomplete, not necessarily wrong.
    Info,
}

/// A single lint diagnostic.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// The node this diagnostic refers to, if any (graph-level findings
    /// carry `None`).
    pub node_id: Option<NodeId>,
    /// Human-readable message.
    pub message: String,
    /// Severity level.
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "missing-start").
    pub rule: &'static str,
}

// ─── Public API ──────────────────────────────────────────────────────────

/// Run all lint rules over the workflow and return diagnostics.
#[must_use]
pub fn lint_workflow(nodes: &NodeStore, _connections: &ConnectionStore) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_entry_points(nodes, &mut diags);
    lint_unconfigured(nodes, &mut diags);
    diags
}

/// Whether the workflow passes the hard validation gate (no warnings).
/// Info-level findings do not block saving or testing.
pub fn is_valid(nodes: &NodeStore, connections: &ConnectionStore) -> bool {
    lint_workflow(nodes, connections)
        .iter()
        .all(|d| d.severity != LintSeverity::Warning)
}

// ─── Rules ───────────────────────────────────────────────────────────────

/// A runnable workflow needs a Start node and an End node.
fn lint_entry_points(nodes: &NodeStore, diags: &mut Vec<LintDiagnostic>) {
    if !nodes.iter().any(|n| n.node_type == NodeType::Start) {
        diags.push(LintDiagnostic {
            node_id: None,
            message: "Workflow must have a Start node".to_string(),
            severity: LintSeverity::Warning,
            rule: "missing-start",
        });
    }
    if !nodes.iter().any(|n| n.node_type == NodeType::End) {
        diags.push(LintDiagnostic {
            node_id: None,
            message: "Workflow should have an End node".to_string(),
            severity: LintSeverity::Warning,
            rule: "missing-end",
        });
    }
}

/// Flag nodes whose configuration badge says they are not ready.
fn lint_unconfigured(nodes: &NodeStore, diags: &mut Vec<LintDiagnostic>) {
    for node in nodes.iter() {
        let status = node.status();
        if !status.configured {
            diags.push(LintDiagnostic {
                node_id: Some(node.id),
                message: format!("{}: {}", node.id, status.text),
                severity: LintSeverity::Info,
                rule: "unconfigured-node",
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_is_missing_both_entry_points() {
        let nodes = NodeStore::new();
        let connections = ConnectionStore::new();
        let diags = lint_workflow(&nodes, &connections);
        let rules: Vec<_> = diags.iter().map(|d| d.rule).collect();
        assert!(rules.contains(&"missing-start"));
        assert!(rules.contains(&"missing-end"));
        assert!(!is_valid(&nodes, &connections));
    }

    #[test]
    fn start_and_end_satisfy_the_gate() {
        let mut nodes = NodeStore::new();
        let connections = ConnectionStore::new();
        nodes.create(NodeType::Start, 0.0, 0.0, None);
        nodes.create(NodeType::End, 200.0, 0.0, None);
        assert!(is_valid(&nodes, &connections));
    }

    #[test]
    fn unconfigured_nodes_are_informational() {
        let mut nodes = NodeStore::new();
        let connections = ConnectionStore::new();
        nodes.create(NodeType::Start, 0.0, 0.0, None);
        nodes.create(NodeType::End, 200.0, 0.0, None);
        let get = nodes.create(NodeType::Get, 100.0, 0.0, None);

        let diags = lint_workflow(&nodes, &connections);
        let info: Vec<_> = diags
            .iter()
            .filter(|d| d.rule == "unconfigured-node")
            .collect();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].node_id, Some(get));
        assert_eq!(info[0].severity, LintSeverity::Info);

        // Info findings don't block validation.
        assert!(is_valid(&nodes, &connections));
    }
}
