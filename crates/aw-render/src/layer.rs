//! The connection layer: clear-then-redraw rendering of connector curves.
//!
//! `redraw_all` is a pure function of current state (committed edges
//! whose endpoints both resolve, plus the in-flight edge if one exists),
//! so repeated calls with unchanged state produce the same layer and
//! nothing stale can accumulate. It is called once per animation frame
//! during drags.

use crate::geometry::{connector_curve, input_anchor, output_anchor, path_data};
use aw_core::id::{ConnectionId, NodeId};
use aw_core::model::{Connection, NodeBounds, TempConnection};
use std::collections::HashMap;

/// Stroke style for committed connections.
const EDGE_COLOR: &str = "#28a745";
const EDGE_WIDTH: f32 = 3.0;
/// Stroke style for the in-flight connection.
const TEMP_COLOR: &str = "#667eea";
const TEMP_WIDTH: f32 = 2.0;
const TEMP_DASH: &str = "5,5";

/// One drawable connector path.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    /// `None` for the in-flight edge.
    pub id: Option<ConnectionId>,
    /// SVG path data (`M … C …`).
    pub d: String,
    pub temp: bool,
}

/// The full redrawn layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionLayer {
    pub paths: Vec<EdgePath>,
}

/// Rebuild the layer from scratch.
///
/// Committed connections whose source or target no longer has bounds are
/// skipped; dangling edges are pruned eagerly on deletion, so hitting
/// one here means a logic error upstream, worth a log line but never a
/// panic or a ghost curve.
pub fn redraw_all(
    connections: &[Connection],
    bounds: &HashMap<NodeId, NodeBounds>,
    temp: Option<&TempConnection>,
) -> ConnectionLayer {
    let mut paths = Vec::with_capacity(connections.len() + temp.is_some() as usize);

    for conn in connections {
        let (Some(source), Some(target)) = (bounds.get(&conn.source), bounds.get(&conn.target))
        else {
            log::warn!(
                "connection {} references a node without bounds; skipping",
                conn.id
            );
            continue;
        };
        let curve = connector_curve(output_anchor(source), input_anchor(target));
        paths.push(EdgePath {
            id: Some(conn.id),
            d: path_data(&curve),
            temp: false,
        });
    }

    if let Some(temp) = temp {
        let curve = connector_curve(temp.start, temp.cursor);
        paths.push(EdgePath {
            id: None,
            d: path_data(&curve),
            temp: true,
        });
    }

    ConnectionLayer { paths }
}

impl ConnectionLayer {
    /// Render the layer as a standalone SVG element the host drops into
    /// the canvas. The temp edge is dashed and colored distinctly.
    pub fn to_svg(&self, width: f32, height: f32) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"connections-layer\" \
             width=\"{width}\" height=\"{height}\" style=\"overflow: visible\">\n"
        ));
        for path in &self.paths {
            svg.push_str("  <path d=\"");
            svg.push_str(&path.d);
            svg.push_str("\" fill=\"none\"");
            if path.temp {
                svg.push_str(&format!(
                    " stroke=\"{TEMP_COLOR}\" stroke-width=\"{TEMP_WIDTH}\" \
                     stroke-dasharray=\"{TEMP_DASH}\""
                ));
            } else {
                svg.push_str(&format!(
                    " stroke=\"{EDGE_COLOR}\" stroke-width=\"{EDGE_WIDTH}\""
                ));
                if let Some(id) = path.id {
                    svg.push_str(&format!(" data-connection-id=\"{id}\""));
                }
            }
            svg.push_str(" />\n");
        }
        svg.push_str("</svg>");
        svg
    }
}
