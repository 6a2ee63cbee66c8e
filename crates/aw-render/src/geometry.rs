//! Connector geometry: anchor points and cubic curve construction.
//!
//! Pure functions, no state. A connection leaves the source node's
//! output anchor (right-center edge) and enters the target's input anchor
//! (left-center edge). The curve is a cubic whose control points sit at
//! the horizontal midpoint of the span, one at each endpoint's height, so
//! the curve approaches both nodes horizontally regardless of vertical
//! offset, the symmetric "S" that keeps routing readable when nodes
//! are stacked.

use aw_core::model::{NodeBounds, Position};
use kurbo::{CubicBez, Point};

/// The output anchor: right-center edge of a node's bounding box.
pub fn output_anchor(bounds: &NodeBounds) -> Position {
    Position::new(bounds.x + bounds.width, bounds.y + bounds.height / 2.0)
}

/// The input anchor: left-center edge of a node's bounding box.
pub fn input_anchor(bounds: &NodeBounds) -> Position {
    Position::new(bounds.x, bounds.y + bounds.height / 2.0)
}

/// Build the connector cubic from one point to another.
///
/// Both control points share the x of the horizontal midpoint; each keeps
/// its own endpoint's y.
pub fn connector_curve(from: Position, to: Position) -> CubicBez {
    let p0 = Point::new(from.x as f64, from.y as f64);
    let p3 = Point::new(to.x as f64, to.y as f64);
    let mid_x = p0.x + (p3.x - p0.x) * 0.5;
    CubicBez::new(p0, Point::new(mid_x, p0.y), Point::new(mid_x, p3.y), p3)
}

/// SVG path data for a connector curve: `M x0 y0 C x1 y1 x2 y2 x3 y3`.
pub fn path_data(curve: &CubicBez) -> String {
    format!(
        "M {} {} C {} {} {} {} {} {}",
        fmt_coord(curve.p0.x),
        fmt_coord(curve.p0.y),
        fmt_coord(curve.p1.x),
        fmt_coord(curve.p1.y),
        fmt_coord(curve.p2.x),
        fmt_coord(curve.p2.y),
        fmt_coord(curve.p3.x),
        fmt_coord(curve.p3.y),
    )
}

/// Trim trailing `.0` so path data stays compact for round pixel values.
fn fmt_coord(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
