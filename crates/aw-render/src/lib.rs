pub mod geometry;
pub mod hit;
pub mod layer;

pub use layer::{ConnectionLayer, EdgePath, redraw_all};
