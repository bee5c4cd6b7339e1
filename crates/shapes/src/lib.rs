//! Overlay geometry in the shape buffer's frame space.
//!
//! Paths are stroked into ribbon triangles with mitered joints, polygons are
//! triangulated with earcut. Both carry the world → texel transform the tile
//! shader uses to sample the shape buffer.

pub mod error;
pub mod path;
pub mod polygon;
pub mod stroke;

pub use error::*;
pub use path::*;
pub use polygon::*;
pub use stroke::*;
