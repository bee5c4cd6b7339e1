//! Quadtree level-of-detail engine for map tiles.
//!
//! [`LodTree`] owns the nodes and their in-flight loads, [`LodController`]
//! decides per frame which nodes split or merge.

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod kind;
pub mod layer;
pub mod loader;
pub mod node;
pub mod provider;
pub mod tile;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use event::*;
pub use kind::*;
pub use layer::*;
pub use loader::*;
pub use node::*;
pub use provider::*;
pub use tile::*;
pub use tree::*;
