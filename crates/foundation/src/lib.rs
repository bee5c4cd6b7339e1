pub mod arena;
pub mod bounds;
pub mod error;
pub mod handles;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use arena::*;
pub use bounds::*;
pub use error::*;
pub use handles::*;
