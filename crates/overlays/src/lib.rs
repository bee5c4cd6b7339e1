//! Fixed-capacity uniform arrays for circle and shape overlays.

pub mod config;
pub mod error;
pub mod identity;
pub mod layout;
pub mod pool;
pub mod records;
pub mod uniforms;

pub use config::*;
pub use error::*;
pub use identity::*;
pub use layout::*;
pub use pool::*;
pub use records::*;
pub use uniforms::*;
