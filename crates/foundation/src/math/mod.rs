pub mod line;
pub mod linear;
pub mod mercator;
pub mod vec;

pub use line::*;
pub use linear::*;
pub use mercator::*;
pub use vec::*;
