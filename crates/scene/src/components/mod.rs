pub mod solid;
pub mod transform;

pub use solid::*;
pub use transform::*;
