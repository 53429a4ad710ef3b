pub mod geodesy;
pub mod matrix;
pub mod projection;
pub mod rotation;
pub mod vec;

pub use geodesy::*;
pub use matrix::*;
pub use projection::*;
pub use rotation::*;
pub use vec::*;
