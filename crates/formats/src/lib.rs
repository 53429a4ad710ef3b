pub mod geojson;
pub mod loader;
pub mod names;
pub mod stats;

pub use geojson::*;
pub use loader::*;
pub use names::*;
pub use stats::*;
