pub mod choropleth;
pub mod config;
pub mod labels;
pub mod layer;
pub mod normalize;
pub mod symbology;
pub mod vector;

pub use choropleth::*;
pub use config::*;
pub use labels::*;
pub use layer::*;
pub use normalize::*;
pub use symbology::*;
pub use vector::*;
