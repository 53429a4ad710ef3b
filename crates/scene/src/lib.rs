pub mod camera;
pub mod components;
pub mod composer;
pub mod config;
pub mod controller;
pub mod group;
pub mod picking;

pub use camera::*;
pub use composer::*;
pub use config::*;
pub use controller::*;
pub use group::*;
pub use picking::{PickHit, Ray, pick_ray};
