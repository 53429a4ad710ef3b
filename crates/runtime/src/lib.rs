pub mod frame;
pub mod input;
pub mod readiness;
pub mod teardown;

pub use frame::*;
pub use input::*;
pub use readiness::*;
pub use teardown::*;
