pub mod buffers;
pub mod renderer;

pub use buffers::*;
pub use renderer::*;
