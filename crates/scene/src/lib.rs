pub mod camera;
pub mod composition;
pub mod config;

pub use camera::*;
pub use composition::*;
pub use config::*;
