pub mod bounds;
pub mod color;
pub mod coords;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use color::*;
pub use coords::*;
