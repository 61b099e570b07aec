pub mod annotations;
pub mod layer;
pub mod mask;
pub mod raster;
pub mod risk;
pub mod stack;
pub mod symbology;
pub mod toggles;

pub use layer::*;
pub use stack::*;
pub use toggles::*;
