pub mod envelope;
pub mod geojson;
pub mod key;
pub mod rings;

pub use envelope::*;
pub use geojson::*;
pub use key::*;
pub use rings::*;
