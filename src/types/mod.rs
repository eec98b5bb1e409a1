pub mod fix;
pub mod sample;
pub mod track;

pub use fix::*;
pub use sample::*;
pub use track::*;
