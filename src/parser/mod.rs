pub mod checksum;
pub mod recording;
pub mod sentence;
pub mod track_builder;

pub use checksum::*;
pub use recording::*;
pub use sentence::*;
pub use track_builder::*;
