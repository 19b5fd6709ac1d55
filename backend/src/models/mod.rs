//! Domain types shared by the benchmark engine, the video sources and the
//! HTTP layer.

pub mod band;
pub mod comparison;
pub mod duration;
pub mod macros;
pub mod trajectory;
pub mod video;

pub use band::*;
pub use comparison::*;
pub use duration::*;
pub use trajectory::*;
pub use video::*;
