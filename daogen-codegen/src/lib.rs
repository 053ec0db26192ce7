mod entity;
mod error;
mod merge;
mod util;

pub use entity::*;
pub use error::*;
pub use merge::*;
