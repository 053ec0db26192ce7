mod base_entity;
mod column;
mod relation;
mod writer;

pub use base_entity::*;
pub use column::*;
pub use relation::*;
pub use writer::*;
