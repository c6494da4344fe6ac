pub mod model;
pub mod note;

pub use model::*;
pub use note::*;
