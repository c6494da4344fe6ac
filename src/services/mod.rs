pub mod dictionary;
pub mod image_search;

pub use dictionary::*;
pub use image_search::*;
