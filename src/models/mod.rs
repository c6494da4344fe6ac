pub mod cursor;
pub mod dictionary;
pub mod entry;
pub mod flashcard;
pub mod manifest;

pub use cursor::*;
pub use dictionary::*;
pub use entry::*;
pub use flashcard::*;
pub use manifest::*;
