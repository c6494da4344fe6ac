pub mod assemble;
pub mod clean;
pub mod curate;
pub mod generate;
pub mod images;
pub mod manifest;
pub mod sanitize;

pub use assemble::*;
pub use clean::*;
pub use curate::*;
pub use generate::*;
pub use images::*;
pub use manifest::*;
pub use sanitize::*;
