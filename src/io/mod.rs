pub mod input;
pub mod output;
pub mod store;
pub mod wordlist;

pub use input::*;
pub use output::*;
pub use store::*;
pub use wordlist::*;
