pub mod catalog;
pub mod selector;
pub mod source;
pub mod time_range;

pub use catalog::*;
pub use selector::*;
pub use source::*;
pub use time_range::*;
