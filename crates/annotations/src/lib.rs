pub mod category;
pub mod store;
pub mod summary;

pub use category::*;
pub use store::*;
pub use summary::*;
