pub mod collab;
pub mod config;
pub mod session;

#[cfg(test)]
mod recorder;

pub use collab::*;
pub use config::*;
pub use session::*;
