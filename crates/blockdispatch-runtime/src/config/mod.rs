/// Execution config module.
pub mod execution;
/// Launch config module.
pub mod launch;

mod base;
mod logger;

pub use base::*;
pub use logger::*;
