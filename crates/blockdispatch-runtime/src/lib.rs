#![warn(missing_docs)]

//! BlockDispatch runtime crate that executes block kernels on a grid of blocks and lanes.

#[macro_use]
extern crate derive_new;

/// Backtrace captured by launch errors.
pub mod backtrace;
/// Builtin coordinates handed to every lane.
pub mod builtin;
/// Compute client module.
pub mod client;
/// Runtime configuration.
pub mod config;
/// Grid execution module.
pub mod executor;
/// Process-wide resident argument slots.
pub mod resident;
/// Launch dimensions and errors.
pub mod server;
/// Launch validation against hardware limits.
pub mod validation;

mod kernel;
mod properties;

pub use kernel::*;
pub use properties::*;
