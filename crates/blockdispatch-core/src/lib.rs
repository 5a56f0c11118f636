#![warn(missing_docs)]

//! BlockDispatch core crate.
//!
//! A generic 2D block kernel hosting user functors. The primary (x) dimension of a block has a
//! static size carried by the argument type ([`arg::BlockKernelArg`]), the block index along x
//! can be swizzled to improve the locality of concurrently scheduled blocks
//! ([`swizzle::virtual_block_idx`]), and the argument reaches the lanes either by value or
//! through a process-wide resident slot ([`passing`]).

#[macro_use]
extern crate derive_new;

/// Kernel arguments and their static block size.
pub mod arg;
/// The functor contract hosted by block kernels.
pub mod functor;
/// The 2D block kernel body and its entry points.
pub mod kernel;
/// Argument passing strategies.
pub mod passing;
/// Block index swizzling.
pub mod swizzle;

/// Export runtime types used by kernels and launches.
pub use blockdispatch_runtime::{
    HardwareProperties,
    builtin::Builtin,
    client::ComputeClient,
    server::{BlockDim, Dim3, GridDim, LaunchError, ResourceLimitError},
};

/// Runtime crate, re-exported for configuration and resident staging.
pub use blockdispatch_runtime as runtime;

/// Items needed to write and launch block kernels.
pub mod prelude {
    pub use crate::arg::{BlockKernelArg, KernelArg, KernelArgBase, StaticBlockSize};
    pub use crate::functor::BlockFunctor;
    pub use crate::kernel::{BlockKernel2D, launch_bounds};
    pub use crate::passing::{ArgPassing, ByValue, Resident};
    pub use crate::swizzle::virtual_block_idx;
    pub use crate::{BlockDim, Builtin, ComputeClient, Dim3, GridDim, LaunchError};
}
