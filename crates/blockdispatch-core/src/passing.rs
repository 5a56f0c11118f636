//! How the kernel argument reaches the lanes.
//!
//! Small arguments are copied into the kernel parameter space ([ByValue]). Arguments that don't
//! fit are staged once in the process-wide resident slot of their type before the launch and
//! fetched by every lane ([Resident]). The strategy is a static property of the argument type,
//! selected with [KernelArg::Passing].

use blockdispatch_runtime::{
    KernelLaunch,
    backtrace::BackTrace,
    client::ComputeClient,
    resident::ResidentArgs,
};

use crate::{
    LaunchError,
    arg::{KernelArg, StaticBlockSize},
    functor::BlockFunctor,
    kernel::BlockKernel2D,
};

pub use blockdispatch_runtime::PassingMode;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::ByValue {}
    impl Sealed for super::Resident {}
}

/// Strategy getting the kernel argument onto the lanes of a launch.
pub trait ArgPassing: sealed::Sealed + Sized + Send + Sync + 'static {
    /// The runtime view of the strategy, used for logging.
    const MODE: PassingMode;

    /// Makes `arg` available with this strategy and runs the matching entry point of
    /// [BlockKernel2D] on every lane of `launch`.
    fn dispatch<F, A, const GRID_STRIDE: bool>(
        client: &ComputeClient,
        launch: KernelLaunch,
        arg: &A,
    ) -> Result<(), LaunchError>
    where
        A: KernelArg<Passing = Self> + StaticBlockSize,
        F: BlockFunctor<A>;
}

/// The argument is copied into the kernel parameter space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByValue;

/// The argument is staged in the process-wide resident slot of its type before the launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resident;

impl ArgPassing for ByValue {
    const MODE: PassingMode = PassingMode::Value;

    fn dispatch<F, A, const GRID_STRIDE: bool>(
        client: &ComputeClient,
        launch: KernelLaunch,
        arg: &A,
    ) -> Result<(), LaunchError>
    where
        A: KernelArg<Passing = Self> + StaticBlockSize,
        F: BlockFunctor<A>,
    {
        let max = client.properties().max_kernel_param_size;
        if !fits_kernel_param::<A>(max) {
            return Err(LaunchError::ArgumentTooLarge {
                arg: core::any::type_name::<A>(),
                size: core::mem::size_of::<A>(),
                max,
                backtrace: BackTrace::capture(),
            });
        }

        let params = arg.clone();

        client.launch(launch, |builtin| {
            BlockKernel2D::<F, A, GRID_STRIDE>::entry(&params, builtin)
        })
    }
}

impl ArgPassing for Resident {
    const MODE: PassingMode = PassingMode::Resident;

    fn dispatch<F, A, const GRID_STRIDE: bool>(
        client: &ComputeClient,
        launch: KernelLaunch,
        arg: &A,
    ) -> Result<(), LaunchError>
    where
        A: KernelArg<Passing = Self> + StaticBlockSize,
        F: BlockFunctor<A>,
    {
        let staged = ResidentArgs::stage(arg.clone())?;

        let result = client.launch(launch, |builtin| {
            BlockKernel2D::<F, A, GRID_STRIDE>::entry_resident(builtin)
        });

        core::mem::drop(staged);
        result
    }
}

/// Whether an argument of type `A` fits in a kernel parameter space of `max_param_size` bytes.
///
/// Arguments that don't fit should use [Resident] passing.
pub const fn fits_kernel_param<A>(max_param_size: usize) -> bool {
    core::mem::size_of::<A>() <= max_param_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn small_arguments_fit_the_parameter_space() {
        assert!(fits_kernel_param::<[u32; 1024]>(4096));
        assert!(!fits_kernel_param::<[u32; 1025]>(4096));
    }

    #[test_log::test]
    fn strategies_report_their_mode() {
        assert_eq!(ByValue::MODE, PassingMode::Value);
        assert_eq!(Resident::MODE, PassingMode::Resident);
    }
}
