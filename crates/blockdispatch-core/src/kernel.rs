use core::marker::PhantomData;

use blockdispatch_runtime::{
    KernelLaunch, backtrace::BackTrace, builtin::Builtin, client::ComputeClient,
    resident::get_arg,
};

use crate::{
    BlockDim, Dim3, GridDim, LaunchError,
    arg::{KernelArg, StaticBlockSize},
    functor::BlockFunctor,
    passing::{ArgPassing, ByValue, Resident},
    swizzle::virtual_block_idx,
};

/// Block size above which a kernel is always built with launch bounds.
pub const LAUNCH_BOUNDS_THRESHOLD: u32 = 512;

/// Launch bounds of a block kernel, 0 when the number of lanes per block is unconstrained.
///
/// The kernel is bounded to its block size when bounds are `requested` or when the block size
/// exceeds [LAUNCH_BOUNDS_THRESHOLD].
pub const fn launch_bounds(requested: bool, block_size: u32) -> u32 {
    if requested || block_size > LAUNCH_BOUNDS_THRESHOLD {
        block_size
    } else {
        0
    }
}

/// Implementation of the generic 2D block kernel.
///
/// Splits the block and lane indices along x and y and passes them separately to the functor.
/// The block index along x goes through [virtual_block_idx]. The x lane dimension is static
/// (`A::BLOCK_SIZE`, e.g. for efficient reductions) and never bounds-checked, the y lane
/// dimension is checked against `threads.y`: lanes past it return without constructing the
/// functor.
#[inline(always)]
pub fn block_kernel_2d_impl<F, A>(arg: &A, builtin: &Builtin)
where
    A: KernelArg,
    F: BlockFunctor<A>,
{
    let block_idx = Dim3::coord(virtual_block_idx(arg, builtin), builtin.block_idx.y);
    let thread_idx = Dim3::coord(builtin.thread_idx.x, builtin.thread_idx.y);
    let j = builtin.absolute_pos_y();
    if j >= arg.base().threads.y {
        return;
    }

    let mut t = F::new(arg);
    t.call(block_idx, thread_idx);
}

/// The generic 2D block kernel.
///
/// - `F`: functor defining the computation of one lane.
/// - `A`: kernel argument, carrying the static block size.
/// - `GRID_STRIDE`: whether a lane computes multiple items along x. Not supported, any use of a
///   kernel with `GRID_STRIDE = true` fails to build.
///
/// The kernel imposes launch bounds equal to the block size when the argument requests them
/// ([KernelArg::LAUNCH_BOUNDS]) or when the block size is above [LAUNCH_BOUNDS_THRESHOLD].
///
/// ```compile_fail
/// use blockdispatch_core::prelude::*;
///
/// #[derive(Clone)]
/// struct Arg(KernelArgBase);
///
/// impl KernelArg for Arg {
///     type Passing = ByValue;
///
///     fn base(&self) -> &KernelArgBase {
///         &self.0
///     }
/// }
///
/// struct Noop;
///
/// impl<A> BlockFunctor<A> for Noop {
///     fn new(_arg: &A) -> Self {
///         Noop
///     }
///
///     fn call(&mut self, _block_idx: Dim3, _thread_idx: Dim3) {}
/// }
///
/// const BOUNDS: u32 = BlockKernel2D::<Noop, BlockKernelArg<128, Arg>, true>::LAUNCH_BOUNDS;
/// ```
///
/// ```compile_fail
/// use blockdispatch_core::prelude::*;
///
/// #[derive(Clone)]
/// struct Arg(KernelArgBase);
///
/// impl KernelArg for Arg {
///     type Passing = ByValue;
///
///     fn base(&self) -> &KernelArgBase {
///         &self.0
///     }
/// }
///
/// struct Noop;
///
/// impl<A> BlockFunctor<A> for Noop {
///     fn new(_arg: &A) -> Self {
///         Noop
///     }
///
///     fn call(&mut self, _block_idx: Dim3, _thread_idx: Dim3) {}
/// }
///
/// let arg = BlockKernelArg::<128, _>::new(&Arg(KernelArgBase::unswizzled(Dim3::new_2d(128, 1))));
/// let builtin = Builtin::new(
///     Dim3::coord(0, 0),
///     Dim3::coord(0, 0),
///     BlockDim::new_1d(128),
///     GridDim::new_1d(1),
/// );
///
/// BlockKernel2D::<Noop, BlockKernelArg<128, Arg>, true>::entry(&arg, &builtin);
/// ```
pub struct BlockKernel2D<F, A, const GRID_STRIDE: bool = false> {
    _functor: PhantomData<fn() -> F>,
    _arg: PhantomData<fn() -> A>,
}

impl<F, A, const GRID_STRIDE: bool> BlockKernel2D<F, A, GRID_STRIDE>
where
    A: KernelArg + StaticBlockSize,
    F: BlockFunctor<A>,
{
    /// Launch bounds of the kernel, 0 when unconstrained.
    pub const LAUNCH_BOUNDS: u32 = {
        assert!(!GRID_STRIDE, "grid_stride not supported for BlockKernel");
        launch_bounds(A::LAUNCH_BOUNDS, A::BLOCK_SIZE)
    };

    /// Fully qualified name of the kernel.
    pub fn name() -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Launches the kernel on `client` with `grid_dim` blocks of `block_dim` lanes.
    ///
    /// The argument is passed following `A::Passing`. Returns once every lane completed.
    ///
    /// # Errors
    ///
    /// - [LaunchError::BlockSizeMismatch] when `block_dim.x` isn't `A::BLOCK_SIZE`.
    /// - [LaunchError::InvalidSwizzleFactor] when swizzling with a factor of 0.
    /// - [LaunchError::ArgumentTooLarge] when a by-value argument doesn't fit the parameter space.
    /// - [LaunchError::ResidentSlotBusy] when a resident argument of the same type is staged.
    /// - Any hardware limit error of the runtime.
    pub fn launch(
        client: &ComputeClient,
        grid_dim: GridDim,
        block_dim: BlockDim,
        arg: &A,
    ) -> Result<(), LaunchError> {
        if block_dim.x != A::BLOCK_SIZE {
            return Err(LaunchError::BlockSizeMismatch {
                block_size: A::BLOCK_SIZE,
                block_dim_x: block_dim.x,
                backtrace: BackTrace::capture(),
            });
        }

        let base = arg.base();
        if base.swizzle && base.swizzle_factor == 0 {
            return Err(LaunchError::InvalidSwizzleFactor {
                backtrace: BackTrace::capture(),
            });
        }

        let launch = KernelLaunch::new(
            Self::name(),
            grid_dim,
            block_dim,
            <A::Passing as ArgPassing>::MODE,
            Self::LAUNCH_BOUNDS,
        );

        <A::Passing as ArgPassing>::dispatch::<F, A, GRID_STRIDE>(client, launch, arg)
    }
}

impl<F, A, const GRID_STRIDE: bool> BlockKernel2D<F, A, GRID_STRIDE>
where
    A: KernelArg<Passing = ByValue> + StaticBlockSize,
    F: BlockFunctor<A>,
{
    /// Entry point of the kernel when the argument is passed by value.
    pub fn entry(arg: &A, builtin: &Builtin) {
        const { assert!(!GRID_STRIDE, "grid_stride not supported for BlockKernel") };
        block_kernel_2d_impl::<F, A>(arg, builtin);
    }
}

impl<F, A, const GRID_STRIDE: bool> BlockKernel2D<F, A, GRID_STRIDE>
where
    A: KernelArg<Passing = Resident> + StaticBlockSize,
    F: BlockFunctor<A>,
{
    /// Entry point of the kernel when the argument was staged in its resident slot before the
    /// launch.
    pub fn entry_resident(builtin: &Builtin) {
        const { assert!(!GRID_STRIDE, "grid_stride not supported for BlockKernel") };
        block_kernel_2d_impl::<F, A>(&get_arg::<A>(), builtin);
    }
}
