use core::ops::Deref;

use crate::{Dim3, passing::ArgPassing};

/// Runtime fields read by the block kernel itself.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelArgBase {
    /// Number of active lanes along each axis of the whole launch.
    ///
    /// Only `threads.y` is read by the kernel: lanes whose global y index is at least
    /// `threads.y` exit without invoking the functor.
    pub threads: Dim3,
    /// Whether the block index along x is swizzled.
    pub swizzle: bool,
    /// Dimension of the matrix the block index is transposed through when swizzling.
    pub swizzle_factor: u32,
}

impl KernelArgBase {
    /// Base without swizzling.
    pub const fn unswizzled(threads: Dim3) -> Self {
        Self {
            threads,
            swizzle: false,
            swizzle_factor: 1,
        }
    }

    /// Enables swizzling with the given factor.
    pub const fn with_swizzle(mut self, swizzle_factor: u32) -> Self {
        self.swizzle = true;
        self.swizzle_factor = swizzle_factor;
        self
    }
}

/// Argument of a block kernel.
///
/// The argument is cloned into the launch and stays immutable while the lanes run, it must be
/// shareable between the worker threads of the executor.
pub trait KernelArg: Clone + Send + Sync + 'static {
    /// How the argument reaches the lanes, [ByValue](crate::passing::ByValue) or
    /// [Resident](crate::passing::Resident).
    type Passing: ArgPassing;

    /// Whether the kernel is built with launch bounds equal to its block size, regardless of
    /// the block size.
    const LAUNCH_BOUNDS: bool = false;

    /// The runtime fields read by the block kernel.
    fn base(&self) -> &KernelArgBase;
}

/// Static number of lanes along the primary (x) dimension of a block.
pub trait StaticBlockSize {
    /// The block size along x.
    const BLOCK_SIZE: u32;
}

/// Curries a static block size into a kernel argument.
///
/// This allows the block size to be set statically at launch time while the kernel body only
/// sees one argument type. Every field of the wrapped argument is reachable through [Deref], and
/// the [KernelArg] implementation forwards to it.
///
/// ```
/// use blockdispatch_core::prelude::*;
///
/// #[derive(Clone)]
/// struct ScaleArg {
///     base: KernelArgBase,
///     factor: f32,
/// }
///
/// impl KernelArg for ScaleArg {
///     type Passing = ByValue;
///
///     fn base(&self) -> &KernelArgBase {
///         &self.base
///     }
/// }
///
/// let arg = ScaleArg {
///     base: KernelArgBase::unswizzled(Dim3::new_2d(256, 4)),
///     factor: 2.0,
/// };
/// let arg = BlockKernelArg::<256, _>::new(&arg);
///
/// assert_eq!(arg.factor, 2.0);
/// assert_eq!(<BlockKernelArg<256, ScaleArg> as StaticBlockSize>::BLOCK_SIZE, 256);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BlockKernelArg<const BLOCK_SIZE: u32, A> {
    arg: A,
}

impl<const BLOCK_SIZE: u32, A: Clone> BlockKernelArg<BLOCK_SIZE, A> {
    /// Creates the argument from a copy of `arg`.
    pub fn new(arg: &A) -> Self {
        Self { arg: arg.clone() }
    }
}

impl<const BLOCK_SIZE: u32, A> BlockKernelArg<BLOCK_SIZE, A> {
    /// The static block size.
    pub const fn block_size(&self) -> u32 {
        BLOCK_SIZE
    }

    /// Returns the wrapped argument.
    pub fn into_inner(self) -> A {
        self.arg
    }
}

impl<const BLOCK_SIZE: u32, A> Deref for BlockKernelArg<BLOCK_SIZE, A> {
    type Target = A;

    fn deref(&self) -> &Self::Target {
        &self.arg
    }
}

impl<const BLOCK_SIZE: u32, A> From<A> for BlockKernelArg<BLOCK_SIZE, A> {
    fn from(arg: A) -> Self {
        Self { arg }
    }
}

impl<const BLOCK_SIZE: u32, A: KernelArg> KernelArg for BlockKernelArg<BLOCK_SIZE, A> {
    type Passing = A::Passing;

    const LAUNCH_BOUNDS: bool = A::LAUNCH_BOUNDS;

    fn base(&self) -> &KernelArgBase {
        self.arg.base()
    }
}

impl<const BLOCK_SIZE: u32, A> StaticBlockSize for BlockKernelArg<BLOCK_SIZE, A> {
    const BLOCK_SIZE: u32 = BLOCK_SIZE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passing::{PassingMode, Resident};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct NormArg {
        base: KernelArgBase,
        epsilon: f64,
        columns: Vec<u32>,
    }

    impl KernelArg for NormArg {
        type Passing = Resident;

        const LAUNCH_BOUNDS: bool = true;

        fn base(&self) -> &KernelArgBase {
            &self.base
        }
    }

    fn norm_arg() -> NormArg {
        NormArg {
            base: KernelArgBase::unswizzled(Dim3::new_2d(128, 6)).with_swizzle(4),
            epsilon: 1e-6,
            columns: vec![3, 1, 2],
        }
    }

    #[test_log::test]
    fn wrapper_is_transparent() {
        let arg = norm_arg();
        let wrapped = BlockKernelArg::<128, _>::new(&arg);

        assert_eq!(wrapped.base(), arg.base());
        assert_eq!(wrapped.epsilon, arg.epsilon);
        assert_eq!(wrapped.columns, arg.columns);
        assert_eq!(*wrapped, arg);
        assert_eq!(wrapped.into_inner(), arg);
    }

    #[test_log::test]
    fn wrapper_exposes_static_block_size() {
        let wrapped = BlockKernelArg::<64, _>::new(&norm_arg());

        assert_eq!(wrapped.block_size(), 64);
        assert_eq!(<BlockKernelArg<64, NormArg> as StaticBlockSize>::BLOCK_SIZE, 64);
        assert_eq!(<BlockKernelArg<512, NormArg> as StaticBlockSize>::BLOCK_SIZE, 512);
    }

    #[test_log::test]
    fn wrapper_forwards_static_configuration() {
        assert!(<BlockKernelArg<64, NormArg> as KernelArg>::LAUNCH_BOUNDS);
        assert_eq!(
            <<BlockKernelArg<64, NormArg> as KernelArg>::Passing as ArgPassing>::MODE,
            PassingMode::Resident
        );
    }

    #[test_log::test]
    fn swizzle_builder_sets_factor() {
        let base = KernelArgBase::unswizzled(Dim3::new_2d(32, 2));
        assert!(!base.swizzle);

        let base = base.with_swizzle(5);
        assert!(base.swizzle);
        assert_eq!(base.swizzle_factor, 5);
    }
}
