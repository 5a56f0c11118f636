use crate::Dim3;

/// Computation hosted by a block kernel.
///
/// A functor is constructed from the kernel argument once per active lane, then called once with
/// the block coordinate and the lane coordinate:
///
/// - `block_idx`: `(virtual block index along x, block index along y, 0)`.
/// - `thread_idx`: `(lane index along x, lane index along y, 0)`.
///
/// The x coordinate of a lane is never bounds-checked, the block always holds exactly
/// [`BLOCK_SIZE`](crate::arg::StaticBlockSize::BLOCK_SIZE) lanes along x. Lanes past the
/// secondary bound `threads.y` never construct the functor.
pub trait BlockFunctor<A>: Sized {
    /// Creates the functor from the kernel argument.
    fn new(arg: &A) -> Self;

    /// Runs the computation of one lane.
    fn call(&mut self, block_idx: Dim3, thread_idx: Dim3);
}
