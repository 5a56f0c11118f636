use blockdispatch_runtime::builtin::Builtin;

use crate::arg::KernelArg;

/// Swizzles the block index by mapping it onto a matrix and transposing it, to potentially
/// increase cache utilization.
///
/// Uses the `swizzle` and `swizzle_factor` fields of the argument base: when `swizzle` is unset
/// the hardware block index along x is returned unchanged, otherwise
/// [swizzle_block_idx] is applied with the grid extent along x.
pub fn virtual_block_idx<A: KernelArg>(arg: &A, builtin: &Builtin) -> u32 {
    let base = arg.base();
    match base.swizzle {
        true => swizzle_block_idx(builtin.block_idx.x, builtin.grid_dim.x, base.swizzle_factor),
        false => builtin.block_idx.x,
    }
}

/// Maps `block_idx` onto a `swizzle_factor × (gridp / swizzle_factor)` matrix and returns its
/// transposed position.
///
/// `gridp` is the portion of the grid that is exactly divisible by `swizzle_factor`. Indices in
/// that portion are permuted among themselves, indices past it are returned unchanged.
///
/// `swizzle_factor` must be at least 1.
pub const fn swizzle_block_idx(block_idx: u32, grid_extent: u32, swizzle_factor: u32) -> u32 {
    debug_assert!(swizzle_factor > 0, "swizzle_factor must be at least 1");

    let gridp = grid_extent - grid_extent % swizzle_factor;

    if block_idx < gridp {
        let i = block_idx % swizzle_factor;
        let j = block_idx / swizzle_factor;

        i * (gridp / swizzle_factor) + j
    } else {
        block_idx
    }
}
