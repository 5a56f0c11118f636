use crate::server::{BlockDim, Dim3, GridDim};

/// Hardware coordinates of one lane during a launch.
///
/// On an accelerator these are intrinsics; the grid executor hands them to the kernel
/// explicitly instead.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Builtin {
    /// Position of the block within the grid.
    pub block_idx: Dim3,
    /// Position of the lane within its block.
    pub thread_idx: Dim3,
    /// Shape of every block of the launch.
    pub block_dim: BlockDim,
    /// Shape of the grid of the launch.
    pub grid_dim: GridDim,
}

impl Builtin {
    /// Global position of the lane along the secondary (y) dimension.
    pub const fn absolute_pos_y(&self) -> u32 {
        self.block_dim.y * self.block_idx.y + self.thread_idx.y
    }
}
