use crate::server::{BlockDim, GridDim};

/// Properties of the hardware a grid is launched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareProperties {
    /// Maximum number of lanes in a block.
    pub max_units_per_block: u32,
    /// Maximum extent of a block along each axis.
    pub max_block_dim: BlockDim,
    /// Maximum extent of a grid along each axis.
    pub max_grid_dim: GridDim,
    /// Size of the kernel parameter space in bytes. Arguments passed by value must fit in it.
    pub max_kernel_param_size: usize,
}

impl Default for HardwareProperties {
    fn default() -> Self {
        Self {
            max_units_per_block: 1024,
            max_block_dim: BlockDim::new_3d(1024, 1024, 64),
            max_grid_dim: GridDim::new_3d(i32::MAX as u32, u16::MAX as u32, u16::MAX as u32),
            max_kernel_param_size: 4096,
        }
    }
}
