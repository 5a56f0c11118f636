use crate::{
    builtin::Builtin,
    config::execution::ExecutionConfig,
    server::{BlockDim, Dim3, GridDim},
};

/// Runs every (block, lane) pair of a launch on the CPU.
///
/// Blocks are independent and may run in parallel on the rayon thread pool, in which case they
/// complete in no particular order. The lanes of one block always run sequentially on the same
/// worker, in hardware order (x fastest, then y, then z). Only a sequential executor also walks
/// the blocks in hardware order.
#[derive(new, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridExecutor {
    parallel: bool,
}

impl Default for GridExecutor {
    fn default() -> Self {
        Self::from_config(&ExecutionConfig::default())
    }
}

impl GridExecutor {
    /// Creates an executor following the execution configuration.
    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.parallel)
    }

    /// Whether blocks are dispatched on the thread pool.
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }

    /// Executes `kernel` once per lane of the grid.
    ///
    /// A panic in `kernel` is propagated to the caller once the in-flight blocks complete.
    pub fn execute<K>(&self, grid_dim: GridDim, block_dim: BlockDim, kernel: K)
    where
        K: Fn(&Builtin) + Sync,
    {
        let total_blocks = grid_dim.x as usize * grid_dim.y as usize * grid_dim.z as usize;
        let run_block = |block: usize| {
            execute_block(&kernel, block_pos(block, grid_dim), grid_dim, block_dim)
        };

        cfg_if::cfg_if! {
            if #[cfg(feature = "parallel")] {
                if self.parallel {
                    use rayon::prelude::*;

                    (0..total_blocks).into_par_iter().for_each(run_block);
                    return;
                }
            }
        }

        (0..total_blocks).for_each(run_block);
    }
}

fn block_pos(block: usize, grid_dim: GridDim) -> Dim3 {
    let blocks_per_row = grid_dim.x as usize;
    let blocks_per_slice = blocks_per_row * grid_dim.y as usize;

    Dim3::new_3d(
        (block % blocks_per_row) as u32,
        ((block % blocks_per_slice) / blocks_per_row) as u32,
        (block / blocks_per_slice) as u32,
    )
}

fn execute_block<K>(kernel: &K, block_idx: Dim3, grid_dim: GridDim, block_dim: BlockDim)
where
    K: Fn(&Builtin),
{
    for z in 0..block_dim.z {
        for y in 0..block_dim.y {
            for x in 0..block_dim.x {
                let builtin = Builtin::new(block_idx, Dim3::new_3d(x, y, z), block_dim, grid_dim);
                kernel(&builtin);
            }
        }
    }
}
