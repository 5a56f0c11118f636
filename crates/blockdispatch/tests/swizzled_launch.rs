use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU32, Ordering},
};

use blockdispatch::{
    prelude::*,
    runtime::{HardwareProperties, config::GlobalConfig},
};
use pretty_assertions::assert_eq;

#[derive(Clone)]
struct VisitArg {
    base: KernelArgBase,
    blocks: Arc<Mutex<Vec<u32>>>,
    lanes: Arc<AtomicU32>,
}

impl KernelArg for VisitArg {
    type Passing = ByValue;

    fn base(&self) -> &KernelArgBase {
        &self.base
    }
}

struct Visit {
    arg: VisitArg,
}

impl<const B: u32> BlockFunctor<BlockKernelArg<B, VisitArg>> for Visit {
    fn new(arg: &BlockKernelArg<B, VisitArg>) -> Self {
        Self {
            arg: VisitArg::clone(arg),
        }
    }

    fn call(&mut self, block_idx: Dim3, thread_idx: Dim3) {
        self.arg.lanes.fetch_add(1, Ordering::Relaxed);

        if thread_idx == Dim3::coord(0, 0) && block_idx.y == 0 {
            self.arg.blocks.lock().unwrap().push(block_idx.x);
        }
    }
}

fn visit(swizzle_factor: Option<u32>, grid_x: u32, threads_y: u32) -> (Vec<u32>, u32) {
    let client = ComputeClient::with_config(
        HardwareProperties::default(),
        Arc::new(GlobalConfig::default()),
    );
    let base = KernelArgBase::unswizzled(Dim3::new_2d(16 * grid_x, threads_y));
    let arg = VisitArg {
        base: match swizzle_factor {
            Some(factor) => base.with_swizzle(factor),
            None => base,
        },
        blocks: Arc::new(Mutex::new(Vec::new())),
        lanes: Arc::new(AtomicU32::new(0)),
    };

    BlockKernel2D::<Visit, BlockKernelArg<16, VisitArg>>::launch(
        &client,
        GridDim::new_2d(grid_x, threads_y.div_ceil(4)),
        BlockDim::new_2d(16, 4),
        &BlockKernelArg::new(&arg),
    )
    .unwrap();

    let mut blocks = arg.blocks.lock().unwrap().clone();
    blocks.sort_unstable();

    (blocks, arg.lanes.load(Ordering::Relaxed))
}

#[test_log::test]
fn swizzled_grid_visits_every_virtual_block_once() {
    let (blocks, lanes) = visit(Some(3), 10, 6);

    assert_eq!(blocks, (0..10).collect::<Vec<_>>());
    assert_eq!(lanes, 10 * 16 * 6);
}

#[test_log::test]
fn swizzle_factor_larger_than_grid_keeps_hardware_order() {
    let (blocks, lanes) = visit(Some(12), 10, 4);

    assert_eq!(blocks, (0..10).collect::<Vec<_>>());
    assert_eq!(lanes, 10 * 16 * 4);
}

#[test_log::test]
fn out_of_range_rows_do_no_work() {
    // 2 blocks of 4 rows cover 8 rows, only 5 are active.
    let (_, lanes) = visit(None, 3, 5);

    assert_eq!(lanes, 3 * 16 * 5);
}
