use crate::backtrace::BackTrace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a launch was refused.
#[derive(Error, Clone)]
pub enum LaunchError {
    /// The launch exceeds a hardware or kernel limit
    #[error("Too many resources were requested during launch\n{0}")]
    TooManyResources(#[from] ResourceLimitError),

    /// A grid or block extent is zero.
    #[error(
        "Can't launch an empty grid.\nRequested grid {grid:?} with blocks {block:?}.\nBacktrace\n{backtrace}"
    )]
    EmptyLaunch {
        /// Requested grid dimensions.
        grid: (u32, u32, u32),
        /// Requested block dimensions.
        block: (u32, u32, u32),
        /// Where the error was raised.
        backtrace: BackTrace,
    },

    /// The x extent of the block doesn't match the static block size of the argument.
    ///
    /// Lanes along x are never bounds-checked on device, so the block must cover exactly
    /// `block_size` lanes.
    #[error(
        "Block x dimension {block_dim_x} doesn't match the static block size {block_size}.\nBacktrace\n{backtrace}"
    )]
    BlockSizeMismatch {
        /// Static block size of the kernel argument.
        block_size: u32,
        /// Requested block x dimension.
        block_dim_x: u32,
        /// Where the error was raised.
        backtrace: BackTrace,
    },

    /// Swizzling was requested with a swizzle factor of zero.
    #[error("Swizzling requires a swizzle factor of at least 1.\nBacktrace\n{backtrace}")]
    InvalidSwizzleFactor {
        /// Where the error was raised.
        backtrace: BackTrace,
    },

    /// The argument doesn't fit in the kernel parameter space.
    #[error(
        "Kernel argument {arg} is {size} bytes, the parameter space holds at most {max} bytes. Use resident passing instead.\nBacktrace\n{backtrace}"
    )]
    ArgumentTooLarge {
        /// Type name of the argument.
        arg: &'static str,
        /// Size of the argument in bytes.
        size: usize,
        /// Maximum size of the parameter space in bytes.
        max: usize,
        /// Where the error was raised.
        backtrace: BackTrace,
    },

    /// A resident argument of the same type is still staged by another launch.
    #[error(
        "The resident slot for {arg} is already staged, overlapping resident launches must be serialized.\nBacktrace\n{backtrace}"
    )]
    ResidentSlotBusy {
        /// Type name of the argument.
        arg: &'static str,
        /// Where the error was raised.
        backtrace: BackTrace,
    },
}

/// A launch configuration exceeding the hardware or kernel limits.
#[derive(Error, Clone)]
pub enum ResourceLimitError {
    /// More lanes per block than the hardware runs
    #[error(
        "Total unit count exceeds maximum.\nRequested {requested} units, max units is {max}.\nBacktrace\n{backtrace}"
    )]
    Units {
        /// Requested value
        requested: u32,
        /// Maximum value
        max: u32,
        /// Where the error was raised.
        backtrace: BackTrace,
    },
    /// `BlockDim` exceeds maximum
    #[error(
        "Block dim exceeds maximum bounds.\nRequested {requested:?}, max is {max:?}.\nBacktrace\n{backtrace}"
    )]
    BlockDim {
        /// Requested value
        requested: (u32, u32, u32),
        /// Maximum value
        max: (u32, u32, u32),
        /// Where the error was raised.
        backtrace: BackTrace,
    },
    /// `GridDim` exceeds maximum
    #[error(
        "Grid dim exceeds maximum bounds.\nRequested {requested:?}, max is {max:?}.\nBacktrace\n{backtrace}"
    )]
    GridDim {
        /// Requested value
        requested: (u32, u32, u32),
        /// Maximum value
        max: (u32, u32, u32),
        /// Where the error was raised.
        backtrace: BackTrace,
    },
    /// The grid has more blocks in total than can be indexed.
    #[error(
        "Total block count exceeds maximum.\nRequested {requested} blocks, max is {max}.\nBacktrace\n{backtrace}"
    )]
    GridBlocks {
        /// Requested block count
        requested: u64,
        /// Maximum block count
        max: u32,
        /// Where the error was raised.
        backtrace: BackTrace,
    },
    /// The block has more units than the launch bounds of the kernel allow.
    #[error(
        "Block unit count exceeds the kernel launch bounds.\nRequested {requested} units, launch bounds is {ceiling}.\nBacktrace\n{backtrace}"
    )]
    LaunchBounds {
        /// Requested value
        requested: u32,
        /// Launch bounds of the kernel
        ceiling: u32,
        /// Where the error was raised.
        backtrace: BackTrace,
    },
}

impl core::fmt::Debug for LaunchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}

impl core::fmt::Debug for ResourceLimitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}

/// Three dimensional extent or coordinate.
///
/// Used both for the shape of a launch ([`GridDim`], [`BlockDim`]) and for the position of a
/// block or a lane within it. Coordinates that don't use the z axis keep it at 0.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Dim3 {
    /// The x axis, the primary dimension.
    pub x: u32,
    /// The y axis, the secondary dimension.
    pub y: u32,
    /// The z axis.
    pub z: u32,
}

/// The number of lanes across all 3 axis of a block.
pub type BlockDim = Dim3;

/// The number of blocks across all 3 axis of a grid.
pub type GridDim = Dim3;

impl Dim3 {
    /// Create a new extent with the given x, and y = z = 1.
    pub const fn new_1d(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    /// Create a new extent with the given x and y, and z = 1.
    pub const fn new_2d(x: u32, y: u32) -> Self {
        Self { x, y, z: 1 }
    }

    /// Create a new extent with the given x, y and z.
    pub const fn new_3d(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Create a planar coordinate, z is always 0.
    pub const fn coord(x: u32, y: u32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Total numbers of elements covered by this extent.
    ///
    /// Only meant for extents that went through launch validation, see
    /// [Dim3::checked_num_elems] otherwise.
    pub const fn num_elems(&self) -> u32 {
        self.x * self.y * self.z
    }

    /// Total numbers of elements covered by this extent, `None` when it doesn't fit in `u32`.
    pub const fn checked_num_elems(&self) -> Option<u32> {
        match self.x.checked_mul(self.y) {
            Some(xy) => xy.checked_mul(self.z),
            None => None,
        }
    }

    /// Whether this extent can fully contain `other`.
    pub const fn can_contain(&self, other: Dim3) -> bool {
        self.x >= other.x && self.y >= other.y && self.z >= other.z
    }

    /// Whether any axis is zero.
    pub const fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }
}

impl From<(u32, u32, u32)> for Dim3 {
    fn from(value: (u32, u32, u32)) -> Self {
        Dim3::new_3d(value.0, value.1, value.2)
    }
}

impl From<Dim3> for (u32, u32, u32) {
    fn from(val: Dim3) -> Self {
        (val.x, val.y, val.z)
    }
}

impl core::fmt::Display for Dim3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("({}, {}, {})", self.x, self.y, self.z))
    }
}
