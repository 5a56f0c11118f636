use core::fmt::Display;

use crate::server::{BlockDim, GridDim};

/// How the kernel argument reaches the lanes of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassingMode {
    /// The argument is copied into the kernel parameter space.
    Value,
    /// The argument is read from the process-wide resident slot of its type.
    Resident,
}

/// Everything the runtime knows about a launch before running it.
#[derive(new, Debug, Clone, PartialEq, Eq)]
pub struct KernelLaunch {
    /// Fully qualified name of the kernel, used for logging.
    pub name: &'static str,
    /// Number of blocks along each axis.
    pub grid_dim: GridDim,
    /// Number of lanes per block along each axis.
    pub block_dim: BlockDim,
    /// How the argument is passed.
    pub passing: PassingMode,
    /// Maximum number of lanes per block the kernel was built for, 0 when unconstrained.
    pub launch_bounds: u32,
}

impl Display for KernelLaunch {
    /// The alternate flag (`{:#}`) writes the full launch record.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match f.alternate() {
            true => self.format_full(f),
            false => self.format_basic(f),
        }
    }
}

impl KernelLaunch {
    /// Short name of the kernel, generic parameters are dropped.
    pub fn short_name(&self) -> &'static str {
        self.name.split('<').next().unwrap_or(self.name)
    }

    fn format_basic(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("[Launching kernel]")?;
        if self.name.len() <= 32 {
            f.write_fmt(format_args!(" {}", self.name))
        } else {
            f.write_fmt(format_args!(" {}", self.short_name()))
        }
    }

    fn format_full(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("[START_KERNEL_LAUNCH]")?;
        f.write_fmt(format_args!("\nname: {}", self.name))?;
        f.write_fmt(format_args!(
            "\ngrid_dim: {}\nblock_dim: {}\npassing: {:?}",
            self.grid_dim, self.block_dim, self.passing
        ))?;

        match self.launch_bounds {
            0 => f.write_str("\nlaunch_bounds: unconstrained")?,
            ceiling => f.write_fmt(format_args!("\nlaunch_bounds: {ceiling}"))?,
        }

        f.write_str("\n[END_KERNEL_LAUNCH]")
    }
}
