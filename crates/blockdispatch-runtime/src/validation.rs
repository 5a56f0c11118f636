use crate::{
    HardwareProperties, KernelLaunch,
    backtrace::BackTrace,
    server::{LaunchError, ResourceLimitError},
};

/// Validate every hardware limit of a launch.
pub fn validate_launch(
    properties: &HardwareProperties,
    launch: &KernelLaunch,
) -> Result<(), LaunchError> {
    validate_not_empty(launch)?;
    validate_block_dim(properties, launch)?;
    validate_units(properties, launch)?;
    validate_grid_dim(properties, launch)?;
    validate_launch_bounds(launch)
}

/// Validate that the launch covers at least one lane.
pub fn validate_not_empty(launch: &KernelLaunch) -> Result<(), LaunchError> {
    if launch.grid_dim.is_empty() || launch.block_dim.is_empty() {
        Err(LaunchError::EmptyLaunch {
            grid: launch.grid_dim.into(),
            block: launch.block_dim.into(),
            backtrace: BackTrace::capture(),
        })
    } else {
        Ok(())
    }
}

/// Validate the block dim of a kernel fits within the hardware limits
pub fn validate_block_dim(
    properties: &HardwareProperties,
    launch: &KernelLaunch,
) -> Result<(), LaunchError> {
    let requested = launch.block_dim;
    let max = properties.max_block_dim;
    if !max.can_contain(requested) {
        Err(ResourceLimitError::BlockDim {
            requested: requested.into(),
            max: max.into(),
            backtrace: BackTrace::capture(),
        }
        .into())
    } else {
        Ok(())
    }
}

/// Validate the total units of a block fits within the hardware limits
pub fn validate_units(
    properties: &HardwareProperties,
    launch: &KernelLaunch,
) -> Result<(), LaunchError> {
    let requested = launch.block_dim.num_elems();
    let max = properties.max_units_per_block;
    if requested > max {
        Err(ResourceLimitError::Units {
            requested,
            max,
            backtrace: BackTrace::capture(),
        }
        .into())
    } else {
        Ok(())
    }
}

/// Validate the grid dim of a launch fits within the hardware limits
pub fn validate_grid_dim(
    properties: &HardwareProperties,
    launch: &KernelLaunch,
) -> Result<(), LaunchError> {
    let requested = launch.grid_dim;
    let max = properties.max_grid_dim;
    if !max.can_contain(requested) {
        return Err(ResourceLimitError::GridDim {
            requested: requested.into(),
            max: max.into(),
            backtrace: BackTrace::capture(),
        }
        .into());
    }

    // Each axis can be in range while the product isn't.
    match requested.checked_num_elems() {
        Some(_) => Ok(()),
        None => Err(ResourceLimitError::GridBlocks {
            requested: requested.x as u64 * requested.y as u64 * requested.z as u64,
            max: u32::MAX,
            backtrace: BackTrace::capture(),
        }
        .into()),
    }
}

/// Validate the block doesn't hold more units than the kernel was bounded to.
///
/// A ceiling of 0 means the kernel has no launch bounds.
pub fn validate_launch_bounds(launch: &KernelLaunch) -> Result<(), LaunchError> {
    let requested = launch.block_dim.num_elems();
    let ceiling = launch.launch_bounds;
    if ceiling != 0 && requested > ceiling {
        Err(ResourceLimitError::LaunchBounds {
            requested,
            ceiling,
            backtrace: BackTrace::capture(),
        }
        .into())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        PassingMode,
        server::{BlockDim, GridDim},
    };

    fn launch(grid_dim: GridDim, block_dim: BlockDim, launch_bounds: u32) -> KernelLaunch {
        KernelLaunch::new("test", grid_dim, block_dim, PassingMode::Value, launch_bounds)
    }

    #[test_log::test]
    fn valid_launch_passes() {
        let properties = HardwareProperties::default();

        let result = validate_launch(
            &properties,
            &launch(GridDim::new_2d(64, 4), BlockDim::new_2d(256, 4), 0),
        );

        assert!(result.is_ok());
    }

    #[test_log::test]
    fn empty_grid_is_rejected() {
        let properties = HardwareProperties::default();

        let result = validate_launch(
            &properties,
            &launch(GridDim::new_2d(0, 4), BlockDim::new_1d(32), 0),
        );

        assert!(matches!(result, Err(LaunchError::EmptyLaunch { .. })));
    }

    #[test_log::test]
    fn too_many_units_are_rejected() {
        let properties = HardwareProperties::default();

        let result = validate_launch(
            &properties,
            &launch(GridDim::new_1d(1), BlockDim::new_2d(1024, 2), 0),
        );

        assert!(matches!(
            result,
            Err(LaunchError::TooManyResources(ResourceLimitError::Units {
                requested: 2048,
                max: 1024,
                ..
            }))
        ));
    }

    #[test_log::test]
    fn block_dim_over_axis_limit_is_rejected() {
        let properties = HardwareProperties::default();

        let result = validate_launch(
            &properties,
            &launch(GridDim::new_1d(1), BlockDim::new_3d(1, 1, 128), 0),
        );

        assert!(matches!(
            result,
            Err(LaunchError::TooManyResources(
                ResourceLimitError::BlockDim { .. }
            ))
        ));
    }

    #[test_log::test]
    fn grid_dim_over_axis_limit_is_rejected() {
        let properties = HardwareProperties::default();

        let result = validate_launch(
            &properties,
            &launch(GridDim::new_2d(1, 70_000), BlockDim::new_1d(32), 0),
        );

        assert!(matches!(
            result,
            Err(LaunchError::TooManyResources(ResourceLimitError::GridDim { .. }))
        ));
    }

    #[test_log::test]
    fn grid_with_too_many_blocks_is_rejected() {
        let properties = HardwareProperties::default();

        let result = validate_launch(
            &properties,
            &launch(GridDim::new_2d(70_000, 65_535), BlockDim::new_1d(1), 0),
        );

        assert!(matches!(
            result,
            Err(LaunchError::TooManyResources(ResourceLimitError::GridBlocks {
                requested: 4_587_450_000,
                max: u32::MAX,
                ..
            }))
        ));
    }

    #[test_log::test]
    fn largest_indexable_grid_passes() {
        let properties = HardwareProperties::default();

        let result = validate_launch(
            &properties,
            &launch(GridDim::new_2d(65_537, 65_535), BlockDim::new_1d(1), 0),
        );

        assert!(result.is_ok());
    }

    #[test_log::test]
    fn launch_bounds_caps_units() {
        let properties = HardwareProperties::default();

        let bounded = launch(GridDim::new_1d(1), BlockDim::new_2d(64, 2), 64);
        let unbounded = launch(GridDim::new_1d(1), BlockDim::new_2d(64, 2), 0);

        assert!(matches!(
            validate_launch(&properties, &bounded),
            Err(LaunchError::TooManyResources(
                ResourceLimitError::LaunchBounds {
                    requested: 128,
                    ceiling: 64,
                    ..
                }
            ))
        ));
        assert!(validate_launch(&properties, &unbounded).is_ok());
    }
}
