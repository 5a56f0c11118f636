use std::sync::Arc;

use crate::{
    HardwareProperties, KernelLaunch,
    builtin::Builtin,
    config::{GlobalConfig, Logger, launch::LaunchLogLevel},
    executor::GridExecutor,
    server::LaunchError,
    validation::validate_launch,
};

/// The ComputeClient is the entry point to launch kernels on the grid executor.
///
/// It validates every launch against the hardware properties, reports it to the launch logger
/// and runs it to completion. Cloning a client is cheap, clones share the same logger.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    state: Arc<ClientState>,
}

#[derive(Debug)]
struct ClientState {
    properties: HardwareProperties,
    executor: GridExecutor,
    logger: spin::Mutex<Logger>,
}

impl Default for ComputeClient {
    fn default() -> Self {
        Self::new(HardwareProperties::default())
    }
}

impl ComputeClient {
    /// Create a new client following the global configuration.
    pub fn new(properties: HardwareProperties) -> Self {
        Self::with_config(properties, GlobalConfig::get())
    }

    /// Create a new client following an explicit configuration.
    pub fn with_config(properties: HardwareProperties, config: Arc<GlobalConfig>) -> Self {
        let executor = GridExecutor::from_config(&config.execution);
        let logger = Logger::from_config(config);

        Self {
            state: Arc::new(ClientState {
                properties,
                executor,
                logger: spin::Mutex::new(logger),
            }),
        }
    }

    /// Get the hardware properties of the client.
    pub fn properties(&self) -> &HardwareProperties {
        &self.state.properties
    }

    /// Get the grid executor of the client.
    pub fn executor(&self) -> GridExecutor {
        self.state.executor
    }

    /// Validates `launch` then runs `kernel` once per lane of its grid.
    ///
    /// Returns once every lane completed. Nothing runs when validation fails.
    pub fn launch<K>(&self, launch: KernelLaunch, kernel: K) -> Result<(), LaunchError>
    where
        K: Fn(&Builtin) + Sync,
    {
        validate_launch(&self.state.properties, &launch)?;

        log::debug!(
            "Launching {} on grid {} with blocks {} ({:?})",
            launch.short_name(),
            launch.grid_dim,
            launch.block_dim,
            launch.passing
        );
        self.log_launch(&launch);

        self.state
            .executor
            .execute(launch.grid_dim, launch.block_dim, kernel);

        Ok(())
    }

    fn log_launch(&self, launch: &KernelLaunch) {
        let mut logger = self.state.logger.lock();
        if !logger.is_enabled() {
            return;
        }

        match logger.log_level_launch() {
            LaunchLogLevel::Disabled => {}
            LaunchLogLevel::Basic => logger.log_launch(&format!("{launch}")),
            LaunchLogLevel::Full => logger.log_launch(&format!("{launch:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        PassingMode,
        server::{BlockDim, GridDim, ResourceLimitError},
    };
    use core::sync::atomic::{AtomicU32, Ordering};

    fn client() -> ComputeClient {
        ComputeClient::with_config(HardwareProperties::default(), Arc::new(GlobalConfig::default()))
    }

    #[test_log::test]
    fn launch_runs_every_lane() {
        let client = client();
        let count = AtomicU32::new(0);
        let launch = KernelLaunch::new(
            "count",
            GridDim::new_2d(5, 3),
            BlockDim::new_2d(32, 2),
            PassingMode::Value,
            0,
        );

        client
            .launch(launch, |_| {
                count.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        assert_eq!(count.load(Ordering::Relaxed), 5 * 3 * 32 * 2);
    }

    #[test_log::test]
    fn invalid_launch_runs_nothing() {
        let client = client();
        let count = AtomicU32::new(0);
        let launch = KernelLaunch::new(
            "count",
            GridDim::new_1d(2),
            BlockDim::new_2d(2048, 1),
            PassingMode::Value,
            0,
        );

        let result = client.launch(launch, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        });

        assert!(matches!(
            result,
            Err(LaunchError::TooManyResources(
                ResourceLimitError::BlockDim { .. }
            ))
        ));
        assert_eq!(count.load(Ordering::Relaxed), 0);
    }

    #[test_log::test]
    fn sequential_execution_is_configurable() {
        let mut config = GlobalConfig::default();
        config.execution.parallel = false;

        let client = ComputeClient::with_config(HardwareProperties::default(), Arc::new(config));

        assert!(!client.executor().is_parallel());
    }
}
