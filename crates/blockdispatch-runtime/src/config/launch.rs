use super::logger::{LogLevel, LoggerConfig};

/// Configuration of the launch logger.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LaunchConfig {
    /// Logger used to report every kernel launch.
    #[serde(default)]
    pub logger: LoggerConfig<LaunchLogLevel>,
}

/// How much information is written for every launch.
#[derive(Default, Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub enum LaunchLogLevel {
    /// Launches are not logged.
    #[default]
    #[serde(rename = "disabled")]
    Disabled,

    /// Only the kernel name is logged.
    #[serde(rename = "basic")]
    Basic,

    /// Kernel name, grid, block, passing mode and launch bounds are logged.
    #[serde(rename = "full")]
    Full,
}

impl LogLevel for LaunchLogLevel {}
