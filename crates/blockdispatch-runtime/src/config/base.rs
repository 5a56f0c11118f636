use super::{
    execution::ExecutionConfig,
    launch::{LaunchConfig, LaunchLogLevel},
};
use std::{path::Path, sync::Arc};

static BLOCKDISPATCH_GLOBAL_CONFIG: spin::Mutex<Option<Arc<GlobalConfig>>> =
    spin::Mutex::new(None);

const CONFIG_FILE_NAMES: [&str; 2] = ["blockdispatch.toml", "BlockDispatch.toml"];

/// Process-wide BlockDispatch settings.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlobalConfig {
    /// Launch logging.
    #[serde(default)]
    pub launch: LaunchConfig,

    /// Grid executor.
    #[serde(default)]
    pub execution: ExecutionConfig,
}

impl GlobalConfig {
    /// The active configuration.
    ///
    /// The first call loads it from the closest `blockdispatch.toml` (or `BlockDispatch.toml`)
    /// in the current directory or one of its parents, then applies the environment overrides
    /// of [GlobalConfig::override_from_env]. Without any file the defaults are used.
    ///
    /// Takes a global lock, clients read it once when they are created.
    pub fn get() -> Arc<Self> {
        BLOCKDISPATCH_GLOBAL_CONFIG
            .lock()
            .get_or_insert_with(|| Arc::new(Self::from_current_dir().override_from_env()))
            .clone()
    }

    /// Writes the active configuration to `path` as toml.
    pub fn save_default<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
        let content = toml::to_string_pretty(Self::get().as_ref())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;

        std::fs::write(path, content)
    }

    /// Installs `config` as the active configuration.
    ///
    /// # Panics
    ///
    /// When a configuration is already active, either set before or loaded by
    /// [GlobalConfig::get]. Call it first thing in `main`.
    pub fn set(config: Self) {
        let mut state = BLOCKDISPATCH_GLOBAL_CONFIG.lock();
        if state.is_some() {
            panic!("Cannot set the global configuration multiple times.");
        }
        *state = Some(Arc::new(config));
    }

    /// Parses a configuration, missing sections take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Applies the environment variables on top of the configuration.
    ///
    /// - `BLOCKDISPATCH_DEBUG_LOG`: `stdout`, `stderr`, `1`/`true` (log file in `/tmp`), a file
    ///   path, or `0`/`false` to disable launch logs. Any value but the last enables full
    ///   launch records.
    /// - `BLOCKDISPATCH_PARALLEL`: `0`/`false` runs blocks one after the other, `1`/`true` on the
    ///   thread pool.
    pub fn override_from_env(self) -> Self {
        let debug_log = std::env::var("BLOCKDISPATCH_DEBUG_LOG").ok();
        let parallel = std::env::var("BLOCKDISPATCH_PARALLEL").ok();

        self.override_from(debug_log.as_deref(), parallel.as_deref())
    }

    fn override_from(mut self, debug_log: Option<&str>, parallel: Option<&str>) -> Self {
        let logger = &mut self.launch.logger;

        match debug_log {
            None => {}
            Some("0" | "false") => logger.level = LaunchLogLevel::Disabled,
            Some(target) => {
                logger.level = LaunchLogLevel::Full;
                match target {
                    "stdout" => logger.stdout = true,
                    "stderr" => logger.stderr = true,
                    "1" | "true" => logger.file = Some("/tmp/blockdispatch.log".into()),
                    path => logger.file = Some(path.into()),
                }
            }
        }

        match parallel {
            Some("0" | "false") => self.execution.parallel = false,
            Some("1" | "true") => self.execution.parallel = true,
            _ => {}
        }

        self
    }

    fn from_current_dir() -> Self {
        let Ok(cwd) = std::env::current_dir() else {
            return Self::default();
        };

        cwd.ancestors()
            .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
            .find_map(|path| Self::from_file_path(path).ok())
            .unwrap_or_default()
    }

    // A file with invalid content is a user error worth stopping for, a missing one isn't.
    fn from_file_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;

        match Self::from_toml(&content) {
            Ok(config) => Ok(config),
            Err(err) => panic!(
                "The file {:?} doesn't have the right format => {err:?}",
                path.as_ref()
            ),
        }
    }
}
