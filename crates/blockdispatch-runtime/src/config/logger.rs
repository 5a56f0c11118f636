use super::{GlobalConfig, launch::LaunchLogLevel};
use core::fmt::Display;
use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

/// Where and how much a BlockDispatch subsystem logs.
///
/// All outputs can be combined.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(bound = "")]
pub struct LoggerConfig<L: LogLevel> {
    /// Log file, none by default.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Append to the log file instead of truncating it when the logger opens.
    #[serde(default = "append_default")]
    pub append: bool,

    /// Print records on standard output.
    #[serde(default)]
    pub stdout: bool,

    /// Print records on standard error.
    #[serde(default)]
    pub stderr: bool,

    /// Forward records to the `log` facade at this level.
    #[serde(default)]
    pub log: Option<LogCrateLevel>,

    /// Verbosity of the subsystem.
    #[serde(default)]
    pub level: L,
}

impl<L: LogLevel> Default for LoggerConfig<L> {
    fn default() -> Self {
        Self {
            file: None,
            append: append_default(),
            stdout: false,
            stderr: false,
            log: None,
            level: L::default(),
        }
    }
}

fn append_default() -> bool {
    true
}

/// Level used when records are forwarded to the `log` facade.
#[derive(
    Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize, Hash, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum LogCrateLevel {
    /// `log::Level::Info`
    #[default]
    Info,
    /// `log::Level::Debug`
    Debug,
    /// `log::Level::Trace`
    Trace,
}

impl From<LogCrateLevel> for log::Level {
    fn from(level: LogCrateLevel) -> Self {
        match level {
            LogCrateLevel::Info => log::Level::Info,
            LogCrateLevel::Debug => log::Level::Debug,
            LogCrateLevel::Trace => log::Level::Trace,
        }
    }
}

/// Verbosity type of a [LoggerConfig].
pub trait LogLevel:
    serde::de::DeserializeOwned + serde::Serialize + Clone + Copy + core::fmt::Debug + Default
{
}

/// Sends launch records to the outputs enabled in the configuration.
#[derive(Debug)]
pub struct Logger {
    outputs: Vec<Output>,
    /// Configuration the outputs were opened from.
    pub config: Arc<GlobalConfig>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Opens the outputs of the global configuration.
    pub fn new() -> Self {
        Self::from_config(GlobalConfig::get())
    }

    /// Opens the outputs of `config`.
    ///
    /// Nothing is opened while launch logging is disabled. A log file that can't be opened is
    /// skipped with a warning.
    pub fn from_config(config: Arc<GlobalConfig>) -> Self {
        let settings = &config.launch.logger;
        let mut outputs = Vec::new();

        if settings.level != LaunchLogLevel::Disabled {
            if let Some(path) = &settings.file {
                match LogFile::open(path, settings.append) {
                    Ok(file) => outputs.push(Output::File(file)),
                    Err(err) => log::warn!("Can't open launch log file {path:?}: {err}"),
                }
            }
            if settings.stdout {
                outputs.push(Output::Stdout);
            }
            if settings.stderr {
                outputs.push(Output::Stderr);
            }
            if let Some(level) = settings.log {
                outputs.push(Output::Log(level.into()));
            }
        }

        Self { outputs, config }
    }

    /// Writes one launch record on every output.
    pub fn log_launch<S: Display>(&mut self, record: &S) {
        match self.outputs.as_mut_slice() {
            [] => {}
            [output] => output.write(record),
            outputs => {
                let record = record.to_string();
                outputs.iter_mut().for_each(|output| output.write(&record));
            }
        }
    }

    /// Configured launch verbosity.
    pub fn log_level_launch(&self) -> LaunchLogLevel {
        self.config.launch.logger.level
    }

    /// Whether any output is open.
    pub fn is_enabled(&self) -> bool {
        !self.outputs.is_empty()
    }
}

#[derive(Debug)]
enum Output {
    File(LogFile),
    Stdout,
    Stderr,
    Log(log::Level),
}

impl Output {
    fn write<S: Display>(&mut self, record: &S) {
        match self {
            Output::File(file) => file.write(record),
            Output::Stdout => println!("{record}"),
            Output::Stderr => eprintln!("{record}"),
            Output::Log(level) => log::log!(*level, "{record}"),
        }
    }
}

#[derive(Debug)]
struct LogFile {
    writer: BufWriter<File>,
}

impl LogFile {
    fn open(path: &Path, append: bool) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    // Flushed per record, a crashing kernel must not lose the launches before it.
    fn write<S: Display>(&mut self, record: &S) {
        if let Err(err) = writeln!(self.writer, "{record}").and_then(|_| self.writer.flush()) {
            log::warn!("Can't write launch log: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test_log::test]
    fn disabled_level_opens_nothing() {
        let mut config = GlobalConfig::default();
        config.launch.logger.stdout = true;

        let logger = Logger::from_config(Arc::new(config));

        assert!(!logger.is_enabled());
    }

    #[test_log::test]
    fn enabled_level_opens_outputs() {
        let mut config = GlobalConfig::default();
        config.launch.logger.level = LaunchLogLevel::Basic;
        config.launch.logger.stderr = true;
        config.launch.logger.log = Some(LogCrateLevel::Trace);

        let logger = Logger::from_config(Arc::new(config));

        assert!(logger.is_enabled());
        assert_eq!(logger.log_level_launch(), LaunchLogLevel::Basic);
    }

    #[test_log::test]
    fn file_output_receives_records() {
        let path = std::env::temp_dir().join("blockdispatch-logger-test.log");
        let mut config = GlobalConfig::default();
        config.launch.logger.level = LaunchLogLevel::Full;
        config.launch.logger.file = Some(path.clone());
        config.launch.logger.append = false;

        let mut logger = Logger::from_config(Arc::new(config));
        logger.log_launch(&"first launch");
        logger.log_launch(&"second launch");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first launch\nsecond launch\n");
    }

    #[test_log::test]
    fn crate_levels_map_to_log_levels() {
        assert_eq!(log::Level::from(LogCrateLevel::Info), log::Level::Info);
        assert_eq!(log::Level::from(LogCrateLevel::Trace), log::Level::Trace);
    }
}
