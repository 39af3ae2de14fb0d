//! Logger configuration
//!
//! [`Config`] is a plain value consumed once by [`Logger::from_config`].
//!
//! [`Logger::from_config`]: crate::core::Logger::from_config

use super::formatter::{ColorConfig, OutputFormat};
use super::log_level::LogLevel;
use std::path::{Path, PathBuf};

/// Default directory for date-rotated files
pub const DEFAULT_LOG_DIR: &str = "./logs";

/// Default file for size-rotated output when no path is configured
pub const DEFAULT_LOG_FILE: &str = "./logs/app.log";

/// Where records are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
    /// Rotated file output, see [`RotationMode`]
    File,
}

/// File rotation strategy, chosen once at construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RotationMode {
    /// One file per local calendar day
    #[default]
    Daily,
    /// Roll over when the file would exceed `max_size_mb`
    Size,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub level: LogLevel,
    pub format: OutputFormat,
    pub output: OutputTarget,
    /// File path (size rotation) or directory / `dir/prefix.log` (daily rotation)
    pub output_path: Option<PathBuf>,
    pub use_color: bool,
    pub colors: ColorConfig,
    pub add_caller: bool,
    pub rotation: RotationMode,
    /// Size threshold in megabytes (size rotation)
    pub max_size_mb: u64,
    /// Retired files kept, 0 keeps all (size rotation)
    pub max_backups: usize,
    /// Days to keep old files, 0 keeps them forever
    pub max_age_days: u32,
    /// Gzip retired files (size rotation)
    pub compress: bool,
    /// Mirror file output to a colored stdout console
    pub multi_output: bool,
}

impl Default for Config {
    /// Daily files under `./logs` plus a colored console mirror
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: OutputFormat::Text,
            output: OutputTarget::File,
            output_path: Some(PathBuf::from(DEFAULT_LOG_DIR)),
            use_color: true,
            colors: ColorConfig::default(),
            add_caller: true,
            rotation: RotationMode::Daily,
            max_size_mb: 100,
            max_backups: 3,
            max_age_days: 28,
            compress: true,
            multi_output: true,
        }
    }
}

impl Config {
    /// Debug level, colored text on stdout
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            output: OutputTarget::Stdout,
            output_path: None,
            multi_output: false,
            ..Self::default()
        }
    }

    /// Info level JSON to a size-rotated `/var/log/app.log`
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: OutputFormat::Json,
            output: OutputTarget::File,
            output_path: Some(PathBuf::from("/var/log/app.log")),
            use_color: false,
            rotation: RotationMode::Size,
            max_backups: 5,
            max_age_days: 30,
            multi_output: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: ColorConfig) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: RotationMode) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_max_size_mb(mut self, mb: u64) -> Self {
        self.max_size_mb = mb;
        self
    }

    #[must_use]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use]
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    #[must_use]
    pub fn with_multi_output(mut self, enabled: bool) -> Self {
        self.multi_output = enabled;
        self
    }

    /// Path for size-rotated output
    pub fn file_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    /// Directory and optional file prefix for daily output
    pub fn daily_location(&self) -> (PathBuf, Option<String>) {
        match self.output_path {
            Some(ref path) => split_daily_path(path),
            None => (PathBuf::from(DEFAULT_LOG_DIR), None),
        }
    }
}

/// Split a daily-rotation path into `(directory, prefix)`
///
/// A path ending in `.log` names a file whose stem becomes the prefix; any
/// other path is taken as the directory itself.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use rust_structured_logger::core::split_daily_path;
///
/// assert_eq!(
///     split_daily_path(Path::new("./logs/myservice.log")),
///     (PathBuf::from("./logs"), Some("myservice".to_string()))
/// );
/// assert_eq!(split_daily_path(Path::new("./logs")), (PathBuf::from("./logs"), None));
/// ```
pub fn split_daily_path(path: &Path) -> (PathBuf, Option<String>) {
    let is_log_file = path.extension().is_some_and(|ext| ext == "log");
    if !is_log_file {
        return (path.to_path_buf(), None);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let prefix = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty());

    (dir, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = Config::default();
        assert_eq!(default.output, OutputTarget::File);
        assert_eq!(default.rotation, RotationMode::Daily);
        assert!(default.multi_output);
        assert_eq!(default.max_age_days, 28);

        let dev = Config::development();
        assert_eq!(dev.level, LogLevel::Debug);
        assert_eq!(dev.output, OutputTarget::Stdout);
        assert!(dev.use_color);

        let prod = Config::production();
        assert_eq!(prod.format, OutputFormat::Json);
        assert_eq!(prod.rotation, RotationMode::Size);
        assert_eq!(prod.max_backups, 5);
        assert!(!prod.use_color);
    }

    #[test]
    fn test_split_daily_path() {
        assert_eq!(
            split_daily_path(Path::new("./logs/myservice.log")),
            (PathBuf::from("./logs"), Some("myservice".to_string()))
        );
        assert_eq!(
            split_daily_path(Path::new("app.log")),
            (PathBuf::from("."), Some("app".to_string()))
        );
        assert_eq!(
            split_daily_path(Path::new("/var/log/myapp")),
            (PathBuf::from("/var/log/myapp"), None)
        );
    }

    #[test]
    fn test_locations() {
        let config = Config::development();
        assert_eq!(config.file_path(), PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(config.daily_location(), (PathBuf::from(DEFAULT_LOG_DIR), None));

        let config = config.with_output_path("/srv/logs/api.log");
        assert_eq!(
            config.daily_location(),
            (PathBuf::from("/srv/logs"), Some("api".to_string()))
        );
    }
}
