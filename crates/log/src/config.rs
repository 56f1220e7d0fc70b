//! Logger configuration and presets

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Level filter in `EnvFilter` syntax (e.g. "info", "cistern_pool=debug")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Where events are written
    pub writer: WriterConfig,

    /// What each line shows
    pub display: DisplayConfig,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Multi-line, human-readable
    Pretty,
    /// Single-line
    Compact,
    /// One JSON object per event
    Json,
}

impl Format {
    /// Parse a format name; unknown names fall back to `Compact`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Output destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriterConfig {
    /// Standard error
    #[default]
    Stderr,
    /// Standard output
    Stdout,
}

/// Display configuration
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show timestamps
    pub time: bool,
    /// Show source location (`file:line`)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Show thread names (`cistern-creator`, `cistern-reaper`, ...)
    pub thread_names: bool,
    /// Use ANSI colors
    pub colors: bool,
    /// Flatten JSON event fields into the top-level object
    pub flatten: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time: true,
            source: cfg!(debug_assertions),
            target: true,
            thread_names: true,
            colors: std::io::IsTerminal::is_terminal(&std::io::stderr()),
            flatten: true,
        }
    }
}

impl DisplayConfig {
    fn parse_env(&mut self) {
        if let Some(v) = env_flag("CISTERN_LOG_TIME") {
            self.time = v;
        }
        if let Some(v) = env_flag("CISTERN_LOG_SOURCE") {
            self.source = v;
        }
        if let Some(v) = env_flag("CISTERN_LOG_COLORS") {
            self.colors = v;
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| v != "0" && v != "false")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            writer: WriterConfig::Stderr,
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Configuration from `CISTERN_LOG` (or `RUST_LOG`), `CISTERN_LOG_FORMAT`
    /// and the `CISTERN_LOG_{TIME,SOURCE,COLORS}` switches.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("CISTERN_LOG") {
            config.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            config.level = level;
        }
        if let Ok(format) = std::env::var("CISTERN_LOG_FORMAT") {
            config.format = Format::from_name(&format);
        }
        config.display.parse_env();

        config
    }

    /// Pretty output at debug level
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                source: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// JSON output at info level, no colors
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
            ..Self::default()
        }
    }

    /// Set the level filter.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(Format::from_name("JSON"), Format::Json);
        assert_eq!(Format::from_name("pretty"), Format::Pretty);
        assert_eq!(Format::from_name("logfmt"), Format::Compact);
    }

    #[test]
    fn presets_differ_where_it_matters() {
        let dev = Config::development();
        let prod = Config::production();
        assert_eq!(dev.format, Format::Pretty);
        assert_eq!(dev.level, "debug");
        assert_eq!(prod.format, Format::Json);
        assert!(!prod.display.colors);
    }

    #[test]
    fn deserializes_partial_config() {
        let config: Config =
            serde_json::from_str(r#"{"level":"cistern_pool=trace","format":"json","writer":"stdout"}"#)
                .unwrap();
        assert_eq!(config.level, "cistern_pool=trace");
        assert_eq!(config.format, Format::Json);
        assert_eq!(config.writer, WriterConfig::Stdout);
        assert!(config.display.thread_names);
    }
}
