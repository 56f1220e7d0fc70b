//! Configuration sources.
//!
//! A [`ConfigSource`] is the collaborator that produces a [`PoolConfig`]
//! before the pool is built. Two file formats are supported:
//!
//! - [`IniFile`]: flat `key=value` lines, the format of the classic
//!   `mysql.ini` deployment file;
//! - [`TomlFile`] (feature `toml`): the serde representation of
//!   [`PoolConfig`].
//!
//! ```ini
//! # mysql.ini
//! ip=127.0.0.1
//! port=3306
//! username=root
//! password=secret
//! dbname=chat
//! initSize=10
//! maxSize=1024
//! maxIdleTime=60
//! connectionTimeOut=100
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::config::PoolConfig;
use crate::error::{Error, Result};

/// Produces the configuration a pool is built from.
pub trait ConfigSource {
    /// Load and validate a configuration.
    fn load(&self) -> Result<PoolConfig>;
}

impl ConfigSource for PoolConfig {
    fn load(&self) -> Result<PoolConfig> {
        self.validate()?;
        Ok(self.clone())
    }
}

/// `key=value` configuration file.
#[derive(Debug, Clone)]
pub struct IniFile {
    path: PathBuf,
}

impl IniFile {
    /// Read configuration from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for IniFile {
    fn load(&self) -> Result<PoolConfig> {
        let origin = self.path.display().to_string();
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::config_load_with(&origin, "cannot read file", e))?;
        parse_ini(&text, &origin)
    }
}

/// Parse `key=value` text into a validated [`PoolConfig`].
///
/// Keys not present keep their [`PoolConfig::default`] values. Lines
/// without `=` and lines starting with `#` or `;` are skipped.
pub fn parse_ini(text: &str, origin: &str) -> Result<PoolConfig> {
    let mut config = PoolConfig::default();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            "ip" => config.connect.host = value.to_string(),
            "port" => config.connect.port = number(origin, key, value)?,
            "username" => config.connect.username = value.to_string(),
            "password" => config.connect.password = value.to_string(),
            "dbname" => config.connect.database = value.to_string(),
            "initSize" => config.initial_size = number(origin, key, value)?,
            "maxSize" => config.max_size = number(origin, key, value)?,
            "maxIdleTime" => {
                config.max_idle_time = Duration::from_secs(number(origin, key, value)?);
            }
            "connectionTimeOut" => {
                config.acquire_timeout = Duration::from_millis(number(origin, key, value)?);
            }
            "retryInterval" => {
                config.retry_interval = Duration::from_millis(number(origin, key, value)?);
            }
            _ => tracing::debug!(origin, line = index + 1, key, "ignoring unknown config key"),
        }
    }

    config
        .validate()
        .map_err(|e| Error::config_load_with(origin, "invalid pool configuration", e))?;
    Ok(config)
}

fn number<T>(origin: &str, key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| Error::config_load_with(origin, format!("'{key}' is not a number: {value:?}"), e))
}

/// TOML configuration file holding a serialized [`PoolConfig`].
#[cfg(feature = "toml")]
#[derive(Debug, Clone)]
pub struct TomlFile {
    path: PathBuf,
}

#[cfg(feature = "toml")]
impl TomlFile {
    /// Read configuration from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "toml")]
impl ConfigSource for TomlFile {
    fn load(&self) -> Result<PoolConfig> {
        let origin = self.path.display().to_string();
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::config_load_with(&origin, "cannot read file", e))?;
        let config: PoolConfig = toml::from_str(&text)
            .map_err(|e| Error::config_load_with(&origin, "malformed TOML", e))?;
        config
            .validate()
            .map_err(|e| Error::config_load_with(&origin, "invalid pool configuration", e))?;
        Ok(config)
    }
}

/// Pick a source by file extension: `.toml` reads TOML, anything else is
/// treated as `key=value`.
pub fn from_path(path: impl Into<PathBuf>) -> Box<dyn ConfigSource> {
    let path = path.into();
    #[cfg(feature = "toml")]
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml")) {
        return Box::new(TomlFile::new(path));
    }
    Box::new(IniFile::new(path))
}
