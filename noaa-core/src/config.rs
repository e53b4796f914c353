use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    client::noaa::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT},
    model::{Datum, TimeZone, Unit},
    request::TidesRequest,
};

/// Defaults applied to every request, stored on disk.
///
/// Example TOML:
/// ```toml
/// station = "8454000"
/// datum = "MLLW"
/// units = "english"
/// time_zone = "lst_ldt"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    pub station: Option<String>,
    pub datum: Option<Datum>,
    pub units: Option<Unit>,
    pub time_zone: Option<TimeZone>,

    /// Reported to NOAA as `application`.
    pub application: Option<String>,

    /// Override for the datagetter endpoint.
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("gov", "noaa", "noaa-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT.as_secs())
    }

    /// Fill fields the caller left unset. Values already on the request win.
    pub fn apply_defaults(&self, mut request: TidesRequest) -> TidesRequest {
        if let Some(station) = self.station.clone().filter(|_| request.get_station().is_none()) {
            request = request.station(station);
        }
        if let Some(datum) = self.datum.filter(|_| request.get_datum().is_none()) {
            request = request.datum(datum);
        }
        if let Some(units) = self.units.filter(|_| request.get_units().is_none()) {
            request = request.units(units);
        }
        if let Some(tz) = self.time_zone.filter(|_| request.get_timezone().is_none()) {
            request = request.timezone(tz);
        }
        if let Some(application) = self.application.clone().filter(|_| !request.has_application()) {
            request = request.application(application);
        }
        request
    }
}
