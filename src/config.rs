//! Settings for a run: built-in defaults, overlaid by the TOML config file,
//! overlaid by command line arguments.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cli::Args;
use crate::error::{Error, Result};
use crate::units::Units;

/// Stand-in key shipped in the default config. Treated the same as no key.
pub const PLACEHOLDER_KEY: &str = "YOUR_WEATHERAPI_KEY";

pub const BASE_URL: &str = "https://api.weatherapi.com/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,

    /// North is positive.
    pub latitude: f64,

    /// East is positive.
    pub longitude: f64,

    pub alerts: bool,

    pub units: Units,

    pub refresh_minutes: u64,

    pub base_url: String,

    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_KEY.to_string(),
            latitude: 51.3616,
            longitude: -0.1900,
            alerts: true,
            units: Units::Metric,
            refresh_minutes: 15,
            base_url: BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wxnow").join("config.toml"))
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Overlays whatever was given on the command line.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(lat) = args.lat {
            self.latitude = lat;
        }
        if let Some(lon) = args.lon {
            self.longitude = lon;
        }
        if let Some(ref key) = args.api_key {
            self.api_key = key.trim().to_string();
        }
        if args.no_alerts {
            self.alerts = false;
        }
        if args.imperial {
            self.units = Units::Imperial;
        }
        if let Some(minutes) = args.refresh {
            self.refresh_minutes = minutes;
        }
    }

    pub fn has_api_key(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != PLACEHOLDER_KEY
    }

    pub fn validate(&self) -> Result<()> {
        let (lat, lon) = (self.latitude, self.longitude);
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::InvalidCoordinates { lat, lon });
        }
        Ok(())
    }
}

/// Builds the effective config for a run and the file it was read from.
pub fn resolve(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    let path = args.config.clone().or_else(Config::default_path);
    let mut config = match path {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply_args(args);
    config.validate()?;
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_key_is_missing() {
        let mut config = Config::default();
        assert!(!config.has_api_key());
        config.api_key = "   ".to_string();
        assert!(!config.has_api_key());
        config.api_key = "abc123".to_string();
        assert!(config.has_api_key());
    }

    #[test]
    fn test_validate_coordinates() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.latitude = 91.0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidCoordinates { .. })
        ));
        config.latitude = -48.3319;
        config.longitude = -180.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"k\"\nunits = \"imperial\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.units, Units::Imperial);
        assert_eq!(config.latitude, 51.3616);
        assert!(config.alerts);
    }

    #[test]
    fn test_bad_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "latitude = \"north\"").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            api_key: "secret".to_string(),
            latitude: -33.9,
            longitude: 18.4,
            alerts: false,
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_args_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"from-file\"\nlatitude = 10.0\nlongitude = 20.0\n").unwrap();

        let args = Args {
            lat: Some(-1.5),
            api_key: Some(" from-args ".to_string()),
            no_alerts: true,
            refresh: Some(0),
            config: Some(path.clone()),
            ..Args::default()
        };
        let (config, used) = resolve(&args).unwrap();
        assert_eq!(used, Some(path));
        assert_eq!(config.latitude, -1.5);
        assert_eq!(config.longitude, 20.0);
        assert_eq!(config.api_key, "from-args");
        assert!(!config.alerts);
        assert_eq!(config.refresh_minutes, 0);
    }

    #[test]
    fn test_resolve_rejects_bad_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            lon: Some(200.0),
            config: Some(dir.path().join("config.toml")),
            ..Args::default()
        };
        assert!(resolve(&args).is_err());
    }
}
