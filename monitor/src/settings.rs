use crate::refresh::DEFAULT_REFRESH_INTERVAL;
use config::{Config, ConfigError, File};
use directories::ProjectDirs;
use serde_derive::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    /// Geodetic latitude in degrees, north positive.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log_level: Option<u64>,
    /// Path of the append-only observation log.
    pub log_path: String,
    /// Seconds between dashboard refresh ticks.
    pub refresh_interval: u64,
    pub observer: ObserverConfig,
    /// Bodies plotted by default when the dashboard starts.
    pub bodies: Vec<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let mut settings = Config::new();
        Self::set_defaults(&mut settings)?;

        if let Some(project_dirs) = ProjectDirs::from("org", "startrack", "startrack") {
            let file = File::with_name(
                project_dirs
                    .config_dir()
                    .join("config.toml")
                    .to_str()
                    .ok_or(ConfigError::Message("Invalid project dir".to_string()))?,
            );
            settings.merge(file.required(false))?;
        }

        settings.try_into()
    }

    pub fn from_file(file: &str) -> Result<Self, ConfigError> {
        let mut settings = Config::new();
        Self::set_defaults(&mut settings)?;

        settings.merge(File::with_name(file))?;
        settings.try_into()
    }

    fn set_defaults(settings: &mut Config) -> Result<(), ConfigError> {
        settings.set_default("log_level", 0)?;
        settings.set_default("log_path", "Star_tracking.csv")?;
        settings.set_default("refresh_interval", DEFAULT_REFRESH_INTERVAL as i64)?;
        // central London
        settings.set_default("observer.latitude", 51.5074)?;
        settings.set_default("observer.longitude", -0.1278)?;
        settings.set_default(
            "bodies",
            vec![
                "Sun".to_string(),
                "Moon".to_string(),
                "Mercury".to_string(),
                "Venus".to_string(),
                "Mars".to_string(),
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let settings = Settings::new().unwrap();
        assert_eq!(settings.log_path, "Star_tracking.csv");
        assert_eq!(settings.refresh_interval, 5);
        assert!((settings.observer.latitude - 51.5074).abs() < 1e-9);
        assert_eq!(settings.bodies.len(), 5);
        assert!(settings.bodies.iter().any(|b| b == "Mars"));
    }
}
