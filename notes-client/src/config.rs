use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, time::Duration};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(with = "humantime_serde", default = "default_refresh_interval")]
    pub refresh_interval: Duration,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_refresh_interval() -> Duration {
    DEFAULT_REFRESH_INTERVAL
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

impl Config {
    // tokio's interval cannot tick with a zero period
    fn validate(self) -> Result<Self, Box<dyn std::error::Error>> {
        if self.refresh_interval.is_zero() {
            return Err("refresh_interval must be greater than zero".into());
        }
        Ok(self)
    }
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let api_url = env::var("NOTES_API_URL").unwrap_or_else(|_| default_api_url());

    let refresh_interval = match env::var("NOTES_REFRESH_INTERVAL") {
        Ok(raw) => humantime_serde::re::humantime::parse_duration(&raw)
            .map_err(|e| format!("Failed to parse NOTES_REFRESH_INTERVAL: {e}"))?,
        Err(_) => default_refresh_interval(),
    };

    Config {
        api_url,
        refresh_interval,
    }
    .validate()
}

fn load_from_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&contents)?;
    config.validate()
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_CLIENT_CONFIG").unwrap_or_else(|_| "client.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to client.yaml
    if Path::new("client.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'client.yaml'",
            config_path
        );
        return load_from_file("client.yaml");
    }

    // Fallback to environment variables
    tracing::debug!("No client config file found, using environment variables");
    load_from_env()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_interval_uses_humantime() {
        let config: Config =
            serde_yaml::from_str("api_url: http://notes:8080\nrefresh_interval: 1m 30s\n")
                .unwrap();

        assert_eq!(config.api_url, "http://notes:8080");
        assert_eq!(config.refresh_interval, Duration::from_secs(90));
    }

    #[test]
    fn zero_refresh_interval_is_rejected() {
        let config: Config = serde_yaml::from_str("refresh_interval: 0s\n").unwrap();
        assert!(config.validate().is_err());

        let config: Config = serde_yaml::from_str("refresh_interval: 1s\n").unwrap();
        assert_eq!(
            config.validate().unwrap().refresh_interval,
            Duration::from_secs(1)
        );
    }

    #[test]
    fn empty_file_takes_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
    }
}
