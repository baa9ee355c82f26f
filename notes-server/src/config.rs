use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    // PORT from the environment wins over whatever the file says
    fn apply_port_override(
        mut self,
        raw: Option<&str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(port) = parse_port(raw)? {
            self.port = port;
        }
        Ok(self)
    }
}

fn parse_port(raw: Option<&str>) -> Result<Option<u16>, Box<dyn std::error::Error>> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|e| format!("Failed to parse PORT '{raw}': {e}").into()),
        None => Ok(None),
    }
}

fn env_port() -> Option<String> {
    env::var("PORT").ok()
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let host = env::var("HOST").unwrap_or_else(|_| default_host());
    let port = parse_port(env_port().as_deref())?.unwrap_or(DEFAULT_PORT);

    Ok(Config { host, port })
}

fn load_from_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let config: Config = serde_yaml::from_str(&contents)?;
    config.apply_port_override(env_port().as_deref())
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_SERVER_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml");
    }

    // Fallback to environment variables
    tracing::info!("No config file found, loading configuration from environment variables");
    load_from_env()
}
