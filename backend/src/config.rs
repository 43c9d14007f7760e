use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "MONILIA_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub log_file: Option<PathBuf>,
    /// bcrypt work factor for plain passwords hashed at startup.
    pub password_cost: u32,
    pub users: Vec<UserConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_dir: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub labels: PathBuf,
    pub device: DeviceKind,
    pub apply_softmax: bool,
    pub preload: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[default]
    Auto,
    Cpu,
    Cuda,
}

/// One entry of the credential table. Either a plain password, hashed at
/// startup, or a standard bcrypt `"$2b$..."` hash.
#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    pub username: String,
    #[serde(flatten)]
    pub secret: UserSecret,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserSecret {
    Hashed { password_hash: String },
    Plain { password: String },
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            log_file: Some(PathBuf::from("app.log")),
            password_cost: bcrypt::DEFAULT_COST,
            users: Vec::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let frontend_dir = if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
            PathBuf::from(format!("{}/../frontend/dist", manifest_dir))
        } else {
            PathBuf::from("/usr/src/app/frontend/dist")
        };
        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            frontend_dir,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model/keras_model.pt"),
            labels: PathBuf::from("model/labels.txt"),
            device: DeviceKind::Auto,
            apply_softmax: false,
            preload: false,
        }
    }
}

impl AppConfig {
    /// Reads the YAML file named by `MONILIA_CONFIG` (or `config/app.yaml`),
    /// falling back to defaults when it does not exist, then applies
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let path = Path::new(&path);
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|name| env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&config_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Applies `HOST`, `PORT`, `FRONTEND_DIR`, `MODEL_PATH`, `LABELS_PATH` and
    /// `LOG_FILE` as returned by `lookup`. An empty `LOG_FILE` logs to stderr.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { name: "PORT", value: port })?;
        }
        if let Some(dir) = lookup("FRONTEND_DIR") {
            self.server.frontend_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup("MODEL_PATH") {
            self.model.path = PathBuf::from(path);
        }
        if let Some(path) = lookup("LABELS_PATH") {
            self.model.labels = PathBuf::from(path);
        }
        if let Some(path) = lookup("LOG_FILE") {
            self.log_file = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
