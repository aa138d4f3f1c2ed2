use crate::cli::Cli;
use crate::client::{Client, DEFAULT_BASE_URL, USER_AGENT};
use crate::logging::LoggingOptions;
use crate::nominatim::NOMINATIM_PATH_PREFIX;
use crate::util::string_or_number;
use anyhow::Result;
use etcetera::{choose_app_strategy, AppStrategy, AppStrategyArgs};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const ENV_PREFIX: &str = "NOMINATIM_";

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,
    pub main: MainConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: Self::default_path(),
            main: MainConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MainConfig {
    #[serde(deserialize_with = "string_or_number")]
    pub base_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub path_prefix: String,
    /// Empty means requests are sent without a key.
    #[serde(deserialize_with = "string_or_number")]
    pub api_key: String,
    pub timeout_secs: u64,
    #[serde(deserialize_with = "string_or_number")]
    pub user_agent: String,
    pub logging: LoggingOptions,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path_prefix: NOMINATIM_PATH_PREFIX.to_string(),
            api_key: String::new(),
            timeout_secs: 5,
            user_agent: USER_AGENT.to_string(),
            logging: LoggingOptions::default(),
        }
    }
}

impl MainConfig {
    pub fn client(&self) -> Client {
        Client::builder()
            .base_url(&self.base_url)
            .path_prefix(&self.path_prefix)
            .key(&self.api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(&self.user_agent)
            .build()
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let mut path = PathBuf::from(&Self::default_dirs().config);
        path.push("config.yml");
        path
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::from(Serialized::defaults(MainConfig::default()))
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        let main = Self::figment(&config_path).extract()?;
        Ok(Self { config_path, main })
    }

    pub fn from_cli(args: &Cli) -> Result<Self> {
        let config_path = if let Some(path) = &args.config_path {
            path.to_owned()
        } else {
            Self::default_path()
        };

        let main = Self::figment(&config_path)
            .merge(Serialized::defaults(args))
            .extract()?;

        Ok(Config { config_path, main })
    }

    pub fn write_config_file(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(&self.main)?;
        fs::write(&self.config_path, yaml)?;
        info!("Wrote config to {}", self.config_path.display());
        Ok(())
    }

    pub fn default_dirs() -> &'static DefaultDirs {
        DEFAULT_DIRS.get_or_init(|| {
            let strategy = choose_app_strategy(AppStrategyArgs {
                top_level_domain: "org".to_string(),
                author: "sublipri".to_string(),
                app_name: "Nominatim Search".to_string(),
            })
            .expect("could not determine the home directory");
            DefaultDirs {
                config: strategy.config_dir(),
                state: strategy.state_dir().unwrap_or(strategy.data_dir()),
            }
        })
    }
}

static DEFAULT_DIRS: OnceCell<DefaultDirs> = OnceCell::new();

#[derive(Debug, Deserialize, Serialize)]
pub struct DefaultDirs {
    pub config: PathBuf,
    pub state: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::JsonClient;
    use crate::logging::LogLevel;
    use figment::Jail;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|jail| {
            let config = Config::from_path(jail.directory().join("missing.yml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.main.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.main.path_prefix, NOMINATIM_PATH_PREFIX);
            assert_eq!(config.main.api_key, "");
            assert_eq!(config.main.timeout_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yml",
                "base_url: http://localhost:9000\napi_key: from-file\nlogging:\n  console_level: warn\n",
            )?;
            jail.set_env("NOMINATIM_API_KEY", "from-env");
            jail.set_env("NOMINATIM_TIMEOUT_SECS", "30");
            jail.set_env("NOMINATIM_LOGGING__FILE_LEVEL", "trace");

            let config = Config::from_path(jail.directory().join("config.yml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.main.base_url, "http://localhost:9000");
            assert_eq!(config.main.api_key, "from-env");
            assert_eq!(config.main.timeout_secs, 30);
            assert_eq!(config.main.logging.console_level, LogLevel::Warn);
            assert_eq!(config.main.logging.file_level, LogLevel::Trace);
            Ok(())
        });
    }

    #[test]
    fn numeric_keys_stay_strings() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yml", "api_key: 67890\nuser_agent: 42\n")?;
            let path = jail.directory().join("config.yml");

            let config = Config::from_path(&path).map_err(|e| e.to_string())?;
            assert_eq!(config.main.api_key, "67890");
            assert_eq!(config.main.user_agent, "42");

            jail.set_env("NOMINATIM_API_KEY", "12345");
            let config = Config::from_path(&path).map_err(|e| e.to_string())?;
            assert_eq!(config.main.api_key, "12345");
            assert_eq!(config.main.client().key(), "12345");
            Ok(())
        });
    }

    #[test]
    fn empty_key_in_file_means_no_key() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yml", "api_key:\n")?;
            let config = Config::from_path(jail.directory().join("config.yml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.main.api_key, "");
            Ok(())
        });
    }

    #[test]
    fn client_uses_configured_values() {
        let main = MainConfig {
            base_url: "http://localhost:9000/".to_string(),
            path_prefix: String::new(),
            api_key: "abc".to_string(),
            ..Default::default()
        };
        let client = main.client();
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(client.path_prefix(), "");
        assert_eq!(client.key(), "abc");
    }

    #[test]
    fn written_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        let mut config = Config::default();
        config.config_path = path.clone();
        config.main.api_key = "written".to_string();
        config.write_config_file().unwrap();

        let yaml = fs::read_to_string(&path).unwrap();
        let main: MainConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(main.api_key, "written");
        assert_eq!(main.base_url, DEFAULT_BASE_URL);
    }
}
