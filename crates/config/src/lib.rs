//! Layered configuration for mwatch.
//!
//! Sources, later ones winning: built-in defaults, a TOML config file,
//! `MANGA_WATCH_*` environment variables, then command-line overrides.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Prefix shared by every environment variable mwatch reads.
pub const ENV_PREFIX: &str = "MANGA_WATCH_";
/// Publishers serve different (or no) markup to unknown agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 25;
pub const DEFAULT_JOBS: usize = 4;
pub const DEFAULT_MAX_HOPS: usize = 30;

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sent with every request.
    pub user_agent: String,
    /// Per-request timeout, in seconds.
    pub timeout: u64,
    pub state_path: PathBuf,
    /// Number of watchlist entries checked concurrently.
    pub jobs: usize,
    /// Upper bound on fetches when following "next episode" pointers.
    pub max_hops: usize,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            state_path: default_state_path(),
            jobs: DEFAULT_JOBS,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Config {
    /// Load every layer and validate the result.
    ///
    /// `file` is the config file given on the command line; without one, the
    /// per-user config file is read if it exists.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::NotFound`] if `file` was given but does not exist.
    /// - [`ErrorKind::Load`] if a layer holds a value of the wrong type.
    /// - [`ErrorKind::Invalid`] if the merged values are unusable.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let figment = Self::figment(file)?.merge(Serialized::defaults(overrides));
        Self::from_figment(&figment)
    }

    /// Defaults, config file and environment, without command-line overrides.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match file {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
                }
                figment = figment.merge(Toml::file(path));
            },
            None => {
                if let Some(path) = default_config_file() {
                    debug!(path = %path.display(), "checking default config file");
                    figment = figment.merge(Toml::file(path));
                }
            },
        }
        Ok(figment.merge(env()))
    }

    /// Extract and validate a config from an assembled [`Figment`].
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("user agent must not be empty"));
        }
        if self.timeout == 0 {
            exn::bail!(ErrorKind::Invalid("timeout must be at least one second"));
        }
        if self.max_hops == 0 {
            exn::bail!(ErrorKind::Invalid("max hops must be at least one"));
        }
        Ok(())
    }
}

/// `MANGA_WATCH_<FIELD>`, plus the short `MANGA_WATCH_UA` and
/// `MANGA_WATCH_STATE` spellings. `MANGA_WATCH_LOG` belongs to the logger.
fn env() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(&["log"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "ua" => "user_agent".into(),
            "state" => "state_path".into(),
            other => other.to_string().into(),
        })
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "mwatch")
}

fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

fn default_state_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("state.json"))
        .unwrap_or_else(|| PathBuf::from("state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    const FILE: &str = "config.toml";

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.request_timeout(), Duration::from_secs(25));
        assert_eq!(config.jobs, 4);
        assert_eq!(config.max_hops, 30);
        assert!(config.state_path.ends_with("state.json"));
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(FILE, "")?;
            let config = Config::load(Some(Path::new(FILE)), &Overrides::default()).unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_layers_in_order() {
        Jail::expect_with(|jail| {
            jail.create_file(FILE, "timeout = 10\njobs = 2\nuser_agent = \"FileAgent/1.0\"\n")?;
            jail.set_env("MANGA_WATCH_JOBS", "3");
            jail.set_env("MANGA_WATCH_UA", "EnvAgent/1.0");
            let overrides = Overrides {
                state_path: None,
                jobs: Some(6),
            };
            let config = Config::load(Some(Path::new(FILE)), &overrides).unwrap();
            assert_eq!(config.timeout, 10);
            assert_eq!(config.user_agent, "EnvAgent/1.0");
            assert_eq!(config.jobs, 6);
            Ok(())
        });
    }

    #[test]
    fn test_state_path_spellings() {
        Jail::expect_with(|jail| {
            jail.create_file(FILE, "")?;
            jail.set_env("MANGA_WATCH_STATE", "/srv/mwatch/state.json");
            let config = Config::load(Some(Path::new(FILE)), &Overrides::default()).unwrap();
            assert_eq!(config.state_path, PathBuf::from("/srv/mwatch/state.json"));

            let overrides = Overrides {
                state_path: Some(PathBuf::from("cli.json")),
                jobs: None,
            };
            let config = Config::load(Some(Path::new(FILE)), &overrides).unwrap();
            assert_eq!(config.state_path, PathBuf::from("cli.json"));
            Ok(())
        });
    }

    #[test]
    fn test_short_env_spellings() {
        Jail::expect_with(|jail| {
            jail.set_env("MANGA_WATCH_UA", "EnvAgent/1.0");
            jail.set_env("MANGA_WATCH_STATE", "/srv/state.json");
            jail.set_env("MANGA_WATCH_JOBS", "7");
            jail.create_file(FILE, "")?;
            let config = Config::from_figment(&Config::figment(Some(Path::new(FILE))).unwrap()).unwrap();
            assert_eq!(config.user_agent, "EnvAgent/1.0");
            assert_eq!(config.state_path, PathBuf::from("/srv/state.json"));
            assert_eq!(config.jobs, 7);
            Ok(())
        });
    }

    #[test]
    fn test_log_variable_is_not_config() {
        Jail::expect_with(|jail| {
            jail.set_env("MANGA_WATCH_LOG", "debug");
            jail.set_env("MANGA_WATCH_JOBS", "5");
            let figment = Figment::from(env());
            assert!(figment.find_value("log").is_err());
            assert_eq!(figment.extract_inner::<usize>("jobs").unwrap(), 5);
            Ok(())
        });
    }

    #[rstest]
    #[case::empty_agent("user_agent = \"  \"", ErrorKind::Invalid("user agent must not be empty"))]
    #[case::zero_timeout("timeout = 0", ErrorKind::Invalid("timeout must be at least one second"))]
    #[case::zero_hops("max_hops = 0", ErrorKind::Invalid("max hops must be at least one"))]
    #[case::wrong_type("jobs = \"many\"", ErrorKind::Load)]
    fn test_rejected(#[case] contents: &str, #[case] expected: ErrorKind) {
        Jail::expect_with(|jail| {
            jail.create_file(FILE, contents)?;
            let err = Config::load(Some(Path::new(FILE)), &Overrides::default()).unwrap_err();
            assert_eq!(*err, expected);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load(Some(&path), &Overrides::default()).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }
}
