//! Profile configuration.
//!
//! Connection settings are stored in a TOML file with one table per profile:
//!
//! ```toml
//! [default]
//! access_token = "..."
//! project_id = "5e2211c17a3e5a48f5497de3"
//! output = "json"
//!
//! [staging]
//! base_url = "https://cloud-qa.mongodb.com/"
//! ```
//!
//! The selected profile is resolved once in `main` and handed to the commands explicitly.
//! Environment variables override the values from the file.
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{commands::validators::parse_object_id, formatting::Format};

pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com/";
pub const DEFAULT_PROFILE: &str = "default";

/// Overrides the location of the config file.
pub const CONFIG_PATH_ENV: &str = "ATLAS_CLI_CONFIG";
/// Selects the profile when `--profile` is not provided.
pub const PROFILE_ENV: &str = "ATLAS_CLI_PROFILE";
pub const ACCESS_TOKEN_ENV: &str = "MONGODB_ATLAS_ACCESS_TOKEN";
pub const PROJECT_ID_ENV: &str = "MONGODB_ATLAS_PROJECT_ID";
pub const BASE_URL_ENV: &str = "MONGODB_ATLAS_BASE_URL";
pub const OUTPUT_ENV: &str = "MONGODB_ATLAS_OUTPUT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config from {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid project ID in profile '{profile}': {reason}")]
    InvalidProjectId { profile: String, reason: String },

    #[error("Invalid output format '{0}', expected 'text' or 'json'")]
    InvalidOutput(String),

    #[error("Failed to determine config directory")]
    ConfigDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// A profile as written in the config file, every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
struct ProfileEntry {
    access_token: Option<String>,
    project_id: Option<String>,
    base_url: Option<String>,
    output: Option<String>,
}

/// Contents of the config file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    profiles: HashMap<String, ProfileEntry>,
}

/// Resolved connection settings of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    /// Bearer token sent with every API request.
    pub access_token: Option<String>,
    /// Project used when `--projectId` is not provided.
    pub project_id: Option<String>,
    pub base_url: Url,
    /// Output format used when `--output` is not provided.
    pub output: Option<Format>,
}

impl Config {
    /// Location of the config file: `$ATLAS_CLI_CONFIG`, or `atlascli/config.toml` in the user config directory.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let base_dirs = BaseDirs::new().ok_or(ConfigError::ConfigDir)?;
        Ok(base_dirs.config_dir().join("atlascli").join("config.toml"))
    }

    /// Load the config file, a missing file is an empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using an empty config");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let profiles = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self { profiles })
    }

    /// Resolve the profile to use.
    ///
    /// The profile is selected by `requested` (the `--profile` flag), then `$ATLAS_CLI_PROFILE`, then `default`.
    /// A profile that was explicitly requested has to exist, a missing `default` profile resolves to an empty profile.
    ///
    /// # Arguments
    ///
    /// * `requested` - Profile name from the command line.
    /// * `env` - Environment lookup, `std::env::var` outside of tests.
    pub fn resolve_profile(
        &self,
        requested: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Profile> {
        let explicit_name = requested.map(str::to_string).or_else(|| env(PROFILE_ENV));

        let (name, entry) = match explicit_name {
            Some(name) => match self.profiles.get(&name) {
                Some(entry) => (name, entry.clone()),
                None => return Err(ConfigError::ProfileNotFound { name }),
            },
            None => (
                DEFAULT_PROFILE.to_string(),
                self.profiles
                    .get(DEFAULT_PROFILE)
                    .cloned()
                    .unwrap_or_default(),
            ),
        };

        debug!(profile = name, "resolving profile");

        let access_token = env(ACCESS_TOKEN_ENV).or(entry.access_token);
        let project_id = env(PROJECT_ID_ENV)
            .or(entry.project_id)
            .map(|project_id| {
                parse_object_id(&project_id).map_err(|reason| ConfigError::InvalidProjectId {
                    profile: name.clone(),
                    reason,
                })
            })
            .transpose()?;

        let base_url = env(BASE_URL_ENV)
            .or(entry.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;

        let output = env(OUTPUT_ENV)
            .or(entry.output)
            .map(|output| {
                Format::from_str(&output, true).map_err(|_| ConfigError::InvalidOutput(output))
            })
            .transpose()?;

        Ok(Profile {
            name,
            access_token,
            project_id,
            base_url,
            output,
        })
    }
}

/// Load the config file from its default location and resolve the profile using the process environment.
pub fn load_profile(requested: Option<&str>) -> Result<Profile> {
    let path = Config::default_path()?;
    debug!(path = %path.display(), "loading config");

    Config::load_from(&path)?.resolve_profile(requested, |key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"
[default]
access_token = "default-token"
project_id = "5e2211c17a3e5a48f5497de3"

[staging]
access_token = "staging-token"
base_url = "https://cloud-qa.mongodb.com/"
output = "json"
"#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_default_profile() {
        let file = config_file(CONFIG);
        let config = Config::load_from(file.path()).unwrap();

        let profile = config.resolve_profile(None, no_env).unwrap();

        assert_eq!(
            profile,
            Profile {
                name: "default".to_string(),
                access_token: Some("default-token".to_string()),
                project_id: Some("5e2211c17a3e5a48f5497de3".to_string()),
                base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
                output: None,
            }
        );
    }

    #[test]
    fn test_load_requested_profile() {
        let file = config_file(CONFIG);
        let config = Config::load_from(file.path()).unwrap();

        let profile = config.resolve_profile(Some("staging"), no_env).unwrap();

        assert_eq!(profile.name, "staging");
        assert_eq!(profile.access_token.as_deref(), Some("staging-token"));
        assert_eq!(profile.project_id, None);
        assert_eq!(profile.base_url.as_str(), "https://cloud-qa.mongodb.com/");
        assert_eq!(profile.output, Some(Format::Json));
    }

    #[test]
    fn test_profile_from_env() {
        let file = config_file(CONFIG);
        let config = Config::load_from(file.path()).unwrap();

        let profile = config
            .resolve_profile(None, |key| {
                (key == PROFILE_ENV).then(|| "staging".to_string())
            })
            .unwrap();

        assert_eq!(profile.name, "staging");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = config_file(CONFIG);
        let config = Config::load_from(file.path()).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            (ACCESS_TOKEN_ENV, "env-token"),
            (PROJECT_ID_ENV, "65a1f0e4c8b2d13b7a9e4f21"),
            (BASE_URL_ENV, "http://localhost:8080/"),
            (OUTPUT_ENV, "TEXT"),
        ]);

        let profile = config
            .resolve_profile(None, |key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(profile.access_token.as_deref(), Some("env-token"));
        assert_eq!(profile.project_id.as_deref(), Some("65a1f0e4c8b2d13b7a9e4f21"));
        assert_eq!(profile.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(profile.output, Some(Format::Text));
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        let profile = config.resolve_profile(None, no_env).unwrap();

        assert_eq!(profile.name, "default");
        assert_eq!(profile.access_token, None);
        assert_eq!(profile.project_id, None);
        assert_eq!(profile.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_requested_profile() {
        let file = config_file(CONFIG);
        let config = Config::load_from(file.path()).unwrap();

        let err = config.resolve_profile(Some("prod"), no_env).unwrap_err();

        assert!(matches!(err, ConfigError::ProfileNotFound { ref name } if name == "prod"));
        assert_eq!(err.to_string(), "Profile 'prod' not found");
    }

    #[test]
    fn test_invalid_toml() {
        let file = config_file("[default\naccess_token = ");

        let err = Config::load_from(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        let file = config_file("[default]\nbase_url = \"not a url\"\n");
        let config = Config::load_from(file.path()).unwrap();

        let err = config.resolve_profile(None, no_env).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_invalid_project_id() {
        let file = config_file("[default]\nproject_id = \"my-project\"\n");
        let config = Config::load_from(file.path()).unwrap();

        let err = config.resolve_profile(None, no_env).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid project ID in profile 'default': Invalid ID 'my-project', expected a 24 character hexadecimal string"
        );
    }

    #[test]
    fn test_invalid_project_id_from_env() {
        let file = config_file(CONFIG);
        let config = Config::load_from(file.path()).unwrap();

        let err = config
            .resolve_profile(None, |key| {
                (key == PROJECT_ID_ENV).then(|| "123".to_string())
            })
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidProjectId { .. }));
    }

    #[test]
    fn test_invalid_output() {
        let file = config_file("[default]\noutput = \"yaml\"\n");
        let config = Config::load_from(file.path()).unwrap();

        let err = config.resolve_profile(None, no_env).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid output format 'yaml', expected 'text' or 'json'"
        );
    }
}
