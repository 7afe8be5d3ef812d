//! Environment-driven configuration
//!
//! Every setting comes from an environment variable. A variable that is
//! unset or empty falls back to its default; nothing is validated.

use std::fmt;

pub const ENV_ACCESS_KEY: &str = "AWS_ACCESS_KEY";
pub const ENV_SECRET_KEY: &str = "AWS_SECRET_KEY";
pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_PROFILE: &str = "AWS_PROFILE";
pub const ENV_SECRET_ID: &str = "AWS_SECRET_ID";
pub const ENV_SECRET_VERSION: &str = "AWS_SECRET_VERSION";
pub const ENV_FILEPATH: &str = "FILEPATH";

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_SECRET_ID: &str = "LARAVEL-ENV";
pub const DEFAULT_VERSION_STAGE: &str = "AWSCURRENT";
pub const DEFAULT_FILEPATH: &str = ".env";

/// Settings for a single run
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Static access key id (`AWS_ACCESS_KEY`)
    pub access_key: String,
    /// Static secret access key (`AWS_SECRET_KEY`)
    pub secret_key: String,
    /// Region the client talks to (`AWS_REGION`)
    pub region: String,
    /// Named profile for the default credential chain (`AWS_PROFILE`)
    pub profile: String,
    /// Secret name or ARN (`AWS_SECRET_ID`)
    pub secret_id: String,
    /// Version stage label, e.g. AWSCURRENT (`AWS_SECRET_VERSION`)
    pub version_stage: String,
    /// Output file (`FILEPATH`)
    pub filepath: String,
}

/// How the client obtains credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Explicit key pair from the environment
    Static {
        access_key: String,
        secret_key: String,
    },
    /// The SDK's default chain, optionally pinned to a named profile
    Ambient { profile: Option<String> },
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Static { .. } => "static",
            AuthMode::Ambient { .. } => "ambient",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            profile: String::new(),
            secret_id: DEFAULT_SECRET_ID.to_string(),
            version_stage: DEFAULT_VERSION_STAGE.to_string(),
            filepath: DEFAULT_FILEPATH.to_string(),
        }
    }
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            access_key: get(ENV_ACCESS_KEY, ""),
            secret_key: get(ENV_SECRET_KEY, ""),
            region: get(ENV_REGION, DEFAULT_REGION),
            profile: get(ENV_PROFILE, ""),
            secret_id: get(ENV_SECRET_ID, DEFAULT_SECRET_ID),
            version_stage: get(ENV_SECRET_VERSION, DEFAULT_VERSION_STAGE),
            filepath: get(ENV_FILEPATH, DEFAULT_FILEPATH),
        }
    }

    /// Static credentials need both halves of the key pair
    pub fn auth_mode(&self) -> AuthMode {
        if !self.access_key.is_empty() && !self.secret_key.is_empty() {
            AuthMode::Static {
                access_key: self.access_key.clone(),
                secret_key: self.secret_key.clone(),
            }
        } else {
            AuthMode::Ambient {
                profile: (!self.profile.is_empty()).then(|| self.profile.clone()),
            }
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret_key = if self.secret_key.is_empty() {
            ""
        } else {
            "<redacted>"
        };

        f.debug_struct("Config")
            .field("access_key", &self.access_key)
            .field("secret_key", &secret_key)
            .field("region", &self.region)
            .field("profile", &self.profile)
            .field("secret_id", &self.secret_id)
            .field("version_stage", &self.version_stage)
            .field("filepath", &self.filepath)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.secret_id, "LARAVEL-ENV");
        assert_eq!(config.version_stage, "AWSCURRENT");
        assert_eq!(config.filepath, ".env");
        assert!(config.access_key.is_empty());
        assert!(config.secret_key.is_empty());
        assert!(config.profile.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("AWS_ACCESS_KEY", "AKIDEXAMPLE"),
            ("AWS_SECRET_KEY", "wJalrXUtnFEMI"),
            ("AWS_REGION", "eu-central-1"),
            ("AWS_PROFILE", "staging"),
            ("AWS_SECRET_ID", "MY-ENV"),
            ("AWS_SECRET_VERSION", "AWSPREVIOUS"),
            ("FILEPATH", "/tmp/out.env"),
        ]);

        assert_eq!(config.access_key, "AKIDEXAMPLE");
        assert_eq!(config.secret_key, "wJalrXUtnFEMI");
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.profile, "staging");
        assert_eq!(config.secret_id, "MY-ENV");
        assert_eq!(config.version_stage, "AWSPREVIOUS");
        assert_eq!(config.filepath, "/tmp/out.env");
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = config_from(&[("AWS_REGION", ""), ("FILEPATH", "")]);
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.filepath, DEFAULT_FILEPATH);
    }

    #[test]
    fn test_auth_mode_static_needs_both_keys() {
        let config = config_from(&[("AWS_ACCESS_KEY", "AKID"), ("AWS_SECRET_KEY", "SECRET")]);
        assert_eq!(
            config.auth_mode(),
            AuthMode::Static {
                access_key: "AKID".to_string(),
                secret_key: "SECRET".to_string(),
            }
        );

        let config = config_from(&[("AWS_ACCESS_KEY", "AKID")]);
        assert_eq!(config.auth_mode(), AuthMode::Ambient { profile: None });

        let config = config_from(&[("AWS_SECRET_KEY", "SECRET")]);
        assert_eq!(config.auth_mode(), AuthMode::Ambient { profile: None });
    }

    #[test]
    fn test_auth_mode_ambient_profile() {
        let config = config_from(&[("AWS_PROFILE", "staging")]);
        assert_eq!(
            config.auth_mode(),
            AuthMode::Ambient {
                profile: Some("staging".to_string())
            }
        );
        assert_eq!(config.auth_mode().as_str(), "ambient");
    }

    #[test]
    fn test_debug_redacts_secret_key() {
        let config = config_from(&[("AWS_SECRET_KEY", "wJalrXUtnFEMI")]);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("wJalrXUtnFEMI"));
        assert!(rendered.contains("<redacted>"));
    }
}
