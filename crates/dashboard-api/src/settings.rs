//! Dashboard settings, derived from `config.toml` and the environment

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::session::{Locale, RouterMode, DEFAULT_LOGIN_PATH};

/// Backend base URL override
pub const ENV_API_BASE_URL: &str = "DASHBOARD_API_BASE_URL";
/// Client-wide timeout override, in seconds
pub const ENV_API_TIMEOUT_SECS: &str = "DASHBOARD_API_TIMEOUT_SECS";
/// Message language override (`en`, `zh`)
pub const ENV_LOCALE: &str = "DASHBOARD_LOCALE";
/// Login route override
pub const ENV_LOGIN_PATH: &str = "DASHBOARD_LOGIN_PATH";

/// Backend connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Api {
    /// Prefix of every relative request path
    pub base_url: String,
    /// Client-wide request timeout, in seconds
    pub timeout_secs: u64,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            timeout_secs: 180,
        }
    }
}

impl Api {
    /// Configured timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Routing style of the dashboard front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    /// `#/path` routes
    Hash,
    /// Plain path routes
    #[default]
    History,
}

impl std::str::FromStr for RouterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(RouterKind::Hash),
            "history" | "browser" => Ok(RouterKind::History),
            _ => Err(format!("Unknown router kind: {}", s)),
        }
    }
}

/// Session behaviour: messages and where a 401 leads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Language of user-facing notices
    pub locale: Locale,
    /// Route of the login page
    pub login_path: String,
    /// Routing style used to reach the login page
    pub router: RouterKind,
    /// Wait before navigating to the login page with history routing
    pub redirect_delay_ms: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            router: RouterKind::default(),
            redirect_delay_ms: 1000,
        }
    }
}

impl Session {
    /// Redirect behaviour for the session interceptors
    pub fn router_mode(&self) -> RouterMode {
        match self.router {
            RouterKind::Hash => RouterMode::Hash,
            RouterKind::History => RouterMode::History {
                delay: Duration::from_millis(self.redirect_delay_ms),
            },
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Backend connection
    pub api: Api,
    /// Session behaviour
    #[serde(default)]
    pub session: Session,
}

impl Settings {
    /// Load settings from `config_file_name` (or the default location), falling
    /// back to the defaults when the file cannot be read
    #[must_use]
    pub fn new<P>(config_file_name: Option<P>) -> Self
    where
        P: Into<PathBuf>,
    {
        let default_settings = Self::default();
        let from_file = Self::new_from_default(&default_settings, config_file_name);
        match from_file {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(
                    "Error reading config file, falling back to defaults. Error: {e:?}"
                );
                default_settings
            }
        }
    }

    /// Load settings layered over `default`
    pub fn new_from_default<P>(
        default: &Settings,
        config_file_name: Option<P>,
    ) -> Result<Self, ConfigError>
    where
        P: Into<PathBuf>,
    {
        let config_file_name = match config_file_name {
            Some(value) => value.into(),
            None => default_config_path()?,
        };

        let config: Config = Config::builder()
            // use defaults
            .add_source(Config::try_from(default)?)
            // override with file contents
            .add_source(File::from(config_file_name))
            .build()?;

        config.try_deserialize()
    }

    /// Override settings with environment variables if set
    pub fn from_env(&self) -> Self {
        let mut settings = self.clone();

        if let Ok(base_url) = env::var(ENV_API_BASE_URL) {
            settings.api.base_url = base_url;
        }

        if let Ok(timeout_str) = env::var(ENV_API_TIMEOUT_SECS) {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                settings.api.timeout_secs = timeout;
            }
        }

        if let Ok(locale_str) = env::var(ENV_LOCALE) {
            if let Ok(locale) = locale_str.parse::<Locale>() {
                settings.session.locale = locale;
            }
        }

        if let Ok(login_path) = env::var(ENV_LOGIN_PATH) {
            settings.session.login_path = login_path;
        }

        settings
    }
}

fn default_config_path() -> Result<PathBuf, ConfigError> {
    let mut path = home::home_dir()
        .ok_or(ConfigError::NotFound("Config Path".to_string()))?
        .join(".dashboard");
    path.push("config.toml");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Create temp config");
        file.write_all(contents.as_bytes())
            .expect("Write temp config");
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.timeout(), Duration::from_secs(180));
        assert_eq!(settings.session.login_path, "/login");
        assert_eq!(
            settings.session.router_mode(),
            RouterMode::History {
                delay: Duration::from_secs(1)
            }
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"
[api]
base_url = "https://admin.example.com/api"

[session]
locale = "zh"
router = "hash"
"#,
        );

        let settings = Settings::new_from_default(&Settings::default(), Some(file.path()))
            .expect("Config should load");

        assert_eq!(settings.api.base_url, "https://admin.example.com/api");
        assert_eq!(settings.api.timeout_secs, 180);
        assert_eq!(settings.session.locale, Locale::Zh);
        assert_eq!(settings.session.router_mode(), RouterMode::Hash);
        assert_eq!(settings.session.login_path, "/login");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::new(Some("/nonexistent/dashboard/config.toml"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_env_overrides() {
        env::set_var(ENV_API_BASE_URL, "http://10.0.0.5/api");
        env::set_var(ENV_API_TIMEOUT_SECS, "30");
        env::set_var(ENV_LOCALE, "zh");
        env::set_var(ENV_LOGIN_PATH, "/sign-in");

        let settings = Settings::default().from_env();

        env::remove_var(ENV_API_BASE_URL);
        env::remove_var(ENV_API_TIMEOUT_SECS);
        env::remove_var(ENV_LOCALE);
        env::remove_var(ENV_LOGIN_PATH);

        assert_eq!(settings.api.base_url, "http://10.0.0.5/api");
        assert_eq!(settings.api.timeout(), Duration::from_secs(30));
        assert_eq!(settings.session.locale, Locale::Zh);
        assert_eq!(settings.session.login_path, "/sign-in");
    }

    #[test]
    fn test_router_kind_from_str() {
        assert_eq!("Hash".parse::<RouterKind>(), Ok(RouterKind::Hash));
        assert_eq!("browser".parse::<RouterKind>(), Ok(RouterKind::History));
        assert!("memory".parse::<RouterKind>().is_err());
    }
}
