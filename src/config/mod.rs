//! Process configuration.
//!
//! All configuration is environment-provided; there is no config file.
//! Missing values do not fail startup - each tool surfaces its own
//! "not configured" result when it is asked to run without credentials.

use std::env;
use std::path::PathBuf;

/// Environment variable holding the mail account user
pub const ENV_MAIL_USER: &str = "MAIL_USER";
/// Environment variable holding the mail app password
pub const ENV_MAIL_APP_PASSWORD: &str = "MAIL_APP_PASSWORD";
/// Environment variable overriding the calendar token cache path
pub const ENV_CALENDAR_TOKEN_PATH: &str = "CALENDAR_TOKEN_PATH";
/// Environment variable overriding the default weather city
pub const ENV_DEFAULT_CITY: &str = "DEFAULT_CITY";

/// City used when a weather request names none
pub const DEFAULT_CITY: &str = "manila";

/// Credential pair for SMTP submission
#[derive(Debug, Clone)]
pub struct MailCredentials {
    pub user: String,
    pub app_password: String,
}

/// Runtime configuration assembled from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Mail credentials; `None` leaves the email tool unconfigured
    pub mail: Option<MailCredentials>,

    /// Location of the cached calendar OAuth token
    pub calendar_token_path: PathBuf,

    /// City used when a weather request names none
    pub default_city: String,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        let mail = match (
            non_empty_var(ENV_MAIL_USER),
            non_empty_var(ENV_MAIL_APP_PASSWORD),
        ) {
            (Some(user), Some(app_password)) => Some(MailCredentials { user, app_password }),
            _ => None,
        };

        let calendar_token_path = non_empty_var(ENV_CALENDAR_TOKEN_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(default_token_path);

        let default_city =
            non_empty_var(ENV_DEFAULT_CITY).unwrap_or_else(|| DEFAULT_CITY.to_string());

        Self {
            mail,
            calendar_token_path,
            default_city,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mail: None,
            calendar_token_path: default_token_path(),
            default_city: DEFAULT_CITY.to_string(),
        }
    }
}

fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("adjutant")
        .join("calendar_token.json")
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
