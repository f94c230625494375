//! Runtime settings, taken from the process environment.
//!
//! Everything has a default that matches the stock deployment, so a function
//! deployed without any environment variables still does the right thing.

use std::path::PathBuf;

pub const LOG_GROUP_VAR: &str = "HELLO_LOG_GROUP";
pub const LOG_STREAM_VAR: &str = "HELLO_LOG_STREAM";
pub const PARAMETERS_FILE_VAR: &str = "HELLO_PARAMETERS_FILE";
pub const TEMPLATE_DIR_VAR: &str = "HELLO_TEMPLATE_DIR";
pub const TEMPLATE_NAME_VAR: &str = "HELLO_TEMPLATE_NAME";
pub const CHECKIP_URL_VAR: &str = "HELLO_CHECKIP_URL";
pub const REGION_FALLBACK_VAR: &str = "HELLO_REGION_FALLBACK";

pub const DEFAULT_LOG_GROUP: &str = "/lambda/test/log-group";
pub const DEFAULT_LOG_STREAM: &str = "/lambda/test/log-group-stream";
pub const DEFAULT_PARAMETERS_FILE: &str = "templates/log.parameters";
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";
pub const DEFAULT_TEMPLATE_NAME: &str = "log.template";
pub const DEFAULT_CHECKIP_URL: &str = "https://checkip.amazonaws.com";
pub const DEFAULT_REGION_FALLBACK: &str = "us-east-1";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub log_group: String,
    pub log_stream: String,
    pub parameters_file: PathBuf,
    pub template_dir: PathBuf,
    pub template_name: String,
    pub checkip_url: String,

    /// Region to use when the SDK's default provider chain doesn't come up
    /// with one (e.g. when running the oneshot tool outside of AWS).
    pub region_fallback: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from_lookup(|_| None)
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_owned())
        };

        Settings {
            log_group: get(LOG_GROUP_VAR, DEFAULT_LOG_GROUP),
            log_stream: get(LOG_STREAM_VAR, DEFAULT_LOG_STREAM),
            parameters_file: get(PARAMETERS_FILE_VAR, DEFAULT_PARAMETERS_FILE).into(),
            template_dir: get(TEMPLATE_DIR_VAR, DEFAULT_TEMPLATE_DIR).into(),
            template_name: get(TEMPLATE_NAME_VAR, DEFAULT_TEMPLATE_NAME),
            checkip_url: get(CHECKIP_URL_VAR, DEFAULT_CHECKIP_URL),
            region_fallback: get(REGION_FALLBACK_VAR, DEFAULT_REGION_FALLBACK),
        }
    }
}
