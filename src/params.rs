//! The log parameter file and the template context built from it.
//!
//! The parameter file is a small YAML mapping:
//!
//! ```yaml
//! appName: modamodApp
//! version: 1.0.1.0
//! appFullName: My Awesome App
//! client: modamod
//! env: dev
//! ```
//!
//! Templates see these values under their capitalized field names
//! (`AppName`, `Version`, ...), alongside whatever the renderer adds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigParseError {
    #[error("parameter file `{}` does not exist", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to read parameter file `{}`", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed parameter file `{}`", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(
    default,
    rename_all(serialize = "PascalCase", deserialize = "camelCase")
)]
pub struct ConfigRecord {
    pub app_name: String,
    pub version: String,
    pub app_full_name: String,
    pub client: String,
    pub env: String,
}

impl ConfigRecord {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigParseError> {
        let path = path.as_ref();

        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                ConfigParseError::Missing {
                    path: path.to_owned(),
                }
            } else {
                ConfigParseError::Unreadable {
                    path: path.to_owned(),
                    source: e,
                }
            }
        })?;

        serde_yaml::from_str(&text).map_err(|e| ConfigParseError::Malformed {
            path: path.to_owned(),
            source: e,
        })
    }

    pub fn to_context(&self) -> TemplateContext {
        let mut ctx = TemplateContext::default();

        for (key, value) in [
            ("AppName", &self.app_name),
            ("Version", &self.version),
            ("AppFullName", &self.app_full_name),
            ("Client", &self.client),
            ("Env", &self.env),
        ] {
            ctx.insert(key, Value::String(value.clone()));
        }

        ctx
    }
}

/// Read the parameter file and turn it straight into a template context.
pub fn load_context<P: AsRef<Path>>(path: P) -> Result<TemplateContext, ConfigParseError> {
    Ok(ConfigRecord::from_file(path)?.to_context())
}

/// String-keyed values handed to the template renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext(Map<String, Value>);

impl TemplateContext {
    /// Insert a value, returning whatever was previously stored under `key`.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}
