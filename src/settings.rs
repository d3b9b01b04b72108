//! Layered configuration: defaults, optional TOML file, then `MENUGATE__*` env vars

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::AccessPolicy;
use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: Storage,
    pub server: Server,
    pub policy: AccessPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    /// LMDB environment directory
    pub path: PathBuf,
}

impl Default for Storage {
    fn default() -> Self {
        Storage { path: PathBuf::from("data/menugate") }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Server { host: "0.0.0.0".to_string(), port: 3000 }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: MENUGATE__SERVER__PORT=9090, etc.
        builder = builder.add_source(config::Environment::with_prefix("MENUGATE").separator("__"));

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
