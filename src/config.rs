//! Environment-driven configuration.
//!
//! All settings come from `POSTD_`-prefixed environment variables, with a
//! `.env` file picked up in `main` for local development. There are no
//! config files and no CLI flags.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// `host:port` the listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// MongoDB connection string. When unset the service runs on the
    /// in-memory store instead, which is what local dev and tests want.
    pub mongodb_url: Option<String>,
    #[serde(default = "default_database")]
    pub mongodb_database: String,
    /// When true the store stamps createdAt/updatedAt/createdBy/updatedBy
    /// on writes.
    #[serde(default)]
    pub auditing: bool,
    /// Actor name recorded in the audit fields.
    #[serde(default = "default_audit_actor")]
    pub audit_actor: String,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("POSTD_").from_env()
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_owned()
}

fn default_database() -> String {
    "postd".to_owned()
}

fn default_audit_actor() -> String {
    "postd".to_owned()
}
