use std::sync::LazyLock;

use figment::{Figment, providers::Env};
use serde::Deserialize;

/// Runtime configuration, sourced from the environment.
///
/// `SQLDECK_*` variables take precedence; `DATABASE_URL` is also honored
/// for the connection string since that is what most tooling exports.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_loglevel")]
    pub loglevel: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    pub fn from_env() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Env::raw().only(&["DATABASE_URL"]))
            .merge(Env::prefixed("SQLDECK_"))
            .extract()
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().unwrap_or_else(|e| panic!("invalid configuration: {e}"))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/deck");
            let cfg = Config::from_env()?;
            assert_eq!(cfg.database_url, "postgres://localhost/deck");
            assert_eq!(cfg.listen_addr, "0.0.0.0:8000");
            assert_eq!(cfg.loglevel, "info");
            assert_eq!(cfg.max_connections, 5);
            Ok(())
        });
    }

    #[test]
    fn prefixed_vars_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SQLDECK_DATABASE_URL", "postgres://db/admin");
            jail.set_env("SQLDECK_LISTEN_ADDR", "127.0.0.1:9000");
            jail.set_env("SQLDECK_MAX_CONNECTIONS", "12");
            let cfg = Config::from_env()?;
            assert_eq!(cfg.database_url, "postgres://db/admin");
            assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
            assert_eq!(cfg.max_connections, 12);
            Ok(())
        });
    }
}
