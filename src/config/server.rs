//! HTTP listener configuration.

use super::{ConfigError, non_empty};

/// Address the API server binds to
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_address = non_empty(lookup, "BIND_ADDRESS").unwrap_or(defaults.bind_address);
        let port = match non_empty(lookup, "PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                reason: format!("'{raw}' is not a valid port"),
            })?,
            None => defaults.port,
        };

        Ok(Self { bind_address, port })
    }

    /// `host:port` pair for `HttpServer::bind`
    pub fn socket_addr(&self) -> (String, u16) {
        (self.bind_address.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::vars;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::from_lookup(&vars(&[])).unwrap();
        assert_eq!(config.socket_addr(), ("127.0.0.1".to_string(), 8080));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(&vars(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }
}
