//! Record store backend configuration.

use super::{ConfigError, non_empty};

/// Default table holding weather requests
pub const DEFAULT_TABLE: &str = "weather_requests";

/// Connection details for a PostgREST (Supabase) table API
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,
    pub api_key: String,
    pub table: String,
}

/// Which backend the record store talks to
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgrest(PostgrestConfig),
    /// Process-local table, for development and tests
    Memory,
}

impl StoreConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Postgrest(_) => "postgrest",
            StoreConfig::Memory => "memory",
        }
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = non_empty(lookup, "STORE_BACKEND")
            .unwrap_or_else(|| "postgrest".to_string())
            .to_lowercase();

        match backend.as_str() {
            "memory" => Ok(StoreConfig::Memory),
            "postgrest" | "supabase" => {
                let url = non_empty(lookup, "SUPABASE_URL")
                    .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
                url::Url::parse(&url).map_err(|e| ConfigError::Invalid {
                    var: "SUPABASE_URL",
                    reason: e.to_string(),
                })?;
                let api_key = non_empty(lookup, "SUPABASE_KEY")
                    .ok_or(ConfigError::Missing("SUPABASE_KEY"))?;
                let table =
                    non_empty(lookup, "STORE_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());

                Ok(StoreConfig::Postgrest(PostgrestConfig {
                    url: url.trim_end_matches('/').to_string(),
                    api_key,
                    table,
                }))
            }
            other => Err(ConfigError::Invalid {
                var: "STORE_BACKEND",
                reason: format!("unknown backend '{other}', expected 'postgrest' or 'memory'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::vars;

    #[test]
    fn test_postgrest_is_default_and_needs_credentials() {
        let err = StoreConfig::from_lookup(&vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_URL")));

        let err = StoreConfig::from_lookup(&vars(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_KEY")));
    }

    #[test]
    fn test_postgrest_config() {
        let lookup = vars(&[
            ("SUPABASE_URL", "https://x.supabase.co/"),
            ("SUPABASE_KEY", "service-key"),
        ]);
        match StoreConfig::from_lookup(&lookup).unwrap() {
            StoreConfig::Postgrest(pg) => {
                assert_eq!(pg.url, "https://x.supabase.co");
                assert_eq!(pg.api_key, "service-key");
                assert_eq!(pg.table, DEFAULT_TABLE);
            }
            StoreConfig::Memory => panic!("expected postgrest backend"),
        }
    }

    #[test]
    fn test_unknown_backend() {
        let err = StoreConfig::from_lookup(&vars(&[("STORE_BACKEND", "sqlite")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "STORE_BACKEND", .. }));
    }
}
