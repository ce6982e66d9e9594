use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for environment variable {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` if present)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub swagger_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_address =
            lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let swagger_enabled = match lookup("SWAGGER_ENABLED") {
            None => true,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "SWAGGER_ENABLED",
                        value,
                    });
                }
            },
        };

        Ok(Self {
            database_url,
            bind_address,
            swagger_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup_in(&[("DATABASE_URL", "postgres://localhost/reviews")]))
                .unwrap();

        assert_eq!(config.database_url, "postgres://localhost/reviews");
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert!(config.swagger_enabled);
    }

    #[test]
    fn test_missing_database_url() {
        assert_eq!(
            Config::from_lookup(lookup_in(&[])),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_in(&[
            ("DATABASE_URL", "postgres://db/reviews"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("SWAGGER_ENABLED", "FALSE"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert!(!config.swagger_enabled);
    }

    #[test]
    fn test_invalid_swagger_flag() {
        let result = Config::from_lookup(lookup_in(&[
            ("DATABASE_URL", "postgres://db/reviews"),
            ("SWAGGER_ENABLED", "sometimes"),
        ]));

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
