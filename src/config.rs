//! Application configuration loaded from environment variables.
//!
//! The extraction pipeline receives an immutable `Config` value; nothing
//! reads process-global state after startup. Secret values themselves are
//! never held here, only the references (mount paths) they are read from.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Strava API ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Secret reference (mounted file path) for the Strava client secret
    pub client_secret_ref: String,
    /// Secret reference (mounted file path) for the Strava refresh token
    pub refresh_token_ref: String,

    // --- Extraction window ---
    /// Seconds subtracted from "now" to get the window's end (`before`)
    pub window_offset_secs: i64,
    /// Size of the lookback window in seconds (`after = before - window_secs`)
    pub window_secs: i64,

    // --- Output ---
    /// Target GCS bucket for the serialized batch
    pub gcs_bucket: String,
    /// Object name of the batch within the bucket (overwritten each run)
    pub gcs_object: String,

    // --- Server ---
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary lookup function.
    ///
    /// Keeps tests free of process-global environment mutation.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let window_offset_secs = parsed(&get, "WINDOW_OFFSET_SECS")?;
        let window_secs = parsed(&get, "WINDOW_SECS")?;

        if window_offset_secs < 0 {
            return Err(ConfigError::Invalid {
                name: "WINDOW_OFFSET_SECS",
                value: window_offset_secs.to_string(),
            });
        }
        // A window of zero seconds would make `after == before`
        if window_secs <= 0 {
            return Err(ConfigError::Invalid {
                name: "WINDOW_SECS",
                value: window_secs.to_string(),
            });
        }

        Ok(Self {
            strava_client_id: required(&get, "STRAVA_CLIENT_ID")?,
            client_secret_ref: required(&get, "STRAVA_CLIENT_SECRET_REF")?,
            refresh_token_ref: required(&get, "STRAVA_REFRESH_TOKEN_REF")?,
            window_offset_secs,
            window_secs,
            gcs_bucket: required(&get, "GCS_BUCKET")?,
            gcs_object: required(&get, "GCS_OBJECT")?,
            port: match get("PORT") {
                Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                    name: "PORT",
                    value: v,
                })?,
                None => 8080,
            },
        })
    }

    /// Default config for tests.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            client_secret_ref: "client_secret".to_string(),
            refresh_token_ref: "refresh_token".to_string(),
            window_offset_secs: 0,
            window_secs: 7 * 24 * 3600,
            gcs_bucket: "test-bucket".to_string(),
            gcs_object: "activities.json".to_string(),
            port: 8080,
        }
    }
}

fn required(get: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match get(name) {
        Some(v) => Ok(v.trim().to_string()),
        None => Err(ConfigError::Missing(name)),
    }
}

fn parsed(get: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<i64, ConfigError> {
    let raw = get(name).ok_or(ConfigError::Missing(name))?;
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value: raw })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Failed to read secret reference {reference}: {message}")]
    Secret { reference: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("STRAVA_CLIENT_ID", "12345"),
            ("STRAVA_CLIENT_SECRET_REF", "/secrets/client_secret"),
            ("STRAVA_REFRESH_TOKEN_REF", "/secrets/refresh_token"),
            ("WINDOW_OFFSET_SECS", "0"),
            ("WINDOW_SECS", "604800"),
            ("GCS_BUCKET", "my-bucket"),
            ("GCS_OBJECT", "activities.json"),
        ])
    }

    fn lookup(vars: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |name| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn loads_complete_config() {
        let config = Config::from_lookup(lookup(base_vars())).expect("Config should load");

        assert_eq!(config.strava_client_id, "12345");
        assert_eq!(config.client_secret_ref, "/secrets/client_secret");
        assert_eq!(config.window_secs, 604800);
        assert_eq!(config.gcs_object, "activities.json");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        let mut vars = base_vars();
        vars.remove("GCS_BUCKET");

        let err = Config::from_lookup(lookup(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GCS_BUCKET")));
    }

    #[test]
    fn malformed_window_is_rejected() {
        let mut vars = base_vars();
        vars.insert("WINDOW_SECS", "a week");

        let err = Config::from_lookup(lookup(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "WINDOW_SECS", .. }));
    }

    #[test]
    fn zero_size_window_is_rejected() {
        let mut vars = base_vars();
        vars.insert("WINDOW_SECS", "0");

        let err = Config::from_lookup(lookup(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "WINDOW_SECS", .. }));
    }

    #[test]
    fn negative_offset_is_rejected() {
        let mut vars = base_vars();
        vars.insert("WINDOW_OFFSET_SECS", "-60");

        let err = Config::from_lookup(lookup(vars)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "WINDOW_OFFSET_SECS",
                ..
            }
        ));
    }
}
