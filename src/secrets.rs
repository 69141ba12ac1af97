// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Secret resolution for runtime credentials.
//!
//! The pipeline never holds the Strava client secret or refresh token in its
//! configuration; it holds *references* and resolves them at the start of
//! each run through a [`SecretSource`]. Production uses Secret Manager volume
//! mounts, so the reference is a local file path and the value is the file's
//! first line.

use crate::config::ConfigError;
use std::collections::HashMap;

/// Capability interface for resolving a secret reference to its value.
pub trait SecretSource: Send + Sync {
    /// Resolve `reference` to the secret value.
    fn read(&self, reference: &str) -> Result<String, ConfigError>;
}

/// Reads secrets from locally mounted files (Secret Manager volume mounts).
///
/// Only the first line of the file is the secret; surrounding whitespace is
/// trimmed so a trailing newline in the mount never leaks into a form-encoded
/// credential.
#[derive(Debug, Clone, Default)]
pub struct MountedSecretSource;

impl SecretSource for MountedSecretSource {
    fn read(&self, reference: &str) -> Result<String, ConfigError> {
        let contents = std::fs::read_to_string(reference).map_err(|e| ConfigError::Secret {
            reference: reference.to_string(),
            message: e.to_string(),
        })?;

        let value = contents.lines().next().unwrap_or("").trim();
        if value.is_empty() {
            return Err(ConfigError::Secret {
                reference: reference.to_string(),
                message: "secret file is empty".to_string(),
            });
        }
        Ok(value.to_string())
    }
}

/// In-memory secret source for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretSource {
    values: HashMap<String, String>,
}

impl MemorySecretSource {
    pub fn new(values: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SecretSource for MemorySecretSource {
    fn read(&self, reference: &str) -> Result<String, ConfigError> {
        self.values
            .get(reference)
            .cloned()
            .ok_or_else(|| ConfigError::Secret {
                reference: reference.to_string(),
                message: "no such secret".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mounted_source_reads_first_line_trimmed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "s3cr3t-value").unwrap();
        writeln!(file, "trailing garbage").unwrap();

        let source = MountedSecretSource;
        let value = source.read(file.path().to_str().unwrap()).unwrap();

        assert_eq!(value, "s3cr3t-value");
    }

    #[test]
    fn mounted_source_missing_file_is_config_error() {
        let source = MountedSecretSource;
        let err = source.read("/nonexistent/secret").unwrap_err();

        assert!(matches!(err, ConfigError::Secret { .. }));
    }

    #[test]
    fn mounted_source_rejects_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let source = MountedSecretSource;
        let err = source.read(file.path().to_str().unwrap()).unwrap_err();

        assert!(matches!(err, ConfigError::Secret { .. }));
    }

    #[test]
    fn memory_source_round_trips() {
        let source = MemorySecretSource::new([("client_secret", "abc")]);

        assert_eq!(source.read("client_secret").unwrap(), "abc");
        assert!(source.read("unknown").is_err());
    }
}
