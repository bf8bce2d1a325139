// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{ContactFieldSet, ContactFields};

/// Persistent bridge settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Name given to the thread that settles host promises.
    pub resolver_thread_name: String,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Artificial latency (milliseconds) added to every in-memory store query.
    pub query_delay_ms: u64,
    /// Fields requested when the caller names none. `None` means every field.
    pub default_fields: Option<Vec<ContactFields>>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            resolver_thread_name: "rolodex-resolver".into(),
            log_filter: "info".into(),
            query_delay_ms: 0,
            default_fields: None,
        }
    }
}

impl BridgeConfig {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        info!(path = %path.display(), "bridge config loaded");
        Ok(config)
    }

    /// Selector used when the caller did not choose fields explicitly.
    pub fn default_selection(&self) -> ContactFieldSet {
        match &self.default_fields {
            Some(fields) => fields.iter().copied().collect(),
            None => ContactFieldSet::all(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BridgeConfig::load(dir.path().join("rolodex.json")).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolodex.json");
        std::fs::write(&path, r#"{ "query_delay_ms": 25 }"#).unwrap();

        let config = BridgeConfig::load(&path).unwrap();
        assert_eq!(config.query_delay_ms, 25);
        assert_eq!(config.resolver_thread_name, "rolodex-resolver");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolodex.json");
        let config = BridgeConfig {
            log_filter: "debug".into(),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(BridgeConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn default_fields_use_upper_case_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolodex.json");
        std::fs::write(&path, r#"{ "default_fields": ["PHONE_NUMBERS", "FIRST_NAME"] }"#).unwrap();

        let config = BridgeConfig::load(&path).unwrap();
        let expected: ContactFieldSet = [ContactFields::FirstName, ContactFields::PhoneNumbers]
            .into_iter()
            .collect();
        assert_eq!(config.default_selection(), expected);
        assert_eq!(BridgeConfig::default().default_selection(), ContactFieldSet::all());
    }

    #[test]
    fn unknown_default_field_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolodex.json");
        std::fs::write(&path, r#"{ "default_fields": ["NICKNAME"] }"#).unwrap();
        assert_eq!(BridgeConfig::load(&path).unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rolodex.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = BridgeConfig::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
