// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rolodex — contacts bridge command-line front end.
//
// Entry point. Loads config, initialises logging, wraps a contacts fixture in
// the hybrid module, and issues `getAll` through the host-facing method table.

mod paths;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use rolodex_bridge::hybrid::settle;
use rolodex_bridge::{HybridContactsModule, InMemoryContactStore, ToHost};
use rolodex_core::{BridgeConfig, ContactFieldSet, ContactFields, Result};

#[derive(Debug, Parser)]
#[command(name = "rolodex", version, about = "Query a contacts fixture through the Rolodex bridge")]
struct Cli {
    /// Contacts fixture: a JSON array of host-shaped contact records
    fixture: PathBuf,
    /// Fields to request (e.g. PHONE_NUMBERS,EMAIL_ADDRESSES); the config's
    /// `default_fields` if omitted
    #[arg(long = "field", short = 'f', value_delimiter = ',')]
    fields: Vec<ContactFields>,
    /// Request no fields at all (one bare record per contact)
    #[arg(long, conflicts_with = "fields")]
    no_fields: bool,
    /// Bridge config file (default: $XDG_CONFIG_HOME/rolodex/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulate the user denying contacts permission
    #[arg(long)]
    deny_access: bool,
    /// Also report the module's external memory estimate
    #[arg(long)]
    memory: bool,
}

impl Cli {
    fn keys(&self, config: &BridgeConfig) -> ContactFieldSet {
        if self.no_fields {
            ContactFieldSet::empty()
        } else if self.fields.is_empty() {
            config.default_selection()
        } else {
            self.fields.iter().copied().collect()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(paths::config_path);
    let config = match BridgeConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("rolodex: cannot load config {}: {e}", config_path.display());
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Rolodex starting");

    match run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, kind = ?e.kind(), "query failed");
            eprintln!("rolodex: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, config: &BridgeConfig) -> Result<()> {
    let store = InMemoryContactStore::from_fixture(&cli.fixture)?
        .with_query_delay(Duration::from_millis(config.query_delay_ms));
    if cli.deny_access {
        store.set_access_granted(false);
    }

    let module = HybridContactsModule::new(store, config)?;
    let keys = cli.keys(config);
    tracing::info!(?keys, "requesting contacts");

    let contacts = settle(module.call("getAll", &[keys.to_host()])).await?;
    println!("{}", serde_json::to_string_pretty(&contacts)?);

    if cli.memory {
        let bytes = settle(module.call("getExternalMemorySize", &[])).await?;
        tracing::info!(%bytes, "external memory estimate");
        eprintln!("external memory: {bytes} bytes");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_accept_names_and_commas() {
        let cli = Cli::try_parse_from([
            "rolodex",
            "contacts.json",
            "--field",
            "PHONE_NUMBERS,emailAddresses",
            "-f",
            "first_name",
        ])
        .unwrap();
        let expected: ContactFieldSet = [
            ContactFields::FirstName,
            ContactFields::PhoneNumbers,
            ContactFields::EmailAddresses,
        ]
        .into_iter()
        .collect();
        assert_eq!(cli.keys(&BridgeConfig::default()), expected);
    }

    #[test]
    fn no_fields_means_all_fields() {
        let cli = Cli::try_parse_from(["rolodex", "contacts.json"]).unwrap();
        assert_eq!(cli.keys(&BridgeConfig::default()), ContactFieldSet::all());
    }

    #[test]
    fn config_default_fields_apply_when_none_given() {
        let config = BridgeConfig {
            default_fields: Some(vec![ContactFields::EmailAddresses]),
            ..Default::default()
        };
        let cli = Cli::try_parse_from(["rolodex", "contacts.json"]).unwrap();
        assert_eq!(
            cli.keys(&config),
            [ContactFields::EmailAddresses].into_iter().collect::<ContactFieldSet>()
        );

        let cli = Cli::try_parse_from(["rolodex", "contacts.json", "-f", "LAST_NAME"]).unwrap();
        assert_eq!(
            cli.keys(&config),
            [ContactFields::LastName].into_iter().collect::<ContactFieldSet>()
        );
    }

    #[test]
    fn explicit_empty_selection() {
        let cli = Cli::try_parse_from(["rolodex", "contacts.json", "--no-fields"]).unwrap();
        assert!(cli.keys(&BridgeConfig::default()).is_empty());
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(Cli::try_parse_from(["rolodex", "contacts.json", "-f", "NICKNAME"]).is_err());
    }

    #[tokio::test]
    async fn run_reads_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("contacts.json");
        std::fs::write(
            &fixture,
            r#"[{ "firstName": "Ada", "phoneNumbers": [{ "value": "555-0100" }] }]"#,
        )
        .unwrap();

        let fixture = fixture.to_str().unwrap();

        let cli = Cli::try_parse_from(["rolodex", fixture, "-f", "PHONE_NUMBERS"]).unwrap();
        run(&cli, &BridgeConfig::default()).await.unwrap();
    }

    #[tokio::test]
    async fn denied_access_fails_run() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("contacts.json");
        std::fs::write(&fixture, "[]").unwrap();

        let fixture = fixture.to_str().unwrap();

        let cli = Cli::try_parse_from(["rolodex", fixture, "--deny-access"]).unwrap();
        let err = run(&cli, &BridgeConfig::default()).await.unwrap_err();
        assert_eq!(err.kind(), rolodex_core::ErrorKind::PlatformQuery);
    }
}
