//! # Describe Subcommand
//!
//! Publication step for clients: records where a registry is served and
//! what it offers.
//!
//! Writes two files into the output directory:
//!
//! - `CredentialRegistry-address.json`: `{"address", "administrator"}`.
//! - `CredentialRegistry.json`: interface descriptor listing every
//!   operation with its HTTP route, and the event names.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use credreg_core::Identity;
use credreg_registry::RegistryEvent;

use crate::REGISTRY_NAME;

/// Arguments for `credreg describe`.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Base URL the registry is served at.
    #[arg(long)]
    pub endpoint: String,

    /// Administrator identity the registry was started with.
    #[arg(long, env = "REGISTRY_ADMIN")]
    pub admin: Identity,

    /// Directory to write the artifacts into. Created if missing.
    #[arg(long, short, default_value = ".")]
    pub output_dir: PathBuf,
}

/// Contents of `CredentialRegistry-address.json`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressFile {
    pub address: String,
    pub administrator: Identity,
}

/// Contents of `CredentialRegistry.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub version: String,
    pub operations: Vec<OperationDescriptor>,
    pub events: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub name: String,
    pub method: String,
    pub path: String,
    /// Role the caller must hold; `None` for public reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<String>,
}

/// (name, method, path, required role)
const OPERATIONS: &[(&str, &str, &str, Option<&str>)] = &[
    ("summary", "GET", "/v1/registry", None),
    ("transferAdministration", "PUT", "/v1/registry/administrator", Some("administrator")),
    ("issuers", "GET", "/v1/issuers", None),
    ("addIssuer", "POST", "/v1/issuers", Some("administrator")),
    ("isAuthorizedIssuer", "GET", "/v1/issuers/{identity}", None),
    ("removeIssuer", "DELETE", "/v1/issuers/{identity}", Some("administrator")),
    ("issueCredential", "POST", "/v1/credentials", Some("issuer")),
    ("getCredentialById", "GET", "/v1/credentials/{id}", None),
    ("revokeCredential", "POST", "/v1/credentials/{id}/revoke", Some("original issuer")),
    ("verifyCredential", "GET", "/v1/credentials/{id}/verify", None),
    ("getCredentialsOf", "GET", "/v1/holders/{identity}/credentials", None),
    ("eventsSince", "GET", "/v1/events", None),
];

pub fn interface_descriptor() -> InterfaceDescriptor {
    InterfaceDescriptor {
        name: REGISTRY_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        operations: OPERATIONS
            .iter()
            .map(|(name, method, path, requires)| OperationDescriptor {
                name: name.to_string(),
                method: method.to_string(),
                path: path.to_string(),
                requires: requires.map(str::to_string),
            })
            .collect(),
        events: RegistryEvent::NAMES.iter().map(|n| n.to_string()).collect(),
    }
}

/// Execute `credreg describe`.
pub fn run_describe(args: &DescribeArgs) -> Result<u8> {
    let address = write_artifacts(&args.endpoint, args.admin, &args.output_dir)?;
    println!("{REGISTRY_NAME} published at: {address}");
    Ok(0)
}

/// Write both artifacts and return the normalized address.
fn write_artifacts(endpoint: &str, administrator: Identity, output_dir: &Path) -> Result<String> {
    let address = endpoint.trim().trim_end_matches('/').to_string();
    if !(address.starts_with("http://") || address.starts_with("https://")) {
        bail!("endpoint must be an http:// or https:// URL, got {endpoint:?}");
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let address_file = AddressFile {
        address: address.clone(),
        administrator,
    };
    write_json(
        &output_dir.join(format!("{REGISTRY_NAME}-address.json")),
        &address_file,
    )?;
    write_json(
        &output_dir.join(format!("{REGISTRY_NAME}.json")),
        &interface_descriptor(),
    )?;

    tracing::info!(%address, %administrator, dir = %output_dir.display(), "wrote registry artifacts");
    Ok(address)
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
