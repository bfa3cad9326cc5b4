//! Locations of the register collections and the admin identity.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::io::CsvStore;
use crate::reference::ReferenceTables;
use crate::register::Status;

/// Environment variable holding the admin user name.
pub const ADMIN_USERNAME_VAR: &str = "PCODES_ADMIN_USERNAME";
/// Environment variable holding the admin password.
pub const ADMIN_PASSWORD_VAR: &str = "PCODES_ADMIN_PASSWORD";

/// Where the dataset, staging and rejected tables live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    /// The authoritative village register.
    pub dataset: PathBuf,
    /// Records awaiting approval.
    pub staging: PathBuf,
    /// Records an admin rejected.
    pub rejected: PathBuf,
    /// Optional reference tables (JSON); the built-in provinces apply without it.
    pub reference: Option<PathBuf>,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/village_masterlist.csv"),
            staging: PathBuf::from("pending_villages.csv"),
            rejected: PathBuf::from("rejected_villages.csv"),
            reference: None,
        }
    }
}

impl RegisterConfig {
    /// Reads a JSON config file; fields it leaves out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// The config file at `path` if given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset = path.into();
        self
    }

    pub fn with_staging(mut self, path: impl Into<PathBuf>) -> Self {
        self.staging = path.into();
        self
    }

    pub fn with_rejected(mut self, path: impl Into<PathBuf>) -> Self {
        self.rejected = path.into();
        self
    }

    pub fn with_reference(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference = Some(path.into());
        self
    }

    pub fn dataset_store(&self) -> CsvStore { CsvStore::new(&self.dataset) }

    /// Rows of a staging table without a `status` column are pending.
    pub fn staging_store(&self) -> CsvStore {
        CsvStore::optional(&self.staging).with_legacy_status(Status::Pending)
    }

    pub fn rejected_store(&self) -> CsvStore {
        CsvStore::optional(&self.rejected).with_legacy_status(Status::Rejected)
    }

    /// The configured reference tables, or the built-in ones.
    pub fn reference_tables(&self) -> Result<ReferenceTables> {
        match &self.reference {
            Some(path) => ReferenceTables::from_json_file(path),
            None => Ok(ReferenceTables::builtin()),
        }
    }
}

/// Admin credentials, required before staged records are approved or rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminIdentity").field("username", &self.username).finish_non_exhaustive()
    }
}

impl AdminIdentity {
    pub fn new(username: &str, password: &str) -> Self {
        Self { username: username.to_string(), password: password.to_string() }
    }

    /// Reads the identity from [`ADMIN_USERNAME_VAR`] and [`ADMIN_PASSWORD_VAR`].
    pub fn from_env() -> Option<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(get_env: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = get_env(ADMIN_USERNAME_VAR).filter(|v| !v.is_empty())?;
        let password = get_env(ADMIN_PASSWORD_VAR).filter(|v| !v.is_empty())?;
        Some(Self { username, password })
    }

    pub fn username(&self) -> &str { &self.username }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
