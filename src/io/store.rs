use std::path::{Path, PathBuf};

use anyhow::Result;

use super::csv::{read_register, write_register};
use crate::register::{Register, Status};

/// Read access to one register collection (dataset, staging or rejected).
pub trait TableSource: Send + Sync {
    fn load(&self) -> Result<Register>;
}

/// Write access to one register collection. The whole table is replaced.
pub trait TableSink: Send + Sync {
    fn save(&mut self, register: &Register) -> Result<()>;
}

/// A collection kept in a CSV file.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    optional: bool,
    legacy_status: Status,
}

impl CsvStore {
    /// A store whose file must exist when loaded.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), optional: false, legacy_status: Status::Active }
    }

    /// A store whose missing file loads as an empty register.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self { optional: true, ..Self::new(path) }
    }

    /// Status given to rows of a table written without a `status` column
    /// when their remarks do not name one.
    pub fn with_legacy_status(mut self, status: Status) -> Self {
        self.legacy_status = status;
        self
    }

    pub fn path(&self) -> &Path { &self.path }
}

impl TableSource for CsvStore {
    fn load(&self) -> Result<Register> {
        if self.optional && !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no table yet, starting empty");
            return Ok(Register::new());
        }
        read_register(&self.path, self.legacy_status)
    }
}

impl TableSink for CsvStore {
    fn save(&mut self, register: &Register) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        write_register(register, &self.path)?;
        tracing::info!(path = %self.path.display(), rows = register.len(), "saved table");
        Ok(())
    }
}

/// A collection held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemStore {
    register: Register,
}

impl MemStore {
    pub fn new(register: Register) -> Self { Self { register } }

    pub fn register(&self) -> &Register { &self.register }
}

impl TableSource for MemStore {
    fn load(&self) -> Result<Register> { Ok(self.register.clone()) }
}

impl TableSink for MemStore {
    fn save(&mut self, register: &Register) -> Result<()> {
        self.register = register.clone();
        Ok(())
    }
}
