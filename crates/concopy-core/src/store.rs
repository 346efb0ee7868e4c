//! JSON-file persistence for copy functions
//!
//! The store holds the whole collection in memory; mutations take effect on
//! disk only after [`FunctionStore::save`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::SettingsConfig;
use crate::error::{ConcopyError, Result};
use crate::function::CopyFunction;

/// Store file schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageData {
    #[serde(default)]
    pub functions: Vec<CopyFunction>,
    #[serde(default)]
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone)]
pub struct FunctionStore {
    path: PathBuf,
    data: StorageData,
}

/// Current time as epoch milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

impl FunctionStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no store file, starting empty");
            return Ok(Self {
                path,
                data: StorageData::default(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConcopyError::StoreReadError {
            path: path.clone(),
            reason: format!("Failed to read: {}", e),
        })?;
        let data = serde_json::from_str(&content).map_err(|e| ConcopyError::StoreReadError {
            path: path.clone(),
            reason: format!("Failed to parse: {}", e),
        })?;

        Ok(Self { path, data })
    }

    /// Write the store atomically
    pub fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.data).map_err(|e| self.write_error("serialize", e))?;
        atomic_write(&self.path, &content).map_err(|e| self.write_error("write", e))?;
        tracing::debug!(path = %self.path.display(), count = self.data.functions.len(), "store saved");
        Ok(())
    }

    fn write_error(&self, step: &str, err: impl std::fmt::Display) -> ConcopyError {
        ConcopyError::StoreWriteError {
            path: self.path.clone(),
            reason: format!("Failed to {}: {}", step, err),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &StorageData {
        &self.data
    }

    pub fn settings(&self) -> SettingsConfig {
        self.data.settings
    }

    pub fn set_settings(&mut self, settings: SettingsConfig) {
        self.data.settings = settings;
    }

    /// Functions in display order
    pub fn functions(&self) -> &[CopyFunction] {
        &self.data.functions
    }

    pub fn get(&self, id: &str) -> Option<&CopyFunction> {
        self.data.functions.iter().find(|f| f.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.data.functions.iter().position(|f| f.id == id)
    }

    /// Append a function, stamping both timestamps
    pub fn add(&mut self, mut func: CopyFunction) {
        let now = now_ms();
        func.created_at = now;
        func.updated_at = now;
        self.data.functions.push(func);
    }

    /// Replace the function with the same id, or append it
    pub fn save_function(&mut self, mut func: CopyFunction) {
        match self.position(&func.id) {
            Some(index) => {
                func.updated_at = now_ms();
                self.data.functions[index] = func;
            }
            None => self.add(func),
        }
    }

    /// Replace an existing function
    pub fn update(&mut self, mut func: CopyFunction) -> Result<()> {
        let index = self
            .position(&func.id)
            .ok_or_else(|| ConcopyError::FunctionNotFound(func.id.clone()))?;
        func.updated_at = now_ms();
        self.data.functions[index] = func;
        Ok(())
    }

    /// Remove a function; returns whether it existed
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.data.functions.len();
        self.data.functions.retain(|f| f.id != id);
        self.data.functions.len() != before
    }

    /// Move the listed ids to the front, in order; others keep their order after them
    pub fn reorder<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<()> {
        let mut rest = std::mem::take(&mut self.data.functions);
        let mut ordered = Vec::with_capacity(rest.len());

        for id in ids {
            let id = id.as_ref();
            match rest.iter().position(|f| f.id == id) {
                Some(index) => ordered.push(rest.remove(index)),
                None => {
                    ordered.append(&mut rest);
                    self.data.functions = ordered;
                    return Err(ConcopyError::FunctionNotFound(id.to_string()));
                }
            }
        }

        ordered.append(&mut rest);
        self.data.functions = ordered;
        Ok(())
    }

    /// Append copies of `functions` under fresh ids; returns the new ids
    pub fn import_functions(&mut self, functions: Vec<CopyFunction>) -> Vec<String> {
        functions
            .into_iter()
            .map(|mut func| {
                func.id = uuid::Uuid::new_v4().to_string();
                let id = func.id.clone();
                self.add(func);
                id
            })
            .collect()
    }

    pub fn export_functions(&self) -> Vec<CopyFunction> {
        self.data.functions.clone()
    }
}

/// Write via a temp file in the same directory, then persist over `path`
fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}
