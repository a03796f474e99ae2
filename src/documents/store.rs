//! Whole-file JSON documents with atomic rename-on-write
//!
//! Each document is a single file holding one named top-level array:
//! ```text
//! <data_dir>/knowledge_base.json
//! {
//!   "entries": [ { ... }, { ... } ]
//! }
//! ```

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Typed handle on one JSON document
pub struct JsonDocument<R> {
    path: PathBuf,
    key: &'static str,
    /// Serializes read-modify-write cycles within the process
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonDocument<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Create a handle for `file_name` inside `dir`, holding records under `key`
    pub fn new(dir: &Path, file_name: &str, key: &'static str) -> Self {
        Self {
            path: dir.join(file_name),
            key,
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Top-level array key
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Load all records, treating an absent file as empty
    pub async fn load(&self) -> Result<Vec<R>> {
        Ok(self.load_existing().await?.unwrap_or_default())
    }

    /// Load all records, or `None` when the file does not exist
    pub async fn load_existing(&self) -> Result<Option<Vec<R>>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut doc: serde_json::Value = serde_json::from_str(&raw)?;
        let records = match doc.get_mut(self.key) {
            Some(value) => serde_json::from_value(value.take())?,
            None => Vec::new(),
        };
        Ok(Some(records))
    }

    /// Number of records without decoding them; absent file counts as zero
    pub async fn count(&self) -> Result<usize> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let doc: serde_json::Value = serde_json::from_str(&raw)?;
        Ok(doc
            .get(self.key)
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0))
    }

    /// Append a record and return its 1-based position
    pub async fn append(&self, record: R) -> Result<usize> {
        self.update(|records| {
            records.push(record);
            (records.len(), true)
        })
        .await
    }

    /// Read-modify-write under the document lock.
    ///
    /// The closure returns its result plus whether the document must be
    /// written back. Nothing is written when it returns `false`.
    pub async fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<R>) -> (T, bool),
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let (out, dirty) = f(&mut records);
        if dirty {
            self.write(&records).await?;
        }
        Ok(out)
    }

    /// Same as [`update`](Self::update), but returns `None` without calling
    /// `f` when the file does not exist
    pub async fn update_existing<T, F>(&self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Vec<R>) -> (T, bool),
    {
        let _guard = self.write_lock.lock().await;
        let Some(mut records) = self.load_existing().await? else {
            return Ok(None);
        };
        let (out, dirty) = f(&mut records);
        if dirty {
            self.write(&records).await?;
        }
        Ok(Some(out))
    }

    /// Records matching `predicate`
    pub async fn query<P>(&self, predicate: P) -> Result<Vec<R>>
    where
        P: Fn(&R) -> bool,
    {
        Ok(self
            .load()
            .await?
            .into_iter()
            .filter(|r| predicate(r))
            .collect())
    }

    /// Write the whole document through a temp file and rename it into place
    async fn write(&self, records: &[R]) -> Result<()> {
        let mut doc = serde_json::Map::new();
        doc.insert(self.key.to_string(), serde_json::to_value(records)?);
        let json = serde_json::to_string_pretty(&serde_json::Value::Object(doc))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Storage(format!("Invalid path {}", self.path.display())))?;
        let tmp = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

        if let Err(e) = tokio::fs::write(&tmp, json).await {
            tracing::warn!("Failed to write {}: {}", tmp.display(), e);
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            tracing::warn!("Failed to replace {}: {}", self.path.display(), e);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}
