use crate::fs_utils;
use crate::layout::{self, KeyRecord};
use anyhow::{anyhow, Context, Result};
use ocdb_types::serde::WBuffer;
use ocdb_types::types::Object;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A container being written. Holds an exclusive lock.
///
/// Records are buffered in memory; nothing reaches the file until [`OcdbWriter::close`].
pub struct OcdbWriter {
    path: PathBuf,
    file: File,
    keys: Vec<KeyRecord>,
}

impl OcdbWriter {
    /// Truncates an existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs_utils::lock_file_exclusive(&path)?;
        Ok(Self {
            path,
            file,
            keys: vec![],
        })
    }

    pub fn put(&mut self, name: &str, obj: &dyn Object) -> Result<()> {
        let mut w = WBuffer::new();
        obj.marshal(&mut w)
            .with_context(|| format!("encode {name:?} ({})", obj.class()))?;
        self.put_bytes(name, obj.class(), w.into_bytes())
    }

    /// Stores an already encoded record under `name`.
    pub fn put_bytes(&mut self, name: &str, class: &str, record: Vec<u8>) -> Result<()> {
        if self.keys.iter().any(|key| key.name == name) {
            return Err(anyhow!("Duplicate key {name:?} in {:?}", self.path));
        }
        tracing::debug!(name, class, len = record.len(), "put record");
        self.keys.push(KeyRecord {
            name: name.to_owned(),
            class: class.to_owned(),
            record,
        });
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        let buf = layout::encode(&self.keys).with_context(|| format!("encode {:?}", self.path))?;
        fs_utils::write_all_and_sync(&self.file, &buf, &self.path)?;
        fs_utils::unlock_file(&self.file, &self.path)?;
        tracing::info!(path = ?self.path, keys = self.keys.len(), "wrote container");
        Ok(())
    }
}
