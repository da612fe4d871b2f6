use crate::fs_utils;
use crate::layout::{self, KeyRecord};
use anyhow::{anyhow, Context, Result};
use ocdb_types::serde::RBuffer;
use ocdb_types::types::{Factory, Object};
use std::any;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A container opened for reading. Holds a shared lock until closed or dropped.
pub struct OcdbFile {
    path: PathBuf,
    file: File,
    keys: Vec<KeyRecord>,
}

impl OcdbFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = fs_utils::lock_file_shared(&path)?;
        let buf = fs_utils::read_all(&file, &path)?;
        let keys = layout::decode(&buf).with_context(|| format!("decode {path:?}"))?;
        tracing::info!(?path, keys = keys.len(), "opened container");
        Ok(Self { path, file, keys })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// In storage order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|key| key.name.as_str())
    }

    fn key(&self, name: &str) -> Result<&KeyRecord> {
        self.keys
            .iter()
            .find(|key| key.name == name)
            .ok_or_else(|| anyhow!("No key {name:?} in {:?}", self.path))
    }

    /// The class tag stored with `name`.
    pub fn class_of(&self, name: &str) -> Result<&str> {
        Ok(self.key(name)?.class.as_str())
    }

    pub fn get_bytes(&self, name: &str) -> Result<&[u8]> {
        Ok(&self.key(name)?.record)
    }

    /// Constructs the record's class through the [`Factory`] and decodes the record into it.
    pub fn get(&self, name: &str) -> Result<Box<dyn Object>> {
        let key = self.key(name)?;
        let ctx = || format!("decode {name:?} ({}) in {:?}", key.class, self.path);

        let mut obj = Factory::construct(&key.class).with_context(ctx)?;
        let mut r = RBuffer::new(&key.record);
        obj.unmarshal(&mut r).with_context(ctx)?;
        if r.remaining() != 0 {
            return Err(anyhow!("{} trailing bytes", r.remaining()).context(ctx()));
        }
        tracing::debug!(name, class = %key.class, len = key.record.len(), "decoded record");
        Ok(obj)
    }

    pub fn get_as<T: Object>(&self, name: &str) -> Result<T> {
        let obj = self.get(name)?;
        let class = obj.class();
        match obj.into_any().downcast::<T>() {
            Ok(t) => Ok(*t),
            Err(_) => Err(anyhow!(
                "Key {name:?} holds a {class}, not a {}",
                any::type_name::<T>()
            )),
        }
    }

    pub fn close(self) -> Result<()> {
        fs_utils::unlock_file(&self.file, &self.path)?;
        tracing::info!(path = ?self.path, "closed container");
        Ok(())
    }
}
