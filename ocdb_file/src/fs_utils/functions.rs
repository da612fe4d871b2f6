use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

pub fn create_dir_all<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).with_context(|| format!("create_dir_all {path:?}"))
}

pub fn open_file<P: AsRef<Path>>(path: P, oo: &OpenOptions) -> Result<File> {
    let path = path.as_ref();
    oo.open(path).with_context(|| format!("open {path:?}"))
}

/// Opens `path` for reading, holding a shared advisory lock.
pub fn lock_file_shared<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    let file = open_file(path, OpenOptions::new().read(true))?;
    FileExt::try_lock_shared(&file).with_context(|| format!("try_lock_shared {path:?}"))?;
    Ok(file)
}

/// Opens `path` for writing, creating it if needed, holding an exclusive advisory lock.
/// The file is truncated only once the lock is held.
pub fn lock_file_exclusive<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    let file = open_file(path, OpenOptions::new().write(true).create(true).truncate(false))?;
    file.try_lock_exclusive()
        .with_context(|| format!("try_lock_exclusive {path:?}"))?;
    file.set_len(0).with_context(|| format!("set_len {path:?}"))?;
    Ok(file)
}

pub fn unlock_file<P: AsRef<Path>>(file: &File, implicit_path: P) -> Result<()> {
    FileExt::unlock(file).with_context(|| format!("unlock {:?}", implicit_path.as_ref()))
}

pub fn read_all<P: AsRef<Path>>(mut file: &File, implicit_path: P) -> Result<Vec<u8>> {
    let mut buf = vec![];
    file.read_to_end(&mut buf)
        .with_context(|| format!("read {:?}", implicit_path.as_ref()))?;
    Ok(buf)
}

pub fn write_all_and_sync<P: AsRef<Path>>(
    mut file: &File,
    buf: &[u8],
    implicit_path: P,
) -> Result<()> {
    let path = implicit_path.as_ref();
    file.write_all(buf).with_context(|| format!("write {path:?}"))?;
    file.flush().with_context(|| format!("flush {path:?}"))?;
    file.sync_all().with_context(|| format!("sync_all {path:?}"))
}

pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::remove_file(path).with_context(|| format!("remove_file {path:?}"))
}
