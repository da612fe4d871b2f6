//! ```text
//! struct Container {
//!     magic:          [u8; 4],                    // b"ocdb"
//!     version:        u32,                        // LAYOUT_VERSION
//!     key_count:      u32,
//!     keys:           [Key; key_count],
//! }
//!
//! struct Key {
//!     name:           String,
//!     class:          String,                     // class tag of the record's object
//!     record_len:     u32,
//!     record:         [u8; record_len],           // the object's frame
//! }
//! ```
//!
//! Strings are encoded the way the record protocol encodes them.

use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::{Error, Result};
use std::io::ErrorKind;

pub const MAGIC: [u8; 4] = *b"ocdb";
pub const LAYOUT_VERSION: u32 = 1;

const CONTAINER: &str = "ocdb container";

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct KeyRecord {
    pub name: String,
    pub class: String,
    pub record: Vec<u8>,
}

fn write_len(w: &mut WBuffer, len: usize) -> Result<()> {
    match u32::try_from(len) {
        Ok(len) => w.write_u32(len),
        Err(_) => Err(w.fail(Error::stream(
            w.pos(),
            ErrorKind::InvalidInput,
            format!("length {len} does not fit a u32"),
        ))),
    }
}

pub fn encode(keys: &[KeyRecord]) -> Result<Vec<u8>> {
    let mut w = WBuffer::new();
    w.write_u32(u32::from_be_bytes(MAGIC))?;
    w.write_u32(LAYOUT_VERSION)?;
    write_len(&mut w, keys.len())?;
    for key in keys {
        w.write_string(&key.name)?;
        w.write_string(&key.class)?;
        write_len(&mut w, key.record.len())?;
        w.write_raw(&key.record)?;
    }
    Ok(w.into_bytes())
}

pub fn decode(buf: &[u8]) -> Result<Vec<KeyRecord>> {
    let mut r = RBuffer::new(buf);
    let magic = r.read_u32()?;
    if magic != u32::from_be_bytes(MAGIC) {
        return Err(r.fail(Error::malformed(
            CONTAINER,
            format!("bad magic {:?}", magic.to_be_bytes()),
        )));
    }
    let version = r.read_u32()?;
    if version != LAYOUT_VERSION {
        return Err(r.fail(Error::malformed(
            CONTAINER,
            format!("unsupported layout version {version}"),
        )));
    }

    let n = r.read_u32()?;
    let mut keys = vec![];
    for _ in 0..n {
        let name = r.read_string()?;
        let class = r.read_string()?;
        let len = r.read_u32()? as usize;
        let record = r.read_raw(len)?.to_vec();
        keys.push(KeyRecord {
            name,
            class,
            record,
        });
    }

    if r.remaining() != 0 {
        return Err(r.fail(Error::malformed(
            CONTAINER,
            format!("{} trailing bytes", r.remaining()),
        )));
    }
    Ok(keys)
}
