use crate::error::{Error, Result};
use crate::serde::{ClassRef, LONG_STRING_MARKER, MAX_CLASS_NAME};
use std::collections::HashMap;
use std::io::ErrorKind;

/// A growable, in-memory writer.
///
/// The first failure is kept. Every later write returns a clone of it and
/// leaves the bytes untouched.
#[derive(Default, Debug)]
pub struct WBuffer {
    w: Vec<u8>,
    err: Option<Error>,
    pub(crate) class_refs: HashMap<&'static str, ClassRef>,
}

impl WBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            w: Vec::with_capacity(cap),
            ..Self::default()
        }
    }

    pub fn pos(&self) -> u64 {
        self.w.len() as u64
    }

    pub fn bytes(&self) -> &[u8] {
        &self.w
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.w
    }

    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Fails with the sticky error, if any.
    pub fn check(&self) -> Result<()> {
        match &self.err {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Records `err` unless an earlier error is already recorded.
    /// Returns whichever error is now sticky.
    pub fn fail(&mut self, err: Error) -> Error {
        self.err.get_or_insert(err).clone()
    }

    fn put(&mut self, buf: &[u8]) -> Result<()> {
        self.check()?;
        self.w.extend_from_slice(buf);
        Ok(())
    }

    /// Writes `buf` as is, with no length prefix.
    pub fn write_raw(&mut self, buf: &[u8]) -> Result<()> {
        self.put(buf)
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.put(&v.to_be_bytes())
    }
    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        self.put(&v.to_be_bytes())
    }
    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u8(u8::from(v))
    }
    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.put(&v.to_be_bytes())
    }
    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        self.put(&v.to_be_bytes())
    }
    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.put(&v.to_be_bytes())
    }
    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        self.put(&v.to_be_bytes())
    }
    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.put(&v.to_be_bytes())
    }
    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        self.put(&v.to_be_bytes())
    }
    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        self.put(&v.to_be_bytes())
    }

    /// Writes an element count as the `i32` the format uses for counts.
    pub fn write_count(&mut self, n: usize) -> Result<()> {
        self.check()?;
        match i32::try_from(n) {
            Ok(n) => self.write_i32(n),
            Err(_) => Err(self.fail(Error::stream(
                self.pos(),
                ErrorKind::InvalidInput,
                format!("count {n} does not fit an i32"),
            ))),
        }
    }

    pub fn write_string(&mut self, s: &str) -> Result<()> {
        self.check()?;
        let buf = s.as_bytes();
        if buf.len() < LONG_STRING_MARKER as usize {
            self.write_u8(buf.len() as u8)?;
        } else {
            let len = match u32::try_from(buf.len()) {
                Ok(len) => len,
                Err(_) => {
                    return Err(self.fail(Error::stream(
                        self.pos(),
                        ErrorKind::InvalidInput,
                        format!("string of {} bytes is too long", buf.len()),
                    )))
                }
            };
            self.write_u8(LONG_STRING_MARKER)?;
            self.write_u32(len)?;
        }
        self.put(buf)
    }

    /// Writes a NUL-terminated class name.
    pub fn write_cstring(&mut self, s: &str) -> Result<()> {
        self.check()?;
        if s.len() >= MAX_CLASS_NAME || s.as_bytes().contains(&0) {
            return Err(self.fail(Error::stream(
                self.pos(),
                ErrorKind::InvalidInput,
                format!("invalid class name {s:?}"),
            )));
        }
        self.put(s.as_bytes())?;
        self.write_u8(0)
    }

    pub fn write_fast_array_f64(&mut self, vs: &[f64]) -> Result<()> {
        self.check()?;
        for v in vs {
            self.w.extend_from_slice(&v.to_be_bytes());
        }
        Ok(())
    }

    pub fn write_fast_array_i64(&mut self, vs: &[i64]) -> Result<()> {
        self.check()?;
        for v in vs {
            self.w.extend_from_slice(&v.to_be_bytes());
        }
        Ok(())
    }

    /// Overwrites four already-written bytes at `pos`.
    pub(crate) fn patch_u32(&mut self, pos: u64, v: u32) -> Result<()> {
        self.check()?;
        let beg = pos as usize;
        match self.w.get_mut(beg..beg + 4) {
            Some(dst) => {
                dst.copy_from_slice(&v.to_be_bytes());
                Ok(())
            }
            None => Err(self.fail(Error::stream(
                pos,
                ErrorKind::InvalidInput,
                "patch position past the end of the buffer",
            ))),
        }
    }
}
