use crate::error::{Error, Result};
use crate::serde::{ClassRef, BYTE_COUNT_LEN, LONG_STRING_MARKER};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::mem;
use std::str;

/// A frame whose header has been read but whose byte count is not verified yet.
#[derive(Debug)]
pub(crate) struct OpenFrame {
    pub(crate) class: String,
    pub(crate) start: u64,
    pub(crate) bcnt: u32,
}

/// A forward-only cursor over a borrowed record.
///
/// The first failure is kept. Every later read returns a clone of it without
/// moving the cursor.
#[derive(Debug)]
pub struct RBuffer<'a> {
    r: &'a [u8],
    c: usize,
    err: Option<Error>,
    pub(crate) frames: Vec<OpenFrame>,
    pub(crate) class_refs: HashMap<ClassRef, String>,
}

impl<'a> RBuffer<'a> {
    pub fn new(r: &'a [u8]) -> Self {
        Self {
            r,
            c: 0,
            err: None,
            frames: vec![],
            class_refs: HashMap::new(),
        }
    }

    pub fn pos(&self) -> u64 {
        self.c as u64
    }

    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn remaining(&self) -> usize {
        self.r.len() - self.c
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

    /// Bytes missing or unusable inside an open frame mean the frame lied about its
    /// length, so they are reported against the innermost frame.
    fn decode_failure(&mut self, kind: ErrorKind, msg: String) -> Error {
        let err = match self.frames.last() {
            Some(frame) => {
                tracing::debug!(class = %frame.class, pos = self.c, %msg, "decode failure inside frame");
                Error::Corruption {
                    class: frame.class.clone(),
                    expected: u64::from(frame.bcnt),
                    actual: (self.c as u64).saturating_sub(frame.start + BYTE_COUNT_LEN),
                }
            }
            None => Error::stream(self.c as u64, kind, msg),
        };
        self.fail(err)
    }

    pub(crate) fn set_pos(&mut self, pos: u64) -> Result<()> {
        self.check()?;
        if pos > self.r.len() as u64 {
            return Err(self.decode_failure(
                ErrorKind::UnexpectedEof,
                format!("seek to {pos} past the end of {} bytes", self.r.len()),
            ));
        }
        self.c = pos as usize;
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check()?;
        let r = self.r;
        let buf = self.c.checked_add(n).and_then(|end| r.get(self.c..end));
        match buf {
            Some(buf) => {
                self.c += n;
                Ok(buf)
            }
            None => Err(self.decode_failure(
                ErrorKind::UnexpectedEof,
                format!("need {n} bytes, {} remain", self.remaining()),
            )),
        }
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let buf = self.take(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(buf);
        Ok(arr)
    }

    /// Reads `n` bytes as is.
    pub fn read_raw(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.take_array().map(u8::from_be_bytes)
    }
    pub fn read_i8(&mut self) -> Result<i8> {
        self.take_array().map(i8::from_be_bytes)
    }
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }
    pub fn read_u16(&mut self) -> Result<u16> {
        self.take_array().map(u16::from_be_bytes)
    }
    pub fn read_i16(&mut self) -> Result<i16> {
        self.take_array().map(i16::from_be_bytes)
    }
    pub fn read_u32(&mut self) -> Result<u32> {
        self.take_array().map(u32::from_be_bytes)
    }
    pub fn read_i32(&mut self) -> Result<i32> {
        self.take_array().map(i32::from_be_bytes)
    }
    pub fn read_u64(&mut self) -> Result<u64> {
        self.take_array().map(u64::from_be_bytes)
    }
    pub fn read_i64(&mut self) -> Result<i64> {
        self.take_array().map(i64::from_be_bytes)
    }
    pub fn read_f64(&mut self) -> Result<f64> {
        self.take_array().map(f64::from_be_bytes)
    }

    /// Reads an `i32` element count.
    ///
    /// A negative count inside an open frame is corruption of the innermost frame;
    /// outside any frame it makes the record malformed.
    pub fn read_count(&mut self, class: &str) -> Result<usize> {
        let n = self.read_i32()?;
        match usize::try_from(n) {
            Ok(n) => Ok(n),
            Err(_) if !self.frames.is_empty() => Err(self.decode_failure(
                ErrorKind::InvalidData,
                format!("negative {class} element count {n}"),
            )),
            Err(_) => Err(self.fail(Error::malformed(
                class,
                format!("negative element count {n}"),
            ))),
        }
    }

    pub fn read_string(&mut self) -> Result<String> {
        let mut len = self.read_u8()? as usize;
        if len == LONG_STRING_MARKER as usize {
            len = self.read_u32()? as usize;
        }
        let buf = self.take(len)?;
        self.utf8(buf)
    }

    /// Reads a NUL-terminated class name of at most `max` bytes.
    pub fn read_cstring(&mut self, max: usize) -> Result<String> {
        self.check()?;
        let r = self.r;
        let rest = &r[self.c..];
        let window = &rest[..rest.len().min(max)];
        match window.iter().position(|b| *b == 0) {
            Some(nul) => {
                let buf = self.take(nul)?;
                self.skip(1)?;
                self.utf8(buf)
            }
            None => Err(self.decode_failure(
                ErrorKind::InvalidData,
                format!("no NUL within {max} bytes of a class name"),
            )),
        }
    }

    fn utf8(&mut self, buf: &[u8]) -> Result<String> {
        match str::from_utf8(buf) {
            Ok(s) => Ok(s.to_owned()),
            Err(e) => Err(self.decode_failure(ErrorKind::InvalidData, e.to_string())),
        }
    }

    pub fn read_fast_array_f64(&mut self, n: usize) -> Result<Vec<f64>> {
        let buf = self.take_elems(n, mem::size_of::<f64>())?;
        let vs = buf
            .chunks_exact(mem::size_of::<f64>())
            .map(|chunk| {
                let mut arr = [0u8; mem::size_of::<f64>()];
                arr.copy_from_slice(chunk);
                f64::from_be_bytes(arr)
            })
            .collect();
        Ok(vs)
    }

    pub fn read_fast_array_i64(&mut self, n: usize) -> Result<Vec<i64>> {
        let buf = self.take_elems(n, mem::size_of::<i64>())?;
        let vs = buf
            .chunks_exact(mem::size_of::<i64>())
            .map(|chunk| {
                let mut arr = [0u8; mem::size_of::<i64>()];
                arr.copy_from_slice(chunk);
                i64::from_be_bytes(arr)
            })
            .collect();
        Ok(vs)
    }

    fn take_elems(&mut self, n: usize, elem_len: usize) -> Result<&'a [u8]> {
        match n.checked_mul(elem_len) {
            Some(len) => self.take(len),
            None => Err(self.decode_failure(
                ErrorKind::InvalidData,
                format!("array of {n} elements overflows"),
            )),
        }
    }
}
