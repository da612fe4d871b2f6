use crate::error::{Error, Result};
use crate::serde::{RBuffer, WBuffer};
use crate::types::{Marshaler, Unmarshaler};
use derive_more::{Deref, From, Into};

/// A counted array of `i64`, embedded by value (no frame, no class tag).
#[derive(From, Into, Deref, Default, PartialEq, Eq, Clone, Debug)]
pub struct ArrayL64(Vec<i64>);

impl ArrayL64 {
    pub const CLASS: &'static str = "TArrayL64";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(&self, i: usize) -> Result<i64> {
        match self.0.get(i) {
            Some(v) => Ok(*v),
            None => Err(Error::bounds(Self::CLASS, i, self.0.len())),
        }
    }

    pub fn set(&mut self, i: usize, v: i64) -> Result<()> {
        let len = self.0.len();
        match self.0.get_mut(i) {
            Some(dst) => {
                *dst = v;
                Ok(())
            }
            None => Err(Error::bounds(Self::CLASS, i, len)),
        }
    }

    pub fn push(&mut self, v: i64) {
        self.0.push(v);
    }
}

impl Marshaler for ArrayL64 {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let beg = w.pos();
        w.write_count(self.0.len())?;
        w.write_fast_array_i64(&self.0)?;
        Ok((w.pos() - beg) as usize)
    }
}

impl Unmarshaler for ArrayL64 {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let n = r.read_count(Self::CLASS)?;
        self.0 = r.read_fast_array_i64(n)?;
        Ok(())
    }
}
