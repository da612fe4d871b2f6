use crate::error::Result;
use crate::serde::{RBuffer, WBuffer, BYTE_COUNT_VMASK};
use crate::types::{Marshaler, Unmarshaler};

/// The common root of every persisted class.
///
/// Written without a byte count of its own: version, unique id, status bits.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub struct Base {
    pub unique_id: u32,
    pub bits: u32,
}

impl Base {
    pub const CLASS: &'static str = "TObject";
    pub const VERSION: i16 = 1;

    /// Set when other objects refer to this one by process id.
    pub const IS_REFERENCED: u32 = 1 << 4;

    pub fn with_unique_id(unique_id: u32) -> Self {
        Self {
            unique_id,
            bits: 0,
        }
    }

    pub fn is_referenced(&self) -> bool {
        self.bits & Self::IS_REFERENCED != 0
    }
}

impl Marshaler for Base {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let beg = w.pos();
        w.write_i16(Self::VERSION)?;
        w.write_u32(self.unique_id)?;
        w.write_u32(self.bits)?;
        if self.is_referenced() {
            // No process ids are tracked; every reference belongs to process 0.
            w.write_u16(0)?;
        }
        Ok((w.pos() - beg) as usize)
    }
}

impl Unmarshaler for Base {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let vers = r.read_i16()?;
        if vers as u16 & BYTE_COUNT_VMASK != 0 {
            // A byte count occupied the first two bytes; the version follows its lower half.
            r.skip(2)?;
            r.read_i16()?;
        }
        self.unique_id = r.read_u32()?;
        self.bits = r.read_u32()?;
        if self.is_referenced() {
            r.read_u16()?;
        }
        Ok(())
    }
}
