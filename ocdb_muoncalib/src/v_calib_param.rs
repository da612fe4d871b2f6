use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, Marshaler, Object, Unmarshaler,
};
use ocdb_types::Result;

/// Base class section of every calibration param.
/// The base's unique id carries the param's two channel ids.
#[derive(Default, PartialEq, Eq, Clone, Debug)]
pub struct VCalibParam {
    pub base: Base,
}

impl VCalibParam {
    pub const CLASS: &'static str = "AliMUONVCalibParam";

    pub fn with_ids(id0: u16, id1: u16) -> Self {
        Self {
            base: Base::with_unique_id(u32::from(id0) | (u32::from(id1) << 16)),
        }
    }

    pub fn id0(&self) -> u16 {
        (self.base.unique_id & 0xFFFF) as u16
    }

    pub fn id1(&self) -> u16 {
        (self.base.unique_id >> 16) as u16
    }
}

impl Object for VCalibParam {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for VCalibParam {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for VCalibParam {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for VCalibParam {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(Self::CLASS, 1, vec![FieldDescriptor::base(Base::CLASS)])
            .with_checksum(0xfbc2_0a45)
    }
}
