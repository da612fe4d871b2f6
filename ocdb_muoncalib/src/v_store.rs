use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, Marshaler, Object, Unmarshaler,
};
use ocdb_types::Result;

/// Base class section of every calibration store.
#[derive(Default, PartialEq, Eq, Clone, Debug)]
pub struct VStore {
    pub base: Base,
}

impl VStore {
    pub const CLASS: &'static str = "AliMUONVStore";
}

impl Object for VStore {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for VStore {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for VStore {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for VStore {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(Self::CLASS, 1, vec![FieldDescriptor::base(Base::CLASS)])
            .with_checksum(0x98a7_b8b6)
    }
}
