use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, Object, Unmarshaler,
};
use ocdb_types::Result;
use std::fmt;

/// An inclusive range of run numbers.
#[derive(Default, PartialEq, Eq, Clone, Debug)]
pub struct RunRange {
    pub base: Base,
    pub first: i32,
    pub last: i32,
}

impl RunRange {
    pub const CLASS: &'static str = "AliCDBRunRange";

    pub fn new(first: i32, last: i32) -> Self {
        Self {
            base: Base::default(),
            first,
            last,
        }
    }

    pub fn contains(&self, run: i32) -> bool {
        self.first <= run && run <= self.last
    }
}

impl fmt::Display for RunRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunRange{{First: {}, Last: {}}}", self.first, self.last)
    }
}

impl Object for RunRange {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for RunRange {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_i32(self.first)?;
        w.write_i32(self.last)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for RunRange {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.first = r.read_i32()?;
        self.last = r.read_i32()?;
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for RunRange {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(
            Self::CLASS,
            1,
            vec![
                FieldDescriptor::base(Base::CLASS),
                FieldDescriptor::basic("fFirstRun", FieldKind::Int, "Int_t"),
                FieldDescriptor::basic("fLastRun", FieldKind::Int, "Int_t"),
            ],
        )
    }
}
