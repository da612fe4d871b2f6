use crate::error::Result;
use crate::serde::{RBuffer, WBuffer};
use crate::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, Object, Unmarshaler,
};
use derive_more::Deref;

/// A string that can live behind an object pointer, e.g. as a [`super::Map`] key.
#[derive(Deref, Default, PartialEq, Eq, Clone, Debug)]
pub struct ObjString {
    #[deref]
    pub string: String,
    pub base: Base,
}

impl ObjString {
    pub const CLASS: &'static str = "TObjString";

    pub fn new(s: impl Into<String>) -> Self {
        Self {
            string: s.into(),
            base: Base::default(),
        }
    }
}

impl From<&str> for ObjString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
impl From<String> for ObjString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Object for ObjString {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for ObjString {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_string(&self.string)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for ObjString {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.string = r.read_string()?;
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for ObjString {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(
            Self::CLASS,
            1,
            vec![
                FieldDescriptor::base(Base::CLASS),
                FieldDescriptor::basic("fString", FieldKind::TString, "TString"),
            ],
        )
    }
}
