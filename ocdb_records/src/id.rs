use crate::{Path, RunRange};
use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, Object, Unmarshaler,
};
use ocdb_types::Result;
use std::fmt;

/// Identifies one stored entry: where, for which runs, and which revision.
#[derive(Default, PartialEq, Eq, Clone, Debug)]
pub struct Id {
    pub base: Base,
    pub path: Path,
    pub runs: RunRange,
    pub version: i32,
    pub sub_version: i32,
    /// Where the entry was last stored (`new`, `grid`, `local`, `dump`).
    pub last_storage: String,
}

impl Id {
    pub const CLASS: &'static str = "AliCDBId";

    pub fn new(path: Path, runs: RunRange, version: i32, sub_version: i32) -> Self {
        Self {
            base: Base::default(),
            path,
            runs,
            version,
            sub_version,
            last_storage: String::new(),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AliCDBId{{Path: {}, RunRange: {}, Version: {:#x}, SubVersion: {:#x}, Last: {:?}}}",
            self.path, self.runs, self.version, self.sub_version, self.last_storage
        )
    }
}

impl Object for Id {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for Id {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        self.path.marshal(w)?;
        self.runs.marshal(w)?;
        w.write_i32(self.version)?;
        w.write_i32(self.sub_version)?;
        w.write_string(&self.last_storage)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for Id {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.path.unmarshal(r)?;
        self.runs.unmarshal(r)?;
        self.version = r.read_i32()?;
        self.sub_version = r.read_i32()?;
        self.last_storage = r.read_string()?;
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for Id {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(
            Self::CLASS,
            1,
            vec![
                FieldDescriptor::base(Base::CLASS),
                FieldDescriptor::object("fPath", Path::CLASS),
                FieldDescriptor::object("fRunRange", RunRange::CLASS),
                FieldDescriptor::basic("fVersion", FieldKind::Int, "Int_t"),
                FieldDescriptor::basic("fSubVersion", FieldKind::Int, "Int_t"),
                FieldDescriptor::basic("fLastStorage", FieldKind::TString, "TString"),
            ],
        )
        .with_checksum(0x3308_a8aa)
    }
}
