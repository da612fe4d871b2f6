use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, Object, Unmarshaler,
};
use ocdb_types::Result;
use std::fmt;

pub const PATH_LEVELS: usize = 3;

/// A storage path of the form `level0/level1/level2`, e.g. `MUON/Calib/Pedestals`.
#[derive(Default, PartialEq, Eq, Clone, Debug)]
pub struct Path {
    pub base: Base,
    pub path: String,
    pub level0: String,
    pub level1: String,
    pub level2: String,
    pub is_valid: bool,
    pub is_wildcard: bool,
}

impl Path {
    pub const CLASS: &'static str = "AliCDBPath";

    /// Valid iff there are exactly three non-empty levels.
    /// A level containing `*` makes the path a wildcard.
    pub fn new(path: &str) -> Self {
        let levels = path.split('/').collect::<Vec<_>>();
        let level = |i: usize| levels.get(i).map(|s| s.to_string()).unwrap_or_default();
        Self {
            base: Base::default(),
            path: path.to_owned(),
            level0: level(0),
            level1: level(1),
            level2: level(2),
            is_valid: levels.len() == PATH_LEVELS && levels.iter().all(|s| !s.is_empty()),
            is_wildcard: levels.iter().any(|s| s.contains('*')),
        }
    }

    pub fn levels(&self) -> [&str; PATH_LEVELS] {
        [&self.level0, &self.level1, &self.level2]
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Path{{Path: {:?}, Level0: {:?}, Level1: {:?}, Level2: {:?}, Valid: {}, WildCard: {}}}",
            self.path, self.level0, self.level1, self.level2, self.is_valid, self.is_wildcard
        )
    }
}

impl Object for Path {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for Path {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_string(&self.path)?;
        w.write_string(&self.level0)?;
        w.write_string(&self.level1)?;
        w.write_string(&self.level2)?;
        w.write_bool(self.is_valid)?;
        w.write_bool(self.is_wildcard)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for Path {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.path = r.read_string()?;
        self.level0 = r.read_string()?;
        self.level1 = r.read_string()?;
        self.level2 = r.read_string()?;
        self.is_valid = r.read_bool()?;
        self.is_wildcard = r.read_bool()?;
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for Path {
    fn describe() -> ClassDescriptor {
        let string = |name| FieldDescriptor::basic(name, FieldKind::TString, "TString");
        let boolean = |name| FieldDescriptor::basic(name, FieldKind::Bool, "Bool_t");
        ClassDescriptor::new(
            Self::CLASS,
            1,
            vec![
                FieldDescriptor::base(Base::CLASS),
                string("fPath"),
                string("fLevel0"),
                string("fLevel1"),
                string("fLevel2"),
                boolean("fIsValid"),
                boolean("fIsWildcard"),
            ],
        )
    }
}
