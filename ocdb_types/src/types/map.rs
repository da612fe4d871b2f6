use crate::error::Result;
use crate::serde::{RBuffer, WBuffer};
use crate::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, ObjString, Object,
    Unmarshaler,
};

/// An associative array of object pointers, keyed by object equality.
///
/// Entries keep their insertion order.
#[derive(Default, PartialEq, Clone, Debug)]
pub struct Map {
    pub base: Base,
    pub name: String,
    entries: Vec<(Box<dyn Object>, Option<Box<dyn Object>>)>,
}

impl Map {
    pub const CLASS: &'static str = "TMap";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replaces the value of an equal key, if any; returns the replaced value.
    pub fn insert(
        &mut self,
        key: Box<dyn Object>,
        value: Option<Box<dyn Object>>,
    ) -> Option<Box<dyn Object>> {
        match self.entries.iter_mut().find(|(k, _)| **k == *key) {
            Some((_, v)) => std::mem::replace(v, value),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// `None` both for a missing key and for a null value.
    pub fn get(&self, key: &dyn Object) -> Option<&dyn Object> {
        self.entries
            .iter()
            .find(|(k, _)| **k == *key)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Looks up the entry whose key is the [`ObjString`] `key`.
    pub fn get_str(&self, key: &str) -> Option<&dyn Object> {
        self.entries
            .iter()
            .find(|(k, _)| match k.downcast_ref::<ObjString>() {
                Some(k) => k.string == key,
                None => false,
            })
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&dyn Object, Option<&dyn Object>)> {
        self.entries.iter().map(|(k, v)| (&**k, v.as_deref()))
    }
}

impl Object for Map {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        3
    }
}

impl Marshaler for Map {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_string(&self.name)?;
        w.write_count(self.entries.len())?;
        for (k, v) in self.entries.iter() {
            w.write_object_any(Some(&**k))?;
            w.write_object_any(v.as_deref())?;
        }
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for Map {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;

        self.base = Base::default();
        if hdr.vers > 2 {
            self.base.unmarshal(r)?;
        }
        self.name.clear();
        if hdr.vers > 1 {
            self.name = r.read_string()?;
        }

        let n = r.read_count(Self::CLASS)?;
        self.entries.clear();
        for _ in 0..n {
            let k = r.read_object_any()?;
            let v = r.read_object_any()?;
            if let Some(k) = k {
                self.entries.push((k, v));
            }
        }

        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for Map {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(
            Self::CLASS,
            3,
            vec![
                FieldDescriptor::base(Base::CLASS),
                FieldDescriptor::basic("fName", FieldKind::TString, "TString"),
                FieldDescriptor::basic("fSize", FieldKind::Counter, "Int_t"),
            ],
        )
    }
}
