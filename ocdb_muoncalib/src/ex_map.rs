use itertools::Itertools;
use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    ArrayL64, Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, ObjArray,
    Object, Unmarshaler,
};
use ocdb_types::{Error, Result};

/// A map from `i64` keys to object pointers, stored as two parallel arrays.
///
/// Lookups scan linearly; enumeration sorts by key.
#[derive(Default, PartialEq, Clone, Debug)]
pub struct ExMap {
    pub base: Base,
    objects: ObjArray,
    keys: ArrayL64,
}

impl ExMap {
    pub const CLASS: &'static str = "AliMpExMap";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn objects(&self) -> &ObjArray {
        &self.objects
    }

    pub fn keys(&self) -> &ArrayL64 {
        &self.keys
    }

    fn position(&self, key: i64) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }

    pub fn get(&self, key: i64) -> Option<&dyn Object> {
        let i = self.position(key)?;
        self.objects.at(i).ok().flatten()
    }

    pub fn get_mut(&mut self, key: i64) -> Option<&mut (dyn Object + 'static)> {
        let i = self.position(key)?;
        self.objects.at_mut(i).ok().flatten()
    }

    /// Replaces the object of an existing key.
    pub fn insert(&mut self, key: i64, obj: Box<dyn Object>) -> Result<()> {
        match self.position(key) {
            Some(i) => self.objects.set(i, Some(obj)),
            None => {
                self.keys.push(key);
                self.objects.push(Some(obj));
                Ok(())
            }
        }
    }

    pub fn sorted_keys(&self) -> Vec<i64> {
        self.keys.iter().copied().sorted().collect()
    }

    /// In storage order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, Option<&dyn Object>)> {
        self.keys.iter().copied().zip(self.objects.iter())
    }
}

impl Object for ExMap {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for ExMap {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        self.objects.marshal(w)?;
        self.keys.marshal(w)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for ExMap {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.objects.unmarshal(r)?;
        self.keys.unmarshal(r)?;
        if self.objects.len() != self.keys.len() {
            return Err(r.fail(Error::malformed(
                Self::CLASS,
                format!(
                    "{} objects but {} keys",
                    self.objects.len(),
                    self.keys.len()
                ),
            )));
        }
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for ExMap {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(
            Self::CLASS,
            1,
            vec![
                FieldDescriptor::base(Base::CLASS),
                FieldDescriptor::object("fObjects", ObjArray::CLASS),
                FieldDescriptor::basic("fKeys", FieldKind::Any, ArrayL64::CLASS),
            ],
        )
    }
}
