use crate::error::{Error, Result};
use crate::serde::{RBuffer, WBuffer};
use crate::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, Object, Unmarshaler,
};

/// An ordered array of object pointers, any of which may be null.
#[derive(Default, PartialEq, Clone, Debug)]
pub struct ObjArray {
    pub base: Base,
    pub name: String,
    pub lower_bound: i32,
    objs: Vec<Option<Box<dyn Object>>>,
}

impl ObjArray {
    pub const CLASS: &'static str = "TObjArray";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    /// `Ok(None)` is a null slot.
    pub fn at(&self, i: usize) -> Result<Option<&dyn Object>> {
        match self.objs.get(i) {
            Some(obj) => Ok(obj.as_deref()),
            None => Err(Error::bounds(Self::CLASS, i, self.objs.len())),
        }
    }

    pub fn at_mut(&mut self, i: usize) -> Result<Option<&mut (dyn Object + 'static)>> {
        let len = self.objs.len();
        match self.objs.get_mut(i) {
            Some(obj) => Ok(obj.as_deref_mut()),
            None => Err(Error::bounds(Self::CLASS, i, len)),
        }
    }

    pub fn set(&mut self, i: usize, obj: Option<Box<dyn Object>>) -> Result<()> {
        let len = self.objs.len();
        match self.objs.get_mut(i) {
            Some(dst) => {
                *dst = obj;
                Ok(())
            }
            None => Err(Error::bounds(Self::CLASS, i, len)),
        }
    }

    pub fn push(&mut self, obj: Option<Box<dyn Object>>) {
        self.objs.push(obj);
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&dyn Object>> {
        self.objs.iter().map(|obj| obj.as_deref())
    }
}

impl FromIterator<Box<dyn Object>> for ObjArray {
    fn from_iter<I: IntoIterator<Item = Box<dyn Object>>>(iter: I) -> Self {
        Self {
            objs: iter.into_iter().map(Some).collect(),
            ..Self::default()
        }
    }
}

impl Object for ObjArray {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        3
    }
}

impl Marshaler for ObjArray {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_string(&self.name)?;
        w.write_count(self.objs.len())?;
        w.write_i32(self.lower_bound)?;
        for obj in self.objs.iter() {
            w.write_object_any(obj.as_deref())?;
        }
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for ObjArray {
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
        self.lower_bound = r.read_i32()?;
        self.objs.clear();
        for _ in 0..n {
            let obj = r.read_object_any()?;
            self.objs.push(obj);
        }

        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for ObjArray {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(
            Self::CLASS,
            3,
            vec![
                FieldDescriptor::base(Base::CLASS),
                FieldDescriptor::basic("fName", FieldKind::TString, "TString"),
                FieldDescriptor::basic("fSize", FieldKind::Counter, "Int_t"),
                FieldDescriptor::basic("fLowerBound", FieldKind::Int, "Int_t"),
                FieldDescriptor::array("fCont", FieldKind::ObjectPtr, "TObject**", "fSize"),
            ],
        )
    }
}
