use crate::{Id, MetaData};
use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, Object, Unmarshaler,
};
use ocdb_types::Result;
use std::io::{self, Write};

/// One calibration database entry: a payload of any registered class plus its identity.
#[derive(Default, PartialEq, Clone, Debug)]
pub struct Entry {
    pub base: Base,
    pub object: Option<Box<dyn Object>>,
    pub id: Id,
    pub meta: Option<MetaData>,
    pub is_owner: bool,
}

impl Entry {
    pub const CLASS: &'static str = "AliCDBEntry";

    pub fn new(object: Box<dyn Object>, id: Id, meta: Option<MetaData>) -> Self {
        Self {
            base: Base::default(),
            object: Some(object),
            id,
            meta,
            is_owner: true,
        }
    }

    /// The payload, if it is a `T`.
    pub fn object_as<T: Object>(&self) -> Option<&T> {
        self.object.as_deref().and_then(|obj| obj.downcast_ref::<T>())
    }

    pub fn display(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "=== Entry ===")?;
        writeln!(w, "ID: {}", self.id)?;
        writeln!(w, "Owner: {}", self.is_owner)?;
        if let Some(meta) = &self.meta {
            writeln!(w, "MetaData:")?;
            meta.display(w)?;
        }
        if let Some(obj) = &self.object {
            writeln!(w, "Object: {}", obj.class())?;
            writeln!(w, "{obj:?}")?;
            writeln!(w, "===")?;
        }
        Ok(())
    }
}

impl Object for Entry {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for Entry {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_object_any(self.object.as_deref())?;
        self.id.marshal(w)?;
        w.write_object_any(self.meta.as_ref().map(|meta| meta as &dyn Object))?;
        w.write_bool(self.is_owner)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for Entry {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.object = r.read_object_any()?;
        self.id.unmarshal(r)?;
        self.meta = r.read_object_as::<MetaData>()?;
        self.is_owner = r.read_bool()?;
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for Entry {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(
            Self::CLASS,
            1,
            vec![
                FieldDescriptor::base(Base::CLASS),
                FieldDescriptor::object_ptr("fObject", Base::CLASS),
                FieldDescriptor::object("fId", Id::CLASS),
                FieldDescriptor::object_ptr("fMetaData", MetaData::CLASS),
                FieldDescriptor::basic("fIsOwner", FieldKind::Bool, "Bool_t"),
            ],
        )
        .with_checksum(0x9d5e_ed3c)
    }
}
