use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    Base, ClassDescriptor, Describe, FieldDescriptor, FieldKind, Map, Marshaler, ObjString,
    Object, Unmarshaler,
};
use ocdb_types::Result;
use std::io::{self, Write};

/// Provenance of an entry.
#[derive(Default, PartialEq, Clone, Debug)]
pub struct MetaData {
    pub base: Base,
    pub object_class_name: String,
    pub responsible: String,
    pub beam_period: u32,
    pub aliroot_version: String,
    pub comment: String,
    /// Object-specific properties, usually keyed by [`ObjString`].
    pub properties: Map,
}

impl MetaData {
    pub const CLASS: &'static str = "AliCDBMetaData";

    pub fn property(&self, key: &str) -> Option<&dyn Object> {
        self.properties.get_str(key)
    }

    pub fn set_property(&mut self, key: &str, value: Box<dyn Object>) {
        self.properties
            .insert(Box::new(ObjString::new(key)), Some(value));
    }

    pub fn display(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "Class: {:?}", self.object_class_name)?;
        writeln!(w, "Responsible: {:?}", self.responsible)?;
        writeln!(w, "BeamPeriod: {}", self.beam_period)?;
        writeln!(w, "AliRoot Version: {:?}", self.aliroot_version)?;
        writeln!(w, "Comment: {:?}", self.comment)?;
        writeln!(w, "Properties: {}", self.properties.len())?;
        for (k, v) in self.properties.iter() {
            writeln!(w, "  key: {k:?}")?;
            writeln!(w, "  val: {v:?}")?;
        }
        Ok(())
    }
}

impl Object for MetaData {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for MetaData {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_string(&self.object_class_name)?;
        w.write_string(&self.responsible)?;
        w.write_u32(self.beam_period)?;
        w.write_string(&self.aliroot_version)?;
        w.write_string(&self.comment)?;
        self.properties.marshal(w)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for MetaData {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.object_class_name = r.read_string()?;
        self.responsible = r.read_string()?;
        self.beam_period = r.read_u32()?;
        self.aliroot_version = r.read_string()?;
        self.comment = r.read_string()?;
        self.properties.unmarshal(r)?;
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for MetaData {
    fn describe() -> ClassDescriptor {
        let string = |name| FieldDescriptor::basic(name, FieldKind::TString, "TString");
        ClassDescriptor::new(
            Self::CLASS,
            1,
            vec![
                FieldDescriptor::base(Base::CLASS),
                string("fObjectClassName"),
                string("fResponsible"),
                FieldDescriptor::basic("fBeamPeriod", FieldKind::UInt, "UInt_t"),
                string("fAliRootVersion"),
                string("fComment"),
                FieldDescriptor::object("fProperties", Map::CLASS),
            ],
        )
        .with_checksum(0x746c_bdf0)
    }
}
