use crate::error::{Error, Result};
use crate::types::{Factory, Object};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// The wire type code of a field, as recorded in schema descriptors.
#[repr(i32)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum FieldKind {
    Base = 0,
    Char = 1,
    Int = 3,
    Counter = 6,
    Double = 8,
    UInt = 13,
    Long64 = 16,
    Bool = 18,
    /// `Double` + the pointer offset of 40.
    DoublePtr = 48,
    Object = 61,
    Any = 62,
    ObjectPtr = 64,
    TString = 65,
    TObject = 66,
}

impl FieldKind {
    pub fn code(self) -> i32 {
        // Every discriminant fits an i32.
        self.to_i32().unwrap_or_default()
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::from_i32(code)
    }

    /// In-memory size in bytes; zero for kinds whose size depends on the class.
    pub fn size(self) -> u32 {
        match self {
            Self::Char | Self::Bool => 1,
            Self::Int | Self::Counter | Self::UInt => 4,
            Self::Double | Self::Long64 | Self::DoublePtr | Self::ObjectPtr => 8,
            Self::TString => 24,
            Self::Base | Self::Object | Self::Any | Self::TObject => 0,
        }
    }
}

/// What role a field plays in its class.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SemanticType {
    BaseClass,
    Primitive,
    PrimitiveArray,
    EmbeddedObject,
    ObjectPointer,
    AssociativeMap,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub type_name: String,
    pub size: u32,
    /// For arrays, the sibling field holding the element count.
    pub count_name: Option<String>,
}

impl FieldDescriptor {
    /// A base class section. `class` is the base's class tag.
    pub fn base(class: &str) -> Self {
        Self {
            name: class.to_owned(),
            kind: FieldKind::Base,
            type_name: "BASE".to_owned(),
            size: 0,
            count_name: None,
        }
    }

    pub fn basic(name: &str, kind: FieldKind, type_name: &str) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            type_name: type_name.to_owned(),
            size: kind.size(),
            count_name: None,
        }
    }

    pub fn array(name: &str, kind: FieldKind, type_name: &str, count_name: &str) -> Self {
        Self {
            count_name: Some(count_name.to_owned()),
            ..Self::basic(name, kind, type_name)
        }
    }

    pub fn object(name: &str, type_name: &str) -> Self {
        Self::basic(name, FieldKind::Object, type_name)
    }

    pub fn object_ptr(name: &str, type_name: &str) -> Self {
        Self::basic(name, FieldKind::ObjectPtr, &format!("{type_name}*"))
    }

    pub fn semantic(&self) -> SemanticType {
        match self.kind {
            FieldKind::Base => SemanticType::BaseClass,
            FieldKind::ObjectPtr => SemanticType::ObjectPointer,
            FieldKind::Object | FieldKind::TObject if self.type_name == "TMap" => {
                SemanticType::AssociativeMap
            }
            FieldKind::Object | FieldKind::TObject | FieldKind::Any => {
                SemanticType::EmbeddedObject
            }
            _ if self.count_name.is_some() => SemanticType::PrimitiveArray,
            _ => SemanticType::Primitive,
        }
    }
}

/// The declared schema of one persisted class.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ClassDescriptor {
    pub class: String,
    pub version: i16,
    pub checksum: u32,
    pub fields: Vec<FieldDescriptor>,
}

impl ClassDescriptor {
    /// The checksum is derived from the class and field names.
    pub fn new(class: &str, version: i16, fields: Vec<FieldDescriptor>) -> Self {
        let checksum = schema_checksum(class, &fields);
        Self {
            class: class.to_owned(),
            version,
            checksum,
            fields,
        }
    }

    /// Replaces the derived checksum with the one recorded by the producer.
    pub fn with_checksum(mut self, checksum: u32) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn schema_checksum(class: &str, fields: &[FieldDescriptor]) -> u32 {
    let mix = |id: u32, s: &str| {
        s.bytes()
            .fold(id, |id, c| id.wrapping_mul(3).wrapping_add(u32::from(c)))
    };
    let mut id = mix(0, class);
    for field in fields {
        id = mix(id, &field.name);
        id = mix(id, &field.type_name);
    }
    id
}

static DESCRIPTORS: Lazy<RwLock<HashMap<String, ClassDescriptor>>> = Lazy::new(Default::default);

/// The process-wide class name -> schema descriptor table.
pub struct Streamers;

impl Streamers {
    /// Fails if a higher version of the same class is already registered.
    pub fn add(desc: ClassDescriptor) -> Result<()> {
        let mut descs = DESCRIPTORS.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(prev) = descs.get(&desc.class) {
            if prev.version > desc.version {
                return Err(Error::malformed(
                    &desc.class,
                    format!(
                        "descriptor version {} is older than the registered {}",
                        desc.version, prev.version
                    ),
                ));
            }
        }
        descs.insert(desc.class.clone(), desc);
        Ok(())
    }

    pub fn get(class: &str) -> Option<ClassDescriptor> {
        let descs = DESCRIPTORS.read().unwrap_or_else(PoisonError::into_inner);
        descs.get(class).cloned()
    }

    /// Sorted.
    pub fn classes() -> Vec<String> {
        let descs = DESCRIPTORS.read().unwrap_or_else(PoisonError::into_inner);
        let mut classes = descs.keys().cloned().collect::<Vec<_>>();
        classes.sort();
        classes
    }
}

pub trait Describe {
    fn describe() -> ClassDescriptor;
}

/// Registers `T` with both the [`Factory`] and the [`Streamers`] table.
pub fn register_class<T: Object + Default + Describe>() -> Result<()> {
    Streamers::add(T::describe())?;
    Factory::register::<T>();
    Ok(())
}
