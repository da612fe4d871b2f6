use crate::error::Result;
use crate::serde::{RBuffer, WBuffer};
use std::any::Any;
use std::fmt::Debug;

pub trait Marshaler {
    /// Returns the number of bytes written.
    fn marshal(&self, w: &mut WBuffer) -> Result<usize>;
}

pub trait Unmarshaler {
    /// Overwrites `self` with the next record in `r`.
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()>;
}

/// A persisted class: something a pointer can refer to and the [`super::Factory`]
/// can construct by name.
pub trait Object: ObjectAny + Marshaler + Unmarshaler + Debug {
    /// The class tag written ahead of this object in pointers.
    fn class(&self) -> &'static str;

    /// The frame version this implementation writes.
    fn rversion(&self) -> i16;
}

/// Type-erased operations on [`Object`]s. Implemented for every
/// `Object + Clone + PartialEq`.
pub trait ObjectAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn clone_object(&self) -> Box<dyn Object>;
    fn eq_object(&self, other: &dyn Object) -> bool;
}

impl<T> ObjectAny for T
where
    T: Object + Clone + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }
    fn eq_object(&self, other: &dyn Object) -> bool {
        match other.as_any().downcast_ref::<T>() {
            Some(other) => self == other,
            None => false,
        }
    }
}

impl dyn Object {
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl Clone for Box<dyn Object> {
    fn clone(&self) -> Self {
        (**self).clone_object()
    }
}

/* Objects of different concrete classes are never equal. */
impl PartialEq for dyn Object {
    fn eq(&self, other: &Self) -> bool {
        self.eq_object(other)
    }
}
