use crate::error::{Error, Result};
use crate::types::Object;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Returns a zero-value instance, ready to be unmarshaled into.
pub type Constructor = fn() -> Box<dyn Object>;

static CONSTRUCTORS: Lazy<RwLock<HashMap<String, Constructor>>> = Lazy::new(Default::default);

fn construct_default<T: Object + Default>() -> Box<dyn Object> {
    Box::new(T::default())
}

/// The process-wide class name -> constructor table that pointer decoding relies on.
pub struct Factory;

impl Factory {
    /// Registers `ctor` under `class`. A later registration of the same name wins.
    pub fn add(class: &str, ctor: Constructor) {
        let mut ctors = CONSTRUCTORS.write().unwrap_or_else(PoisonError::into_inner);
        if ctors.insert(class.to_owned(), ctor).is_some() {
            tracing::warn!(class, "replaced the registered constructor");
        }
    }

    /// Registers `T` under its own class tag.
    pub fn register<T: Object + Default>() {
        let class = T::default().class();
        Self::add(class, construct_default::<T>);
    }

    pub fn get(class: &str) -> Option<Constructor> {
        let ctors = CONSTRUCTORS.read().unwrap_or_else(PoisonError::into_inner);
        ctors.get(class).copied()
    }

    pub fn contains(class: &str) -> bool {
        Self::get(class).is_some()
    }

    pub fn construct(class: &str) -> Result<Box<dyn Object>> {
        match Self::get(class) {
            Some(ctor) => Ok(ctor()),
            None => Err(Error::UnknownClass {
                class: class.to_owned(),
            }),
        }
    }

    /// Sorted.
    pub fn classes() -> Vec<String> {
        let ctors = CONSTRUCTORS.read().unwrap_or_else(PoisonError::into_inner);
        let mut classes = ctors.keys().cloned().collect::<Vec<_>>();
        classes.sort();
        classes
    }
}
