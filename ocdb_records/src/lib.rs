//! Calibration database records: the entry envelope and its identity.
//!
//! An [`Entry`] wraps one calibration payload (any registered [`ocdb_types::types::Object`])
//! together with the [`Id`] it is stored under and optional [`MetaData`].

mod entry;
mod id;
mod metadata;
mod path;
mod run_range;


pub use entry::*;
pub use id::*;
pub use metadata::*;
pub use path::*;
pub use run_range::*;

use ocdb_types::types::register_class;
use ocdb_types::Result;
use once_cell::sync::OnceCell;

/// Registers the record classes, and the generic containers they embed.
///
/// Only the first call has an effect.
pub fn register_types() -> Result<()> {
    static REGISTERED: OnceCell<()> = OnceCell::new();
    REGISTERED.get_or_try_init(|| {
        ocdb_types::register_types()?;
        register_class::<Path>()?;
        register_class::<RunRange>()?;
        register_class::<Id>()?;
        register_class::<MetaData>()?;
        register_class::<Entry>()?;
        Ok(())
    })?;
    Ok(())
}
