pub mod error;
pub mod serde;
pub mod types;

pub use error::{Error, Result};

use once_cell::sync::OnceCell;
use types::{register_class, Map, ObjArray, ObjString};

/// Registers the generic container classes with the process-wide
/// [`types::Factory`] and [`types::Streamers`] tables.
///
/// Call before decoding anything. Only the first call has an effect.
pub fn register_types() -> Result<()> {
    static REGISTERED: OnceCell<()> = OnceCell::new();
    REGISTERED.get_or_try_init(|| {
        register_class::<ObjString>()?;
        register_class::<ObjArray>()?;
        register_class::<Map>()?;
        Ok(())
    })?;
    Ok(())
}
