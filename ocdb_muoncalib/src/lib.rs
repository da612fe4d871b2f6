//! Muon spectrometer calibration payloads.
//!
//! A [`TwoDMap`] holds one [`CalibParamND`] per (detection element, manu) pair.
//! Each param is a `size` x `dimension` table of channel values.

mod calib_param_nd;
mod ex_map;
mod two_d_map;
mod v_calib_param;
mod v_store;

mod test;

pub use calib_param_nd::*;
pub use ex_map::*;
pub use two_d_map::*;
pub use v_calib_param::*;
pub use v_store::*;

use ocdb_types::types::register_class;
use ocdb_types::Result;
use once_cell::sync::OnceCell;

/// Registers the calibration classes, and the generic containers they embed.
///
/// Only the first call has an effect.
pub fn register_types() -> Result<()> {
    static REGISTERED: OnceCell<()> = OnceCell::new();
    REGISTERED.get_or_try_init(|| {
        ocdb_types::register_types()?;
        register_class::<VStore>()?;
        register_class::<VCalibParam>()?;
        register_class::<CalibParamND>()?;
        register_class::<ExMap>()?;
        register_class::<TwoDMap>()?;
        Ok(())
    })?;
    Ok(())
}
