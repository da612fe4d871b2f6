//! Inspection tools for ocdb containers.

pub mod config;
mod ls;


pub use ls::*;

/// Registers every class the tools know how to decode.
pub fn register_types() -> anyhow::Result<()> {
    ocdb_records::register_types()?;
    ocdb_muoncalib::register_types()?;
    Ok(())
}
