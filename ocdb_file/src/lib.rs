//! A minimal single-file store of named records.

pub mod fs_utils;
mod layout;
mod reader;
mod writer;


pub use layout::{LAYOUT_VERSION, MAGIC};
pub use reader::*;
pub use writer::*;
