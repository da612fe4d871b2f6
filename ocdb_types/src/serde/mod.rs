//! # Serialization format
//!
//! Every persisted object is written as a *frame*, in a fixed field order and
//! with no field tags. All integers are big-endian.
//!
//! The frame starts with a `byte_count` word, which is patched in after the
//! payload has been written. The `0x4000_0000` bit marks the new frame format;
//! the remaining bits count every byte that follows the word, version tag included.
//! A reader compares this count with the bytes it actually consumed.
//!
//! ```text
//! struct Frame {
//!     byte_count:     u32,                        // count | 0x4000_0000
//!     version:        i16,
//!     base:           Base {                      // the common root
//!         version:        i16,
//!         unique_id:      u32,
//!         bits:           u32,
//!     },
//!     fields:         ...,                        // declared order
//! }
//! ```
//!
//! Frames written by old producers carry no `byte_count` word; the marker bit
//! is absent and the reader rewinds to read the version directly.
//!
//! An object pointer (a field whose concrete class is only known at decode time)
//! is null, or a class tag followed by the referent's frame.
//! The first occurrence of a class in a buffer spells out its name;
//! later occurrences refer back to the first one by offset.
//!
//! ```text
//! struct NullPointer {
//!     tag:            u32,                        // 0
//! }
//!
//! struct NewClassPointer {
//!     byte_count:     u32,                        // count | 0x4000_0000
//!     tag:            u32,                        // 0xFFFF_FFFF
//!     class_name:     [u8; _],                    // NUL terminated
//!     object:         Frame,
//! }
//!
//! struct KnownClassPointer {
//!     byte_count:     u32,                        // count | 0x4000_0000
//!     tag:            u32,                        // (first_start + 2) | 0x8000_0000
//!     object:         Frame,
//! }
//! ```
//!
//! Strings carry a one-byte length, or `255` followed by a `u32` length.
//! Variable-length numeric arrays are preceded by a count field that the owning
//! object declares itself.

mod frame;
mod object_any;
mod rbuffer;
mod tags;
mod wbuffer;


pub use frame::*;
pub use rbuffer::*;
pub use tags::*;
pub use wbuffer::*;
