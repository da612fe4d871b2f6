use derive_more::{Deref, From, Into};

/// Set on every byte count written by a current producer.
pub const BYTE_COUNT_MASK: u32 = 0x4000_0000;
/// Largest byte count a frame can declare.
pub const MAX_BYTE_COUNT: u32 = BYTE_COUNT_MASK - 1;
/// Length of the byte count word itself.
pub const BYTE_COUNT_LEN: u64 = 4;

/// Set in a base version tag whose upper half belonged to a byte count.
pub const BYTE_COUNT_VMASK: u16 = 0x4000;

pub const NULL_TAG: u32 = 0;
pub const NEW_CLASS_TAG: u32 = 0xFFFF_FFFF;
pub const CLASS_MASK: u32 = 0x8000_0000;
/// Added to a pointer's start offset to form a class reference.
pub const MAP_OFFSET: u64 = 2;
pub const MAX_CLASS_NAME: usize = 80;

/// Strings at least this long use the extended length prefix.
pub const LONG_STRING_MARKER: u8 = 255;

#[derive(Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ByteCount(u32);
impl ByteCount {
    pub fn from_len(len: u64) -> Option<Self> {
        u32::try_from(len)
            .ok()
            .filter(|n| *n <= MAX_BYTE_COUNT)
            .map(Self)
    }

    /// Returns `None` for a word that does not carry the new-format marker.
    pub fn from_wire(word: u32) -> Option<Self> {
        if word & BYTE_COUNT_MASK == 0 {
            return None;
        }
        Some(Self(word & !BYTE_COUNT_MASK))
    }

    pub fn to_wire(self) -> u32 {
        self.0 | BYTE_COUNT_MASK
    }
}

/// Identifies, within one buffer, the first pointer that spelled out a class name.
#[derive(From, Into, Deref, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClassRef(u64);
impl ClassRef {
    /// `pointer_start` is the offset of the first pointer's byte count word.
    pub fn at(pointer_start: u64) -> Option<Self> {
        let off = pointer_start + MAP_OFFSET;
        if off >= u64::from(CLASS_MASK) {
            return None;
        }
        Some(Self(off))
    }

    pub fn from_tag(tag: u32) -> Self {
        Self(u64::from(tag & !CLASS_MASK))
    }

    pub fn to_tag(self) -> u32 {
        // `at` guarantees the offset fits below CLASS_MASK.
        (self.0 as u32) | CLASS_MASK
    }
}
