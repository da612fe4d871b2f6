use crate::error::{Error, Result};
use crate::serde::{ByteCount, OpenFrame, RBuffer, WBuffer, BYTE_COUNT_LEN};
use derive_more::{Deref, From, Into};
use std::io::ErrorKind;

/// Where a frame's byte count word was reserved. Returned by [`WBuffer::write_version`].
#[derive(From, Into, Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct FramePos(u64);

/// What [`RBuffer::read_version`] learned about a frame.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct FrameHeader {
    pub vers: i16,
    /// Offset of the byte count word.
    pub start: u64,
    /// Zero for old-style frames, which are not checked.
    pub bcnt: u32,
}

impl WBuffer {
    /// Opens a frame: reserves the byte count and writes the version tag.
    pub fn write_version(&mut self, vers: i16) -> Result<FramePos> {
        self.check()?;
        let pos = FramePos(self.pos());
        self.write_u32(0)?;
        self.write_i16(vers)?;
        Ok(pos)
    }

    /// Closes the frame opened at `beg` by patching its byte count.
    ///
    /// Returns the size of the whole frame, byte count word included.
    pub fn set_byte_count(&mut self, beg: FramePos, class: &str) -> Result<usize> {
        self.check()?;
        let len = self.pos() - *beg - BYTE_COUNT_LEN;
        let bcnt = match ByteCount::from_len(len) {
            Some(bcnt) => bcnt,
            None => {
                return Err(self.fail(Error::stream(
                    *beg,
                    ErrorKind::InvalidInput,
                    format!("{class} frame of {len} bytes exceeds the byte count range"),
                )))
            }
        };
        self.patch_u32(*beg, bcnt.to_wire())?;
        Ok((len + BYTE_COUNT_LEN) as usize)
    }
}

impl<'a> RBuffer<'a> {
    /// Reads a frame header and opens the frame for `class`.
    ///
    /// Every successful call must be paired with [`RBuffer::check_byte_count`].
    pub fn read_version(&mut self, class: &str) -> Result<FrameHeader> {
        self.check()?;
        let start = self.pos();
        let word = self.read_u32()?;
        let bcnt = match ByteCount::from_wire(word) {
            Some(bcnt) => *bcnt,
            None => {
                self.set_pos(start)?;
                0
            }
        };
        self.frames.push(OpenFrame {
            class: class.to_owned(),
            start,
            bcnt,
        });
        let vers = self.read_i16()?;
        Ok(FrameHeader { vers, start, bcnt })
    }

    /// Closes the frame described by `hdr`, failing the buffer if the bytes consumed
    /// since its start differ from its declared byte count.
    pub fn check_byte_count(&mut self, hdr: &FrameHeader, class: &str) -> Result<()> {
        self.check()?;
        self.frames.pop();
        if hdr.bcnt == 0 {
            return Ok(());
        }
        let consumed = self.pos() - hdr.start - BYTE_COUNT_LEN;
        if consumed == u64::from(hdr.bcnt) {
            return Ok(());
        }
        tracing::debug!(class, start = hdr.start, bcnt = hdr.bcnt, consumed, "byte count mismatch");
        Err(self.fail(Error::Corruption {
            class: class.to_owned(),
            expected: u64::from(hdr.bcnt),
            actual: consumed,
        }))
    }
}
