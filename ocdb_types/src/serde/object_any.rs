use crate::error::{Error, Result};
use crate::serde::{
    ByteCount, ClassRef, FramePos, RBuffer, WBuffer, BYTE_COUNT_LEN, CLASS_MASK, MAX_CLASS_NAME,
    NEW_CLASS_TAG, NULL_TAG,
};
use crate::types::{Factory, Object};
use std::any;
use std::io::ErrorKind;

impl WBuffer {
    /// Writes a pointer to an object whose concrete class the reader will look up by name.
    ///
    /// Returns the number of bytes written.
    pub fn write_object_any(&mut self, obj: Option<&dyn Object>) -> Result<usize> {
        self.check()?;
        let obj = match obj {
            None => {
                self.write_u32(NULL_TAG)?;
                return Ok(BYTE_COUNT_LEN as usize);
            }
            Some(obj) => obj,
        };
        let class = obj.class();

        let beg = self.pos();
        self.write_u32(0)?;
        match self.class_refs.get(class).copied() {
            Some(cref) => self.write_u32(cref.to_tag())?,
            None => {
                let cref = match ClassRef::at(beg) {
                    Some(cref) => cref,
                    None => {
                        return Err(self.fail(Error::stream(
                            beg,
                            ErrorKind::InvalidInput,
                            "buffer too large for class references",
                        )))
                    }
                };
                self.write_u32(NEW_CLASS_TAG)?;
                self.write_cstring(class)?;
                self.class_refs.insert(class, cref);
            }
        }

        obj.marshal(self)?;
        self.set_byte_count(FramePos::from(beg), class)
    }
}

impl<'a> RBuffer<'a> {
    /// Reads a pointer written by [`WBuffer::write_object_any`], constructing the
    /// referent through the [`Factory`].
    pub fn read_object_any(&mut self) -> Result<Option<Box<dyn Object>>> {
        self.check()?;
        let beg = self.pos();
        let word = self.read_u32()?;
        let (bcnt, tag) = match ByteCount::from_wire(word) {
            Some(bcnt) if word != NEW_CLASS_TAG => (*bcnt, self.read_u32()?),
            _ => (0, word),
        };

        if tag & CLASS_MASK == 0 {
            if tag == NULL_TAG {
                return Ok(None);
            }
            return Err(self.fail(Error::malformed(
                "object pointer",
                format!("back-reference {tag:#x} to an already decoded object"),
            )));
        }

        let class = if tag == NEW_CLASS_TAG {
            let class = self.read_cstring(MAX_CLASS_NAME)?;
            if let Some(cref) = ClassRef::at(beg) {
                self.class_refs.insert(cref, class.clone());
            }
            class
        } else {
            let cref = ClassRef::from_tag(tag);
            match self.class_refs.get(&cref) {
                Some(class) => class.clone(),
                None => {
                    return Err(self.fail(Error::malformed(
                        "object pointer",
                        format!("class reference {:#x} names no class seen so far", *cref),
                    )))
                }
            }
        };

        let mut obj = match Factory::construct(&class) {
            Ok(obj) => obj,
            Err(e) => return Err(self.fail(e)),
        };
        obj.unmarshal(self)?;

        if bcnt != 0 {
            let consumed = self.pos() - beg - BYTE_COUNT_LEN;
            if consumed != u64::from(bcnt) {
                return Err(self.fail(Error::Corruption {
                    class,
                    expected: u64::from(bcnt),
                    actual: consumed,
                }));
            }
        }
        Ok(Some(obj))
    }

    /// Reads a pointer whose referent must be a `T`.
    pub fn read_object_as<T: Object>(&mut self) -> Result<Option<T>> {
        let obj = match self.read_object_any()? {
            None => return Ok(None),
            Some(obj) => obj,
        };
        let class = obj.class();
        match obj.into_any().downcast::<T>() {
            Ok(t) => Ok(Some(*t)),
            Err(_) => Err(self.fail(Error::TypeMismatch {
                expected: any::type_name::<T>(),
                actual: class.to_owned(),
            })),
        }
    }
}
