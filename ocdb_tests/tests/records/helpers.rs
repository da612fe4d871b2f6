use anyhow::{anyhow, Result};
use ocdb_muoncalib::{CalibParamND, TwoDMap};
use ocdb_records::{Entry, Id, MetaData, Path, RunRange};
use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{Marshaler, ObjString, Object, Unmarshaler};

pub const DIMENSION: i32 = 3;
pub const SIZE: i32 = 2;

/// A `SIZE` x `DIMENSION` param whose values count up from 0 in storage order.
pub fn param(de_id: u16, manu_id: u16) -> Result<CalibParamND> {
    let mut p = CalibParamND::new(DIMENSION, SIZE, de_id, manu_id);
    let mut v = 0.0;
    for col in 0..DIMENSION as usize {
        for row in 0..SIZE as usize {
            p.set_value_at(row, col, v)?;
            v += 1.0;
        }
    }
    Ok(p)
}

pub fn pedestals(pairs: &[(u16, u16)]) -> Result<TwoDMap> {
    let mut m = TwoDMap::new();
    for &(de_id, manu_id) in pairs {
        m.insert(de_id.into(), manu_id.into(), Box::new(param(de_id, manu_id)?))?;
    }
    Ok(m)
}

pub fn entry(payload: Box<dyn Object>) -> Entry {
    let mut meta = MetaData {
        object_class_name: payload.class().into(),
        responsible: "calib".into(),
        beam_period: 1,
        comment: "pedestals".into(),
        ..MetaData::default()
    };
    meta.set_property("run type", Box::new(ObjString::new("PEDESTAL")));

    let id = Id::new(Path::new("MUON/Calib/Pedestals"), RunRange::new(0, 999_999), 1, 0);
    Entry::new(payload, id, Some(meta))
}

pub fn encode<T: Marshaler + ?Sized>(obj: &T) -> Result<Vec<u8>> {
    let mut w = WBuffer::new();
    let n = obj.marshal(&mut w)?;
    let buf = w.into_bytes();
    if n != buf.len() {
        return Err(anyhow!("marshal reported {n} bytes, wrote {}", buf.len()));
    }
    Ok(buf)
}

/// Decodes one whole record. Leftover bytes are an error.
pub fn decode<T: Unmarshaler + Default>(buf: &[u8]) -> Result<T> {
    let mut obj = T::default();
    let mut r = RBuffer::new(buf);
    obj.unmarshal(&mut r)?;
    if r.remaining() != 0 {
        return Err(anyhow!("{} trailing bytes", r.remaining()));
    }
    Ok(obj)
}
