use super::helpers::{decode, encode, entry, param, pedestals};
use anyhow::{anyhow, Result};
use ocdb_muoncalib::{CalibParamND, ExMap, TwoDMap};
use ocdb_records::Entry;
use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{ArrayL64, Map, ObjArray, ObjString, Object};

pub fn test_roundtrips() -> Result<()> {
    full_entry()?;
    bare_entry()?;
    empty_payloads()?;
    entry_behind_pointer()?;
    Ok(())
}

fn full_entry() -> Result<()> {
    let e = entry(Box::new(pedestals(&[(100, 3), (100, 7), (200, 1)])?));
    let out = decode::<Entry>(&encode(&e)?)?;
    assert_eq!(e, out);

    let m = out
        .object_as::<TwoDMap>()
        .ok_or_else(|| anyhow!("payload is not a {}", TwoDMap::CLASS))?;
    assert_eq!(3, m.len());
    assert_eq!(Some(&param(200, 1)?), m.lookup_as::<CalibParamND>(200, 1));
    Ok(())
}

fn bare_entry() -> Result<()> {
    let e = Entry::default();
    let out = decode::<Entry>(&encode(&e)?)?;
    assert_eq!(e, out);
    assert!(out.object.is_none());
    assert!(out.meta.is_none());
    Ok(())
}

fn empty_payloads() -> Result<()> {
    let p = CalibParamND::new(0, 0, 1, 2);
    assert_eq!(p, decode::<CalibParamND>(&encode(&p)?)?);

    let m = TwoDMap::new();
    let out = decode::<TwoDMap>(&encode(&m)?)?;
    assert_eq!(m, out);
    assert!(out.is_empty());

    assert_eq!(ExMap::new(), decode::<ExMap>(&encode(&ExMap::new())?)?);
    assert_eq!(ObjArray::new(), decode::<ObjArray>(&encode(&ObjArray::new())?)?);
    assert_eq!(Map::new(), decode::<Map>(&encode(&Map::new())?)?);
    assert_eq!(ArrayL64::default(), decode::<ArrayL64>(&encode(&ArrayL64::default())?)?);
    Ok(())
}

/// The reader learns the concrete class from the pointer alone.
fn entry_behind_pointer() -> Result<()> {
    let payloads = [
        entry(Box::new(ObjString::new("note"))),
        entry(Box::new(param(5, 6)?)),
    ];

    let mut w = WBuffer::new();
    for e in payloads.iter() {
        w.write_object_any(Some(e as &dyn Object))?;
    }
    w.write_object_any(None)?;
    let buf = w.into_bytes();

    let mut r = RBuffer::new(&buf);
    for e in payloads.iter() {
        let obj = r
            .read_object_any()?
            .ok_or_else(|| anyhow!("null pointer"))?;
        assert_eq!(Some(e), obj.downcast_ref::<Entry>());
    }
    assert!(r.read_object_any()?.is_none());
    assert_eq!(0, r.remaining());
    Ok(())
}
