use super::helpers::{decode, encode, entry, pedestals};
use anyhow::{anyhow, Result};
use ocdb_muoncalib::{CalibParamND, TwoDMap};
use ocdb_records::{Entry, Path};
use ocdb_types::serde::{BYTE_COUNT_LEN, BYTE_COUNT_MASK};
use ocdb_types::Error;

pub fn test_corruption() -> Result<()> {
    let buf = encode(&entry(Box::new(pedestals(&[(100, 3), (100, 7)])?)))?;

    outer_byte_count(&buf)?;
    nested_byte_count(&buf)?;
    string_length(&buf)?;
    element_count(&buf)?;
    value_bytes(&buf)?;
    truncated(&buf)?;
    Ok(())
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut word = [0; 4];
    word.copy_from_slice(&buf[at..at + 4]);
    u32::from_be_bytes(word)
}

fn bump_byte_count(buf: &[u8], at: usize, delta: i64) -> Vec<u8> {
    let word = read_u32(buf, at);
    assert_ne!(0, word & BYTE_COUNT_MASK, "no byte count at {at}");
    let word = (i64::from(word) + delta) as u32;
    let mut buf = buf.to_vec();
    buf[at..at + 4].copy_from_slice(&word.to_be_bytes());
    buf
}

fn expect_corruption(buf: &[u8], class: &str) -> Result<()> {
    let err = decode::<Entry>(buf).err();
    let err = err.as_ref().and_then(|e| e.downcast_ref::<Error>());
    match err {
        Some(Error::Corruption {
            class: actual,
            expected,
            actual: consumed,
        }) => {
            assert_eq!(class, actual.as_str());
            assert_ne!(expected, consumed);
        }
        _ => panic!("expected corruption of {class}, got {err:?}"),
    }
    Ok(())
}

fn outer_byte_count(buf: &[u8]) -> Result<()> {
    expect_corruption(&bump_byte_count(buf, 0, 1), Entry::CLASS)?;
    expect_corruption(&bump_byte_count(buf, 0, -1), Entry::CLASS)?;
    Ok(())
}

/// The entry's payload pointer comes right after the entry header and its base:
/// pointer byte count, new-class tag, class name. Then the payload's own frame.
fn nested_byte_count(buf: &[u8]) -> Result<()> {
    let base_len = 2 + 4 + 4;
    let at = (BYTE_COUNT_LEN as usize + 2) + base_len + 4 + 4 + TwoDMap::CLASS.len() + 1;
    expect_corruption(&bump_byte_count(buf, at, 1), TwoDMap::CLASS)?;
    Ok(())
}

fn find(buf: &[u8], needle: &[u8]) -> Result<usize> {
    buf.windows(needle.len())
        .position(|w| w == needle)
        .ok_or_else(|| anyhow!("{needle:?} not in the record"))
}

/// A string length prefix inside the entry's id path shifts every later field of
/// the path frame.
fn string_length(buf: &[u8]) -> Result<()> {
    let at = find(buf, b"MUON/Calib/Pedestals")? - 1;
    assert_eq!(20, buf[at]);
    let mut buf = buf.to_vec();
    buf[at] += 1;
    expect_corruption(&buf, Path::CLASS)
}

/// The first param's value count: count 6, presence marker 1, then 0.0.
fn element_count(buf: &[u8]) -> Result<()> {
    let mut needle = vec![0, 0, 0, 6, 1];
    needle.extend(0f64.to_be_bytes());
    let at = find(buf, &needle)?;

    let mut grown = buf.to_vec();
    grown[at + 3] = 7;
    expect_corruption(&grown, CalibParamND::CLASS)?;

    let mut negative = buf.to_vec();
    negative[at..at + 4].copy_from_slice(&(-1i32).to_be_bytes());
    expect_corruption(&negative, CalibParamND::CLASS)?;
    Ok(())
}

/// Byte counts locate fields; they say nothing about their values. A flipped
/// value or id byte decodes into a different, equally well-formed entry.
fn value_bytes(buf: &[u8]) -> Result<()> {
    let at = find(buf, &5f64.to_be_bytes())?;
    let mut buf = buf.to_vec();
    buf[at + 1] ^= 0x01;
    let out = decode::<Entry>(&buf)?;
    let m = out
        .object_as::<TwoDMap>()
        .ok_or_else(|| anyhow!("payload is not a {}", TwoDMap::CLASS))?;
    let p = m
        .lookup_as::<CalibParamND>(100, 3)
        .ok_or_else(|| anyhow!("no param for (100, 3)"))?;
    assert_ne!(5.0, p.value_at(1, 2)?);
    Ok(())
}

fn truncated(buf: &[u8]) -> Result<()> {
    expect_corruption(&buf[..buf.len() - 1], Entry::CLASS)?;

    let err = decode::<Entry>(&buf[..2]).err();
    let err = err.as_ref().and_then(|e| e.downcast_ref::<Error>());
    assert!(matches!(err, Some(Error::Stream { .. })), "{err:?}");
    Ok(())
}
