use anyhow::Result;
use ocdb_file::fs_utils;
use std::fs;

mod records;
use records::corruption::test_corruption;
use records::roundtrip::test_roundtrips;
use records::scenario::test_pedestal_entry;
use records::sparse_map::test_sparse_map_determinism;

fn register_types() -> Result<()> {
    ocdb_records::register_types()?;
    ocdb_muoncalib::register_types()?;
    Ok(())
}

#[test]
fn integration_test_records() -> Result<()> {
    register_types()?;

    test_roundtrips()?;
    test_sparse_map_determinism()?;
    test_corruption()?;

    Ok(())
}

#[test]
fn integration_test_container() -> Result<()> {
    register_types()?;

    let dir = fs_utils::default_scratch_dir("ocdb_tests");
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs_utils::create_dir_all(&dir)?;

    test_pedestal_entry(&dir.join("pedestals.ocdb"))?;

    Ok(())
}
