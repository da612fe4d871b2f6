use super::helpers::{entry, pedestals, DIMENSION, SIZE};
use anyhow::{anyhow, Result};
use ocdb_file::{OcdbFile, OcdbWriter};
use ocdb_muoncalib::{CalibParamND, Manu, TwoDMap};
use ocdb_records::Entry;
use std::path::Path;

const KEY: &str = "MUON/Calib/Pedestals/Run0_999999_v1_s0";

/// Store one pedestal entry in a container, reopen it and look a channel value up.
pub fn test_pedestal_entry(path: &Path) -> Result<()> {
    let stored = entry(Box::new(pedestals(&[(100, 3), (100, 7)])?));

    let mut w = OcdbWriter::create(path)?;
    w.put(KEY, &stored)?;
    w.close()?;

    let f = OcdbFile::open(path)?;
    assert_eq!(vec![KEY], f.keys().collect::<Vec<_>>());
    assert_eq!(Entry::CLASS, f.class_of(KEY)?);
    let loaded = f.get_as::<Entry>(KEY)?;
    f.close()?;

    assert_eq!(stored, loaded);
    assert_eq!("MUON/Calib/Pedestals", loaded.id.path.path);
    assert_eq!(["MUON", "Calib", "Pedestals"], loaded.id.path.levels());

    let m = loaded
        .object_as::<TwoDMap>()
        .ok_or_else(|| anyhow!("payload is not a {}", TwoDMap::CLASS))?;
    assert_eq!(
        vec![
            Manu {
                de_id: 100,
                manu_id: 3
            },
            Manu {
                de_id: 100,
                manu_id: 7
            },
        ],
        m.manus()
    );

    let p = m
        .lookup_as::<CalibParamND>(100, 7)
        .ok_or_else(|| anyhow!("no param for (100, 7)"))?;
    assert_eq!((DIMENSION, SIZE), (p.dimension(), p.size()));
    assert_eq!((100, 7), (p.id0(), p.id1()));
    assert_eq!(5.0, p.value_at(1, 2)?);

    assert!(m.lookup(100, 5).is_none());
    assert!(m.lookup(101, 3).is_none());

    Ok(())
}
