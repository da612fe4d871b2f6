use super::helpers::{decode, encode, param};
use anyhow::{anyhow, Result};
use itertools::Itertools;
use ocdb_muoncalib::{CalibParamND, Manu, TwoDMap};
use rand::prelude::*;

pub fn test_sparse_map_determinism() -> Result<()> {
    every_order()?;
    shuffled()?;
    Ok(())
}

fn build(pairs: &[(u16, u16)]) -> Result<TwoDMap> {
    let mut m = TwoDMap::new();
    for &(de_id, manu_id) in pairs {
        m.insert(de_id.into(), manu_id.into(), Box::new(param(de_id, manu_id)?))?;
    }
    decode::<TwoDMap>(&encode(&m)?)
}

fn verify(m: &TwoDMap, pairs: &[(u16, u16)]) -> Result<()> {
    let expected = pairs
        .iter()
        .map(|&(de_id, manu_id)| Manu {
            de_id: de_id.into(),
            manu_id: manu_id.into(),
        })
        .sorted()
        .collect::<Vec<_>>();
    assert_eq!(expected, m.manus());

    for &(de_id, manu_id) in pairs {
        let p = m
            .lookup_as::<CalibParamND>(de_id.into(), manu_id.into())
            .ok_or_else(|| anyhow!("no param for ({de_id}, {manu_id})"))?;
        assert_eq!((de_id, manu_id), (p.id0(), p.id1()));
    }
    Ok(())
}

fn every_order() -> Result<()> {
    let pairs = [(1100, 4), (1100, 2), (500, 9), (501, 9)];
    for order in pairs.iter().copied().permutations(pairs.len()) {
        verify(&build(&order)?, &pairs)?;
    }
    Ok(())
}

fn shuffled() -> Result<()> {
    let mut pairs = (0..20u16)
        .cartesian_product(0..10u16)
        .map(|(de, manu)| (100 * (de + 1), 2 * manu + 1))
        .collect::<Vec<_>>();

    let mut rng = thread_rng();
    for _ in 0..10 {
        pairs.shuffle(&mut rng);
        let m = build(&pairs)?;
        verify(&m, &pairs)?;
        assert_eq!(pairs.len(), m.len());

        let de_id = i64::from(pairs[0].0);
        let manus = (0..10)
            .map(|i| Manu {
                de_id,
                manu_id: 2 * i + 1,
            })
            .collect::<Vec<_>>();
        assert_eq!(manus, m.manus_for(de_id));
    }
    Ok(())
}
