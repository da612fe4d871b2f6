#[cfg(test)]
mod test {
    use crate::*;
    use anyhow::Result;
    use ocdb_types::serde::{RBuffer, WBuffer};
    use ocdb_types::types::{
        Base, Factory, Marshaler, ObjArray, ObjString, Streamers, Unmarshaler,
    };
    use ocdb_types::Error;
    use rand::prelude::*;

    fn param(id0: u16, id1: u16) -> Result<CalibParamND> {
        let mut p = CalibParamND::new(3, 2, id0, id1);
        for col in 0..3 {
            for row in 0..2 {
                p.set_value_at(row, col, (row + 2 * col) as f64)?;
            }
        }
        Ok(p)
    }

    fn roundtrip<T: Marshaler + Unmarshaler + Default>(obj: &T) -> Result<T> {
        let mut w = WBuffer::new();
        let n = obj.marshal(&mut w)?;
        let buf = w.into_bytes();
        assert_eq!(n, buf.len());

        let mut out = T::default();
        let mut r = RBuffer::new(&buf);
        out.unmarshal(&mut r)?;
        assert_eq!(0, r.remaining());
        Ok(out)
    }

    #[test]
    fn calib_param_values() -> Result<()> {
        let p = param(0x0123, 0x0456)?;
        assert_eq!(0x0123, p.id0());
        assert_eq!(0x0456, p.id1());
        assert_eq!(0x0456_0123, p.base.base.unique_id);

        /* Column-major. */
        assert_eq!(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], p.values());
        assert_eq!(5.0, p.value_at(1, 2)?);
        assert_eq!(2.0, p.value_at(0, 1)?);

        assert_eq!(Err(Error::bounds("row", 2, 2)), p.value_at(2, 0));
        assert_eq!(Err(Error::bounds("column", 3, 3)), p.value_at(0, 3));

        let (mean, sigma) = p.mean_and_sigma(2)?;
        assert_eq!(4.5, mean);
        assert!((sigma - 0.5f64.sqrt()).abs() < 1e-12, "{sigma}");
        Ok(())
    }

    #[test]
    fn calib_param_roundtrip() -> Result<()> {
        let p = param(1, 2)?;
        let out = roundtrip(&p)?;
        assert_eq!(p, out);
        assert_eq!(5.0, out.value_at(1, 2)?);

        let empty = CalibParamND::new(0, 0, 7, 0);
        let out = roundtrip(&empty)?;
        assert_eq!(empty, out);
        assert!(out.values().is_empty());
        Ok(())
    }

    /// The count is the sole source of truth for the number of values.
    #[test]
    fn calib_param_count_disagrees_with_shape() -> Result<()> {
        let mut w = WBuffer::new();
        let pos = w.write_version(1)?;
        VCalibParam::with_ids(1, 1).marshal(&mut w)?;
        w.write_i32(3)?;
        w.write_i32(2)?;
        w.write_i32(4)?;
        w.write_i8(1)?;
        w.write_fast_array_f64(&[1.0, 2.0, 3.0, 4.0])?;
        w.set_byte_count(pos, CalibParamND::CLASS)?;
        let buf = w.into_bytes();

        let mut p = CalibParamND::default();
        p.unmarshal(&mut RBuffer::new(&buf))?;
        assert_eq!(4, p.values().len());
        assert_eq!(4.0, p.value_at(1, 1)?);
        assert_eq!(Err(Error::bounds("value", 4, 4)), p.value_at(0, 2));
        Ok(())
    }

    #[test]
    fn calib_param_negative_count() -> Result<()> {
        let mut w = WBuffer::new();
        let pos = w.write_version(1)?;
        VCalibParam::default().marshal(&mut w)?;
        w.write_i32(1)?;
        w.write_i32(1)?;
        w.write_i32(-1)?;
        w.write_i8(1)?;
        w.set_byte_count(pos, CalibParamND::CLASS)?;
        let buf = w.into_bytes();

        let err = CalibParamND::default()
            .unmarshal(&mut RBuffer::new(&buf))
            .unwrap_err();
        assert!(
            matches!(&err, Error::Corruption { class, .. } if class == CalibParamND::CLASS),
            "{err:?}"
        );
        Ok(())
    }

    #[test]
    fn calib_param_print() -> Result<()> {
        let p = param(3, 9)?;
        let mut out = vec![];
        p.print(&mut out, "full mean2")?;
        let out = String::from_utf8(out)?;
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(
            vec![
                "AliMUONCalibParamND Id=(3,9) Size=2 Dimension=3",
                "CH   0 0 2 4",
                "CH   1 1 3 5",
                " Mean(j=2)=4.5 Sigma(j=2)=0.7071067811865476",
            ],
            lines
        );
        Ok(())
    }

    #[test]
    fn ex_map() -> Result<()> {
        register_types()?;

        let mut m = ExMap::new();
        m.insert(30, Box::new(ObjString::new("thirty")))?;
        m.insert(10, Box::new(ObjString::new("ten")))?;
        m.insert(30, Box::new(ObjString::new("THIRTY")))?;
        assert_eq!(2, m.len());
        assert_eq!(vec![10, 30], m.sorted_keys());

        let out = roundtrip(&m)?;
        assert_eq!(m, out);
        assert_eq!(
            Some("THIRTY"),
            out.get(30)
                .and_then(|o| o.downcast_ref::<ObjString>())
                .map(|s| s.as_str())
        );
        assert!(out.get(20).is_none());
        Ok(())
    }

    #[test]
    fn ex_map_parallel_arrays_disagree() -> Result<()> {
        register_types()?;

        let mut objs = ObjArray::new();
        objs.push(None);
        objs.push(None);
        let mut w = WBuffer::new();
        let pos = w.write_version(1)?;
        Base::default().marshal(&mut w)?;
        objs.marshal(&mut w)?;
        ocdb_types::types::ArrayL64::from(vec![1]).marshal(&mut w)?;
        w.set_byte_count(pos, ExMap::CLASS)?;
        let buf = w.into_bytes();

        let err = ExMap::new().unmarshal(&mut RBuffer::new(&buf)).unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }), "{err:?}");
        Ok(())
    }

    #[test]
    fn two_d_map() -> Result<()> {
        register_types()?;

        let mut m = TwoDMap::new();
        m.insert(100, 7, Box::new(param(7, 100)?))?;
        m.insert(100, 3, Box::new(param(3, 100)?))?;
        m.insert(5, 1, Box::new(param(1, 5)?))?;
        assert_eq!(3, m.len());

        let out = roundtrip(&m)?;
        assert_eq!(m, out);

        let p = out.lookup_as::<CalibParamND>(100, 7).expect("present");
        assert_eq!(5.0, p.value_at(1, 2)?);
        assert_eq!(7, p.id0());
        assert!(out.lookup(100, 4).is_none());
        assert!(out.lookup(6, 7).is_none());

        let manu = |de_id, manu_id| Manu { de_id, manu_id };
        assert_eq!(vec![manu(100, 3), manu(100, 7)], out.manus_for(100));
        assert!(out.manus_for(42).is_empty());
        assert_eq!(
            vec![manu(5, 1), manu(100, 3), manu(100, 7)],
            out.manus()
        );

        /* Replacing keeps the pair count. */
        let mut out = out;
        out.insert(100, 7, Box::new(CalibParamND::new(1, 1, 0, 0)))?;
        assert_eq!(3, out.len());
        assert_eq!(
            Some(1),
            out.lookup_as::<CalibParamND>(100, 7).map(|p| p.size())
        );
        Ok(())
    }

    #[test]
    fn two_d_map_enumeration_ignores_insertion_order() -> Result<()> {
        register_types()?;

        let mut pairs = vec![];
        for de_id in [100, 200, 300, 1025] {
            for manu_id in [1, 7, 3, 1124] {
                pairs.push((de_id, manu_id));
            }
        }

        let mut rng = thread_rng();
        let mut expected = None;
        for _ in 0..5 {
            pairs.shuffle(&mut rng);
            let mut m = TwoDMap::new();
            for (de_id, manu_id) in pairs.iter() {
                m.insert(*de_id, *manu_id, Box::new(param(0, 0)?))?;
            }
            let manus = roundtrip(&m)?.manus();
            assert_eq!(pairs.len(), manus.len());
            if let Some(expected) = &expected {
                assert_eq!(expected, &manus);
            }
            expected = Some(manus);
        }
        Ok(())
    }

    #[test]
    fn two_d_map_null_pointer() -> Result<()> {
        register_types()?;

        let mut w = WBuffer::new();
        let pos = w.write_version(1)?;
        VStore::default().marshal(&mut w)?;
        w.write_object_any(None)?;
        w.write_bool(false)?;
        w.set_byte_count(pos, TwoDMap::CLASS)?;
        let buf = w.into_bytes();

        let mut m = TwoDMap::new();
        m.unmarshal(&mut RBuffer::new(&buf))?;
        assert!(m.ex_map().is_none());
        assert!(m.lookup(1, 1).is_none());
        assert!(m.manus().is_empty());
        assert!(m.is_empty());
        Ok(())
    }

    #[test]
    fn two_d_map_outer_value_not_a_map() -> Result<()> {
        register_types()?;

        let mut outer = ExMap::new();
        outer.insert(1, Box::new(ObjString::new("not a map")))?;
        let mut w = WBuffer::new();
        let pos = w.write_version(1)?;
        VStore::default().marshal(&mut w)?;
        w.write_object_any(Some(&outer))?;
        w.write_bool(true)?;
        w.set_byte_count(pos, TwoDMap::CLASS)?;
        let buf = w.into_bytes();

        let err = TwoDMap::new()
            .unmarshal(&mut RBuffer::new(&buf))
            .unwrap_err();
        assert!(matches!(err, Error::Malformed { .. }), "{err:?}");
        Ok(())
    }

    #[test]
    fn descriptors() -> Result<()> {
        register_types()?;

        let desc = Streamers::get(TwoDMap::CLASS).ok_or_else(|| anyhow::anyhow!("no descriptor"))?;
        assert_eq!(2, desc.version);
        assert_eq!(0x6cd6_4b39, desc.checksum);

        /* Frames stay at version 1. */
        let mut w = WBuffer::new();
        TwoDMap::new().marshal(&mut w)?;
        let mut r = RBuffer::new(w.bytes());
        assert_eq!(1, r.read_version(TwoDMap::CLASS)?.vers);

        for class in [VStore::CLASS, VCalibParam::CLASS, CalibParamND::CLASS, ExMap::CLASS] {
            assert!(Factory::contains(class), "{class}");
            assert!(Streamers::get(class).is_some(), "{class}");
        }
        Ok(())
    }
}
