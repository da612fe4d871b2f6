use crate::{ExMap, VStore};
use itertools::Itertools;
use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, Object, Unmarshaler,
};
use ocdb_types::{Error, Result};

/// A (detection element, manu) pair. Orders by detection element first.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct Manu {
    pub de_id: i64,
    pub manu_id: i64,
}

/// A two-level sparse map: outer key -> inner [`ExMap`] -> object.
#[derive(PartialEq, Clone, Debug)]
pub struct TwoDMap {
    pub base: VStore,
    map: Option<ExMap>,
    pub optimize_for_de_manu: bool,
}

impl Default for TwoDMap {
    fn default() -> Self {
        Self {
            base: VStore::default(),
            map: Some(ExMap::new()),
            optimize_for_de_manu: true,
        }
    }
}

impl TwoDMap {
    pub const CLASS: &'static str = "AliMUON2DMap";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn ex_map(&self) -> Option<&ExMap> {
        self.map.as_ref()
    }

    fn inner_maps(&self) -> impl Iterator<Item = (i64, &ExMap)> {
        self.map
            .iter()
            .flat_map(|outer| outer.iter())
            .filter_map(|(k, obj)| Some((k, obj?.downcast_ref::<ExMap>()?)))
    }

    pub fn lookup(&self, outer: i64, inner: i64) -> Option<&dyn Object> {
        self.inner_maps()
            .find(|(k, _)| *k == outer)
            .and_then(|(_, inner_map)| inner_map.get(inner))
    }

    pub fn lookup_as<T: Object>(&self, outer: i64, inner: i64) -> Option<&T> {
        self.lookup(outer, inner)?.downcast_ref::<T>()
    }

    /// Replaces the object already stored for the pair, if any.
    pub fn insert(&mut self, outer: i64, inner: i64, obj: Box<dyn Object>) -> Result<()> {
        let outer_map = self.map.get_or_insert_with(ExMap::new);
        if outer_map.get(outer).is_none() {
            outer_map.insert(outer, Box::new(ExMap::new()))?;
        }
        match outer_map
            .get_mut(outer)
            .and_then(|obj| obj.downcast_mut::<ExMap>())
        {
            Some(inner_map) => inner_map.insert(inner, obj),
            None => Err(Error::malformed(
                Self::CLASS,
                format!("outer key {outer} does not hold an {}", ExMap::CLASS),
            )),
        }
    }

    /// All pairs held for `de_id`, sorted.
    pub fn manus_for(&self, de_id: i64) -> Vec<Manu> {
        self.inner_maps()
            .filter(|(k, _)| *k == de_id)
            .flat_map(|(_, inner_map)| inner_map.sorted_keys())
            .map(|manu_id| Manu { de_id, manu_id })
            .sorted()
            .collect()
    }

    /// All pairs, sorted.
    pub fn manus(&self) -> Vec<Manu> {
        self.inner_maps()
            .flat_map(|(de_id, inner_map)| {
                inner_map
                    .keys()
                    .iter()
                    .map(move |manu_id| Manu {
                        de_id,
                        manu_id: *manu_id,
                    })
                    .collect::<Vec<_>>()
            })
            .sorted()
            .collect()
    }

    /// Number of (outer, inner) pairs.
    pub fn len(&self) -> usize {
        self.inner_maps().map(|(_, inner_map)| inner_map.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Object for TwoDMap {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for TwoDMap {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_object_any(self.map.as_ref().map(|map| map as &dyn Object))?;
        w.write_bool(self.optimize_for_de_manu)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for TwoDMap {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.map = r.read_object_as::<ExMap>()?;
        self.optimize_for_de_manu = r.read_bool()?;

        if let Some(outer_map) = &self.map {
            for (k, obj) in outer_map.iter() {
                if !obj.map_or(false, |obj| obj.is::<ExMap>()) {
                    return Err(r.fail(Error::malformed(
                        Self::CLASS,
                        format!("outer key {k} does not hold an {}", ExMap::CLASS),
                    )));
                }
            }
        }

        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for TwoDMap {
    fn describe() -> ClassDescriptor {
        // The descriptor is one version ahead of the frames this class writes.
        ClassDescriptor::new(
            Self::CLASS,
            2,
            vec![
                FieldDescriptor::base(VStore::CLASS),
                FieldDescriptor::object_ptr("fMap", ExMap::CLASS),
                FieldDescriptor::basic("fOptimizeForDEManu", FieldKind::Bool, "Bool_t"),
            ],
        )
        .with_checksum(0x6cd6_4b39)
    }
}
