use crate::VCalibParam;
use ocdb_types::serde::{RBuffer, WBuffer};
use ocdb_types::types::{
    ClassDescriptor, Describe, FieldDescriptor, FieldKind, Marshaler, Object, Unmarshaler,
};
use ocdb_types::{Error, Result};
use std::io::{self, Write};

/// A table of `size` rows (channels) by `dimension` columns, stored column-major.
#[derive(Default, PartialEq, Clone, Debug)]
pub struct CalibParamND {
    pub base: VCalibParam,
    dimension: i32,
    size: i32,
    values: Vec<f64>,
}

fn extent(v: i32) -> usize {
    usize::try_from(v).unwrap_or(0)
}

impl CalibParamND {
    pub const CLASS: &'static str = "AliMUONCalibParamND";

    /// Zero-filled.
    pub fn new(dimension: i32, size: i32, id0: u16, id1: u16) -> Self {
        Self {
            base: VCalibParam::with_ids(id0, id1),
            dimension,
            size,
            values: vec![0.0; extent(dimension) * extent(size)],
        }
    }

    pub fn dimension(&self) -> i32 {
        self.dimension
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn id0(&self) -> u16 {
        self.base.id0()
    }

    pub fn id1(&self) -> u16 {
        self.base.id1()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= extent(self.size) {
            return Err(Error::bounds("row", row, extent(self.size)));
        }
        if col >= extent(self.dimension) {
            return Err(Error::bounds("column", col, extent(self.dimension)));
        }
        let i = row + extent(self.size) * col;
        if i >= self.values.len() {
            return Err(Error::bounds("value", i, self.values.len()));
        }
        Ok(i)
    }

    pub fn value_at(&self, row: usize, col: usize) -> Result<f64> {
        let i = self.index(row, col)?;
        Ok(self.values[i])
    }

    pub fn set_value_at(&mut self, row: usize, col: usize, v: f64) -> Result<()> {
        let i = self.index(row, col)?;
        self.values[i] = v;
        Ok(())
    }

    /// Mean and sample standard deviation of column `col` over all rows.
    /// An empty column yields zeros; a single row has zero sigma.
    pub fn mean_and_sigma(&self, col: usize) -> Result<(f64, f64)> {
        let n = extent(self.size);
        if n == 0 {
            return Ok((0.0, 0.0));
        }
        let (mut sum, mut sum2) = (0.0, 0.0);
        for row in 0..n {
            let v = self.value_at(row, col)?;
            sum += v;
            sum2 += v * v;
        }
        let nf = n as f64;
        let mean = sum / nf;
        let sigma = if n > 1 {
            ((sum2 - nf * mean * mean) / (nf - 1.0)).sqrt()
        } else {
            0.0
        };
        Ok((mean, sigma))
    }

    /// `opt` is case-insensitive. `FULL` adds one line per channel;
    /// `MEAN<col>` adds the mean and sigma of column `col` (default 0).
    pub fn print(&self, w: &mut impl Write, opt: &str) -> io::Result<()> {
        writeln!(
            w,
            "{} Id=({},{}) Size={} Dimension={}",
            Self::CLASS,
            self.id0(),
            self.id1(),
            self.size,
            self.dimension
        )?;

        let opt = opt.to_uppercase();
        if opt.contains("FULL") {
            for row in 0..extent(self.size) {
                write!(w, "CH {row:3}")?;
                for col in 0..extent(self.dimension) {
                    let v = self.value_at(row, col).unwrap_or(f64::NAN);
                    write!(w, " {v}")?;
                }
                writeln!(w)?;
            }
        }
        if let Some(at) = opt.find("MEAN") {
            let digits = opt[at + "MEAN".len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect::<String>();
            let col = digits.parse::<usize>().unwrap_or(0);
            match self.mean_and_sigma(col) {
                Ok((mean, sigma)) => {
                    writeln!(w, " Mean(j={col})={mean} Sigma(j={col})={sigma}")?
                }
                Err(e) => writeln!(w, " Mean(j={col}): {e}")?,
            }
        }
        Ok(())
    }
}

impl Object for CalibParamND {
    fn class(&self) -> &'static str {
        Self::CLASS
    }
    fn rversion(&self) -> i16 {
        1
    }
}

impl Marshaler for CalibParamND {
    fn marshal(&self, w: &mut WBuffer) -> Result<usize> {
        w.check()?;
        let pos = w.write_version(self.rversion())?;
        self.base.marshal(w)?;
        w.write_i32(self.dimension)?;
        w.write_i32(self.size)?;
        w.write_count(self.values.len())?;
        // Array presence marker.
        w.write_i8(i8::from(!self.values.is_empty()))?;
        w.write_fast_array_f64(&self.values)?;
        w.set_byte_count(pos, Self::CLASS)
    }
}

impl Unmarshaler for CalibParamND {
    fn unmarshal(&mut self, r: &mut RBuffer) -> Result<()> {
        r.check()?;
        let hdr = r.read_version(Self::CLASS)?;
        self.base.unmarshal(r)?;
        self.dimension = r.read_i32()?;
        self.size = r.read_i32()?;
        let n = r.read_count(Self::CLASS)?;
        let present = r.read_i8()? != 0;
        self.values = match present {
            true => r.read_fast_array_f64(n)?,
            false => vec![],
        };
        r.check_byte_count(&hdr, Self::CLASS)
    }
}

impl Describe for CalibParamND {
    fn describe() -> ClassDescriptor {
        ClassDescriptor::new(
            Self::CLASS,
            1,
            vec![
                FieldDescriptor::base(VCalibParam::CLASS),
                FieldDescriptor::basic("fDimension", FieldKind::Int, "Int_t"),
                FieldDescriptor::basic("fSize", FieldKind::Int, "Int_t"),
                FieldDescriptor::basic("fN", FieldKind::Counter, "Int_t"),
                FieldDescriptor::array("fValues", FieldKind::DoublePtr, "Double_t*", "fN"),
            ],
        )
        .with_checksum(0xb1a7_e64a)
    }
}
