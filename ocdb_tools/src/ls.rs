use anyhow::{Context, Result};
use ocdb_file::OcdbFile;
use ocdb_records::Entry;
use ocdb_types::types::Object;
use regex::Regex;
use std::io::{self, Write};
use std::path::Path;

pub fn print_object(obj: &dyn Object, out: &mut impl Write) -> io::Result<()> {
    match obj.downcast_ref::<Entry>() {
        Some(entry) => entry.display(out),
        None => writeln!(out, "{obj:?}"),
    }
}

/// Decodes and prints every key of the container at `path` that matches `filter`.
///
/// Stops at the first record that fails to decode. Returns the number of keys printed.
pub fn ls<P: AsRef<Path>>(path: P, filter: Option<&Regex>, out: &mut impl Write) -> Result<usize> {
    let path = path.as_ref();
    let file = OcdbFile::open(path)?;

    let names = file
        .keys()
        .filter(|name| filter.map_or(true, |re| re.is_match(name)))
        .map(str::to_owned)
        .collect::<Vec<_>>();
    for name in names.iter() {
        let class = file.class_of(name)?;
        tracing::info!(key = %name, class, "key");
        let obj = file.get(name)?;
        writeln!(out, "--- {name} ---").context("write")?;
        print_object(obj.as_ref(), out).context("write")?;
    }

    file.close()?;
    Ok(names.len())
}
