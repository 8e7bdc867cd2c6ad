use std::fs::File;
use std::io::{self, BufRead, BufReader};

use crate::error::{Error, Result};

/// Source name that reads standard input.
pub const STDIN: &str = "-";

/// Parse one number per line. Surrounding whitespace is ignored but blank
/// lines are not.
pub fn read_values<R: BufRead>(source_name: &str, reader: R) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| Error::Read {
            source_name: source_name.to_string(),
            source,
        })?;
        let text = line.trim();
        let value = text.parse::<f64>().map_err(|source| Error::MalformedInput {
            source_name: source_name.to_string(),
            line: i + 1,
            text: text.to_string(),
            source,
        })?;
        values.push(value);
    }

    if values.is_empty() {
        return Err(Error::EmptySource(source_name.to_string()));
    }
    Ok(values)
}

pub fn read_source(source_name: &str) -> Result<Vec<f64>> {
    if source_name == STDIN {
        let stdin = io::stdin();
        return read_values("stdin", stdin.lock());
    }
    let file = File::open(source_name).map_err(|source| Error::Open {
        source_name: source_name.to_string(),
        source,
    })?;
    read_values(source_name, BufReader::new(file))
}
