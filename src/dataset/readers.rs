use super::records::{MismatchRecord, PrimerRecord};
use super::store::DatasetStore;
use crate::error::VizError;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

const BUFFER_CAPACITY: usize = 128 * 1024;

#[derive(Debug, Clone)]
pub struct DataSources {
    pub mismatches: PathBuf,
    pub forwards: PathBuf,
    pub reverses: PathBuf,
}

// Rows are read as text and coerced field by field so that a bad cell can be
// reported with its column name.
#[derive(Debug, Deserialize)]
struct MismatchRow {
    mismatches: String,
    positions: String,
    bases: String,
    number_of_sequences: String,
}

#[derive(Debug, Deserialize)]
struct PrimerRow {
    name: String,
    sequence: String,
    start_position: String,
    stop_position: String,
    primer_length: String,
    capture_length: String,
}

/// Reads all three tables; any failure aborts the whole load
pub fn load_dataset(sources: &DataSources) -> Result<DatasetStore, VizError> {
    let mismatches = read_mismatches(open(&sources.mismatches)?, &label(&sources.mismatches))?;
    let forwards = read_primers(open(&sources.forwards)?, &label(&sources.forwards))?;
    let reverses = read_primers(open(&sources.reverses)?, &label(&sources.reverses))?;
    Ok(DatasetStore::new(mismatches, forwards, reverses))
}

pub fn read_mismatches<R: io::Read>(reader: R, origin: &str) -> Result<Vec<MismatchRecord>, VizError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<MismatchRow>().enumerate() {
        let row = row?;
        let at = RowRef { origin, row: index + 1 };
        let mismatch_count = at.count("mismatches", &row.mismatches)?;
        let sample_count = at.count("number_of_sequences", &row.number_of_sequences)?;
        if sample_count == 0 {
            return Err(at.invalid("number_of_sequences", &row.number_of_sequences));
        }
        if mismatch_count > sample_count {
            return Err(at.invalid("mismatches", &row.mismatches));
        }
        records.push(MismatchRecord {
            position: at.position("positions", &row.positions)?,
            mismatch_count,
            consensus_base: row.bases.chars().next().unwrap_or('N'),
            sample_count,
        });
    }
    log::debug!("Read {} mismatch rows from {}", records.len(), origin);
    Ok(records)
}

pub fn read_primers<R: io::Read>(reader: R, origin: &str) -> Result<Vec<PrimerRecord>, VizError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<PrimerRow>().enumerate() {
        let row = row?;
        let at = RowRef { origin, row: index + 1 };
        let start_position = at.integer("start_position", &row.start_position)?;
        let stop_position = at.integer("stop_position", &row.stop_position)?;
        if stop_position <= start_position {
            return Err(at.invalid("stop_position", &row.stop_position));
        }
        let primer_length = at.length("primer_length", &row.primer_length)?;
        let capture_length = at.length("capture_length", &row.capture_length)?;
        records.push(PrimerRecord {
            name: row.name,
            sequence: row.sequence,
            start_position,
            stop_position,
            primer_length,
            capture_length,
        });
    }
    log::debug!("Read {} primer rows from {}", records.len(), origin);
    Ok(records)
}

struct RowRef<'a> {
    origin: &'a str,
    row: usize,
}

impl RowRef<'_> {
    fn invalid(&self, field: &'static str, value: &str) -> VizError {
        VizError::InvalidRecord {
            origin: format!("{} row {}", self.origin, self.row),
            field,
            value: value.to_string(),
        }
    }

    fn integer(&self, field: &'static str, value: &str) -> Result<i64, VizError> {
        leading_integer(value).ok_or_else(|| self.invalid(field, value))
    }

    fn count(&self, field: &'static str, value: &str) -> Result<u32, VizError> {
        self.integer(field, value)
            .and_then(|n| u32::try_from(n).map_err(|_| self.invalid(field, value)))
    }

    fn position(&self, field: &'static str, value: &str) -> Result<i64, VizError> {
        match self.integer(field, value)? {
            n if n >= 0 => Ok(n),
            _ => Err(self.invalid(field, value)),
        }
    }

    fn length(&self, field: &'static str, value: &str) -> Result<i64, VizError> {
        match self.integer(field, value)? {
            n if n > 0 => Ok(n),
            _ => Err(self.invalid(field, value)),
        }
    }
}

/// Integer prefix of a cell: optional sign followed by digits. Anything after
/// the digits (a fractional part, units) is ignored; no digits means no value.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    let (negative, rest) = match *value.as_bytes().first()? {
        b'-' => (true, &value[1..]),
        b'+' => (false, &value[1..]),
        _ => (false, value),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn open(path: &Path) -> Result<BufReader<File>, VizError> {
    let file = File::open(path).map_err(|source| VizError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(BufReader::with_capacity(BUFFER_CAPACITY, file))
}

fn label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
