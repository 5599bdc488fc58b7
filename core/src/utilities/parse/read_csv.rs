use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use crate::utilities::dataset::VectorDataset;
use crate::utilities::error::KmeansError;
use crate::utilities::structs::Point;

pub type KeyedRow = (f64, Point);

/// Headerless CSV: column 0 is a numeric key, the rest are features. Rows come
/// back sorted by key. Duplicate keys and ragged rows are rejected.
pub fn parse_keyed_csv(bytes: &[u8]) -> Result<Vec<KeyedRow>, KmeansError> {
    read_keyed(bytes)
}

fn read_keyed<R: Read>(input: R) -> Result<Vec<KeyedRow>, KmeansError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(input);

    let mut rows: Vec<KeyedRow> = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let mut fields = record.iter().map(|f| parse_field(f, line));
        let key = fields
            .next()
            .ok_or_else(|| unreadable(line, "missing key"))??;
        if !key.is_finite() {
            return Err(unreadable(line, "non-finite key"));
        }
        rows.push((key, fields.collect::<Result<Point, _>>()?));
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));
    if rows.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(KmeansError::InputUnreadable("duplicate key".into()));
    }
    Ok(rows)
}

/// Inner join on key, ascending. Features of `left` come first.
pub fn merge_keyed(left: &[KeyedRow], right: &[KeyedRow]) -> Vec<Point> {
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0usize, 0usize);
    while i < left.len() && j < right.len() {
        let (ka, kb) = (left[i].0, right[j].0);
        if ka < kb {
            i += 1;
        } else if kb < ka {
            j += 1;
        } else {
            let mut row = left[i].1.clone();
            row.extend_from_slice(&right[j].1);
            out.push(row);
            i += 1;
            j += 1;
        }
    }
    out
}

pub fn read_csv_files<P: AsRef<Path>, Q: AsRef<Path>>(
    file_1: P,
    file_2: Q,
) -> Result<VectorDataset, KmeansError> {
    let left = read(file_1.as_ref())?;
    let right = read(file_2.as_ref())?;
    let merged = merge_keyed(&left, &right);
    debug!(
        left = left.len(),
        right = right.len(),
        merged = merged.len(),
        "merged inputs"
    );
    if merged.is_empty() {
        return Err(KmeansError::InputUnreadable("no common keys".into()));
    }
    VectorDataset::new(merged).map_err(|e| KmeansError::InputUnreadable(e.to_string()))
}

fn read(path: &Path) -> Result<Vec<KeyedRow>, KmeansError> {
    let file = std::fs::File::open(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "cannot read input");
        KmeansError::InputUnreadable(format!("{}: {e}", path.display()))
    })?;
    read_keyed(file)
        .inspect_err(|e| warn!(path = %path.display(), error = %e, "cannot parse input"))
}

fn parse_field(field: &str, line: u64) -> Result<f64, KmeansError> {
    field.parse().map_err(|_| unreadable(line, "bad number"))
}

fn unreadable(line: u64, what: &str) -> KmeansError {
    KmeansError::InputUnreadable(format!("line {line}: {what}"))
}
