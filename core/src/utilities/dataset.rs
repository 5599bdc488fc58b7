use crate::utilities::error::KmeansError;
use crate::utilities::structs::Point;

/// Ordered rows of equal dimension. Row position is the row's identity.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorDataset {
    rows: Vec<Point>,
    dim: usize,
}

impl VectorDataset {
    pub fn new(rows: Vec<Point>) -> Result<Self, KmeansError> {
        let dim = match rows.first() {
            Some(r) if !r.is_empty() => r.len(),
            _ => return Err(KmeansError::EmptyDataset),
        };
        for (i, r) in rows.iter().enumerate().skip(1) {
            if r.len() != dim {
                return Err(KmeansError::DimensionMismatch {
                    row: i,
                    expected: dim,
                    found: r.len(),
                });
            }
        }
        Ok(Self { rows, dim })
    }

    /// Builds a dataset from `n_rows * n_cols` row-major values.
    pub fn from_flat(values: &[f64], n_rows: usize, n_cols: usize) -> Result<Self, KmeansError> {
        if n_rows == 0 || n_cols == 0 {
            return Err(KmeansError::EmptyDataset);
        }
        match n_rows.checked_mul(n_cols) {
            Some(need) if need == values.len() => {}
            _ => {
                return Err(KmeansError::DimensionMismatch {
                    row: values.len() / n_cols,
                    expected: n_cols,
                    found: values.len() % n_cols,
                });
            }
        }
        Self::new(values.chunks_exact(n_cols).map(|c| c.to_vec()).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Panics when `i >= len()`, like slice indexing.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    pub fn get(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(|r| r.as_slice())
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.rows
    }
}

impl TryFrom<Vec<Point>> for VectorDataset {
    type Error = KmeansError;

    fn try_from(rows: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}
