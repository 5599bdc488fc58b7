use std::fmt;

use thiserror::Error;

pub const ERR_MSG_K: &str = "Invalid number of clusters!";
pub const ERR_MSG_ITER: &str = "Invalid maximum max_iteration!";
pub const ERR_MSG_DEFAULT: &str = "An Error Has Occurred";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cluster count k={k} is outside [2, {n})")]
    InvalidClusterCount { k: usize, n: usize },
    #[error("iteration bound max_iter={max_iter} is outside [2, 999]")]
    InvalidIterationBound { max_iter: usize },
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidClusterCount { .. } => ERR_MSG_K,
            Self::InvalidIterationBound { .. } => ERR_MSG_ITER,
        }
    }
}

/// Every rule that failed in one validation pass, cluster count first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new(mut errors: Vec<ValidationError>) -> Self {
        errors.sort_by_key(|e| match e {
            ValidationError::InvalidClusterCount { .. } => 0,
            ValidationError::InvalidIterationBound { .. } => 1,
        });
        Self(errors)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_cluster_count(&self) -> bool {
        self.iter()
            .any(|e| matches!(e, ValidationError::InvalidClusterCount { .. }))
    }

    pub fn has_iteration_bound(&self) -> bool {
        self.iter()
            .any(|e| matches!(e, ValidationError::InvalidIterationBound { .. }))
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum KmeansError {
    #[error("dataset has no rows or zero-length rows")]
    EmptyDataset,
    #[error("row {row} has {found} values, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("cannot draw centroid {round}: total weight is {total}")]
    DegenerateDataset { round: usize, total: f64 },
    #[error("refinement produced no usable centroids")]
    FitFailed,
    #[error("input unreadable: {0}")]
    InputUnreadable(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl From<ValidationError> for KmeansError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.into())
    }
}

impl From<csv::Error> for KmeansError {
    fn from(e: csv::Error) -> Self {
        Self::InputUnreadable(e.to_string())
    }
}

impl KmeansError {
    /// Lines shown to the user. Only the two validation rules get specific text.
    pub fn user_messages(&self) -> Vec<&'static str> {
        match self {
            Self::Validation(errors) => errors.iter().map(|e| e.user_message()).collect(),
            _ => vec![ERR_MSG_DEFAULT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_keep_cluster_count_first() {
        let errs = ValidationErrors::new(vec![
            ValidationError::InvalidIterationBound { max_iter: 1 },
            ValidationError::InvalidClusterCount { k: 1, n: 6 },
        ]);
        let e = KmeansError::from(errs);
        assert_eq!(e.user_messages(), vec![ERR_MSG_K, ERR_MSG_ITER]);
    }

    #[test]
    fn unexpected_failures_collapse_to_generic_message() {
        for e in [
            KmeansError::FitFailed,
            KmeansError::EmptyDataset,
            KmeansError::InputUnreadable("bad float in row 3".into()),
            KmeansError::DegenerateDataset {
                round: 1,
                total: 0.0,
            },
        ] {
            assert_eq!(e.user_messages(), vec![ERR_MSG_DEFAULT]);
        }
    }
}
