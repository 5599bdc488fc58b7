use crate::utilities::error::{ValidationError, ValidationErrors};

pub const DEFAULT_ITER: usize = 300;
pub const ITER_MIN_VALUE: usize = 2;
pub const ITER_MAX_VALUE: usize = 999;
pub const K_MIN_VALUE: usize = 2;

/// Checks both rules before reporting, so one call can return both failures.
pub fn check_arguments(k: usize, max_iter: usize, n_rows: usize) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();
    if !(K_MIN_VALUE <= k && k < n_rows) {
        errors.push(ValidationError::InvalidClusterCount { k, n: n_rows });
    }
    if !(ITER_MIN_VALUE..=ITER_MAX_VALUE).contains(&max_iter) {
        errors.push(ValidationError::InvalidIterationBound { max_iter });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(errors))
    }
}
