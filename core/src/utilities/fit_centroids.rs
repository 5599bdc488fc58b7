use tracing::{debug, warn};

use crate::utilities::error::KmeansError;
use crate::utilities::kmeans::Refiner;
use crate::utilities::structs::{FitRequest, Point};

/// Hands a request to `refiner` and checks the shape of what comes back.
/// There is no retry and no fallback to the initial centroids.
pub fn fit_centroids<F: Refiner + ?Sized>(
    request: &FitRequest<'_>,
    refiner: &F,
) -> Result<Vec<Point>, KmeansError> {
    let k = request.centroids.len();
    let dim = request.dataset.dim();
    debug!(
        k,
        dim,
        max_iter = request.max_iter,
        eps = request.eps,
        "fit request"
    );

    let Some(out) = refiner.refine(
        request.dataset.as_slice(),
        &request.centroids,
        request.max_iter,
        request.eps,
    ) else {
        warn!(k, "refinement returned no result");
        return Err(KmeansError::FitFailed);
    };

    if out.len() != k || out.iter().any(|c| c.len() != dim) {
        warn!(
            expected = k,
            got = out.len(),
            "refinement returned malformed centroids"
        );
        return Err(KmeansError::FitFailed);
    }
    Ok(out)
}
