use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::utilities::dataset::VectorDataset;
use crate::utilities::error::{KmeansError, ValidationError};
use crate::utilities::structs::{Seed, SeedResult};
use crate::utilities::utilities::{cumulative_sum, dist, upper_bound};

/// k-means++ seeding.
///
/// The first centroid is drawn uniformly. Every following centroid is drawn
/// with probability proportional to the row's Euclidean distance to the
/// nearest centroid picked so far, so rows already picked (and their
/// duplicates) carry zero weight. `rng` is advanced once per draw and never
/// reseeded, which makes the result a pure function of the dataset, `k` and
/// the generator state.
///
/// Accepts `1 <= k <= n`; the pipeline narrows this further through
/// [`check_arguments`](crate::utilities::check_arguments::check_arguments).
pub fn init_centroids<R: Rng>(
    dataset: &VectorDataset,
    k: usize,
    rng: &mut R,
) -> Result<SeedResult, KmeansError> {
    let n = dataset.len();
    if k == 0 || k > n {
        return Err(ValidationError::InvalidClusterCount { k, n }.into());
    }

    let mut seeds = Vec::with_capacity(k);
    let first = rng.random_range(0..n);
    debug!(round = 0, index = first, "first centroid");
    seeds.push(Seed {
        index: first,
        centroid: dataset.row(first).to_vec(),
    });

    for round in 1..k {
        let chosen: Vec<&[f64]> = seeds.iter().map(|s| s.centroid.as_slice()).collect();
        let cumulative = cumulative_sum(&min_distances(dataset, &chosen));
        let total = cumulative.last().copied().unwrap_or(0.0);
        if !(total.is_finite() && total > 0.0) {
            return Err(KmeansError::DegenerateDataset { round, total });
        }
        let u = rng.random::<f64>() * total;
        let index = weighted_index(&cumulative, u);
        debug!(round, index, total, "weighted centroid");
        seeds.push(Seed {
            index,
            centroid: dataset.row(index).to_vec(),
        });
    }

    Ok(SeedResult { seeds })
}

pub fn init_centroids_seeded(
    dataset: &VectorDataset,
    k: usize,
    seed: u64,
) -> Result<SeedResult, KmeansError> {
    let mut rng = StdRng::seed_from_u64(seed);
    init_centroids(dataset, k, &mut rng)
}

/// Distance from every row to its closest centroid, recomputed in full.
pub fn min_distances(dataset: &VectorDataset, centroids: &[&[f64]]) -> Vec<f64> {
    dataset
        .rows()
        .map(|row| {
            centroids
                .iter()
                .map(|c| dist(row, c))
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}

/// Probability of each row being drawn next, or `None` if the weights cannot
/// form a distribution.
pub fn selection_weights(dataset: &VectorDataset, centroids: &[&[f64]]) -> Option<Vec<f64>> {
    let d = min_distances(dataset, centroids);
    let total: f64 = d.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    Some(d.into_iter().map(|v| v / total).collect())
}

/// Picks the row whose cumulative interval `[cum[i-1], cum[i])` holds `u`.
/// Zero-weight rows own empty intervals and are never returned.
pub fn weighted_index(cumulative: &[f64], u: f64) -> usize {
    debug_assert!(!cumulative.is_empty());
    let i = upper_bound(cumulative, u);
    if i < cumulative.len() {
        return i;
    }
    // u landed on the total through rounding
    let last = cumulative.len() - 1;
    (0..=last)
        .rev()
        .find(|&j| cumulative[j] > if j == 0 { 0.0 } else { cumulative[j - 1] })
        .unwrap_or(last)
}
