use rand::{SeedableRng, rngs::StdRng};
use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::debug;

use crate::utilities::dataset::VectorDataset;
use crate::utilities::init_centroids::init_centroids;
use crate::utilities::kmeans::{inertia, kmeans};
use crate::utilities::structs::KmeansOptions;

/// Inertia for every `k` in `1..=min(max_k, n)`. Each `k` is seeded from
/// `options.seed` on its own generator, so the curve does not depend on
/// `cores`. A `k` that cannot be fitted reports `f64::INFINITY`.
pub fn elbow_curve(
    dataset: &VectorDataset,
    max_k: usize,
    options: &KmeansOptions,
    cores: usize,
) -> Option<Vec<(usize, f64)>> {
    let ks: Vec<usize> = (1..=max_k.min(dataset.len())).collect();
    if cores <= 1 || ks.len() < 2 {
        return Some(
            ks.iter()
                .map(|&k| (k, inertia_for_k(dataset, k, options)))
                .collect(),
        );
    }
    let pool = ThreadPoolBuilder::new().num_threads(cores).build().ok()?;
    Some(pool.install(|| {
        ks.par_iter()
            .map(|&k| (k, inertia_for_k(dataset, k, options)))
            .collect()
    }))
}

fn inertia_for_k(dataset: &VectorDataset, k: usize, options: &KmeansOptions) -> f64 {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let seeds = match init_centroids(dataset, k, &mut rng) {
        Ok(s) => s,
        Err(e) => {
            debug!(k, error = %e, "elbow seeding failed");
            return f64::INFINITY;
        }
    };
    match kmeans(
        dataset.as_slice(),
        seeds.centroids(),
        options.max_iter,
        options.eps,
    ) {
        Some(c) => inertia(dataset.as_slice(), &c),
        None => f64::INFINITY,
    }
}

/// The `k` farthest from the chord joining the first and last finite points,
/// with both axes scaled to [0, 1].
pub fn find_elbow(curve: &[(usize, f64)]) -> Option<usize> {
    let pts: Vec<(usize, f64)> = curve.iter().copied().filter(|p| p.1.is_finite()).collect();
    if pts.len() < 3 {
        return None;
    }
    let (k0, k1) = (pts[0].0 as f64, pts[pts.len() - 1].0 as f64);
    let y_min = pts.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let y_max = pts.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    if k1 <= k0 || y_max <= y_min {
        return None;
    }
    let norm = |p: &(usize, f64)| ((p.0 as f64 - k0) / (k1 - k0), (p.1 - y_min) / (y_max - y_min));

    let (x0, y0) = norm(&pts[0]);
    let (x1, y1) = norm(&pts[pts.len() - 1]);
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len = (dx * dx + dy * dy).sqrt();

    let mut best: Option<(usize, f64)> = None;
    for p in &pts[1..pts.len() - 1] {
        let (x, y) = norm(p);
        let d = (dy * (x - x0) - dx * (y - y0)).abs() / len;
        match best {
            Some((_, bd)) if d <= bd => {}
            _ => best = Some((p.0, d)),
        }
    }
    best.map(|(k, _)| k)
}
