use tracing::debug;

use crate::utilities::structs::Point;
use crate::utilities::utilities::{dist, is_finite_non_negative, sq_dist};

/// Iterative centroid refinement behind the fit gateway.
///
/// Implementations must be deterministic, must not mutate their inputs and
/// must stop within `max_iter` iterations. `None` means "no result".
pub trait Refiner {
    fn refine(
        &self,
        points: &[Point],
        centroids: &[Point],
        max_iter: usize,
        eps: f64,
    ) -> Option<Vec<Point>>;
}

/// Lloyd's algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lloyd;

impl Refiner for Lloyd {
    fn refine(
        &self,
        points: &[Point],
        centroids: &[Point],
        max_iter: usize,
        eps: f64,
    ) -> Option<Vec<Point>> {
        kmeans(points, centroids.to_vec(), max_iter, eps)
    }
}

fn mean(ps: &[&Point]) -> Point {
    let d = ps[0].len();
    let mut m = vec![0.0; d];
    for p in ps {
        for i in 0..d {
            m[i] += p[i];
        }
    }
    let n = ps.len() as f64;
    for i in 0..d {
        m[i] /= n;
    }
    m
}

/// Index of the closest centroid and the squared distance to it. Ties go to
/// the lower index.
pub fn nearest(p: &[f64], centroids: &[Point]) -> (usize, f64) {
    let mut idx = 0usize;
    let mut best = sq_dist(p, &centroids[0]);
    for j in 1..centroids.len() {
        let d = sq_dist(p, &centroids[j]);
        if d < best {
            best = d;
            idx = j;
        }
    }
    (idx, best)
}

/// Sum of squared distances from every point to its closest centroid.
pub fn inertia(points: &[Point], centroids: &[Point]) -> f64 {
    if centroids.is_empty() {
        return f64::INFINITY;
    }
    points.iter().map(|p| nearest(p, centroids).1).sum()
}

/// Runs Lloyd iterations from `centroids` until every centroid moves less than
/// `eps` or `max_iter` iterations ran. A cluster that loses all its points
/// keeps its previous centroid.
pub fn kmeans(
    points: &[Point],
    mut centroids: Vec<Point>,
    max_iter: usize,
    eps: f64,
) -> Option<Vec<Point>> {
    if points.is_empty() || centroids.is_empty() || max_iter == 0 || !is_finite_non_negative(eps)
    {
        return None;
    }
    let d = points[0].len();
    if points.iter().any(|p| p.len() != d) || centroids.iter().any(|c| c.len() != d) {
        return None;
    }
    let k = centroids.len();

    for it in 0..max_iter {
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
        for (i, p) in points.iter().enumerate() {
            groups[nearest(p, &centroids).0].push(i);
        }

        let mut next = Vec::with_capacity(k);
        for gi in 0..k {
            if groups[gi].is_empty() {
                next.push(centroids[gi].clone());
            } else {
                let refs: Vec<&Point> = groups[gi].iter().map(|&ix| &points[ix]).collect();
                next.push(mean(&refs));
            }
        }

        let converged = next
            .iter()
            .zip(centroids.iter())
            .all(|(a, b)| dist(a, b) < eps);
        centroids = next;
        debug!(iteration = it + 1, converged, "lloyd iteration");
        if converged {
            break;
        }
    }

    if centroids.iter().flatten().all(|v| v.is_finite()) {
        Some(centroids)
    } else {
        None
    }
}
