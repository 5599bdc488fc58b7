#[inline]
pub fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    let mut s = 0.0;
    for i in 0..a.len() {
        let d = a[i] - b[i];
        s += d * d;
    }
    s
}

#[inline]
pub fn dist(a: &[f64], b: &[f64]) -> f64 {
    sq_dist(a, b).sqrt()
}

/// First index whose value is strictly greater than `x`.
#[inline]
pub fn upper_bound(a: &[f64], x: f64) -> usize {
    let mut lo = 0usize;
    let mut hi = a.len();
    while lo < hi {
        let mid = (lo + hi) / 2;
        if a[mid] <= x {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

pub fn cumulative_sum(w: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(w.len());
    let mut acc = 0.0f64;
    for &v in w {
        acc += v;
        out.push(acc);
    }
    out
}

#[inline]
pub fn is_finite_non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}
