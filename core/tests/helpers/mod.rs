// tests/helpers/mod.rs
use std::io::Write;

use kmeanspp::utilities::{Point, VectorDataset};
use rand::RngCore;
use tempfile::NamedTempFile;

/// Check two numbers are close within a simple absolute tolerance.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Build a dataset from literal rows; panics on malformed input.
#[allow(dead_code)]
pub fn dataset(rows: &[&[f64]]) -> VectorDataset {
    VectorDataset::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
}

/// Six 2-D rows: rows 0..3 near (1, 1.5), rows 3..6 near (8.5, 8.5).
#[allow(dead_code)]
pub fn two_blobs() -> VectorDataset {
    dataset(&[
        &[1.0, 1.0],
        &[1.5, 2.0],
        &[1.0, 1.5],
        &[8.0, 8.0],
        &[9.0, 8.5],
        &[8.5, 9.0],
    ])
}

// Deterministic uniform rows in [lo, hi]^dim
#[allow(dead_code)]
pub fn uniform_rows(n: usize, dim: usize, lo: f64, hi: f64, seed: u64) -> Vec<Point> {
    assert!(hi > lo);
    let mut s = seed | 1; // odd
    (0..n)
        .map(|_| {
            (0..dim)
                .map(|_| {
                    s = s
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    let u = ((s >> 11) as f64) * (1.0 / (1u64 << 53) as f64);
                    lo + (hi - lo) * u
                })
                .collect()
        })
        .collect()
}

/// Generator that replays fixed fractions in [0, 1).
///
/// `random::<f64>()` returns each fraction exactly when it is a multiple of
/// 2^-53. `random_range(0..n)` returns `floor(f * n)` when `f * n` is a whole
/// number, e.g. `f = 0.5` with even `n`.
#[allow(dead_code)]
pub struct ScriptedRng {
    fractions: Vec<f64>,
    pos: usize,
}

#[allow(dead_code)]
impl ScriptedRng {
    pub fn new(fractions: &[f64]) -> Self {
        assert!(!fractions.is_empty());
        assert!(fractions.iter().all(|f| (0.0..1.0).contains(f)));
        Self {
            fractions: fractions.to_vec(),
            pos: 0,
        }
    }

    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let f = self.fractions[self.pos % self.fractions.len()];
        self.pos += 1;
        ((f * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let b = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&b[..chunk.len()]);
        }
    }
}

/// Write `contents` to a temp file that lives as long as the handle.
#[allow(dead_code)]
pub fn csv_file(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}
