use serde::{Deserialize, Serialize};

use crate::utilities::check_arguments::DEFAULT_ITER;
use crate::utilities::dataset::VectorDataset;

pub type Point = Vec<f64>;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Seed {
    pub index: usize,
    pub centroid: Point,
}

/// Initial centroids in selection order, each tagged with the row it was copied from.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SeedResult {
    pub seeds: Vec<Seed>,
}

impl SeedResult {
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.seeds.iter().map(|s| s.index).collect()
    }

    pub fn centroids(&self) -> Vec<Point> {
        self.seeds.iter().map(|s| s.centroid.clone()).collect()
    }
}

#[derive(Clone, Debug)]
pub struct FitRequest<'a> {
    pub dataset: &'a VectorDataset,
    pub centroids: Vec<Point>,
    pub max_iter: usize,
    pub eps: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KmeansOptions {
    pub k: usize,
    pub max_iter: usize,
    pub eps: f64,
    pub seed: u64,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self {
            k: 2,
            max_iter: DEFAULT_ITER,
            eps: 0.001,
            seed: 0,
        }
    }
}

impl KmeansOptions {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
