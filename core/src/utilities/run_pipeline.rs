use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{Level, enabled, info};

use crate::utilities::check_arguments::check_arguments;
use crate::utilities::dataset::VectorDataset;
use crate::utilities::error::KmeansError;
use crate::utilities::fit_centroids::fit_centroids;
use crate::utilities::format_output::format_output;
use crate::utilities::init_centroids::init_centroids;
use crate::utilities::kmeans::{Lloyd, Refiner};
use crate::utilities::structs::{FitRequest, KmeansOptions, Point, SeedResult};

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    pub seeds: SeedResult,
    pub centroids: Vec<Point>,
}

impl PipelineOutput {
    pub fn render(&self) -> String {
        format_output(&self.seeds.indices(), &self.centroids)
    }
}

/// Validate, seed with `StdRng::seed_from_u64(options.seed)`, refine with Lloyd.
pub fn run_pipeline(
    dataset: &VectorDataset,
    options: &KmeansOptions,
) -> Result<PipelineOutput, KmeansError> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    run_pipeline_with(dataset, options, &Lloyd, &mut rng)
}

pub fn run_pipeline_with<F: Refiner + ?Sized, R: Rng>(
    dataset: &VectorDataset,
    options: &KmeansOptions,
    refiner: &F,
    rng: &mut R,
) -> Result<PipelineOutput, KmeansError> {
    check_arguments(options.k, options.max_iter, dataset.len())?;

    let seeds = init_centroids(dataset, options.k, rng)?;
    info!(k = options.k, indices = ?seeds.indices(), "seeded");
    if enabled!(Level::DEBUG) {
        crate::log_json(&seeds);
    }

    let request = FitRequest {
        dataset,
        centroids: seeds.centroids(),
        max_iter: options.max_iter,
        eps: options.eps,
    };
    let centroids = fit_centroids(&request, refiner)?;
    info!(k = centroids.len(), "fitted");

    Ok(PipelineOutput { seeds, centroids })
}
