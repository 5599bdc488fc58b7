pub mod check_arguments;
pub use check_arguments::{DEFAULT_ITER, ITER_MAX_VALUE, ITER_MIN_VALUE, K_MIN_VALUE, check_arguments};

pub mod dataset;
pub use dataset::VectorDataset;

pub mod elbow;
pub use elbow::{elbow_curve, find_elbow};

pub mod error;
pub use error::{KmeansError, ValidationError, ValidationErrors};

pub mod fit_centroids;
pub use fit_centroids::fit_centroids;

pub mod format_output;
pub use format_output::format_output;

pub mod init_centroids;
pub use init_centroids::{init_centroids, init_centroids_seeded};

pub mod kmeans;
pub use kmeans::{Lloyd, Refiner, inertia, kmeans};

pub mod parse;

pub mod run_pipeline;
pub use run_pipeline::{PipelineOutput, run_pipeline, run_pipeline_with};

pub mod structs;
pub use structs::{FitRequest, KmeansOptions, Point, Seed, SeedResult};

pub mod utilities;
pub use utilities::{cumulative_sum, dist, sq_dist, upper_bound};
