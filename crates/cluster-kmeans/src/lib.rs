//! Multi-restart k-means.
//!
//! Each restart seeds `k` centroids, runs a fixed budget of Lloyd iterations
//! (assign every point to its nearest centroid, move every centroid to the
//! mean of its points) and scores the result by the summed distance from each
//! point to its nearest centroid. The lowest-scoring restart is kept.
//!
//! ## Notes
//!
//! - Centroids are updated with the mean, but the score sums *unsquared*
//!   distances, so the reported cost is a k-medians style objective.
//! - The default [`InitStrategy::UnitCube`] seeds coordinates in `[0, 1)`
//!   regardless of the data's scale; use [`InitStrategy::DataRange`] or
//!   [`InitStrategy::Sample`] for unnormalised data.
//! - Restart `t` draws from `StdRng::seed_from_u64(seed + t)`, so a seeded run
//!   gives the same centroids with or without `parallel`.

mod centroids;
mod config;
mod error;
pub mod lloyd;

pub use centroids::CentroidSet;
pub use config::{InitStrategy, KMeansConfig};
pub use error::{KMeansError, Result};
pub use lloyd::{assign, cost, lloyd_step, update, Assignment, Step};

use cluster_core::{Dataset, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, Level};

/// Iterations between progress reports inside a restart.
const PROGRESS_INTERVAL: usize = 40;

/// Outcome of one restart as recorded by [`KMeans::train`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub trial: usize,
    pub cost: f32,
    pub iterations_run: usize,
    /// Lowest cost seen up to and including this trial.
    pub best_cost: f32,
}

struct TrialOutcome {
    trial: usize,
    cost: f32,
    iterations_run: usize,
    centroids: CentroidSet,
}

/// Clustering engine over a fixed dataset.
#[derive(Debug, Clone)]
pub struct KMeans {
    config: KMeansConfig,
    dataset: Dataset,
    centroids: CentroidSet,
    trials: Vec<TrialSummary>,
    trained: bool,
}

impl KMeans {
    /// Validates `config` and starts with `k` centroids at the origin.
    pub fn new(config: KMeansConfig, dataset: Dataset) -> Result<Self> {
        config.validate()?;
        let centroids = CentroidSet::zeros(config.clusters, dataset.dimension())?;

        Ok(Self {
            config,
            dataset,
            centroids,
            trials: Vec::new(),
            trained: false,
        })
    }

    pub fn with_params(
        restarts: usize,
        clusters: usize,
        iterations: usize,
        points: Vec<Vector>,
    ) -> Result<Self> {
        let dataset = Dataset::new(points)?;
        Self::new(KMeansConfig::new(restarts, clusters, iterations), dataset)
    }

    /// Like [`KMeans::with_params`] for a grid of points, flattened row-major.
    pub fn from_grid(
        restarts: usize,
        clusters: usize,
        iterations: usize,
        grid: Vec<Vec<Vector>>,
    ) -> Result<Self> {
        let dataset = Dataset::from_grid(grid)?;
        Self::new(KMeansConfig::new(restarts, clusters, iterations), dataset)
    }

    /// Starts from caller-supplied centroids instead of the origin.
    pub fn with_centroids(
        config: KMeansConfig,
        dataset: Dataset,
        centroids: CentroidSet,
    ) -> Result<Self> {
        if centroids.dimension() != dataset.dimension() {
            return Err(KMeansError::DimensionMismatch {
                expected: dataset.dimension(),
                actual: centroids.dimension(),
            });
        }
        if centroids.len() != config.clusters {
            return Err(KMeansError::CentroidCountMismatch {
                expected: config.clusters,
                actual: centroids.len(),
            });
        }

        let mut engine = Self::new(config, dataset)?;
        engine.centroids = centroids;
        Ok(engine)
    }

    /// Runs every restart and keeps the centroids of the cheapest one. Ties
    /// keep the earlier restart; restarts with a non-finite cost never win.
    pub fn train(&mut self) -> Result<()> {
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());
        debug!(
            seed,
            restarts = self.config.restarts,
            clusters = self.config.clusters,
            iterations = self.config.iterations,
            init = %self.config.init,
            parallel = self.config.parallel,
            "starting k-means training"
        );

        let config = &self.config;
        let dataset = &self.dataset;
        let outcomes: Vec<TrialOutcome> = if config.parallel {
            (0..config.restarts)
                .into_par_iter()
                .map(|trial| run_trial(config, dataset, trial, seed))
                .collect::<Result<_>>()?
        } else {
            (0..config.restarts)
                .map(|trial| run_trial(config, dataset, trial, seed))
                .collect::<Result<_>>()?
        };

        let mut best: Option<CentroidSet> = None;
        let mut best_cost = f32::INFINITY;
        let mut trials = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            if outcome.cost < best_cost {
                best_cost = outcome.cost;
                best = Some(outcome.centroids);
            }
            trials.push(TrialSummary {
                trial: outcome.trial,
                cost: outcome.cost,
                iterations_run: outcome.iterations_run,
                best_cost,
            });
        }

        let best = best.ok_or(KMeansError::NoFiniteTrial)?;
        info!(
            cost = best_cost,
            restarts = trials.len(),
            "k-means training finished"
        );

        self.centroids = best;
        self.trials = trials;
        self.trained = true;
        Ok(())
    }

    /// Cost of the current centroids; valid before training too.
    pub fn cost(&self) -> Result<f32> {
        lloyd::cost(&self.dataset, &self.centroids)
    }

    /// Index of the centroid closest to `point`.
    pub fn classify(&self, point: &Vector) -> Result<usize> {
        let (index, _) = self.centroids.nearest(point)?;
        Ok(index)
    }

    pub fn centroid(&self, index: usize) -> Result<&Vector> {
        self.centroids
            .get(index)
            .ok_or(KMeansError::CentroidOutOfRange {
                index,
                clusters: self.centroids.len(),
            })
    }

    pub fn centroids(&self) -> &CentroidSet {
        &self.centroids
    }

    /// Nearest-centroid label of every dataset point.
    pub fn labels(&self) -> Result<Vec<usize>> {
        Ok(lloyd::assign(&self.dataset, &self.centroids)?.into_labels())
    }

    /// Number of dataset points claimed by each centroid.
    pub fn cluster_sizes(&self) -> Result<Vec<usize>> {
        Ok(lloyd::assign(&self.dataset, &self.centroids)?
            .counts()
            .to_vec())
    }

    pub fn trials(&self) -> &[TrialSummary] {
        &self.trials
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn clusters(&self) -> usize {
        self.config.clusters
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

fn run_trial(
    config: &KMeansConfig,
    dataset: &Dataset,
    trial: usize,
    seed: u64,
) -> Result<TrialOutcome> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(trial as u64));
    let mut centroids = CentroidSet::initialize(config.init, config.clusters, dataset, &mut rng)?;

    let mut iterations_run = 0;
    for iteration in 0..config.iterations {
        if iteration % PROGRESS_INTERVAL == 0 && tracing::enabled!(Level::DEBUG) {
            let progress = lloyd::cost(dataset, &centroids)?;
            debug!(trial, iteration, cost = progress, "lloyd progress");
        }

        let step = lloyd::lloyd_step(dataset, &centroids)?;
        centroids = step.centroids;
        iterations_run += 1;

        if config.tolerance.is_some_and(|tolerance| step.max_shift <= tolerance) {
            debug!(trial, iteration, shift = step.max_shift, "centroids settled");
            break;
        }
    }

    let cost = lloyd::cost(dataset, &centroids)?;
    debug!(trial, cost, iterations_run, "restart finished");

    Ok(TrialOutcome {
        trial,
        cost,
        iterations_run,
        centroids,
    })
}
