//! Centroid sets and the ways a restart seeds them.

use crate::config::InitStrategy;
use crate::error::{KMeansError, Result};
use cluster_core::{CoreError, Dataset, Vector};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Exactly `k >= 1` centroids sharing one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vector>", into = "Vec<Vector>")]
pub struct CentroidSet {
    centroids: Vec<Vector>,
}

impl CentroidSet {
    pub fn new(centroids: Vec<Vector>) -> Result<Self> {
        let dimension = centroids
            .first()
            .ok_or(KMeansError::EmptyCentroidSet)?
            .dimension();
        if dimension == 0 {
            return Err(CoreError::ZeroDimension.into());
        }
        if let Some(odd) = centroids.iter().find(|c| c.dimension() != dimension) {
            return Err(KMeansError::DimensionMismatch {
                expected: dimension,
                actual: odd.dimension(),
            });
        }
        Ok(Self { centroids })
    }

    /// `k` centroids at the origin.
    pub fn zeros(clusters: usize, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(CoreError::ZeroDimension.into());
        }
        Self::new(vec![Vector::zeros(dimension); clusters])
    }

    /// Fresh centroids for one restart.
    pub fn initialize<R: Rng + ?Sized>(
        strategy: InitStrategy,
        clusters: usize,
        dataset: &Dataset,
        rng: &mut R,
    ) -> Result<Self> {
        if clusters == 0 {
            return Err(KMeansError::EmptyCentroidSet);
        }

        let dimension = dataset.dimension();
        let centroids = match strategy {
            InitStrategy::UnitCube => (0..clusters)
                .map(|_| Vector::new((0..dimension).map(|_| rng.gen::<f32>()).collect()))
                .collect(),
            InitStrategy::DataRange => {
                let bounds = dataset.bounds();
                (0..clusters)
                    .map(|_| {
                        Vector::new(
                            bounds
                                .iter()
                                .map(|&(low, high)| draw_between(&mut *rng, low, high))
                                .collect(),
                        )
                    })
                    .collect()
            }
            InitStrategy::Sample => {
                let mut picked: Vec<Vector> = dataset
                    .points()
                    .choose_multiple(&mut *rng, clusters)
                    .cloned()
                    .collect();
                // more clusters than points: the surplus reuses random points
                let missing = clusters.saturating_sub(picked.len());
                picked.extend(
                    (0..missing).filter_map(|_| dataset.points().choose(&mut *rng).cloned()),
                );
                picked
            }
        };
        Ok(Self { centroids })
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.centroids.first().map_or(0, Vector::dimension)
    }

    pub fn get(&self, index: usize) -> Option<&Vector> {
        self.centroids.get(index)
    }

    pub fn as_slice(&self) -> &[Vector] {
        &self.centroids
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.centroids.iter()
    }

    /// Index of and distance to the closest centroid. Ties go to the lowest
    /// index: a later centroid must be strictly closer to win.
    pub fn nearest(&self, point: &Vector) -> Result<(usize, f32)> {
        if self.centroids.is_empty() {
            return Err(KMeansError::EmptyCentroidSet);
        }

        let mut best = (0, f32::INFINITY);
        for (index, centroid) in self.centroids.iter().enumerate() {
            let dist = point.distance_to(centroid)?;
            if dist < best.1 {
                best = (index, dist);
            }
        }
        Ok(best)
    }

    /// Largest distance any centroid moved between `self` and `next`.
    pub fn max_shift(&self, next: &CentroidSet) -> Result<f32> {
        let mut shift = 0.0_f32;
        for (before, after) in self.centroids.iter().zip(next.centroids.iter()) {
            shift = shift.max(before.distance_to(after)?);
        }
        Ok(shift)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        cluster_core::save_json(self, path)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        cluster_core::load_json(path)
    }
}

/// Uniform draw from `[low, high]`. Interpolates in `f64` so a span wider
/// than `f32::MAX` still yields a finite coordinate.
fn draw_between<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    let t: f64 = rng.gen();
    let value = f64::from(low) + t * (f64::from(high) - f64::from(low));
    (value as f32).clamp(low, high)
}

impl TryFrom<Vec<Vector>> for CentroidSet {
    type Error = KMeansError;

    fn try_from(centroids: Vec<Vector>) -> Result<Self> {
        Self::new(centroids)
    }
}

impl From<CentroidSet> for Vec<Vector> {
    fn from(set: CentroidSet) -> Self {
        set.centroids
    }
}
