//! One round of Lloyd's iteration (assign, then update) and the cost used to
//! rank restarts.

use crate::centroids::CentroidSet;
use crate::error::{KMeansError, Result};
use cluster_core::{Dataset, Vector};

/// Nearest-centroid label for every dataset point, plus how many points each
/// centroid claimed. Only valid for the centroid set it was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    labels: Vec<usize>,
    counts: Vec<usize>,
}

impl Assignment {
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }
}

pub fn assign(dataset: &Dataset, centroids: &CentroidSet) -> Result<Assignment> {
    let mut labels = Vec::with_capacity(dataset.len());
    let mut counts = vec![0; centroids.len()];

    for point in dataset {
        let (label, _) = centroids.nearest(point)?;
        labels.push(label);
        counts[label] += 1;
    }

    Ok(Assignment { labels, counts })
}

/// Moves every centroid to the mean of the points assigned to it. A centroid
/// that claimed no points is carried over unchanged.
pub fn update(
    dataset: &Dataset,
    assignment: &Assignment,
    previous: &CentroidSet,
) -> Result<CentroidSet> {
    if assignment.labels.len() != dataset.len() {
        return Err(KMeansError::AssignmentMismatch {
            expected: dataset.len(),
            actual: assignment.labels.len(),
        });
    }
    if assignment.counts.len() != previous.len() {
        return Err(KMeansError::CentroidCountMismatch {
            expected: previous.len(),
            actual: assignment.counts.len(),
        });
    }

    let mut sums = vec![Vector::zeros(dataset.dimension()); previous.len()];
    for (point, &label) in dataset.iter().zip(assignment.labels.iter()) {
        sums[label].accumulate(point)?;
    }

    let centroids = sums
        .into_iter()
        .zip(assignment.counts.iter())
        .zip(previous.iter())
        .map(|((mut sum, &count), old)| {
            if count == 0 {
                old.clone()
            } else {
                sum.scale(1.0 / count as f32);
                sum
            }
        })
        .collect();

    CentroidSet::new(centroids)
}

/// Result of a single assign-then-update round.
#[derive(Debug, Clone)]
pub struct Step {
    pub centroids: CentroidSet,
    pub assignment: Assignment,
    /// Largest distance any centroid moved during the round.
    pub max_shift: f32,
}

pub fn lloyd_step(dataset: &Dataset, centroids: &CentroidSet) -> Result<Step> {
    let assignment = assign(dataset, centroids)?;
    let next = update(dataset, &assignment, centroids)?;
    let max_shift = centroids.max_shift(&next)?;
    Ok(Step {
        centroids: next,
        assignment,
        max_shift,
    })
}

/// Sum over all points of the (unsquared) Euclidean distance to the nearest
/// centroid. Accumulated in `f64` so the total barely depends on point order.
pub fn cost(dataset: &Dataset, centroids: &CentroidSet) -> Result<f32> {
    let mut total = 0.0_f64;
    for point in dataset {
        let (_, dist) = centroids.nearest(point)?;
        total += f64::from(dist);
    }
    Ok(total as f32)
}
