//! Validated, read-only point collections.

use crate::error::{CoreError, Result};
use crate::Vector;
use serde::{Deserialize, Serialize};

/// Ordered collection of `n >= 1` finite vectors that all share one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vector>", into = "Vec<Vector>")]
pub struct Dataset {
    dimension: usize,
    points: Vec<Vector>,
}

impl Dataset {
    pub fn new(points: Vec<Vector>) -> Result<Self> {
        let dimension = points.first().ok_or(CoreError::EmptyDataset)?.dimension();
        if dimension == 0 {
            return Err(CoreError::ZeroDimension);
        }

        for (index, point) in points.iter().enumerate() {
            if point.dimension() != dimension {
                return Err(CoreError::DimensionMismatch {
                    expected: dimension,
                    actual: point.dimension(),
                });
            }
            if !point.is_finite() {
                return Err(CoreError::NonFiniteValue { index });
            }
        }

        Ok(Self { dimension, points })
    }

    /// Flattens a rectangular grid row-major (`rows[i][j]` lands at
    /// `i * width + j`) before validating it like [`Dataset::new`].
    pub fn from_grid(rows: Vec<Vec<Vector>>) -> Result<Self> {
        let width = rows.first().map(Vec::len).ok_or(CoreError::EmptyDataset)?;
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != width {
                return Err(CoreError::RaggedGrid {
                    row,
                    expected: width,
                    actual: cells.len(),
                });
            }
        }

        Self::new(rows.into_iter().flatten().collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn points(&self) -> &[Vector] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector> {
        self.points.iter()
    }

    /// Per-dimension `(min, max)` over all points.
    pub fn bounds(&self) -> Vec<(f32, f32)> {
        let mut bounds = vec![(f32::INFINITY, f32::NEG_INFINITY); self.dimension];
        for point in &self.points {
            for ((low, high), &value) in bounds.iter_mut().zip(point.as_slice()) {
                *low = low.min(value);
                *high = high.max(value);
            }
        }
        bounds
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Vector;
    type IntoIter = std::slice::Iter<'a, Vector>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<Vector>> for Dataset {
    type Error = CoreError;

    fn try_from(points: Vec<Vector>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Dataset> for Vec<Vector> {
    fn from(dataset: Dataset) -> Self {
        dataset.points
    }
}
