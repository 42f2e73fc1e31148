use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Fixed-dimension point. The length is set at construction and never
/// changes; the coordinates themselves are mutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    values: Vec<f32>,
}

impl Vector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn zeros(dimension: usize) -> Self {
        Self {
            values: vec![0.0; dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn set(&mut self, index: usize, value: f32) -> Result<()> {
        let dimension = self.dimension();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(CoreError::CoordinateOutOfRange { index, dimension })?;
        *slot = value;
        Ok(())
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|value| value.is_finite())
    }

    fn check_compatible(&self, other: &Vector) -> Result<()> {
        if self.dimension() != other.dimension() {
            return Err(CoreError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(())
    }

    /// Euclidean (L2) distance.
    pub fn distance_to(&self, other: &Vector) -> Result<f32> {
        self.check_compatible(other)?;
        Ok(crate::euclidean(&self.values, &other.values))
    }

    /// Adds `other` into `self` coordinate by coordinate.
    pub fn accumulate(&mut self, other: &Vector) -> Result<()> {
        self.check_compatible(other)?;
        for (lhs, rhs) in self.values.iter_mut().zip(other.values.iter()) {
            *lhs += rhs;
        }
        Ok(())
    }

    /// Multiplies every coordinate in place and hands `self` back for chaining.
    pub fn scale(&mut self, factor: f32) -> &mut Self {
        for value in self.values.iter_mut() {
            *value *= factor;
        }
        self
    }

    pub fn elementwise_product(&self, other: &Vector) -> Result<Vector> {
        self.check_compatible(other)?;
        Ok(Vector::new(
            self.values
                .iter()
                .zip(other.values.iter())
                .map(|(lhs, rhs)| lhs * rhs)
                .collect(),
        ))
    }
}

impl From<Vec<f32>> for Vector {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

impl<const N: usize> From<[f32; N]> for Vector {
    fn from(values: [f32; N]) -> Self {
        Self::new(values.to_vec())
    }
}
