//! Shared building blocks for the clustering crates.
//! This crate defines the vector and dataset types, the Euclidean distance,
//! synthetic dataset generators and JSON persistence helpers that the
//! algorithm crates and the runner build upon.

mod dataset;
mod error;
mod vector;

pub use dataset::Dataset;
pub use error::{CoreError, Result};
pub use vector::Vector;

use anyhow::Context;
use rand::{distributions::Uniform, prelude::*};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Euclidean distance between two equally sized slices. Callers are
/// responsible for checking the lengths; extra trailing entries are ignored.
/// Squares are summed in `f64`, so only a distance above `f32::MAX` itself
/// comes back infinite.
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(lhs, rhs)| {
            let diff = f64::from(*lhs) - f64::from(*rhs);
            diff * diff
        })
        .sum::<f64>()
        .sqrt() as f32
}

/// Generates a deterministic set of vectors uniformly sampled within the given range.
pub fn generate_uniform_dataset(
    dimension: usize,
    count: usize,
    bounds: std::ops::Range<f32>,
    seed: u64,
) -> Vec<Vector> {
    let mut rng = StdRng::seed_from_u64(seed);
    let distribution = Uniform::from(bounds);

    (0..count)
        .map(|_| Vector::new((0..dimension).map(|_| rng.sample(distribution)).collect()))
        .collect()
}

/// Points scattered around `centers` uniformly drawn inside `bounds`. Each
/// point is its center plus independent jitter in `[-spread, spread)` per
/// coordinate; point `i` belongs to center `i % centers`.
pub fn generate_blobs(
    dimension: usize,
    centers: usize,
    points_per_center: usize,
    bounds: std::ops::Range<f32>,
    spread: f32,
    seed: u64,
) -> Vec<Vector> {
    let mut rng = StdRng::seed_from_u64(seed);
    let placement = Uniform::from(bounds);

    let anchors: Vec<Vec<f32>> = (0..centers)
        .map(|_| (0..dimension).map(|_| rng.sample(placement)).collect())
        .collect();

    let mut points = Vec::with_capacity(centers * points_per_center);
    for _ in 0..points_per_center {
        for anchor in &anchors {
            let point: Vec<f32> = anchor
                .iter()
                .map(|&center| {
                    if spread > 0.0 {
                        center + rng.gen_range(-spread..spread)
                    } else {
                        center
                    }
                })
                .collect();
            points.push(Vector::new(point));
        }
    }
    points
}

/// Saves a serializable value to a pretty-printed JSON file.
pub fn save_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let file = File::create(path.as_ref())
        .with_context(|| format!("failed to create file at {}", path.as_ref().display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value).context("failed to serialize value to JSON")?;
    Ok(())
}

/// Loads a deserializable value from a JSON file.
pub fn load_json<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("failed to open file at {}", path.as_ref().display()))?;
    let reader = BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("failed to deserialize {}", path.as_ref().display()))?;
    Ok(value)
}
