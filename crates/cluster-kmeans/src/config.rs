use crate::error::{KMeansError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How each restart seeds its centroids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitStrategy {
    /// Every coordinate drawn uniformly from `[0, 1)`, whatever the data's scale.
    #[default]
    UnitCube,
    /// Every coordinate drawn uniformly from the dataset's bounding box.
    DataRange,
    /// Centroids copied from randomly chosen dataset points.
    Sample,
}

impl fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStrategy::UnitCube => write!(f, "unit-cube"),
            InitStrategy::DataRange => write!(f, "data-range"),
            InitStrategy::Sample => write!(f, "sample"),
        }
    }
}

impl FromStr for InitStrategy {
    type Err = KMeansError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unit-cube" | "uniform" => Ok(Self::UnitCube),
            "data-range" | "range" => Ok(Self::DataRange),
            "sample" | "points" => Ok(Self::Sample),
            other => Err(KMeansError::InvalidConfig(format!(
                "unsupported init strategy '{other}'"
            ))),
        }
    }
}

/// Knobs for a multi-restart k-means run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of independent trials; the lowest-cost one is kept.
    pub restarts: usize,

    /// Number of centroids (k).
    pub clusters: usize,

    /// Lloyd iterations per trial.
    pub iterations: usize,

    pub init: InitStrategy,

    /// Base seed; trial `t` uses `seed + t`. `None` draws one from entropy.
    pub seed: Option<u64>,

    /// Stop a trial once no centroid moves further than this. `None` always
    /// runs the full iteration budget.
    pub tolerance: Option<f32>,

    /// Run restarts on the rayon thread pool.
    pub parallel: bool,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            restarts: 10,
            clusters: 8,
            iterations: 100,
            init: InitStrategy::UnitCube,
            seed: None,
            tolerance: None,
            parallel: false,
        }
    }
}

impl KMeansConfig {
    pub fn new(restarts: usize, clusters: usize, iterations: usize) -> Self {
        Self {
            restarts,
            clusters,
            iterations,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_init(mut self, init: InitStrategy) -> Self {
        self.init = init;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.restarts == 0 {
            return Err(KMeansError::InvalidConfig("restarts must be > 0".to_string()));
        }

        if self.clusters == 0 {
            return Err(KMeansError::InvalidConfig("clusters must be > 0".to_string()));
        }

        if self.iterations == 0 {
            return Err(KMeansError::InvalidConfig("iterations must be > 0".to_string()));
        }

        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(KMeansError::InvalidConfig(
                    "tolerance must be finite and >= 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(KMeansConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_counts_are_rejected() {
        for config in [
            KMeansConfig::new(0, 2, 10),
            KMeansConfig::new(3, 0, 10),
            KMeansConfig::new(3, 2, 0),
        ] {
            assert!(matches!(
                config.validate(),
                Err(KMeansError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn tolerance_must_be_finite_and_non_negative() {
        let base = KMeansConfig::new(1, 1, 1);
        assert!(base.clone().with_tolerance(0.0).validate().is_ok());
        assert!(base.clone().with_tolerance(-1.0).validate().is_err());
        assert!(base.with_tolerance(f32::NAN).validate().is_err());
    }

    #[test]
    fn init_strategy_parses_aliases() {
        assert_eq!("unit-cube".parse::<InitStrategy>().unwrap(), InitStrategy::UnitCube);
        assert_eq!(" Data-Range ".parse::<InitStrategy>().unwrap(), InitStrategy::DataRange);
        assert_eq!("points".parse::<InitStrategy>().unwrap(), InitStrategy::Sample);
        assert!("kmeans++".parse::<InitStrategy>().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: KMeansConfig =
            serde_json::from_str(r#"{ "clusters": 3, "init": "data-range", "seed": 9 }"#).unwrap();
        assert_eq!(config.clusters, 3);
        assert_eq!(config.init, InitStrategy::DataRange);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.restarts, KMeansConfig::default().restarts);
        assert_eq!(config.tolerance, None);
    }
}
