mod scenarios;

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use cluster_core::{generate_blobs, load_json, save_json, Dataset, Vector};
use cluster_kmeans::{CentroidSet, InitStrategy, KMeans, KMeansConfig, TrialSummary};
use scenarios::{ScenarioDetails, ScenarioKind};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Lightweight harness for experimenting with multi-restart k-means")]
struct Cli {
    /// Dimensionality of the synthetic dataset
    #[arg(long, default_value = "2")]
    dimension: usize,
    /// Number of points to generate
    #[arg(long, default_value = "1000")]
    points: usize,
    /// Number of blob centers the points are scattered around (defaults to the cluster count)
    #[arg(long)]
    centers: Option<usize>,
    /// Upper bound of every coordinate; points live in [0, scale)
    #[arg(long, default_value = "1.0")]
    scale: f32,
    /// Per-coordinate jitter around each blob center
    #[arg(long, default_value = "0.05")]
    spread: f32,
    /// RNG seed used for dataset generation
    #[arg(long, default_value = "42")]
    data_seed: u64,
    /// JSON file with a k-means configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of centroids (k)
    #[arg(long)]
    clusters: Option<usize>,
    /// Lloyd iterations per restart
    #[arg(long)]
    iterations: Option<usize>,
    /// Number of independent restarts
    #[arg(long)]
    restarts: Option<usize>,
    /// Centroid seeding (unit-cube | data-range | sample)
    #[arg(long, value_parser = parse_init)]
    init: Option<InitStrategy>,
    /// Base seed for the restarts (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop a restart early once no centroid moves further than this
    #[arg(long)]
    tolerance: Option<f32>,
    /// Run restarts on all cores
    #[arg(long)]
    parallel: bool,
    /// List the baked-in benchmark scenarios
    #[arg(long)]
    list_scenarios: bool,
    /// Execute a named benchmark scenario instead of manual dataset knobs
    #[arg(long, value_enum)]
    scenario: Option<ScenarioKind>,
    /// Export the generated dataset as JSON for reuse
    #[arg(long)]
    export_dataset: Option<PathBuf>,
    /// Export timing + configuration data as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,
    /// Save the trained centroids to a JSON file
    #[arg(long)]
    save_centroids: Option<PathBuf>,
    /// Evaluate centroids from a JSON file instead of training
    #[arg(long)]
    load_centroids: Option<PathBuf>,
}

fn parse_init(value: &str) -> Result<InitStrategy, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if cli.list_scenarios {
        scenarios::print_available();
        return Ok(());
    }

    let mut runtime = RuntimeConfig::from_cli(&cli)?;

    if let Some(kind) = cli.scenario {
        let details = kind.details();
        println!("Using scenario '{}' – {}", details.slug, details.description);
        runtime.apply_scenario(&details);
    }
    runtime.validate()?;

    let dataset = generate_dataset(&runtime)?;
    info!(
        points = dataset.len(),
        dimension = dataset.dimension(),
        "generated dataset"
    );

    if let Some(path) = cli.export_dataset.as_deref() {
        save_json(&dataset, path)
            .with_context(|| format!("failed to export dataset to {}", path.display()))?;
        println!("Wrote dataset to {}", path.display());
    }

    let (engine, train_time) = if let Some(load_path) = cli.load_centroids.as_deref() {
        println!("Loading centroids from {}...", load_path.display());
        let centroids = CentroidSet::load(load_path)
            .with_context(|| format!("failed to load centroids from {}", load_path.display()))?;
        runtime.kmeans.clusters = centroids.len();
        let engine = KMeans::with_centroids(runtime.kmeans.clone(), dataset, centroids)?;
        (engine, Duration::ZERO)
    } else {
        let mut engine = KMeans::new(runtime.kmeans.clone(), dataset)?;
        let train_start = Instant::now();
        engine.train()?;
        (engine, train_start.elapsed())
    };

    if let Some(save_path) = cli.save_centroids.as_deref() {
        engine
            .centroids()
            .save(save_path)
            .with_context(|| format!("failed to save centroids to {}", save_path.display()))?;
        println!(
            "Saved {} centroids to {}",
            engine.clusters(),
            save_path.display()
        );
    }

    print_results(&engine, train_time, &runtime, &cli)
}

fn generate_dataset(runtime: &RuntimeConfig) -> Result<Dataset> {
    let per_center = runtime.points.div_ceil(runtime.centers);
    let mut points: Vec<Vector> = generate_blobs(
        runtime.dimension,
        runtime.centers,
        per_center,
        0.0..runtime.scale,
        runtime.spread,
        runtime.data_seed,
    );
    points.truncate(runtime.points);
    Dataset::new(points).context("generated dataset is invalid")
}

fn print_results(
    engine: &KMeans,
    train_time: Duration,
    runtime: &RuntimeConfig,
    cli: &Cli,
) -> Result<()> {
    let stats = TrainingStats::new(engine, train_time)?;

    for (index, size) in stats.cluster_sizes.iter().enumerate() {
        println!(
            "  cluster {index:<3} size={size:<7} centroid={:?}",
            engine.centroid(index)?.as_slice()
        );
    }

    let scenario_note = runtime
        .scenario_slug
        .map(|slug| format!(" | Scenario: {slug}"))
        .unwrap_or_default();

    println!(
        "Train: {:.2?} | Cost: {:.4} | Empty clusters: {} | Init: {} | Points: {} | Dim: {} | k: {} | Restarts: {} | Iterations: {}{}",
        stats.train_time,
        stats.cost,
        stats.empty_clusters,
        runtime.kmeans.init,
        runtime.points,
        runtime.dimension,
        runtime.kmeans.clusters,
        runtime.kmeans.restarts,
        runtime.kmeans.iterations,
        scenario_note
    );

    if let Some(path) = cli.report_json.as_deref() {
        write_report(path, runtime, &stats, engine.trials())?;
        println!("Wrote training report to {}", path.display());
    }

    Ok(())
}

#[derive(Debug, Clone)]
struct RuntimeConfig {
    dimension: usize,
    points: usize,
    centers: usize,
    scale: f32,
    spread: f32,
    data_seed: u64,
    kmeans: KMeansConfig,
    scenario_slug: Option<&'static str>,
    scenario_label: Option<&'static str>,
    scenario_description: Option<&'static str>,
}

impl RuntimeConfig {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let mut kmeans = match cli.config.as_deref() {
            Some(path) => load_json::<KMeansConfig>(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => KMeansConfig::default(),
        };
        if let Some(clusters) = cli.clusters {
            kmeans.clusters = clusters;
        }
        if let Some(iterations) = cli.iterations {
            kmeans.iterations = iterations;
        }
        if let Some(restarts) = cli.restarts {
            kmeans.restarts = restarts;
        }
        if let Some(init) = cli.init {
            kmeans.init = init;
        }
        if cli.seed.is_some() {
            kmeans.seed = cli.seed;
        }
        if cli.tolerance.is_some() {
            kmeans.tolerance = cli.tolerance;
        }
        kmeans.parallel |= cli.parallel;

        Ok(Self {
            dimension: cli.dimension,
            points: cli.points,
            centers: cli.centers.unwrap_or(kmeans.clusters),
            scale: cli.scale,
            spread: cli.spread,
            data_seed: cli.data_seed,
            kmeans,
            scenario_slug: None,
            scenario_label: None,
            scenario_description: None,
        })
    }

    fn apply_scenario(&mut self, details: &ScenarioDetails) {
        self.dimension = details.config.dimension;
        self.points = details.config.points;
        self.centers = details.config.centers;
        self.scale = details.config.scale;
        self.spread = details.config.spread;
        self.kmeans.clusters = details.config.clusters;
        self.scenario_slug = Some(details.slug);
        self.scenario_label = Some(details.label);
        self.scenario_description = Some(details.description);
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.dimension > 0, "dimension must be greater than zero");
        ensure!(self.points > 0, "points must be greater than zero");
        ensure!(self.centers > 0, "centers must be greater than zero");
        ensure!(
            self.scale.is_finite() && self.scale > 0.0,
            "scale must be a positive number"
        );
        ensure!(
            self.spread.is_finite() && self.spread >= 0.0,
            "spread must be a non-negative number"
        );
        self.kmeans.validate()?;
        Ok(())
    }
}

struct TrainingStats {
    train_time: Duration,
    cost: f32,
    cluster_sizes: Vec<usize>,
    empty_clusters: usize,
}

impl TrainingStats {
    fn new(engine: &KMeans, train_time: Duration) -> Result<Self> {
        let cluster_sizes = engine.cluster_sizes()?;
        let empty_clusters = cluster_sizes.iter().filter(|&&size| size == 0).count();
        Ok(Self {
            train_time,
            cost: engine.cost()?,
            cluster_sizes,
            empty_clusters,
        })
    }
}

fn write_report(
    path: &Path,
    runtime: &RuntimeConfig,
    stats: &TrainingStats,
    trials: &[TrialSummary],
) -> Result<()> {
    #[derive(Serialize)]
    struct ReportPayload<'a> {
        config: ReportConfig<'a>,
        result: ReportResult<'a>,
        trials: &'a [TrialSummary],
    }

    #[derive(Serialize)]
    struct ReportConfig<'a> {
        scenario: Option<&'a str>,
        label: Option<&'a str>,
        description: Option<&'a str>,
        dimension: usize,
        points: usize,
        centers: usize,
        scale: f32,
        spread: f32,
        data_seed: u64,
        kmeans: &'a KMeansConfig,
    }

    #[derive(Serialize)]
    struct ReportResult<'a> {
        train_ms: f64,
        cost: f32,
        empty_clusters: usize,
        cluster_sizes: &'a [usize],
    }

    let payload = ReportPayload {
        config: ReportConfig {
            scenario: runtime.scenario_slug,
            label: runtime.scenario_label,
            description: runtime.scenario_description,
            dimension: runtime.dimension,
            points: runtime.points,
            centers: runtime.centers,
            scale: runtime.scale,
            spread: runtime.spread,
            data_seed: runtime.data_seed,
            kmeans: &runtime.kmeans,
        },
        result: ReportResult {
            train_ms: stats.train_time.as_secs_f64() * 1_000.0,
            cost: stats.cost,
            empty_clusters: stats.empty_clusters,
            cluster_sizes: &stats.cluster_sizes,
        },
        trials,
    };

    save_json(&payload, path)
        .with_context(|| format!("failed to write training report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime(args: &[&str]) -> RuntimeConfig {
        let cli = Cli::try_parse_from(std::iter::once("bench-runner").chain(args.iter().copied()))
            .unwrap();
        RuntimeConfig::from_cli(&cli).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let runtime = runtime(&[
            "--clusters",
            "5",
            "--restarts",
            "2",
            "--init",
            "sample",
            "--seed",
            "9",
            "--parallel",
        ]);
        assert_eq!(runtime.kmeans.clusters, 5);
        assert_eq!(runtime.kmeans.restarts, 2);
        assert_eq!(runtime.kmeans.init, InitStrategy::Sample);
        assert_eq!(runtime.kmeans.seed, Some(9));
        assert!(runtime.kmeans.parallel);
        assert_eq!(runtime.centers, 5);
        assert_eq!(runtime.kmeans.iterations, KMeansConfig::default().iterations);
    }

    #[test]
    fn unknown_init_is_rejected_by_the_parser() {
        let parsed = Cli::try_parse_from(["bench-runner", "--init", "kmeans++"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn scenario_replaces_dataset_shape() {
        let mut runtime = runtime(&["--points", "10"]);
        runtime.apply_scenario(&ScenarioKind::ColorQuantization.details());
        assert_eq!(runtime.dimension, 3);
        assert_eq!(runtime.kmeans.clusters, 16);
        assert_eq!(runtime.scale, 255.0);
        assert!(runtime.validate().is_ok());
    }

    #[test]
    fn generated_dataset_has_requested_size() {
        let mut runtime = runtime(&["--points", "10", "--centers", "3", "--dimension", "4"]);
        runtime.kmeans.clusters = 3;
        let dataset = generate_dataset(&runtime).unwrap();
        assert_eq!(dataset.len(), 10);
        assert_eq!(dataset.dimension(), 4);
    }

    #[test]
    fn smoke_scenario_trains_end_to_end() {
        let mut runtime = runtime(&["--seed", "1", "--restarts", "3", "--iterations", "10"]);
        runtime.apply_scenario(&ScenarioKind::Smoke.details());
        runtime.validate().unwrap();
        let mut engine = KMeans::new(runtime.kmeans.clone(), generate_dataset(&runtime).unwrap())
            .unwrap();
        engine.train().unwrap();
        let stats = TrainingStats::new(&engine, Duration::ZERO).unwrap();
        assert_eq!(stats.cluster_sizes.iter().sum::<usize>(), 150);
        assert!(stats.cost.is_finite());
    }
}
