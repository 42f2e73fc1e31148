//! Invariants that must hold for any input, checked over seeded random data.

use approx::assert_relative_eq;
use cluster_core::{generate_uniform_dataset, Dataset, Vector};
use cluster_kmeans::{cost, CentroidSet, InitStrategy, KMeans, KMeansConfig};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

fn brute_force_nearest(point: &Vector, centroids: &[Vector]) -> usize {
    let distances: Vec<f32> = centroids
        .iter()
        .map(|c| point.distance_to(c).unwrap())
        .collect();
    let min = distances.iter().copied().fold(f32::INFINITY, f32::min);
    distances.iter().position(|&d| d == min).unwrap()
}

#[test]
fn test_classify_returns_first_nearest_centroid() {
    let data = generate_uniform_dataset(3, 200, -5.0..5.0, 21);
    let config = KMeansConfig::new(3, 6, 10)
        .with_seed(8)
        .with_init(InitStrategy::DataRange);
    let mut engine = KMeans::new(config, Dataset::new(data).unwrap()).unwrap();
    engine.train().unwrap();

    let probes = generate_uniform_dataset(3, 100, -8.0..8.0, 22);
    for probe in &probes {
        let index = engine.classify(probe).unwrap();
        assert!(index < engine.clusters());
        assert_eq!(index, brute_force_nearest(probe, engine.centroids().as_slice()));
    }
}

#[test]
fn test_classify_tie_goes_to_lowest_index() {
    let dataset = Dataset::new(vec![Vector::from([0.0, 0.0])]).unwrap();
    let centroids = CentroidSet::new(vec![
        Vector::from([2.0, 0.0]),
        Vector::from([0.0, 1.0]),
        Vector::from([0.0, -1.0]),
        Vector::from([-1.0, 0.0]),
    ])
    .unwrap();
    let engine = KMeans::with_centroids(KMeansConfig::new(1, 4, 1), dataset, centroids).unwrap();
    assert_eq!(engine.classify(&Vector::from([0.0, 0.0])).unwrap(), 1);
}

#[test]
fn test_best_cost_never_increases_across_restarts() {
    let data = generate_uniform_dataset(2, 120, 0.0..1.0, 5);
    let config = KMeansConfig::new(12, 4, 8).with_seed(99);
    let mut engine = KMeans::new(config, Dataset::new(data).unwrap()).unwrap();
    engine.train().unwrap();

    let trials = engine.trials();
    assert_eq!(trials.len(), 12);
    let mut running = f32::INFINITY;
    for trial in trials {
        running = running.min(trial.cost);
        assert_eq!(trial.best_cost, running);
    }
    for pair in trials.windows(2) {
        assert!(pair[1].best_cost <= pair[0].best_cost);
    }
    assert_eq!(engine.cost().unwrap(), running);
}

#[test]
fn test_cost_ignores_point_order_and_centroid_labels() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut points = generate_uniform_dataset(4, 80, -1.0..1.0, 17);
    let mut centroids: Vec<Vector> = (0..5)
        .map(|_| Vector::new((0..4).map(|_| rng.gen_range(-1.0..1.0)).collect()))
        .collect();

    let base = cost(
        &Dataset::new(points.clone()).unwrap(),
        &CentroidSet::new(centroids.clone()).unwrap(),
    )
    .unwrap();

    points.shuffle(&mut rng);
    centroids.shuffle(&mut rng);
    let permuted = cost(
        &Dataset::new(points).unwrap(),
        &CentroidSet::new(centroids).unwrap(),
    )
    .unwrap();

    assert_relative_eq!(base, permuted, max_relative = 1e-5);
}

#[test]
fn test_empty_cluster_survives_training_untouched() {
    let dataset = Dataset::new(vec![Vector::from([0.0, 0.0]), Vector::from([1.0, 1.0])]).unwrap();
    let far = Vector::from([1.0e6, -1.0e6]);
    let start = CentroidSet::new(vec![Vector::from([0.5, 0.5]), far.clone()]).unwrap();

    let step = cluster_kmeans::lloyd_step(&dataset, &start).unwrap();
    assert_eq!(step.assignment.counts(), &[2, 0]);
    assert_eq!(step.centroids.get(1), Some(&far));

    let again = cluster_kmeans::lloyd_step(&dataset, &step.centroids).unwrap();
    assert_eq!(again.centroids.get(1), Some(&far));
}
