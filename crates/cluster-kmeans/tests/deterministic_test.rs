//! Seeded runs are reproducible, with or without the thread pool.

use cluster_core::{generate_blobs, Dataset};
use cluster_kmeans::{InitStrategy, KMeans, KMeansConfig};

fn blobs() -> Dataset {
    Dataset::new(generate_blobs(3, 4, 25, 0.0..1.0, 0.05, 13)).unwrap()
}

fn train(config: KMeansConfig) -> KMeans {
    let mut engine = KMeans::new(config, blobs()).unwrap();
    engine.train().unwrap();
    engine
}

#[test]
fn test_same_seed_same_centroids() {
    let config = KMeansConfig::new(6, 4, 15).with_seed(2024);
    let first = train(config.clone());
    let second = train(config);

    assert_eq!(first.centroids(), second.centroids());
    assert_eq!(first.trials(), second.trials());
}

#[test]
fn test_parallel_matches_sequential() {
    for init in [
        InitStrategy::UnitCube,
        InitStrategy::DataRange,
        InitStrategy::Sample,
    ] {
        let sequential = KMeansConfig::new(8, 4, 12).with_seed(77).with_init(init);
        let parallel = sequential.clone().with_parallel(true);

        let a = train(sequential);
        let b = train(parallel);
        assert_eq!(a.centroids(), b.centroids());
        assert_eq!(a.trials(), b.trials());
    }
}

#[test]
fn test_retraining_is_idempotent_with_seed() {
    let mut engine = KMeans::new(KMeansConfig::new(3, 4, 10).with_seed(5), blobs()).unwrap();
    engine.train().unwrap();
    let first = engine.centroids().clone();
    engine.train().unwrap();
    assert_eq!(engine.centroids(), &first);
    assert_eq!(engine.trials().len(), 3);
}

#[test]
fn test_unseeded_training_still_completes() {
    let engine = train(KMeansConfig::new(2, 4, 5));
    assert!(engine.is_trained());
    assert_eq!(engine.trials().len(), 2);
    assert!(engine.cost().unwrap().is_finite());
}
