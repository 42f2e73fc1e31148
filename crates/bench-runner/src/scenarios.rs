use clap::ValueEnum;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab_case")]
pub enum ScenarioKind {
    /// Fastest possible run – verifies plumbing and I/O quickly.
    Smoke,
    /// Many well separated blobs inside the unit cube.
    SeparatedBlobs,
    /// RGB-like pixels in [0, 255] reduced to a small palette.
    ColorQuantization,
    /// Every point identical.
    IdenticalPoints,
}

#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    pub dimension: usize,
    pub points: usize,
    /// Number of blob centers the dataset is generated around.
    pub centers: usize,
    /// Number of centroids to fit.
    pub clusters: usize,
    /// Upper bound of the coordinate range; the lower bound is zero.
    pub scale: f32,
    pub spread: f32,
}

#[derive(Clone, Debug)]
pub struct ScenarioDetails {
    pub slug: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub config: ScenarioConfig,
}

impl ScenarioKind {
    pub fn details(self) -> ScenarioDetails {
        match self {
            ScenarioKind::Smoke => ScenarioDetails {
                slug: "smoke",
                label: "Smoke test (150 pts)",
                description: "Three small 2-d blobs; quick sanity check that fits easily into CI.",
                config: ScenarioConfig {
                    dimension: 2,
                    points: 150,
                    centers: 3,
                    clusters: 3,
                    scale: 1.0,
                    spread: 0.05,
                },
            },
            ScenarioKind::SeparatedBlobs => ScenarioDetails {
                slug: "separated-blobs",
                label: "Separated blobs (4k pts)",
                description: "Eight tight 8-d blobs in the unit cube; restarts should recover all of them.",
                config: ScenarioConfig {
                    dimension: 8,
                    points: 4_000,
                    centers: 8,
                    clusters: 8,
                    scale: 1.0,
                    spread: 0.02,
                },
            },
            ScenarioKind::ColorQuantization => ScenarioDetails {
                slug: "color-quantization",
                label: "Color quantization (16k px)",
                description: "3-channel pixels in [0, 255] reduced to 16 colors; compare unit-cube and data-range seeding.",
                config: ScenarioConfig {
                    dimension: 3,
                    points: 16_000,
                    centers: 24,
                    clusters: 16,
                    scale: 255.0,
                    spread: 12.0,
                },
            },
            ScenarioKind::IdenticalPoints => ScenarioDetails {
                slug: "identical-points",
                label: "Identical points (800 pts)",
                description: "One 3-d point drawn from [0, 255) and repeated; the best restart should reach zero cost.",
                config: ScenarioConfig {
                    dimension: 3,
                    points: 800,
                    centers: 1,
                    clusters: 4,
                    scale: 255.0,
                    spread: 0.0,
                },
            },
        }
    }

    pub fn list_details() -> Vec<ScenarioDetails> {
        ScenarioKind::value_variants()
            .iter()
            .map(|kind| kind.details())
            .collect()
    }
}

pub fn print_available() {
    println!("Available benchmark scenarios:");
    for details in ScenarioKind::list_details() {
        println!(
            "  {:<19} {:<28} dim={:<3} points={:<6} centers={:<3} k={:<3} scale={:<6} spread={}",
            details.slug,
            details.label,
            details.config.dimension,
            details.config.points,
            details.config.centers,
            details.config.clusters,
            details.config.scale,
            details.config.spread
        );
        println!("      {}", details.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_scenarios_have_unique_slugs() {
        let mut slugs = ScenarioKind::list_details()
            .into_iter()
            .map(|detail| detail.slug)
            .collect::<Vec<_>>();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), ScenarioKind::value_variants().len());
    }

    #[test]
    fn scenarios_describe_valid_datasets() {
        for details in ScenarioKind::list_details() {
            let config = details.config;
            assert!(config.dimension > 0, "{}", details.slug);
            assert!(config.points >= config.centers, "{}", details.slug);
            assert!(config.clusters > 0, "{}", details.slug);
            assert!(config.scale > 0.0, "{}", details.slug);
            assert!(config.spread >= 0.0, "{}", details.slug);
        }
    }
}
