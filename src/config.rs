use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_RELATIONSHIP_TYPES: [&str; 2] = ["family1", "family2"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingConfig {
    /// Scale constant of the component radius heuristic.
    pub padding: f64,
    /// Components below this node count use `small_radius_factor`.
    pub small_component_threshold: usize,
    pub small_radius_factor: f64,
    pub large_radius_factor: f64,
    pub placement_angles: usize,
    pub compaction_rings: usize,
    pub compaction_angles: usize,
    /// Compaction is skipped at or above this component count.
    pub compaction_limit: usize,
    pub fallback_gap: f64,
    pub epsilon: f64,
    pub seed: u64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            padding: 250.0,
            small_component_threshold: 10,
            small_radius_factor: 0.8,
            large_radius_factor: 1.2,
            placement_angles: 36,
            compaction_rings: 4,
            compaction_angles: 24,
            compaction_limit: 100,
            fallback_gap: 10.0,
            epsilon: 1e-6,
            seed: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentLayoutConfig {
    /// Components at or above this size use the force-directed layout.
    pub stress_threshold: usize,
    /// Multiplier applied to a packed center before laying out its component.
    pub center_spread: f64,
    pub stress_scale: f64,
    pub stress_max_iterations: usize,
    pub stress_tolerance: f64,
    pub force_scale: f64,
    /// Repulsion constant numerator, `k = force_k / sqrt(n)`.
    pub force_k: f64,
    /// `(upper size bound, iterations)`, checked in order.
    pub force_iteration_tiers: Vec<(usize, usize)>,
    pub force_max_iterations: usize,
    pub seed: u64,
    pub parallel: bool,
}

impl Default for ComponentLayoutConfig {
    fn default() -> Self {
        Self {
            stress_threshold: 80,
            center_spread: 2.5,
            stress_scale: 1.0,
            stress_max_iterations: 300,
            stress_tolerance: 1e-4,
            force_scale: 1.1,
            force_k: 3.5,
            force_iteration_tiers: vec![(150, 300), (300, 500)],
            force_max_iterations: 600,
            seed: 22,
            parallel: true,
        }
    }
}

impl ComponentLayoutConfig {
    pub fn force_iterations(&self, size: usize) -> usize {
        self.force_iteration_tiers
            .iter()
            .find(|(bound, _)| size < *bound)
            .map(|(_, iterations)| *iterations)
            .unwrap_or(self.force_max_iterations)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterConfig {
    pub band_fraction: f64,
    pub cluster_fraction: f64,
    /// Added to the packed radius to get the band half-length.
    pub band_margin: f64,
    pub band_width: f64,
    /// Both shape parameters of the Beta distribution along the band.
    pub band_shape: f64,
    pub cluster_count_min: usize,
    pub cluster_count_max: usize,
    pub cluster_ring_min: f64,
    pub cluster_ring_max: f64,
    pub cluster_radius_min: f64,
    pub cluster_radius_max: f64,
    pub halo_offset: f64,
    pub halo_spread: f64,
    pub halo_exponential_scale: f64,
    pub halo_cap: f64,
    pub discrete_seed: u64,
    pub continuous_seed: u64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            band_fraction: 0.4,
            cluster_fraction: 0.3,
            band_margin: 20000.0,
            band_width: 4000.0,
            band_shape: 2.0,
            cluster_count_min: 5,
            cluster_count_max: 8,
            cluster_ring_min: 3000.0,
            cluster_ring_max: 18000.0,
            cluster_radius_min: 800.0,
            cluster_radius_max: 2000.0,
            halo_offset: 2000.0,
            halo_spread: 4000.0,
            halo_exponential_scale: 0.6,
            halo_cap: 5.0,
            discrete_seed: 42,
            continuous_seed: 1337,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Relationship categories that become edges.
    pub relationship_types: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            relationship_types: DEFAULT_RELATIONSHIP_TYPES
                .iter()
                .map(|value| value.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayoutConfig {
    pub packing: PackingConfig,
    pub component: ComponentLayoutConfig,
    pub scatter: ScatterConfig,
    pub input: InputConfig,
}

impl LayoutConfig {
    /// Derives every seed from one value, keeping the per-stage seeds distinct.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.packing.seed = seed;
        self.component.seed = seed.wrapping_add(1);
        self.scatter.discrete_seed = seed.wrapping_add(2);
        self.scatter.continuous_seed = seed.wrapping_add(3);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub node_radius: f32,
    pub show_components: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 1200.0,
            background: "#0B1026".to_string(),
            node_radius: 2.5,
            show_components: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::night();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PackingConfigFile {
    padding: Option<f64>,
    placement_angles: Option<usize>,
    compaction_rings: Option<usize>,
    compaction_angles: Option<usize>,
    compaction_limit: Option<usize>,
    fallback_gap: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ComponentConfigFile {
    stress_threshold: Option<usize>,
    center_spread: Option<f64>,
    stress_scale: Option<f64>,
    stress_max_iterations: Option<usize>,
    force_scale: Option<f64>,
    force_k: Option<f64>,
    seed: Option<u64>,
    parallel: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ScatterConfigFile {
    band_fraction: Option<f64>,
    cluster_fraction: Option<f64>,
    band_margin: Option<f64>,
    band_width: Option<f64>,
    band_shape: Option<f64>,
    cluster_count_min: Option<usize>,
    cluster_count_max: Option<usize>,
    halo_offset: Option<f64>,
    halo_spread: Option<f64>,
    discrete_seed: Option<u64>,
    continuous_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
    node_radius: Option<f32>,
    show_components: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    seed: Option<u64>,
    relationship_types: Option<Vec<String>>,
    packing: Option<PackingConfigFile>,
    component: Option<ComponentConfigFile>,
    scatter: Option<ScatterConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    parse_config(config, &contents)
}

/// Applies a JSON override document onto `base`.
pub fn parse_config(mut config: Config, contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "day" || theme_name == "light" {
            config.theme = Theme::day();
            config.render.background = config.theme.background.clone();
        } else if theme_name == "night" || theme_name == "default" {
            config.theme = Theme::night();
            config.render.background = config.theme.background.clone();
        }
    }

    if let Some(seed) = parsed.seed {
        config.layout = config.layout.with_seed(seed);
    }

    if let Some(types) = parsed.relationship_types {
        config.layout.input.relationship_types = types;
    }

    if let Some(packing) = parsed.packing {
        let cfg = &mut config.layout.packing;
        if let Some(v) = packing.padding {
            cfg.padding = v;
        }
        if let Some(v) = packing.placement_angles {
            cfg.placement_angles = v.max(1);
        }
        if let Some(v) = packing.compaction_rings {
            cfg.compaction_rings = v;
        }
        if let Some(v) = packing.compaction_angles {
            cfg.compaction_angles = v.max(1);
        }
        if let Some(v) = packing.compaction_limit {
            cfg.compaction_limit = v;
        }
        if let Some(v) = packing.fallback_gap {
            cfg.fallback_gap = v;
        }
        if let Some(v) = packing.seed {
            cfg.seed = v;
        }
    }

    if let Some(component) = parsed.component {
        let cfg = &mut config.layout.component;
        if let Some(v) = component.stress_threshold {
            cfg.stress_threshold = v;
        }
        if let Some(v) = component.center_spread {
            cfg.center_spread = v;
        }
        if let Some(v) = component.stress_scale {
            cfg.stress_scale = v;
        }
        if let Some(v) = component.stress_max_iterations {
            cfg.stress_max_iterations = v;
        }
        if let Some(v) = component.force_scale {
            cfg.force_scale = v;
        }
        if let Some(v) = component.force_k {
            cfg.force_k = v;
        }
        if let Some(v) = component.seed {
            cfg.seed = v;
        }
        if let Some(v) = component.parallel {
            cfg.parallel = v;
        }
    }

    if let Some(scatter) = parsed.scatter {
        let cfg = &mut config.layout.scatter;
        if let Some(v) = scatter.band_fraction {
            cfg.band_fraction = v.clamp(0.0, 1.0);
        }
        if let Some(v) = scatter.cluster_fraction {
            cfg.cluster_fraction = v.clamp(0.0, 1.0 - cfg.band_fraction);
        }
        if let Some(v) = scatter.band_margin {
            cfg.band_margin = v;
        }
        if let Some(v) = scatter.band_width {
            cfg.band_width = v;
        }
        if let Some(v) = scatter.band_shape {
            cfg.band_shape = v;
        }
        if let Some(v) = scatter.cluster_count_min {
            cfg.cluster_count_min = v.max(1);
        }
        if let Some(v) = scatter.cluster_count_max {
            cfg.cluster_count_max = v;
        }
        cfg.cluster_count_max = cfg.cluster_count_max.max(cfg.cluster_count_min);
        if let Some(v) = scatter.halo_offset {
            cfg.halo_offset = v;
        }
        if let Some(v) = scatter.halo_spread {
            cfg.halo_spread = v;
        }
        if let Some(v) = scatter.discrete_seed {
            cfg.discrete_seed = v;
        }
        if let Some(v) = scatter.continuous_seed {
            cfg.continuous_seed = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
        if let Some(v) = render.node_radius {
            config.render.node_radius = v;
        }
        if let Some(v) = render.show_components {
            config.render.show_components = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = LayoutConfig::default();
        assert!((config.packing.padding - 250.0).abs() < f64::EPSILON);
        assert_eq!(config.packing.placement_angles, 36);
        assert_eq!(config.packing.compaction_rings, 4);
        assert_eq!(config.packing.compaction_angles, 24);
        assert_eq!(config.packing.compaction_limit, 100);
        assert_eq!(config.component.stress_threshold, 80);
        assert!((config.component.center_spread - 2.5).abs() < f64::EPSILON);
        assert_eq!(config.input.relationship_types, vec!["family1", "family2"]);
    }

    #[test]
    fn force_iterations_are_graduated_by_size() {
        let config = ComponentLayoutConfig::default();
        assert_eq!(config.force_iterations(80), 300);
        assert_eq!(config.force_iterations(149), 300);
        assert_eq!(config.force_iterations(150), 500);
        assert_eq!(config.force_iterations(299), 500);
        assert_eq!(config.force_iterations(300), 600);
        assert_eq!(config.force_iterations(5000), 600);
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let json = r#"{
            "theme": "day",
            "relationshipTypes": ["family1"],
            "packing": { "padding": 100, "placementAngles": 12 },
            "component": { "parallel": false },
            "scatter": { "clusterCountMin": 9, "continuousSeed": 5 },
            "render": { "width": 640 }
        }"#;
        let config = parse_config(Config::default(), json).unwrap();
        assert!((config.layout.packing.padding - 100.0).abs() < f64::EPSILON);
        assert_eq!(config.layout.packing.placement_angles, 12);
        assert_eq!(config.layout.packing.compaction_rings, 4);
        assert!(!config.layout.component.parallel);
        assert_eq!(config.layout.scatter.cluster_count_min, 9);
        assert_eq!(config.layout.scatter.cluster_count_max, 9);
        assert_eq!(config.layout.scatter.continuous_seed, 5);
        assert_eq!(config.layout.input.relationship_types, vec!["family1"]);
        assert_eq!(config.theme.background, Theme::day().background);
        assert!((config.render.width - 640.0).abs() < f32::EPSILON);
    }

    #[test]
    fn global_seed_fans_out_to_every_stage() {
        let config = parse_config(Config::default(), r#"{ "seed": 100 }"#).unwrap();
        assert_eq!(config.layout.packing.seed, 100);
        assert_eq!(config.layout.component.seed, 101);
        assert_eq!(config.layout.scatter.discrete_seed, 102);
        assert_eq!(config.layout.scatter.continuous_seed, 103);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.packing.seed, PackingConfig::default().seed);
    }
}
