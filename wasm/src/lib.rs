use skymap_layout::config::{Config, parse_config};
use skymap_layout::{compute_position_map, parse_graph_data};
use wasm_bindgen::prelude::*;

fn build_config(config_json: Option<&str>) -> anyhow::Result<Config> {
    match config_json {
        Some(raw) if !raw.trim().is_empty() => parse_config(Config::default(), raw),
        _ => Ok(Config::default()),
    }
}

fn positions_json(data: &str, config_json: Option<&str>) -> anyhow::Result<String> {
    let config = build_config(config_json)?;
    let graph = parse_graph_data(data, &config.layout.input)?;
    let map = compute_position_map(&graph, &config.layout)?;
    Ok(serde_json::to_string(&map)?)
}

/// Computes the `{id: {x, y}}` map for a data file. `config_json` takes the
/// same overrides as the CLI config file.
#[wasm_bindgen]
pub fn compute_positions_json(data: &str, config_json: Option<String>) -> Result<String, JsValue> {
    positions_json(data, config_json.as_deref()).map_err(|error| JsValue::from_str(&error.to_string()))
}
