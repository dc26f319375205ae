use crate::layout::{Point, PositionMap, Positions};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingDump {
    pub outer_radius: f64,
    pub components: Vec<ComponentDump>,
    pub isolated: IsolatedDump,
    pub fallbacks: Vec<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDump {
    pub index: usize,
    pub size: usize,
    pub point_count: usize,
    pub radius: f64,
    /// Packed center, before the layout spread is applied.
    pub center: Point,
    pub nodes: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IsolatedDump {
    pub count: usize,
    pub band: usize,
    pub clusters: usize,
    pub diffuse: usize,
    pub cluster_centers: usize,
}

impl PackingDump {
    pub fn from_positions(positions: &Positions) -> Self {
        let components = positions
            .components
            .iter()
            .map(|component| ComponentDump {
                index: component.index,
                size: component.size(),
                point_count: component.point_count(),
                radius: component.radius,
                center: positions
                    .packing
                    .centers
                    .get(component.index)
                    .copied()
                    .unwrap_or_default(),
                nodes: component.nodes.clone(),
            })
            .collect();

        let scatter = &positions.scatter;
        PackingDump {
            outer_radius: positions.packing.outer_radius,
            components,
            isolated: IsolatedDump {
                count: positions.isolated.len(),
                band: scatter.band,
                clusters: scatter.clusters,
                diffuse: scatter.diffuse,
                cluster_centers: scatter.cluster_centers,
            },
            fallbacks: positions.fallbacks.clone(),
        }
    }
}

pub fn write_packing_dump(path: &Path, positions: &Positions) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = PackingDump::from_positions(positions);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

/// Writes the `{id: {x, y}}` object, to stdout when `output` is `None`.
pub fn write_positions(map: &PositionMap, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, map)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, map)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
