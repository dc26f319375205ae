use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::Graph;
use crate::layout::{Point, Positions};
use crate::theme::Theme;
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::Path;

/// World-space bounds of everything drawn in a preview.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, point: Point, radius: f64) {
        self.min_x = self.min_x.min(point.x - radius);
        self.min_y = self.min_y.min(point.y - radius);
        self.max_x = self.max_x.max(point.x + radius);
        self.max_y = self.max_y.max(point.y + radius);
    }

    fn extent(&self) -> f64 {
        (self.max_x - self.min_x).max(self.max_y - self.min_y)
    }

    /// Square box around the content with a margin, falling back to a unit
    /// box when nothing was drawn.
    fn view_box(&self) -> (f64, f64, f64) {
        if !self.min_x.is_finite() {
            return (-1.0, -1.0, 2.0);
        }
        let size = self.extent().max(1.0) * 1.05;
        let cx = (self.min_x + self.max_x) / 2.0;
        let cy = (self.min_y + self.max_y) / 2.0;
        (cx - size / 2.0, cy - size / 2.0, size)
    }
}

/// Draws a diagnostic preview: packed component circles, the enclosing
/// circle, relationship edges and every positioned node. The y axis is
/// flipped so the picture matches the coordinate system of the map.
pub fn render_svg(
    graph: &Graph,
    positions: &Positions,
    theme: &Theme,
    layout: &LayoutConfig,
    render: &RenderConfig,
) -> String {
    let spread = layout.component.center_spread;
    let circles: Vec<(Point, f64, usize)> = positions
        .components
        .iter()
        .filter_map(|component| {
            let center = positions.packing.centers.get(component.index)?;
            Some((flip(center.scale(spread)), component.radius, component.size()))
        })
        .collect();
    let outer = positions.packing.outer_radius * spread;

    let mut bounds = Bounds::empty();
    for (_, point) in positions.map.iter() {
        bounds.include(flip(point), 0.0);
    }
    for (center, radius, _) in &circles {
        bounds.include(*center, *radius);
    }
    if outer > 0.0 {
        bounds.include(Point::ORIGIN, outer);
    }
    let (vx, vy, size) = bounds.view_box();
    // one output pixel in world units
    let px = size / f64::from(render.width.min(render.height).max(1.0));

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"{vx:.2} {vy:.2} {size:.2} {size:.2}\" preserveAspectRatio=\"xMidYMid meet\">",
        render.width, render.height
    ));
    svg.push_str(&format!(
        "<rect x=\"{vx:.2}\" y=\"{vy:.2}\" width=\"{size:.2}\" height=\"{size:.2}\" fill=\"{}\"/>",
        render.background
    ));

    if render.show_components {
        if outer > 0.0 {
            svg.push_str(&format!(
                "<circle cx=\"0\" cy=\"0\" r=\"{outer:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-dasharray=\"{:.2} {:.2}\"/>",
                theme.outer_border,
                px * 1.5,
                px * 8.0,
                px * 6.0
            ));
        }
        for (center, radius, count) in &circles {
            svg.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
                center.x,
                center.y,
                theme.component_fill,
                theme.component_border,
                px
            ));
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\">{count}</text>",
                center.x,
                center.y - radius - px * 4.0,
                escape_xml(&theme.font_family),
                f64::from(theme.font_size) * px,
                theme.label_color
            ));
        }
    }

    for edge in &graph.edges {
        let (Some(a), Some(b)) = (positions.map.get(&edge.a), positions.map.get(&edge.b)) else {
            continue;
        };
        let (a, b) = (flip(a), flip(b));
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{:.2}\"/>",
            a.x,
            a.y,
            b.x,
            b.y,
            theme.edge_color,
            px * 0.6
        ));
    }

    let isolated: BTreeSet<&str> = positions.isolated.iter().map(String::as_str).collect();
    let node_radius = f64::from(render.node_radius) * px;
    for (id, point) in positions.map.iter() {
        let point = flip(point);
        let fill = if isolated.contains(id) {
            &theme.isolated_node_color
        } else {
            &theme.connected_node_color
        };
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{node_radius:.2}\" fill=\"{fill}\"><title>{}</title></circle>",
            point.x,
            point.y,
            escape_xml(id)
        ));
    }

    svg.push_str("</svg>");
    svg
}

fn flip(point: Point) -> Point {
    Point::new(point.x, -point.y)
}

pub fn write_output_svg(svg: &str, output: &Path) -> Result<()> {
    std::fs::write(output, svg)?;
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().trim_matches('"').to_string();
    }
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
