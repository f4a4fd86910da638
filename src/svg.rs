use crate::graph::{Direction, GraphEdge, GraphNode, GraphSnapshot, NodeKind};
use crate::layout::{LayoutConfig, Rect, graph_bounds, node_bounds};
use crate::measure::TextMetrics;
use crate::theme::Palette;
use std::collections::HashMap;
use std::fmt::{self, Write};

/// Blank border around the drawing.
const MARGIN: f64 = 20.0;

#[derive(Default)]
pub struct SvgRenderer {
    metrics: TextMetrics,
}

impl SvgRenderer {
    pub fn new(metrics: TextMetrics) -> Self {
        Self { metrics }
    }

    /// Static drawing of a positioned snapshot.
    pub fn render(&self, snapshot: &GraphSnapshot, palette: &Palette, config: &LayoutConfig) -> String {
        let mut svg = String::new();
        // fmt::Write into a String is infallible
        let _ = self.write_document(&mut svg, snapshot, palette, config);
        svg
    }

    fn write_document(
        &self,
        svg: &mut String,
        snapshot: &GraphSnapshot,
        palette: &Palette,
        config: &LayoutConfig,
    ) -> fmt::Result {
        let bounds = graph_bounds(&snapshot.nodes, config).unwrap_or(Rect {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        });
        let (min_x, min_y) = (bounds.x - MARGIN, bounds.y - MARGIN);
        let (width, height) = (bounds.width + MARGIN * 2.0, bounds.height + MARGIN * 2.0);

        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{min_x} {min_y} {width} {height}">"#
        )?;

        writeln!(
            svg,
            r#"<style>
  .node-border {{ fill: none; stroke: {edge}; stroke-width: 1; }}
  .node-name {{ font-family: monospace; font-size: 14px; font-weight: bold; fill: {text}; }}
  .field-text {{ font-family: monospace; font-size: 12px; fill: {text}; }}
  .relation {{ font-style: italic; }}
  .edge {{ stroke: {edge}; stroke-width: 1.5; fill: none; }}
  .implicit {{ stroke-dasharray: 6 4; }}
  .edge-label {{ font-family: monospace; font-size: 11px; fill: {text}; }}
  .multiplicity {{ font-family: monospace; font-size: 11px; fill: {text}; }}
</style>"#,
            edge = palette.edge,
            text = palette.text,
        )?;

        writeln!(
            svg,
            r#"<rect x="{min_x}" y="{min_y}" width="{width}" height="{height}" fill="{}" />"#,
            palette.background
        )?;

        let boxes: HashMap<&str, Rect> = snapshot
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), node_bounds(n, config)))
            .collect();

        // edges first, behind the boxes
        for edge in &snapshot.edges {
            if let (Some(from), Some(to)) = (boxes.get(edge.source.as_str()), boxes.get(edge.target.as_str())) {
                self.write_edge(svg, edge, from, to, snapshot.direction)?;
            }
        }

        for node in &snapshot.nodes {
            self.write_node(svg, node, &node_bounds(node, config), palette)?;
        }

        writeln!(svg, "</svg>")
    }

    fn write_node(&self, svg: &mut String, node: &GraphNode, rect: &Rect, palette: &Palette) -> fmt::Result {
        let header_h = self.metrics.header_height();
        let (header_fill, rows) = match &node.kind {
            NodeKind::Model(model) => (
                palette.header,
                model
                    .fields
                    .iter()
                    .map(|f| (field_text(&f.name, &f.typ, f.is_list, f.is_required), f.has_connections))
                    .collect::<Vec<_>>(),
            ),
            NodeKind::Enum(e) => (
                palette.enum_header,
                e.values.iter().map(|v| (v.clone(), false)).collect(),
            ),
        };

        writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="4" fill="{}" />"#,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            palette.row_odd
        )?;
        writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="4" fill="{}" />"#,
            rect.x, rect.y, rect.width, header_h, header_fill
        )?;
        writeln!(
            svg,
            r#"<text class="node-name" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            rect.x + rect.width / 2.0,
            rect.y + header_h / 2.0 + 5.0,
            escape_xml(node.kind.name())
        )?;

        let mut row_y = rect.y + header_h;
        for (i, (text, related)) in rows.iter().enumerate() {
            if row_y + self.metrics.line_height > rect.bottom() {
                break;
            }
            writeln!(
                svg,
                r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
                rect.x,
                row_y,
                rect.width,
                self.metrics.line_height,
                palette.row(i)
            )?;
            let class = if *related { "field-text relation" } else { "field-text" };
            writeln!(
                svg,
                r#"<text class="{}" x="{}" y="{}">{}</text>"#,
                class,
                rect.x + self.metrics.padding_x,
                row_y + self.metrics.line_height * 0.7,
                escape_xml(text)
            )?;
            row_y += self.metrics.line_height;
        }

        writeln!(
            svg,
            r#"<rect class="node-border" x="{}" y="{}" width="{}" height="{}" rx="4" />"#,
            rect.x, rect.y, rect.width, rect.height
        )
    }

    fn write_edge(
        &self,
        svg: &mut String,
        edge: &GraphEdge,
        from: &Rect,
        to: &Rect,
        direction: Direction,
    ) -> fmt::Result {
        let ((x1, y1), (x2, y2)) = anchor_points(from, to, direction);
        let class = if edge.is_implicit { "edge implicit" } else { "edge" };

        writeln!(
            svg,
            r#"<line class="{class}" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" />"#
        )?;

        let dx = x2 - x1;
        let dy = y2 - y1;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return Ok(());
        }
        let (ux, uy) = (dx / len, dy / len);
        let offset = 15.0;

        // each end shows how many of the entity at that end take part
        writeln!(
            svg,
            r#"<text class="multiplicity" x="{}" y="{}">{}</text>"#,
            x1 + ux * offset + 4.0,
            y1 + uy * offset,
            edge.target_multiplicity.symbol()
        )?;
        writeln!(
            svg,
            r#"<text class="multiplicity" x="{}" y="{}">{}</text>"#,
            x2 - ux * offset + 4.0,
            y2 - uy * offset,
            edge.source_multiplicity.symbol()
        )?;
        writeln!(
            svg,
            r#"<text class="edge-label" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            (x1 + x2) / 2.0,
            (y1 + y2) / 2.0 - 5.0,
            escape_xml(&edge.label)
        )
    }
}

/// Connection points on facing sides of two boxes, along the rank axis.
fn anchor_points(from: &Rect, to: &Rect, direction: Direction) -> ((f64, f64), (f64, f64)) {
    let (fx, fy) = from.center();
    let (tx, ty) = to.center();
    match direction {
        Direction::TB if ty >= fy => ((fx, from.bottom()), (tx, to.y)),
        Direction::TB => ((fx, from.y), (tx, to.bottom())),
        Direction::LR if tx >= fx => ((from.right(), fy), (to.x, ty)),
        Direction::LR => ((from.x, fy), (to.right(), ty)),
    }
}

fn field_text(name: &str, typ: &str, is_list: bool, is_required: bool) -> String {
    let suffix = if is_list {
        "[]"
    } else if !is_required {
        "?"
    } else {
        ""
    };
    format!("{name}: {typ}{suffix}")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
