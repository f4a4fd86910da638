//! Layered (hierarchical) layout of the entity graph.
//!
//! Phases: cycle breaking, longest-path ranking, long-edge normalization,
//! barycenter ordering, coordinate assignment. Each call works on its own
//! [`LayeredGraph`], nothing is kept between calls.

mod analysis;
mod engine;
mod order;
mod placement;
mod types;

pub use engine::LayoutEngine;
pub use types::{LayerEdge, LayerNode, LayeredGraph, LayoutConfig, LayoutError, Rect};

use crate::graph::GraphNode;
use crate::measure::TextMetrics;
use crate::transform::ModelData;

/// Box of a positioned node. All nodes share the configured size.
pub fn node_bounds(node: &GraphNode, config: &LayoutConfig) -> Rect {
    Rect {
        x: node.position.x,
        y: node.position.y,
        width: config.node_width,
        height: config.node_height,
    }
}

/// Smallest box containing every node, `None` for an empty graph.
pub fn graph_bounds(nodes: &[GraphNode], config: &LayoutConfig) -> Option<Rect> {
    nodes
        .iter()
        .map(|n| node_bounds(n, config))
        .reduce(|acc, r| acc.union(&r))
}

impl LayoutConfig {
    /// Grow the shared node box so the largest model fits. Never shrinks it.
    pub fn fit_to_models(&mut self, models: &[ModelData], metrics: &TextMetrics) {
        for model in models {
            let (w, h) = metrics.model_size(model);
            self.node_width = self.node_width.max(w);
            self.node_height = self.node_height.max(h);
        }
    }
}
