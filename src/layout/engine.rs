//! Layout engine core implementation.

use crate::graph::{Direction, GraphEdge, GraphNode, GraphSnapshot, Position};

use super::analysis::{assign_ranks, break_cycles, normalize};
use super::order::order;
use super::placement::place_nodes;
use super::types::{LayeredGraph, LayoutConfig, LayoutError};

/// Layered layout over a node/edge graph.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub(crate) config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute top-left positions for every node. Edges are only read.
    pub fn layout(
        &self,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        direction: Direction,
    ) -> Result<Vec<GraphNode>, LayoutError> {
        // Phase 1: fresh working graph for this call
        let mut g = LayeredGraph::build(nodes, edges, &self.config, direction)?;

        // Phase 2: ranks
        let reversed = break_cycles(&mut g);
        assign_ranks(&mut g);
        normalize(&mut g);

        // Phase 3: order within ranks
        let layers = order(&g, self.config.order_iterations);

        // Phase 4: coordinates
        place_nodes(&mut g, &layers, &self.config);

        tracing::debug!(
            nodes = g.real_count,
            dummies = g.nodes.len() - g.real_count,
            ranks = layers.len(),
            reversed,
            ?direction,
            "layout complete"
        );

        // Phase 5: back to the requested axes, then centre boxes on the computed points
        let (half_w, half_h) = (self.config.node_width / 2.0, self.config.node_height / 2.0);
        let positioned = nodes
            .iter()
            .zip(&g.nodes)
            .map(|(node, placed)| {
                let (cx, cy) = match direction {
                    Direction::TB => (placed.x, placed.y),
                    Direction::LR => (placed.y, placed.x),
                };
                GraphNode {
                    position: Position::new(cx - half_w, cy - half_h),
                    ..node.clone()
                }
            })
            .collect();

        Ok(positioned)
    }

    /// Lay out a snapshot in the given direction, keeping its edges.
    pub fn layout_snapshot(
        &self,
        snapshot: &GraphSnapshot,
        direction: Direction,
    ) -> Result<GraphSnapshot, LayoutError> {
        Ok(GraphSnapshot {
            nodes: self.layout(&snapshot.nodes, &snapshot.edges, direction)?,
            edges: snapshot.edges.clone(),
            direction,
        })
    }
}
