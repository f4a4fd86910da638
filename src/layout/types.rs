//! Data structures for layout computation.

use crate::graph::{Direction, GraphEdge, GraphNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Edge {edge} references unknown node {node}")]
    UnknownEndpoint { edge: String, node: String },
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
}

/// Layout parameters. Every node gets the same box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between neighbouring nodes of one rank
    pub node_sep: f64,
    /// Gap between ranks
    pub rank_sep: f64,
    /// Gap reserved around edge bends (dummy nodes)
    pub edge_sep: f64,
    /// Barycenter sweeps before giving up on fewer crossings
    pub order_iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 250.0,
            node_height: 400.0,
            node_sep: 50.0,
            rank_sep: 50.0,
            edge_sep: 10.0,
            order_iterations: 24,
        }
    }
}

/// Axis-aligned box, top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A node of the layered graph. Coordinates are centres in top-to-bottom space.
#[derive(Debug, Clone)]
pub struct LayerNode {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Bend point of a long edge, not a diagram node
    pub dummy: bool,
    pub rank: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct LayerEdge {
    pub from: usize,
    pub to: usize,
    /// Flipped to break a cycle
    pub reversed: bool,
}

/// Working graph for one layout run. Built fresh per call, never shared.
#[derive(Debug, Clone)]
pub struct LayeredGraph {
    /// Diagram nodes first, dummies appended after them
    pub nodes: Vec<LayerNode>,
    pub edges: Vec<LayerEdge>,
    pub real_count: usize,
}

impl LayeredGraph {
    /// Register nodes and edges. Box dimensions are swapped for left-to-right
    /// so every later phase can work top-to-bottom.
    pub fn build(
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        config: &LayoutConfig,
        direction: Direction,
    ) -> Result<Self, LayoutError> {
        let (width, height) = match direction {
            Direction::TB => (config.node_width, config.node_height),
            Direction::LR => (config.node_height, config.node_width),
        };

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut layer_nodes = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), i).is_some() {
                return Err(LayoutError::DuplicateNode(node.id.clone()));
            }
            layer_nodes.push(LayerNode {
                id: node.id.clone(),
                width,
                height,
                dummy: false,
                rank: 0,
                x: 0.0,
                y: 0.0,
            });
        }

        let lookup = |edge: &GraphEdge, id: &str| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| LayoutError::UnknownEndpoint {
                    edge: edge.id.clone(),
                    node: id.to_string(),
                })
        };

        let mut layer_edges = Vec::with_capacity(edges.len());
        for edge in edges {
            let from = lookup(edge, &edge.source)?;
            let to = lookup(edge, &edge.target)?;
            // Self references carry no ranking information.
            if from != to {
                layer_edges.push(LayerEdge {
                    from,
                    to,
                    reversed: false,
                });
            }
        }

        Ok(Self {
            real_count: layer_nodes.len(),
            nodes: layer_nodes,
            edges: layer_edges,
        })
    }

    pub fn successors(&self) -> Vec<Vec<usize>> {
        let mut succ = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            succ[e.from].push(e.to);
        }
        succ
    }

    pub fn predecessors(&self) -> Vec<Vec<usize>> {
        let mut pred = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            pred[e.to].push(e.from);
        }
        pred
    }

    pub fn max_rank(&self) -> usize {
        self.nodes.iter().map(|n| n.rank).max().unwrap_or(0)
    }
}
