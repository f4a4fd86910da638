//! Coordinate assignment in top-to-bottom space.

use super::types::{LayerNode, LayeredGraph, LayoutConfig};

/// Alternating down/up alignment passes over the ranks.
const ALIGN_PASSES: usize = 4;

/// Assign node centres: ranks stacked along y, nodes of a rank spread along x.
/// The drawing is translated so its top-left diagram node corner is the origin.
pub fn place_nodes(g: &mut LayeredGraph, layers: &[Vec<usize>], config: &LayoutConfig) {
    place_ranks(g, layers, config.rank_sep);
    pack_ranks(g, layers, config);

    let pred = g.predecessors();
    let succ = g.successors();
    for pass in 0..ALIGN_PASSES {
        if pass % 2 == 0 {
            for layer in layers.iter().skip(1) {
                align(g, layer, &pred, config);
            }
        } else {
            for layer in layers.iter().rev().skip(1) {
                align(g, layer, &succ, config);
            }
        }
    }

    translate(g);
}

fn place_ranks(g: &mut LayeredGraph, layers: &[Vec<usize>], rank_sep: f64) {
    let mut y = 0.0;
    for layer in layers {
        let height = layer
            .iter()
            .map(|&v| g.nodes[v].height)
            .fold(0.0, f64::max);
        for &v in layer {
            g.nodes[v].y = y + height / 2.0;
        }
        y += height + rank_sep;
    }
}

/// Initial packing: left to right, each rank centred on x = 0.
fn pack_ranks(g: &mut LayeredGraph, layers: &[Vec<usize>], config: &LayoutConfig) {
    for layer in layers {
        let mut x = 0.0;
        for (i, &v) in layer.iter().enumerate() {
            if i > 0 {
                x += min_distance(&g.nodes[layer[i - 1]], &g.nodes[v], config);
            }
            g.nodes[v].x = x;
        }
        let shift = x / 2.0;
        for &v in layer {
            g.nodes[v].x -= shift;
        }
    }
}

/// Pull each node towards the mean x of its neighbours while keeping the order
/// and the separation. Left- and right-biased packings are averaged; both
/// respect the separation, so their mean does too.
fn align(g: &mut LayeredGraph, layer: &[usize], neighbours: &[Vec<usize>], config: &LayoutConfig) {
    if layer.is_empty() {
        return;
    }

    let desired: Vec<f64> = layer
        .iter()
        .map(|&v| {
            let ns = &neighbours[v];
            if ns.is_empty() {
                g.nodes[v].x
            } else {
                ns.iter().map(|&w| g.nodes[w].x).sum::<f64>() / ns.len() as f64
            }
        })
        .collect();
    let gaps: Vec<f64> = layer
        .windows(2)
        .map(|pair| min_distance(&g.nodes[pair[0]], &g.nodes[pair[1]], config))
        .collect();

    let mut left = desired.clone();
    for i in 1..layer.len() {
        left[i] = left[i].max(left[i - 1] + gaps[i - 1]);
    }
    let mut right = desired;
    for i in (0..layer.len() - 1).rev() {
        right[i] = right[i].min(right[i + 1] - gaps[i]);
    }

    for (i, &v) in layer.iter().enumerate() {
        g.nodes[v].x = (left[i] + right[i]) / 2.0;
    }
}

/// Centre-to-centre distance two neighbours in a rank must keep.
fn min_distance(a: &LayerNode, b: &LayerNode, config: &LayoutConfig) -> f64 {
    let sep = |n: &LayerNode| {
        if n.dummy {
            config.edge_sep / 2.0
        } else {
            config.node_sep / 2.0
        }
    };
    a.width / 2.0 + b.width / 2.0 + sep(a) + sep(b)
}

fn translate(g: &mut LayeredGraph) {
    let real = &g.nodes[..g.real_count];
    let min_x = real
        .iter()
        .map(|n| n.x - n.width / 2.0)
        .fold(f64::INFINITY, f64::min);
    let min_y = real
        .iter()
        .map(|n| n.y - n.height / 2.0)
        .fold(f64::INFINITY, f64::min);
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }
    for n in &mut g.nodes {
        n.x -= min_x;
        n.y -= min_y;
    }
}
