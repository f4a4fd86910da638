//! Ordering within ranks: depth-first initial order, then barycenter sweeps
//! that keep the ordering with the fewest crossings.

use super::types::LayeredGraph;

/// Sweeps without improvement before the search stops.
const PATIENCE: usize = 4;

/// Return node indices per rank, left to right.
pub fn order(g: &LayeredGraph, iterations: usize) -> Vec<Vec<usize>> {
    let succ = g.successors();
    let pred = g.predecessors();

    let mut layers = init_order(g, &succ);
    let mut best = layers.clone();
    let mut best_crossings = total_crossings(&layers, &succ, g.nodes.len());
    let mut since_best = 0;

    for i in 0..iterations {
        if best_crossings == 0 || since_best >= PATIENCE {
            break;
        }
        if i % 2 == 0 {
            for r in 1..layers.len() {
                let (fixed, movable) = layers.split_at_mut(r);
                sweep(&mut movable[0], &fixed[r - 1], &pred, g.nodes.len());
            }
        } else {
            for r in (0..layers.len().saturating_sub(1)).rev() {
                let (movable, fixed) = layers.split_at_mut(r + 1);
                sweep(&mut movable[r], &fixed[0], &succ, g.nodes.len());
            }
        }

        let crossings = total_crossings(&layers, &succ, g.nodes.len());
        if crossings < best_crossings {
            best_crossings = crossings;
            best = layers.clone();
            since_best = 0;
        } else {
            since_best += 1;
        }
    }

    tracing::trace!(crossings = best_crossings, "ordered ranks");
    best
}

/// Depth-first walk from nodes taken in rank order; a node joins its rank
/// when first reached.
fn init_order(g: &LayeredGraph, succ: &[Vec<usize>]) -> Vec<Vec<usize>> {
    if g.nodes.is_empty() {
        return Vec::new();
    }
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); g.max_rank() + 1];

    let mut starts: Vec<usize> = (0..g.nodes.len()).collect();
    starts.sort_by_key(|&v| g.nodes[v].rank);

    let mut visited = vec![false; g.nodes.len()];
    for start in starts {
        if visited[start] {
            continue;
        }
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            layers[g.nodes[v].rank].push(v);
            // reversed so the first successor is visited first
            for &w in succ[v].iter().rev() {
                if !visited[w] {
                    stack.push(w);
                }
            }
        }
    }

    layers
}

/// Reorder `layer` by the mean position of each node's neighbours in `fixed`.
/// Nodes without neighbours keep their slot.
fn sweep(layer: &mut [usize], fixed: &[usize], neighbours: &[Vec<usize>], n: usize) {
    let mut pos = vec![usize::MAX; n];
    for (i, &v) in fixed.iter().enumerate() {
        pos[v] = i;
    }

    let mut sortable: Vec<(usize, f64)> = Vec::new();
    let mut slots: Vec<usize> = Vec::new();
    for (slot, &v) in layer.iter().enumerate() {
        let placed: Vec<usize> = neighbours[v]
            .iter()
            .map(|&w| pos[w])
            .filter(|&p| p != usize::MAX)
            .collect();
        if placed.is_empty() {
            continue;
        }
        let barycenter = placed.iter().sum::<usize>() as f64 / placed.len() as f64;
        sortable.push((v, barycenter));
        slots.push(slot);
    }

    // stable: ties keep their current relative order
    sortable.sort_by(|a, b| a.1.total_cmp(&b.1));
    for (slot, (v, _)) in slots.into_iter().zip(sortable) {
        layer[slot] = v;
    }
}

pub fn total_crossings(layers: &[Vec<usize>], succ: &[Vec<usize>], n: usize) -> usize {
    layers
        .windows(2)
        .map(|pair| crossings(&pair[0], &pair[1], succ, n))
        .sum()
}

/// Crossings between two adjacent ranks: inversions of lower positions once
/// edges are sorted by upper position.
fn crossings(upper: &[usize], lower: &[usize], succ: &[Vec<usize>], n: usize) -> usize {
    let mut pos = vec![usize::MAX; n];
    for (i, &v) in lower.iter().enumerate() {
        pos[v] = i;
    }

    let mut ends: Vec<usize> = Vec::new();
    for &u in upper {
        let mut targets: Vec<usize> = succ[u]
            .iter()
            .map(|&w| pos[w])
            .filter(|&p| p != usize::MAX)
            .collect();
        targets.sort_unstable();
        ends.extend(targets);
    }

    let mut count = 0;
    for i in 0..ends.len() {
        for j in i + 1..ends.len() {
            if ends[j] < ends[i] {
                count += 1;
            }
        }
    }
    count
}
