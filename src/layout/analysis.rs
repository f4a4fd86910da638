//! Cycle breaking, rank assignment and long-edge normalization.

use super::types::{LayerEdge, LayerNode, LayeredGraph};
use std::collections::VecDeque;

/// Reverse the back edges found by a depth-first walk in node order.
/// Returns how many edges were flipped.
pub fn break_cycles(g: &mut LayeredGraph) -> usize {
    let n = g.nodes.len();
    // out-edge indices per node, in edge order
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, e) in g.edges.iter().enumerate() {
        out[e.from].push(i);
    }

    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];
    let mut back_edges: Vec<usize> = Vec::new();

    // Explicit stack of (node, next out-edge cursor) to survive deep chains.
    for root in 0..n {
        if visited[root] {
            continue;
        }
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        visited[root] = true;
        on_stack[root] = true;

        while let Some(top) = stack.last_mut() {
            let v = top.0;
            if let Some(&ei) = out[v].get(top.1) {
                top.1 += 1;
                let w = g.edges[ei].to;
                if on_stack[w] {
                    back_edges.push(ei);
                } else if !visited[w] {
                    visited[w] = true;
                    on_stack[w] = true;
                    stack.push((w, 0));
                }
            } else {
                on_stack[v] = false;
                stack.pop();
            }
        }
    }

    for &ei in &back_edges {
        let e = &mut g.edges[ei];
        std::mem::swap(&mut e.from, &mut e.to);
        e.reversed = true;
    }
    back_edges.len()
}

/// Longest path from the sources: sources sit on rank 0, every other node one
/// rank below its deepest predecessor. Expects an acyclic graph.
pub fn assign_ranks(g: &mut LayeredGraph) {
    let succ = g.successors();
    let mut in_degree: Vec<usize> = vec![0; g.nodes.len()];
    for e in &g.edges {
        in_degree[e.to] += 1;
    }

    let mut ranks = vec![0usize; g.nodes.len()];
    let mut queue: VecDeque<usize> = (0..g.nodes.len()).filter(|&v| in_degree[v] == 0).collect();
    while let Some(u) = queue.pop_front() {
        for &v in &succ[u] {
            ranks[v] = ranks[v].max(ranks[u] + 1);
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    for (node, rank) in g.nodes.iter_mut().zip(ranks) {
        node.rank = rank;
    }
}

/// Split every edge spanning more than one rank into a chain of unit edges
/// through zero-size dummy nodes.
pub fn normalize(g: &mut LayeredGraph) {
    let edges = std::mem::take(&mut g.edges);
    let mut normalized = Vec::with_capacity(edges.len());

    for (ei, edge) in edges.into_iter().enumerate() {
        let from_rank = g.nodes[edge.from].rank;
        let to_rank = g.nodes[edge.to].rank;
        if to_rank <= from_rank + 1 {
            normalized.push(edge);
            continue;
        }

        let mut prev = edge.from;
        for rank in from_rank + 1..to_rank {
            let dummy = g.nodes.len();
            g.nodes.push(LayerNode {
                id: format!("_d{ei}_{rank}"),
                width: 0.0,
                height: 0.0,
                dummy: true,
                rank,
                x: 0.0,
                y: 0.0,
            });
            normalized.push(LayerEdge {
                from: prev,
                to: dummy,
                reversed: edge.reversed,
            });
            prev = dummy;
        }
        normalized.push(LayerEdge {
            from: prev,
            to: edge.to,
            reversed: edge.reversed,
        });
    }

    g.edges = normalized;
}
