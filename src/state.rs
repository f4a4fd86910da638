//! Reducer behind the render surface.
//!
//! Inbound messages arrive over a channel and are applied one at a time. The
//! laid-out snapshot is replaced wholesale on structural change; drag
//! positions live beside it and never reach the layout engine.

use crate::graph::{Direction, GraphEdge, GraphNode, GraphSnapshot, Position, build_graph};
use crate::layout::LayoutEngine;
use crate::relation::RelationshipDescriptor;
use crate::schema::EnumDescriptor;
use crate::theme::ColorThemeKind;
use crate::transform::ModelData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Message {
    SetData {
        models: Vec<ModelData>,
        enums: Vec<EnumDescriptor>,
        relationships: Vec<RelationshipDescriptor>,
    },
    SetTheme {
        theme: ColorThemeKind,
    },
    SetDirection {
        direction: Direction,
    },
    DragNode {
        id: String,
        position: Position,
    },
}

#[derive(Debug, Default)]
pub struct DiagramState {
    engine: LayoutEngine,
    snapshot: GraphSnapshot,
    theme: ColorThemeKind,
    overrides: HashMap<String, Position>,
}

impl DiagramState {
    pub fn new(engine: LayoutEngine, direction: Direction, theme: ColorThemeKind) -> Self {
        Self {
            engine,
            snapshot: GraphSnapshot {
                direction,
                ..GraphSnapshot::default()
            },
            theme,
            overrides: HashMap::new(),
        }
    }

    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    pub fn direction(&self) -> Direction {
        self.snapshot.direction
    }

    pub fn theme(&self) -> ColorThemeKind {
        self.theme
    }

    /// Apply one message. Returns whether the surface has to redraw.
    /// On error the state is left as it was.
    pub fn apply(&mut self, msg: Message) -> Result<bool, crate::Error> {
        match msg {
            Message::SetData {
                models,
                enums,
                relationships,
            } => {
                let (nodes, edges) = build_graph(&models, &enums, &relationships)?;
                if self.same_structure(&nodes, &edges) {
                    tracing::debug!("data unchanged, keeping layout");
                    return Ok(false);
                }
                self.relayout(nodes, edges, self.snapshot.direction)?;
                Ok(true)
            }
            Message::SetTheme { theme } => {
                let changed = self.theme != theme;
                self.theme = theme;
                Ok(changed)
            }
            Message::SetDirection { direction } => {
                let nodes = std::mem::take(&mut self.snapshot.nodes);
                let edges = std::mem::take(&mut self.snapshot.edges);
                match self.engine.layout(&nodes, &edges, direction) {
                    Ok(positioned) => {
                        self.snapshot = GraphSnapshot {
                            nodes: positioned,
                            edges,
                            direction,
                        };
                        self.overrides.clear();
                        Ok(true)
                    }
                    Err(e) => {
                        self.snapshot.nodes = nodes;
                        self.snapshot.edges = edges;
                        Err(e.into())
                    }
                }
            }
            Message::DragNode { id, position } => {
                if self.snapshot.node(&id).is_none() {
                    tracing::warn!(%id, "drag for unknown node ignored");
                    return Ok(false);
                }
                self.overrides.insert(id, position);
                Ok(true)
            }
        }
    }

    /// Apply messages until every sender is gone, calling `on_render` after
    /// each one that needs a redraw. Failed messages are logged and skipped.
    pub fn run(&mut self, receiver: Receiver<Message>, mut on_render: impl FnMut(&DiagramState)) {
        for msg in receiver {
            match self.apply(msg) {
                Ok(true) => on_render(self),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "message rejected"),
            }
        }
    }

    /// Nodes as shown: layout positions with drag overrides on top.
    pub fn displayed_nodes(&self) -> Vec<GraphNode> {
        self.snapshot
            .nodes
            .iter()
            .map(|node| match self.overrides.get(&node.id) {
                Some(&position) => GraphNode {
                    position,
                    ..node.clone()
                },
                None => node.clone(),
            })
            .collect()
    }

    fn same_structure(&self, nodes: &[GraphNode], edges: &[GraphEdge]) -> bool {
        self.snapshot.edges == edges
            && self.snapshot.nodes.len() == nodes.len()
            && self
                .snapshot
                .nodes
                .iter()
                .zip(nodes)
                .all(|(a, b)| a.id == b.id && a.kind == b.kind)
    }

    fn relayout(
        &mut self,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        direction: Direction,
    ) -> Result<(), crate::Error> {
        let positioned = self.engine.layout(&nodes, &edges, direction)?;
        self.snapshot = GraphSnapshot {
            nodes: positioned,
            edges,
            direction,
        };
        self.overrides.clear();
        Ok(())
    }
}
