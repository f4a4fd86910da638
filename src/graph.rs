use crate::relation::{Multiplicity, RelationshipDescriptor};
use crate::schema::{EnumDescriptor, SchemaError};
use crate::transform::ModelData;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ranks stacked top to bottom.
    #[default]
    TB,
    /// Ranks laid out left to right.
    LR,
}

impl Direction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TB" | "tb" | "vertical" => Some(Self::TB),
            "LR" | "lr" | "horizontal" => Some(Self::LR),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self == Self::LR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NodeKind {
    Model(ModelData),
    Enum(EnumDescriptor),
}

impl NodeKind {
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Model(m) => &m.name,
            NodeKind::Enum(e) => &e.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    pub label: String,
    pub relation: String,
    pub is_implicit: bool,
    pub source_multiplicity: Multiplicity,
    pub target_multiplicity: Multiplicity,
}

/// The node/edge snapshot posted to the render surface.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub direction: Direction,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

pub fn edge_id(source: &str, target: &str, relation: &str) -> String {
    format!("{source}-{target}-{relation}")
}

pub fn build_graph(
    models: &[ModelData],
    enums: &[EnumDescriptor],
    relationships: &[RelationshipDescriptor],
) -> Result<(Vec<GraphNode>, Vec<GraphEdge>), SchemaError> {
    let nodes: Vec<GraphNode> = models
        .iter()
        .map(|m| NodeKind::Model(m.clone()))
        .chain(enums.iter().map(|e| NodeKind::Enum(e.clone())))
        .map(|kind| GraphNode {
            id: kind.name().to_string(),
            kind,
            position: Position::default(),
        })
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut edges = Vec::with_capacity(relationships.len());
    for r in relationships {
        let edge = build_edge(r);
        if !seen.insert(edge.id.clone()) {
            return Err(SchemaError::DuplicateEdge(edge.id));
        }
        edges.push(edge);
    }

    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "built graph");
    Ok((nodes, edges))
}

fn build_edge(r: &RelationshipDescriptor) -> GraphEdge {
    let source_handle = match &r.source_field {
        Some(field) => format!("{}-{}-source", r.source_entity, field),
        None => r.source_entity.clone(),
    };
    let label = if r.is_implicit {
        format!("{} (implicit)", r.name)
    } else {
        r.name.clone()
    };

    GraphEdge {
        id: edge_id(&r.source_entity, &r.target_entity, &r.name),
        source: r.source_entity.clone(),
        target: r.target_entity.clone(),
        source_handle,
        target_handle: format!("{}-target", r.target_entity),
        label,
        relation: r.name.clone(),
        is_implicit: r.is_implicit,
        source_multiplicity: r.source_multiplicity,
        target_multiplicity: r.target_multiplicity,
    }
}
