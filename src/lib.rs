pub mod config;
pub mod dml;
pub mod error;
pub mod export;
pub mod graph;
pub mod layout;
pub mod locate;
pub mod measure;
pub mod relation;
pub mod schema;
pub mod state;
pub mod svg;
pub mod theme;
pub mod transform;

use wasm_bindgen::prelude::*;

pub use config::Config;
pub use error::Error;

use graph::{Direction, GraphSnapshot, build_graph};
use layout::LayoutEngine;
use relation::RelationResolver;
use schema::SchemaDocument;

/// Schema document to positioned graph: transform, resolve relationships,
/// build nodes and edges, then lay them out.
pub fn build_diagram(document: &SchemaDocument, config: &Config) -> Result<GraphSnapshot, Error> {
    let (models, enums) = transform::transform(document);
    let relationships = RelationResolver::new(config.implicit_policy).resolve(&document.entities)?;
    let (nodes, edges) = build_graph(&models, &enums, &relationships)?;

    let engine = LayoutEngine::new(config.layout.clone());
    let nodes = engine.layout(&nodes, &edges, config.direction)?;

    tracing::info!(
        nodes = nodes.len(),
        edges = edges.len(),
        direction = ?config.direction,
        "diagram ready"
    );

    Ok(GraphSnapshot {
        nodes,
        edges,
        direction: config.direction,
    })
}

/// Mermaid `erDiagram` text for a schema document.
pub fn build_mermaid(document: &SchemaDocument, config: &Config) -> Result<String, Error> {
    let relationships = RelationResolver::new(config.implicit_policy).resolve(&document.entities)?;
    Ok(dml::render_dml(document, &relationships))
}

fn parse_direction(direction: Option<&str>) -> Result<Direction, String> {
    match direction {
        None => Ok(Direction::default()),
        Some(s) => Direction::from_str(s).ok_or_else(|| format!("Invalid direction: {s}")),
    }
}

fn js_error(e: impl std::fmt::Display) -> js_sys::Error {
    js_sys::Error::new(&e.to_string())
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Schema JSON to laid-out graph snapshot JSON.
#[wasm_bindgen(js_name = "schemaToGraph")]
pub fn schema_to_graph(source: &str, direction: Option<String>) -> Result<String, js_sys::Error> {
    let config = Config {
        direction: parse_direction(direction.as_deref()).map_err(js_error)?,
        ..Config::default()
    };
    let document = SchemaDocument::from_json(source).map_err(|e| js_error(Error::from(e)))?;
    let snapshot = build_diagram(&document, &config).map_err(js_error)?;
    snapshot.to_json().map_err(js_error)
}

/// Re-run layout on a snapshot, e.g. after the direction toggle.
#[wasm_bindgen(js_name = "layoutGraph")]
pub fn layout_graph(snapshot: &str, direction: Option<String>) -> Result<String, js_sys::Error> {
    let snapshot = GraphSnapshot::from_json(snapshot).map_err(js_error)?;
    let direction = match direction.as_deref() {
        None => snapshot.direction,
        Some(_) => parse_direction(direction.as_deref()).map_err(js_error)?,
    };
    let laid_out = LayoutEngine::default()
        .layout_snapshot(&snapshot, direction)
        .map_err(|e| js_error(Error::from(e)))?;
    laid_out.to_json().map_err(js_error)
}

/// Schema JSON to Mermaid `erDiagram` text.
#[wasm_bindgen(js_name = "schemaToMermaid")]
pub fn schema_to_mermaid(source: &str) -> Result<String, js_sys::Error> {
    let document = SchemaDocument::from_json(source).map_err(|e| js_error(Error::from(e)))?;
    build_mermaid(&document, &Config::default()).map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use crate::relation::ImplicitGroupPolicy;

    const SHOP: &str = r#"{
        "datamodel": {
            "models": [
                { "name": "Customer", "fields": [
                    { "name": "id", "type": "Int", "kind": "scalar", "isList": false, "isRequired": true },
                    { "name": "orders", "type": "Order", "kind": "object", "isList": true, "isRequired": true,
                      "relationName": "CustomerToOrder" }
                ]},
                { "name": "Order", "fields": [
                    { "name": "id", "type": "Int", "kind": "scalar", "isList": false, "isRequired": true },
                    { "name": "status", "type": "Status", "kind": "enum", "isList": false, "isRequired": true },
                    { "name": "customerId", "type": "Int", "kind": "scalar", "isList": false, "isRequired": true },
                    { "name": "customer", "type": "Customer", "kind": "object", "isList": false, "isRequired": true,
                      "relationName": "CustomerToOrder", "relationFromFields": ["customerId"] },
                    { "name": "products", "type": "Product", "kind": "object", "isList": true, "isRequired": true,
                      "relationName": "OrderToProduct" }
                ]},
                { "name": "Product", "fields": [
                    { "name": "id", "type": "Int", "kind": "scalar", "isList": false, "isRequired": true },
                    { "name": "orders", "type": "Order", "kind": "object", "isList": true, "isRequired": true,
                      "relationName": "OrderToProduct" }
                ]},
                { "name": "Audit", "fields": [
                    { "name": "a", "type": "Order", "kind": "object", "isList": true, "isRequired": true,
                      "relationName": "Shared" },
                    { "name": "b", "type": "Order", "kind": "object", "isList": true, "isRequired": true,
                      "relationName": "Shared" },
                    { "name": "c", "type": "Order", "kind": "object", "isList": true, "isRequired": true,
                      "relationName": "Shared" }
                ]}
            ],
            "enums": [{ "name": "Status", "values": [{ "name": "OPEN" }, { "name": "CLOSED" }] }]
        }
    }"#;

    #[test]
    fn test_build_diagram() {
        let document = SchemaDocument::from_json(SHOP).unwrap();
        let snapshot = build_diagram(&document, &Config::default()).unwrap();

        assert_eq!(snapshot.nodes.len(), 5);
        assert!(matches!(snapshot.node("Status").unwrap().kind, NodeKind::Enum(_)));

        let ids: Vec<&str> = snapshot.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Order-Customer-CustomerToOrder",
                "Order-Product-OrderToProduct"
            ]
        );
        assert!(snapshot.edges[1].is_implicit);
    }

    #[test]
    fn test_build_diagram_strict_implicit() {
        let document = SchemaDocument::from_json(SHOP).unwrap();
        let config = Config {
            implicit_policy: ImplicitGroupPolicy::Reject,
            ..Config::default()
        };
        let err = build_diagram(&document, &config).unwrap_err();
        assert!(err.to_string().starts_with("Malformed schema:"));
    }

    #[test]
    fn test_schema_to_graph_round_trip() {
        let json = schema_to_graph(SHOP, Some("LR".to_string())).unwrap();
        let snapshot = GraphSnapshot::from_json(&json).unwrap();
        assert_eq!(snapshot.direction, Direction::LR);

        let again = GraphSnapshot::from_json(&layout_graph(&json, None).unwrap()).unwrap();
        assert_eq!(again.direction, Direction::LR);
        assert_eq!(again.edges, snapshot.edges);
        for (a, b) in again.nodes.iter().zip(&snapshot.nodes) {
            assert_eq!(a.id, b.id);
            assert!((a.position.x - b.position.x).abs() < 1e-6);
            assert!((a.position.y - b.position.y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_schema_to_mermaid() {
        let text = schema_to_mermaid(SHOP).unwrap();
        assert!(text.starts_with("erDiagram"));
        assert!(text.contains("Order }o--|| Customer : \"customer\""));
        assert!(text.contains("Order }o--o{ Product : \"OrderToProduct\""));
    }
}
