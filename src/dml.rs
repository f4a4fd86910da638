//! Mermaid `erDiagram` text for a schema, the textual counterpart of the graph.

use crate::relation::{Multiplicity, RelationshipDescriptor};
use crate::schema::SchemaDocument;
use crate::transform::plain_attributes;

/// Render entities and relationships as a Mermaid ER diagram.
pub fn render_dml(document: &SchemaDocument, relationships: &[RelationshipDescriptor]) -> String {
    let mut output = String::from("erDiagram\n");

    for (i, entity) in document.entities.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str("  ");
        output.push_str(&entity.name);
        output.push_str(" {\n");
        for field in plain_attributes(entity) {
            output.push_str(&format!("    {} {}\n", field.typ, field.name));
        }
        output.push_str("  }\n");
    }

    for rel in relationships {
        output.push_str(&render_relationship(rel));
        output.push('\n');
    }

    output
}

/// One relationship line. The marker beside each entity describes how many of
/// that entity take part, so the source side carries the target multiplicity.
fn render_relationship(rel: &RelationshipDescriptor) -> String {
    let label = if rel.is_implicit {
        rel.name.as_str()
    } else {
        rel.source_field.as_deref().unwrap_or(&rel.name)
    };
    format!(
        "    {} {}--{} {} : \"{}\"",
        rel.source_entity,
        left_marker(rel.target_multiplicity),
        right_marker(rel.source_multiplicity),
        rel.target_entity,
        label.replace('"', "'"),
    )
}

fn left_marker(m: Multiplicity) -> &'static str {
    match m {
        Multiplicity::ExactlyOne => "||",
        Multiplicity::ZeroOrOne => "|o",
        Multiplicity::Many => "}o",
    }
}

fn right_marker(m: Multiplicity) -> &'static str {
    match m {
        Multiplicity::ExactlyOne => "||",
        Multiplicity::ZeroOrOne => "o|",
        Multiplicity::Many => "o{",
    }
}
