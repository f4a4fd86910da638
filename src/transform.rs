//! Schema document -> render-ready model and enum payloads.

use crate::schema::{EntityDescriptor, EnumDescriptor, FieldDescriptor, FieldKind, SchemaDocument};
use serde::{Deserialize, Serialize};

/// Node payload for a model: what the render surface needs to draw the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelData {
    pub name: String,
    pub fields: Vec<FieldData>,
    /// Holds at least one foreign key, so the box exposes a target handle.
    pub is_child: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldData {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub is_list: bool,
    pub is_required: bool,
    /// Drives the per-field source handle; topology is unaffected.
    pub has_connections: bool,
}

pub fn transform(document: &SchemaDocument) -> (Vec<ModelData>, Vec<EnumDescriptor>) {
    let models: Vec<ModelData> = document.entities.iter().map(model_data).collect();
    let enums = document.enums.clone();

    tracing::debug!(
        models = models.len(),
        enums = enums.len(),
        "transformed schema document"
    );

    (models, enums)
}

fn model_data(entity: &EntityDescriptor) -> ModelData {
    let fields = entity
        .fields
        .iter()
        .map(|f| FieldData {
            name: f.name.clone(),
            typ: f.typ.clone(),
            is_list: f.is_list,
            is_required: f.is_required,
            has_connections: f.kind == FieldKind::Object || f.is_owning(),
        })
        .collect();

    ModelData {
        name: entity.name.clone(),
        fields,
        is_child: entity.fields.iter().any(FieldDescriptor::is_owning),
    }
}

/// Fields listed as plain attributes: no relation fields, no owning fields,
/// no scalar columns that back a sibling's foreign key.
pub fn plain_attributes(entity: &EntityDescriptor) -> impl Iterator<Item = &FieldDescriptor> {
    entity.fields.iter().filter(move |field| {
        field.kind != FieldKind::Object
            && !field.is_owning()
            && !entity
                .fields
                .iter()
                .any(|other| other.relation_from_fields.contains(&field.name))
    })
}
