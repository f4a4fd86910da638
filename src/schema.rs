//! Structured schema input, as handed over by the external schema parser.
//!
//! The JSON shape follows the DMMF convention (`isList`, `relationFromFields`, ...).
//! Both a flat `{ "models": [...], "enums": [...] }` document and the
//! `{ "datamodel": { ... } }` wrapper are accepted.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Malformed schema JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Duplicate model or enum name: {0}")]
    DuplicateName(String),
    #[error("Duplicate field {field} on model {entity}")]
    DuplicateField { entity: String, field: String },
    #[error("Field {entity}.{field} references unknown model {target}")]
    UnknownEntity {
        entity: String,
        field: String,
        target: String,
    },
    #[error("Relation {relation} on {entity}.{field} has no opposite field on model {target}")]
    MissingOppositeField {
        entity: String,
        field: String,
        target: String,
        relation: String,
    },
    #[error("Implicit relation {relation} is shared by {fields} fields, expected exactly 2")]
    AmbiguousImplicitRelation { relation: String, fields: usize },
    #[error("Duplicate edge id: {0}")]
    DuplicateEdge(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(alias = "models")]
    pub entities: Vec<EntityDescriptor>,
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default)]
    pub is_list: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub relation_from_fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Scalar,
    Object,
    Enum,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub name: String,
    #[serde(default, deserialize_with = "enum_values")]
    pub values: Vec<String>,
}

impl SchemaDocument {
    /// Parse a schema document from JSON, unwrapping a `datamodel` envelope if present.
    pub fn from_json(input: &str) -> Result<Self, SchemaError> {
        let mut value: serde_json::Value = serde_json::from_str(input)?;
        if let Some(inner) = value.get_mut("datamodel") {
            value = inner.take();
        }
        let document: SchemaDocument = serde_json::from_value(value)?;
        document.validate()?;
        Ok(document)
    }

    /// Check name uniqueness: models and enums share one namespace, fields are unique per model.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names: HashSet<&str> = HashSet::new();
        let all_names = self
            .entities
            .iter()
            .map(|e| e.name.as_str())
            .chain(self.enums.iter().map(|e| e.name.as_str()));
        for name in all_names {
            if !names.insert(name) {
                return Err(SchemaError::DuplicateName(name.to_string()));
            }
        }

        for entity in &self.entities {
            let mut fields: HashSet<&str> = HashSet::new();
            for field in &entity.fields {
                if !fields.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.iter().find(|e| e.name == name)
    }
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl FieldDescriptor {
    /// The field holds the foreign key of its relationship.
    pub fn is_owning(&self) -> bool {
        !self.relation_from_fields.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// DMMF emits enum values as `{ "name": "ADMIN", "dbName": null }`.
fn enum_values<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        Plain(String),
        Named { name: String },
    }

    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            Value::Plain(s) => s,
            Value::Named { name } => name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_document() {
        let input = r#"{
            "models": [
                { "name": "User", "fields": [
                    { "name": "id", "type": "Int", "kind": "scalar", "isRequired": true },
                    { "name": "role", "type": "Role", "kind": "enum", "isRequired": true }
                ]}
            ],
            "enums": [{ "name": "Role", "values": ["ADMIN", "USER"] }]
        }"#;
        let doc = SchemaDocument::from_json(input).unwrap();

        assert_eq!(doc.entities.len(), 1);
        assert_eq!(doc.entities[0].fields[1].kind, FieldKind::Enum);
        assert_eq!(doc.enums[0].values, vec!["ADMIN", "USER"]);
    }

    #[test]
    fn test_parse_datamodel_envelope() {
        let input = r#"{
            "datamodel": {
                "models": [
                    { "name": "Post", "fields": [
                        { "name": "author", "type": "User", "kind": "object",
                          "relationName": "PostToUser", "relationFromFields": ["authorId"],
                          "isRequired": true, "isList": false }
                    ]},
                    { "name": "User", "fields": [
                        { "name": "posts", "type": "Post", "kind": "object",
                          "relationName": "PostToUser", "relationFromFields": null, "isList": true }
                    ]}
                ],
                "enums": [{ "name": "Role", "values": [{ "name": "ADMIN", "dbName": null }] }]
            }
        }"#;
        let doc = SchemaDocument::from_json(input).unwrap();

        let author = doc.entity("Post").unwrap().field("author").unwrap();
        assert!(author.is_owning());
        let posts = doc.entity("User").unwrap().field("posts").unwrap();
        assert!(!posts.is_owning());
        assert_eq!(posts.relation_name.as_deref(), Some("PostToUser"));
        assert_eq!(doc.enums[0].values, vec!["ADMIN"]);
    }

    #[test]
    fn test_malformed_json() {
        let err = SchemaDocument::from_json("{ \"models\": [ { \"fields\": [] } ] }").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidJson(_)));
    }

    #[test]
    fn test_duplicate_model_and_enum_name() {
        let input = r#"{ "models": [{ "name": "Role", "fields": [] }],
                         "enums": [{ "name": "Role", "values": [] }] }"#;
        let err = SchemaDocument::from_json(input).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateName(name) if name == "Role"));
    }

    #[test]
    fn test_duplicate_field() {
        let input = r#"{ "models": [{ "name": "User", "fields": [
            { "name": "id", "type": "Int" }, { "name": "id", "type": "String" } ] }] }"#;
        let err = SchemaDocument::from_json(input).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }
}
