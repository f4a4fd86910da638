//! Relationship resolution: explicit (foreign-key) and implicit (join-table) relations,
//! with the multiplicity of each endpoint.

use crate::schema::{EntityDescriptor, FieldDescriptor, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Multiplicity {
    ExactlyOne,
    ZeroOrOne,
    Many,
}

impl Multiplicity {
    pub fn of_field(field: &FieldDescriptor) -> Self {
        if field.is_list {
            Self::Many
        } else if !field.is_required {
            Self::ZeroOrOne
        } else {
            Self::ExactlyOne
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::ExactlyOne => "1",
            Self::ZeroOrOne => "0..1",
            Self::Many => "*",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDescriptor {
    pub source_entity: String,
    pub target_entity: String,
    pub name: String,
    /// Owning field on the source entity; `None` for implicit relations.
    pub source_field: Option<String>,
    pub source_multiplicity: Multiplicity,
    pub target_multiplicity: Multiplicity,
    pub is_implicit: bool,
}

/// What to do with an implicit relation name shared by other than two fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplicitGroupPolicy {
    /// Leave the relation out of the graph.
    #[default]
    Drop,
    /// Fail the whole transform.
    Reject,
}

#[derive(Debug, Clone, Default)]
pub struct RelationResolver {
    pub implicit_policy: ImplicitGroupPolicy,
}

impl RelationResolver {
    pub fn new(implicit_policy: ImplicitGroupPolicy) -> Self {
        Self { implicit_policy }
    }

    /// Explicit relations first, then implicit ones, both in entity/field order.
    pub fn resolve(
        &self,
        entities: &[EntityDescriptor],
    ) -> Result<Vec<RelationshipDescriptor>, SchemaError> {
        let mut relationships = explicit_relationships(entities)?;
        let claimed: HashSet<&str> = relationships.iter().map(|r| r.name.as_str()).collect();
        let implicit = self.implicit_relationships(entities, &claimed)?;

        tracing::debug!(
            explicit = relationships.len(),
            implicit = implicit.len(),
            "resolved relationships"
        );

        relationships.extend(implicit);
        Ok(relationships)
    }

    fn implicit_relationships(
        &self,
        entities: &[EntityDescriptor],
        claimed: &HashSet<&str>,
    ) -> Result<Vec<RelationshipDescriptor>, SchemaError> {
        // relation name -> (entity, field) in source order; first_seen keeps emission order stable
        let mut groups: HashMap<&str, Vec<(&EntityDescriptor, &FieldDescriptor)>> = HashMap::new();
        let mut first_seen: BTreeMap<usize, &str> = BTreeMap::new();
        let mut position = 0usize;

        for entity in entities {
            for field in &entity.fields {
                let Some(relation) = field.relation_name.as_deref() else {
                    continue;
                };
                if field.is_owning() || claimed.contains(relation) {
                    continue;
                }
                let group = groups.entry(relation).or_default();
                if group.is_empty() {
                    first_seen.insert(position, relation);
                }
                group.push((entity, field));
                position += 1;
            }
        }

        let mut relationships = Vec::new();
        for relation in first_seen.into_values() {
            let group = &groups[relation];
            match group.as_slice() {
                [(a, _), (b, _)] if a.name != b.name => {
                    relationships.push(RelationshipDescriptor {
                        source_entity: a.name.clone(),
                        target_entity: b.name.clone(),
                        name: relation.to_string(),
                        source_field: None,
                        source_multiplicity: Multiplicity::Many,
                        target_multiplicity: Multiplicity::Many,
                        is_implicit: true,
                    });
                }
                _ => match self.implicit_policy {
                    ImplicitGroupPolicy::Drop => {
                        tracing::warn!(
                            relation,
                            fields = group.len(),
                            "dropping implicit relation without exactly two endpoints"
                        );
                    }
                    ImplicitGroupPolicy::Reject => {
                        return Err(SchemaError::AmbiguousImplicitRelation {
                            relation: relation.to_string(),
                            fields: group.len(),
                        });
                    }
                },
            }
        }

        Ok(relationships)
    }
}

/// Resolve with the default policy (ambiguous implicit groups are dropped).
pub fn resolve_relationships(
    entities: &[EntityDescriptor],
) -> Result<Vec<RelationshipDescriptor>, SchemaError> {
    RelationResolver::default().resolve(entities)
}

fn explicit_relationships(
    entities: &[EntityDescriptor],
) -> Result<Vec<RelationshipDescriptor>, SchemaError> {
    let by_name: HashMap<&str, &EntityDescriptor> =
        entities.iter().map(|e| (e.name.as_str(), e)).collect();
    let mut relationships = Vec::new();

    for entity in entities {
        for field in entity.fields.iter().filter(|f| f.is_owning()) {
            let target = by_name
                .get(field.typ.as_str())
                .ok_or_else(|| SchemaError::UnknownEntity {
                    entity: entity.name.clone(),
                    field: field.name.clone(),
                    target: field.typ.clone(),
                })?;

            let relation = field.relation_name.clone().unwrap_or_else(|| field.name.clone());
            let other = target
                .fields
                .iter()
                .find(|other| {
                    other.relation_name.as_deref() == Some(relation.as_str())
                        && !(target.name == entity.name && other.name == field.name)
                })
                .ok_or_else(|| SchemaError::MissingOppositeField {
                    entity: entity.name.clone(),
                    field: field.name.clone(),
                    target: target.name.clone(),
                    relation: relation.clone(),
                })?;

            relationships.push(RelationshipDescriptor {
                source_entity: entity.name.clone(),
                target_entity: target.name.clone(),
                name: relation,
                source_field: Some(field.name.clone()),
                source_multiplicity: Multiplicity::of_field(field),
                target_multiplicity: Multiplicity::of_field(other),
                is_implicit: false,
            });
        }
    }

    Ok(relationships)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    fn scalar(name: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            typ: "Int".to_string(),
            is_list: false,
            is_required: true,
            kind: FieldKind::Scalar,
            relation_name: None,
            relation_from_fields: vec![],
        }
    }

    fn relation(name: &str, typ: &str, rel: &str, list: bool, required: bool) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            typ: typ.to_string(),
            is_list: list,
            is_required: required,
            kind: FieldKind::Object,
            relation_name: Some(rel.to_string()),
            relation_from_fields: vec![],
        }
    }

    fn owning(name: &str, typ: &str, rel: &str, required: bool) -> FieldDescriptor {
        let mut f = relation(name, typ, rel, false, required);
        f.relation_from_fields = vec![format!("{name}Id")];
        f
    }

    fn entity(name: &str, fields: Vec<FieldDescriptor>) -> EntityDescriptor {
        EntityDescriptor {
            name: name.to_string(),
            fields,
        }
    }

    fn user_and_post() -> Vec<EntityDescriptor> {
        vec![
            entity(
                "User",
                vec![scalar("id"), relation("posts", "Post", "PostToUser", true, false)],
            ),
            entity(
                "Post",
                vec![scalar("id"), owning("author", "User", "PostToUser", true)],
            ),
        ]
    }

    #[test]
    fn test_one_to_many() {
        let rels = resolve_relationships(&user_and_post()).unwrap();

        assert_eq!(rels.len(), 1);
        let r = &rels[0];
        assert_eq!(r.source_entity, "Post");
        assert_eq!(r.target_entity, "User");
        assert_eq!(r.name, "PostToUser");
        assert_eq!(r.source_field.as_deref(), Some("author"));
        assert_eq!(r.source_multiplicity, Multiplicity::ExactlyOne);
        assert_eq!(r.target_multiplicity, Multiplicity::Many);
        assert!(!r.is_implicit);
    }

    #[test]
    fn test_list_owning_side_is_many() {
        // Owning list field: owning side many, required single opposite exactly-one.
        let mut members = owning("members", "Team", "TeamMembers", true);
        members.is_list = true;
        let entities = vec![
            entity("Club", vec![members]),
            entity("Team", vec![relation("club", "Club", "TeamMembers", false, true)]),
        ];
        let rels = resolve_relationships(&entities).unwrap();

        assert_eq!(rels[0].source_multiplicity, Multiplicity::Many);
        assert_eq!(rels[0].target_multiplicity, Multiplicity::ExactlyOne);
    }

    #[test]
    fn test_optional_one_to_one() {
        let entities = vec![
            entity("User", vec![relation("profile", "Profile", "ProfileToUser", false, false)]),
            entity("Profile", vec![owning("user", "User", "ProfileToUser", false)]),
        ];
        let rels = resolve_relationships(&entities).unwrap();

        assert_eq!(rels[0].source_multiplicity, Multiplicity::ZeroOrOne);
        assert_eq!(rels[0].target_multiplicity, Multiplicity::ZeroOrOne);
    }

    #[test]
    fn test_self_relation_uses_other_field() {
        let entities = vec![entity(
            "Employee",
            vec![
                owning("manager", "Employee", "Management", false),
                relation("reports", "Employee", "Management", true, false),
            ],
        )];
        let rels = resolve_relationships(&entities).unwrap();

        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].source_entity, "Employee");
        assert_eq!(rels[0].target_entity, "Employee");
        assert_eq!(rels[0].source_multiplicity, Multiplicity::ZeroOrOne);
        assert_eq!(rels[0].target_multiplicity, Multiplicity::Many);
    }

    #[test]
    fn test_unknown_entity_fails() {
        let entities = vec![entity("Post", vec![owning("author", "Ghost", "PostToGhost", true)])];
        let err = resolve_relationships(&entities).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownEntity { target, .. } if target == "Ghost"));
    }

    #[test]
    fn test_missing_opposite_field_fails() {
        let entities = vec![
            entity("User", vec![scalar("id")]),
            entity("Post", vec![owning("author", "User", "PostToUser", true)]),
        ];
        let err = resolve_relationships(&entities).unwrap_err();
        assert!(matches!(err, SchemaError::MissingOppositeField { relation, .. } if relation == "PostToUser"));
    }

    #[test]
    fn test_implicit_pair() {
        let entities = vec![
            entity("Post", vec![relation("tags", "Tag", "PostToTag", true, false)]),
            entity("Tag", vec![relation("posts", "Post", "PostToTag", true, false)]),
        ];
        let rels = resolve_relationships(&entities).unwrap();

        assert_eq!(rels.len(), 1);
        assert!(rels[0].is_implicit);
        assert_eq!(rels[0].source_entity, "Post");
        assert_eq!(rels[0].target_entity, "Tag");
        assert_eq!(rels[0].source_field, None);
        assert_eq!(rels[0].source_multiplicity, Multiplicity::Many);
        assert_eq!(rels[0].target_multiplicity, Multiplicity::Many);
    }

    #[test]
    fn test_three_way_implicit_dropped_by_default() {
        let entities = vec![
            entity("A", vec![relation("bs", "B", "X", true, false)]),
            entity("B", vec![relation("as", "A", "X", true, false)]),
            entity("C", vec![relation("as", "A", "X", true, false)]),
        ];
        let rels = resolve_relationships(&entities).unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn test_three_way_implicit_rejected_when_strict() {
        let entities = vec![
            entity("A", vec![relation("bs", "B", "X", true, false)]),
            entity("B", vec![relation("as", "A", "X", true, false)]),
            entity("C", vec![relation("as", "A", "X", true, false)]),
        ];
        let err = RelationResolver::new(ImplicitGroupPolicy::Reject)
            .resolve(&entities)
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::AmbiguousImplicitRelation { fields: 3, .. }
        ));
    }

    #[test]
    fn test_back_side_of_explicit_is_not_implicit() {
        // Strict policy would fail if the lone `posts` field formed an implicit group.
        let rels = RelationResolver::new(ImplicitGroupPolicy::Reject)
            .resolve(&user_and_post())
            .unwrap();
        assert_eq!(rels.len(), 1);
        assert!(!rels[0].is_implicit);
    }

    #[test]
    fn test_explicit_before_implicit() {
        let mut entities = vec![
            entity("Post", vec![relation("tags", "Tag", "PostToTag", true, false)]),
            entity("Tag", vec![relation("posts", "Post", "PostToTag", true, false)]),
        ];
        entities.extend(user_and_post().into_iter().map(|mut e| {
            e.name = format!("{}2", e.name);
            for f in &mut e.fields {
                if f.kind == FieldKind::Object {
                    f.typ = format!("{}2", f.typ);
                }
            }
            e
        }));
        let rels = resolve_relationships(&entities).unwrap();

        let kinds: Vec<bool> = rels.iter().map(|r| r.is_implicit).collect();
        assert_eq!(kinds, vec![false, true]);
    }

    #[test]
    fn test_deterministic_order() {
        let entities = vec![
            entity("A", vec![relation("bs", "B", "AB", true, false), relation("cs", "C", "AC", true, false)]),
            entity("B", vec![relation("as", "A", "AB", true, false)]),
            entity("C", vec![relation("as", "A", "AC", true, false)]),
        ];
        let first = resolve_relationships(&entities).unwrap();
        let second = resolve_relationships(&entities).unwrap();

        assert_eq!(first, second);
        let names: Vec<&str> = first.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["AB", "AC"]);
    }
}
