use super::{ForeignKey, RelationDef, ScalarType, Schema};
use crate::SchemaErr;
use serde::Deserialize;
use std::str::FromStr;
use strum::{Display, EnumString};
use tracing::{debug, warn};

/// Name of the foreign key a TO_MANY relationship adds to its child entity
pub const PARENT_ID_PROPERTY: &str = "parentId";

/// Prefix of the collection link a TO_MANY relationship adds to its parent entity
pub const CHILDREN_LINK_PREFIX: &str = "childs";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RelationKind {
    /// Left has many right; the foreign key lives on the right
    ToMany,
    /// Left references exactly one right
    HasOne,
    /// Left is associated with right without a backing foreign key
    HasMany,
}

/// Generation of the relationship vocabulary a schema is written in
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RelationFormat {
    /// `to_many` and `has_one`; a HAS_ONE places `<leftTable>Id` on the right entity
    Legacy,
    /// `to_many`, `has_one` and `has_many`; a HAS_ONE places `<name>Id` on the left
    /// entity and names the link after the relationship
    #[default]
    Extended,
}

/// A relationship directive, validated against its format
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub name: Option<String>,
    pub left_table: String,
    pub right_table: String,
    pub kind: RelationKind,
    pub mandatory: bool,
}

impl RelationFormat {
    pub fn supports(&self, kind: RelationKind) -> bool {
        match self {
            Self::Legacy => matches!(kind, RelationKind::ToMany | RelationKind::HasOne),
            Self::Extended => true,
        }
    }

    /// Whether a relationship of this kind must carry a `name`
    pub fn requires_name(&self, kind: RelationKind) -> bool {
        match (self, kind) {
            (_, RelationKind::ToMany) => false,
            (Self::Legacy, RelationKind::HasOne) => false,
            (Self::Extended, RelationKind::HasOne) => true,
            (_, RelationKind::HasMany) => true,
        }
    }
}

impl Relation {
    pub fn from_def(def: &RelationDef, format: RelationFormat) -> Result<Self, SchemaErr> {
        let token = def.kind.as_deref().unwrap_or_default();
        let kind = RelationKind::from_str(token)
            .ok()
            .filter(|kind| format.supports(*kind))
            .ok_or_else(|| SchemaErr::UnknownRelationKind(token.to_owned()))?;

        let left_table = def
            .left_table
            .clone()
            .ok_or_else(|| SchemaErr::Malformed("missing `left_table`".to_owned()))?;
        let right_table = def
            .right_table
            .clone()
            .ok_or_else(|| SchemaErr::Malformed("missing `right_table`".to_owned()))?;
        if def.name.is_none() && format.requires_name(kind) {
            return Err(SchemaErr::Malformed(format!(
                "`{kind}` relationship is missing `name`"
            )));
        }

        Ok(Self {
            name: def.name.clone(),
            left_table,
            right_table,
            kind,
            mandatory: def.mandatory,
        })
    }
}

impl Schema {
    /// Apply relationship directives in declaration order.
    ///
    /// Directives naming an undeclared table are skipped; the skipped ones are
    /// returned as [`SchemaErr::UnresolvedReference`]. Any other error aborts.
    pub fn resolve_relations(
        &mut self,
        defs: &[RelationDef],
        format: RelationFormat,
    ) -> Result<Vec<SchemaErr>, SchemaErr> {
        let mut skipped = Vec::new();
        for (i, def) in defs.iter().enumerate() {
            let context = || format!("relationship #{i}");
            let relation = Relation::from_def(def, format).map_err(|e| e.context(context()))?;
            if let Err(err) = self.add_relation(&relation, format) {
                let err = err.context(context());
                warn!("Skipping {err}");
                skipped.push(err);
            }
        }
        Ok(skipped)
    }

    /// Mutate the entity graph for one directive. Fails only when a
    /// referenced table is not declared, in which case nothing is changed.
    pub fn add_relation(
        &mut self,
        relation: &Relation,
        format: RelationFormat,
    ) -> Result<(), SchemaErr> {
        let left = self.resolve_table(&relation.left_table)?;
        let right = self.resolve_table(&relation.right_table)?;
        let left_name = self.entities[left].name.clone();
        let right_name = self.entities[right].name.clone();
        debug!(
            "Relating {} {} {}",
            left_name, relation.kind, right_name
        );

        match (relation.kind, format) {
            (RelationKind::ToMany, _) => {
                let foreign_key =
                    self.add_foreign_key(right, PARENT_ID_PROPERTY.to_owned(), relation.mandatory);
                self.entities[right].add_to_one(&left_name, None, Some(foreign_key.clone()));
                self.entities[left].add_to_many(
                    &right_name,
                    format!("{CHILDREN_LINK_PREFIX}{right_name}"),
                    foreign_key,
                );
            }
            (RelationKind::HasOne, RelationFormat::Legacy) => {
                let foreign_key =
                    self.add_foreign_key(right, format!("{left_name}Id"), relation.mandatory);
                self.entities[left].add_to_one(&right_name, None, Some(foreign_key));
            }
            (RelationKind::HasOne, RelationFormat::Extended) => {
                let name = relation.name.clone().unwrap_or_default();
                let foreign_key =
                    self.add_foreign_key(left, format!("{name}Id"), relation.mandatory);
                self.entities[left].add_to_one(&right_name, Some(name), Some(foreign_key));
            }
            (RelationKind::HasMany, _) => {
                self.entities[left].add_to_one(&right_name, relation.name.clone(), None);
            }
        }
        Ok(())
    }

    fn resolve_table(&self, name: &str) -> Result<usize, SchemaErr> {
        self.entity_index(name)
            .ok_or_else(|| SchemaErr::UnresolvedReference(name.to_owned()))
    }

    fn add_foreign_key(&mut self, entity: usize, name: String, mandatory: bool) -> ForeignKey {
        let owner = &mut self.entities[entity];
        let (property, prop) = owner.add_property_indexed(name, ScalarType::Long);
        if mandatory {
            prop.not_null();
        }
        ForeignKey {
            entity: owner.name.clone(),
            property,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entity, ToOne};
    use pretty_assertions::assert_eq;

    fn schema(names: &[&str]) -> Schema {
        let mut schema = Schema::default();
        for name in names {
            schema.entities.push(Entity::new(*name));
        }
        schema
    }

    fn relation(kind: &str, left: &str, right: &str) -> RelationDef {
        RelationDef {
            name: None,
            left_table: Some(left.to_owned()),
            right_table: Some(right.to_owned()),
            kind: Some(kind.to_owned()),
            mandatory: false,
        }
    }

    fn named(name: &str, def: RelationDef) -> RelationDef {
        RelationDef {
            name: Some(name.to_owned()),
            ..def
        }
    }

    #[test]
    fn test_to_many() {
        let mut schema = schema(&["A", "B"]);
        let skipped = schema
            .resolve_relations(
                &[RelationDef {
                    mandatory: true,
                    ..relation("to_many", "A", "B")
                }],
                RelationFormat::Extended,
            )
            .unwrap();
        assert!(skipped.is_empty());

        let b = schema.get_entity("B").unwrap();
        let parent_id = b.get_property("parentId").unwrap();
        assert_eq!(parent_id.get_scalar_type(), ScalarType::Long);
        assert!(parent_id.is_not_null());

        let foreign_key = ForeignKey {
            entity: "B".to_owned(),
            property: 1,
        };
        assert_eq!(
            b.get_to_one(),
            [ToOne {
                target: "A".to_owned(),
                name: None,
                foreign_key: Some(foreign_key.clone()),
            }]
        );

        let a = schema.get_entity("A").unwrap();
        assert_eq!(a.get_properties().len(), 1);
        assert_eq!(a.get_to_many().len(), 1);
        assert_eq!(a.get_to_many()[0].name, "childsB");
        assert_eq!(a.get_to_many()[0].target, "B");
        assert_eq!(a.get_to_many()[0].foreign_key, foreign_key);
    }

    #[test]
    fn test_to_many_optional_is_nullable() {
        let mut schema = schema(&["A", "B"]);
        schema
            .resolve_relations(&[relation("TO_MANY", "A", "B")], RelationFormat::Legacy)
            .unwrap();
        let b = schema.get_entity("B").unwrap();
        assert!(b.get_property("parentId").unwrap().is_nullable());
    }

    #[test]
    fn test_has_one_legacy() {
        let mut schema = schema(&["Car", "Engine"]);
        schema
            .resolve_relations(
                &[RelationDef {
                    mandatory: true,
                    ..relation("has_one", "Car", "Engine")
                }],
                RelationFormat::Legacy,
            )
            .unwrap();

        let engine = schema.get_entity("Engine").unwrap();
        assert!(engine.get_property("CarId").unwrap().is_not_null());
        assert!(engine.get_to_one().is_empty());

        let car = schema.get_entity("Car").unwrap();
        assert_eq!(car.get_properties().len(), 1);
        assert_eq!(
            car.get_to_one(),
            [ToOne {
                target: "Engine".to_owned(),
                name: None,
                foreign_key: Some(ForeignKey {
                    entity: "Engine".to_owned(),
                    property: 1,
                }),
            }]
        );
    }

    #[test]
    fn test_has_one_extended() {
        let mut schema = schema(&["Car", "Engine"]);
        schema
            .resolve_relations(
                &[named("engine", relation("has_one", "Car", "Engine"))],
                RelationFormat::Extended,
            )
            .unwrap();

        let car = schema.get_entity("Car").unwrap();
        assert!(car.get_property("engineId").unwrap().is_nullable());
        assert_eq!(
            car.get_to_one(),
            [ToOne {
                target: "Engine".to_owned(),
                name: Some("engine".to_owned()),
                foreign_key: Some(ForeignKey {
                    entity: "Car".to_owned(),
                    property: 1,
                }),
            }]
        );
        assert_eq!(schema.get_entity("Engine").unwrap().get_properties().len(), 1);
    }

    #[test]
    fn test_has_many_has_no_foreign_key() {
        let mut schema = schema(&["Author", "Book"]);
        schema
            .resolve_relations(
                &[named("books", relation("has_many", "Author", "Book"))],
                RelationFormat::Extended,
            )
            .unwrap();

        let author = schema.get_entity("Author").unwrap();
        assert_eq!(author.get_properties().len(), 1);
        assert_eq!(
            author.get_to_one(),
            [ToOne {
                target: "Book".to_owned(),
                name: Some("books".to_owned()),
                foreign_key: None,
            }]
        );
        assert_eq!(schema.get_entity("Book").unwrap().get_properties().len(), 1);
    }

    #[test]
    fn test_has_many_is_unknown_in_legacy_format() {
        let mut schema = schema(&["Author", "Book"]);
        let err = schema
            .resolve_relations(
                &[named("books", relation("has_many", "Author", "Book"))],
                RelationFormat::Legacy,
            )
            .unwrap_err();
        assert!(matches!(err.root(), SchemaErr::UnknownRelationKind(t) if t == "has_many"));
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let mut schema = schema(&["A", "B"]);
        for kind in ["many_to_many", ""] {
            let err = schema
                .resolve_relations(&[relation(kind, "A", "B")], RelationFormat::Extended)
                .unwrap_err();
            assert!(err.is_fatal());
            assert!(matches!(err.root(), SchemaErr::UnknownRelationKind(_)));
        }
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let mut schema = schema(&["A", "B"]);
        let defs = [
            RelationDef {
                left_table: None,
                ..relation("to_many", "A", "B")
            },
            RelationDef {
                right_table: None,
                ..relation("to_many", "A", "B")
            },
            relation("has_one", "A", "B"),
            relation("has_many", "A", "B"),
        ];
        for def in defs {
            let err = schema
                .resolve_relations(&[def], RelationFormat::Extended)
                .unwrap_err();
            assert!(matches!(err.root(), SchemaErr::Malformed(_)));
        }
    }

    #[test]
    fn test_unresolved_reference_is_skipped() {
        let mut schema = schema(&["A", "B"]);
        let skipped = schema
            .resolve_relations(
                &[
                    named("ghost", relation("has_one", "A", "Ghost")),
                    relation("to_many", "Nobody", "B"),
                    relation("to_many", "A", "B"),
                ],
                RelationFormat::Extended,
            )
            .unwrap();

        assert_eq!(skipped.len(), 2);
        assert!(matches!(skipped[0].root(), SchemaErr::UnresolvedReference(t) if t == "Ghost"));
        assert!(matches!(skipped[1].root(), SchemaErr::UnresolvedReference(t) if t == "Nobody"));

        let a = schema.get_entity("A").unwrap();
        assert_eq!(a.get_properties().len(), 1);
        assert!(a.get_to_one().is_empty());
        assert_eq!(a.get_to_many().len(), 1);
        assert_eq!(schema.get_entity("B").unwrap().get_properties().len(), 2);
    }

    #[test]
    fn test_duplicate_directives_are_not_deduplicated() {
        let mut schema = schema(&["A", "B"]);
        let def = relation("to_many", "A", "B");
        schema
            .resolve_relations(&[def.clone(), def], RelationFormat::Extended)
            .unwrap();

        let b = schema.get_entity("B").unwrap();
        let names: Vec<_> = b.get_properties().iter().map(|p| p.get_name()).collect();
        assert_eq!(names, ["id", "parentId", "parentId"]);
        assert_eq!(b.get_to_one().len(), 2);
        assert_eq!(b.get_to_one()[0].foreign_key.as_ref().unwrap().property, 1);
        assert_eq!(b.get_to_one()[1].foreign_key.as_ref().unwrap().property, 2);

        let a = schema.get_entity("A").unwrap();
        assert_eq!(a.get_to_many().len(), 2);
        assert_eq!(a.get_to_many()[0].name, a.get_to_many()[1].name);
    }

    #[test]
    fn test_self_referencing_to_many() {
        let mut schema = schema(&["Category"]);
        schema
            .resolve_relations(
                &[relation("to_many", "Category", "Category")],
                RelationFormat::Extended,
            )
            .unwrap();

        let category = schema.get_entity("Category").unwrap();
        assert_eq!(category.get_properties().len(), 2);
        assert_eq!(category.get_to_one()[0].target, "Category");
        assert_eq!(category.get_to_many()[0].name, "childsCategory");
    }

    #[test]
    fn test_kind_tokens() {
        assert_eq!(RelationKind::from_str("To_Many").unwrap(), RelationKind::ToMany);
        assert_eq!(RelationKind::HasOne.to_string(), "has_one");
        assert_eq!(
            RelationFormat::from_str("LEGACY").unwrap(),
            RelationFormat::Legacy
        );
        assert_eq!(RelationFormat::default(), RelationFormat::Extended);
    }
}
