mod entity;
mod json;
mod property;
mod relation;
mod types;

pub use entity::*;
pub use json::*;
pub use property::*;
pub use relation::*;
pub use types::*;

use crate::SchemaErr;
use tracing::debug;

/// The compiled entity graph of one schema document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub(crate) package_name: String,
    pub(crate) version: u32,
    pub(crate) entities: Vec<Entity>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(DEFAULT_PACKAGE_NAME, 1)
    }
}

impl Schema {
    pub fn new<P>(package_name: P, version: u32) -> Self
    where
        P: Into<String>,
    {
        Self {
            package_name: package_name.into(),
            version,
            entities: Vec::new(),
        }
    }

    pub fn get_package_name(&self) -> &str {
        &self.package_name
    }

    pub fn get_version(&self) -> u32 {
        self.version
    }

    pub fn get_entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    pub fn entity_index(&self, name: &str) -> Option<usize> {
        self.entities.iter().position(|entity| entity.name == name)
    }

    /// The property a link's foreign key points at
    pub fn get_foreign_key_property(&self, foreign_key: &ForeignKey) -> Option<&Property> {
        self.get_entity(&foreign_key.entity)?
            .properties
            .get(foreign_key.property)
    }

    /// Build an entity from a table declaration and register it.
    ///
    /// The identity property comes first, followed by the declared
    /// properties in declaration order.
    pub fn add_entity(&mut self, def: &TableDef) -> Result<&mut Entity, SchemaErr> {
        let name = def
            .name
            .as_deref()
            .ok_or_else(|| SchemaErr::Malformed("table is missing `name`".to_owned()))?;
        let context = || format!("table `{name}`");
        if self.entity_index(name).is_some() {
            return Err(SchemaErr::Malformed("declared more than once".to_owned()).context(context()));
        }

        let mut entity = Entity::new(name);
        entity.set_keep_sections(true);
        for prop in def.properties() {
            entity
                .add_declared_property(prop)
                .map_err(|e| e.context(context()))?;
        }
        debug!(
            "Built entity {} with {} properties",
            name,
            entity.properties.len()
        );

        let index = self.entities.len();
        self.entities.push(entity);
        Ok(&mut self.entities[index])
    }
}
