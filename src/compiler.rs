use crate::{RelationFormat, Schema, SchemaDef, SchemaErr};
use serde_json::Value;
use tracing::instrument;

/// Drives a schema document through entity building and relationship
/// resolution
#[derive(Clone, Debug, Default)]
pub struct SchemaCompiler {
    relation_format: RelationFormat,
}

/// A completed entity graph and the relationship directives that were
/// skipped while building it
#[derive(Debug)]
pub struct Compilation {
    pub schema: Schema,
    pub skipped: Vec<SchemaErr>,
}

impl SchemaCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Relationship vocabulary used for documents that do not declare a
    /// `relationFormat` of their own
    pub fn relation_format(mut self, relation_format: RelationFormat) -> Self {
        self.relation_format = relation_format;
        self
    }

    pub fn compile_str(&self, json: &str) -> Result<Compilation, SchemaErr> {
        self.compile(&json.parse::<SchemaDef>()?)
    }

    pub fn compile_value(&self, value: Value) -> Result<Compilation, SchemaErr> {
        self.compile(&SchemaDef::from_value(value)?)
    }

    /// Build every table, then resolve every relationship.
    ///
    /// Relationships are resolved only once all entities exist, so a
    /// directive may reference a table declared after it.
    #[instrument(level = "debug", skip_all, fields(package = %def.package_name))]
    pub fn compile(&self, def: &SchemaDef) -> Result<Compilation, SchemaErr> {
        let mut schema = Schema::new(def.package_name.as_str(), def.version()?);
        for table in def.tables() {
            schema.add_entity(table)?;
        }

        let format = def.relation_format.unwrap_or(self.relation_format);
        let skipped = schema.resolve_relations(def.relationships(), format)?;

        Ok(Compilation { schema, skipped })
    }
}

impl Compilation {
    pub fn into_schema(self) -> Schema {
        self.schema
    }
}
