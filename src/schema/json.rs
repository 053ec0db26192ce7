//! Typed decoding of the JSON schema document.
//!
//! Required string fields are kept optional here so that their absence can be
//! reported as [`SchemaErr::Malformed`] with the offending declaration named,
//! rather than as an opaque decoder error.

use super::RelationFormat;
use crate::SchemaErr;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

pub const DEFAULT_PACKAGE_NAME: &str = "db";

pub const DEFAULT_DATABASE_VERSION: i64 = 1;

/// Root of a schema document
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SchemaDef {
    #[serde(rename = "packageName", default = "default_package_name")]
    pub package_name: String,
    #[serde(rename = "databaseVersion", default = "default_database_version")]
    pub database_version: i64,
    #[serde(rename = "relationFormat", default)]
    pub relation_format: Option<RelationFormat>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub tables: Option<Vec<TableDef>>,
    #[serde(default)]
    pub relationships: Option<Vec<RelationDef>>,
}

/// A table declaration
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct TableDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: Option<Vec<PropertyDef>>,
}

/// A property declaration
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PropertyDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub type_token: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub mandatory: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub indexed: bool,
}

/// A relationship directive
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RelationDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub left_table: Option<String>,
    #[serde(default)]
    pub right_table: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub mandatory: bool,
}

/// `null` flags read as unset
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_package_name() -> String {
    DEFAULT_PACKAGE_NAME.to_owned()
}

fn default_database_version() -> i64 {
    DEFAULT_DATABASE_VERSION
}

impl Default for SchemaDef {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            database_version: default_database_version(),
            relation_format: None,
            output_dir: None,
            tables: None,
            relationships: None,
        }
    }
}

impl SchemaDef {
    pub fn from_value(value: Value) -> Result<Self, SchemaErr> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn tables(&self) -> &[TableDef] {
        self.tables.as_deref().unwrap_or_default()
    }

    pub fn relationships(&self) -> &[RelationDef] {
        self.relationships.as_deref().unwrap_or_default()
    }

    /// The version as a validated positive number
    pub fn version(&self) -> Result<u32, SchemaErr> {
        match u32::try_from(self.database_version) {
            Ok(version) if version >= 1 => Ok(version),
            _ => Err(SchemaErr::Malformed(format!(
                "`databaseVersion` must be a positive integer, got {}",
                self.database_version
            ))),
        }
    }

    /// The output directory required by batch generation
    pub fn output_dir(&self) -> Result<&str, SchemaErr> {
        match self.output_dir.as_deref() {
            Some(dir) if !dir.is_empty() => Ok(dir),
            _ => Err(SchemaErr::MissingOutputTarget),
        }
    }
}

impl FromStr for SchemaDef {
    type Err = SchemaErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl TableDef {
    pub fn properties(&self) -> &[PropertyDef] {
        self.properties.as_deref().unwrap_or_default()
    }
}
