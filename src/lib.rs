#![deny(
    missing_debug_implementations,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # daogen
//!
//! Compiles a declarative JSON schema description into a typed
//! entity-relationship model that drives a persistence-layer code generator.
//!
//! A schema document lists `tables`, each with typed `properties`, and
//! `relationships` between them:
//!
//! ```json
//! {
//!   "packageName": "com.example.db",
//!   "databaseVersion": 2,
//!   "tables": [
//!     { "name": "User", "properties": [{ "name": "name", "type": "string", "mandatory": true }] },
//!     { "name": "Post", "properties": [{ "name": "title", "type": "string" }] }
//!   ],
//!   "relationships": [
//!     { "left_table": "User", "right_table": "Post", "type": "to_many", "mandatory": true }
//!   ]
//! }
//! ```
//!
//! Compilation runs in two phases: every table becomes an [`Entity`] with an
//! implicit `id` primary key, then every relationship is applied to the
//! completed set of entities, synthesizing foreign-key properties and
//! navigation links.
//!
//! ```
//! use daogen::{SchemaCompiler, ScalarType};
//!
//! let json = r#"{
//!     "tables": [
//!         { "name": "User", "properties": [{ "name": "name", "type": "string", "mandatory": true }] },
//!         { "name": "Post", "properties": [{ "name": "title", "type": "string" }] }
//!     ],
//!     "relationships": [
//!         { "left_table": "User", "right_table": "Post", "type": "to_many", "mandatory": true }
//!     ]
//! }"#;
//!
//! let schema = SchemaCompiler::new().compile_str(json)?.into_schema();
//!
//! let post = schema.get_entity("Post").unwrap();
//! let parent_id = post.get_property("parentId").unwrap();
//! assert_eq!(parent_id.get_scalar_type(), ScalarType::Long);
//! assert!(parent_id.is_not_null());
//!
//! let user = schema.get_entity("User").unwrap();
//! assert_eq!(user.get_to_many()[0].name, "childsPost");
//! # Ok::<(), daogen::SchemaErr>(())
//! ```
//!
//! ## Relationship kinds
//!
//! | kind       | foreign key                    | links                                             |
//! |------------|--------------------------------|---------------------------------------------------|
//! | `to_many`  | `parentId` on the right entity | to-one right → left, to-many `childs<Right>` on left |
//! | `has_one`  | `<name>Id` on the left entity  | to-one left → right, named `<name>`               |
//! | `has_many` | none                           | to-one left → right, named `<name>`               |
//!
//! Schemas written for the [`RelationFormat::Legacy`] vocabulary place the
//! `has_one` key on the right entity as `<leftTable>Id` instead, and do not
//! know `has_many`.

mod compiler;
pub mod error;
pub mod schema;

pub use compiler::*;
pub use error::*;
pub use schema::*;
