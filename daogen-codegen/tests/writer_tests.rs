use daogen::{RelationFormat, SchemaCompiler};
use daogen_codegen::{
    DateTimeCrate, EntityWriter, EntityWriterContext, OutputFile, WithSerde, merge_entity_file,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn blog_schema() -> serde_json::Value {
    json!({
        "packageName": "com.example.blog",
        "databaseVersion": 2,
        "output_dir": "src/entities",
        "tables": [
            { "name": "User", "properties": [
                { "name": "name", "type": "String", "mandatory": true }
            ]},
            { "name": "Post", "properties": [
                { "name": "title", "type": "string" },
                { "name": "body", "type": "string" }
            ]}
        ],
        "relationships": [
            { "type": "to_many", "left_table": "User", "right_table": "Post", "mandatory": true },
            { "name": "avatar", "type": "has_one", "left_table": "User", "right_table": "Post" }
        ]
    })
}

fn generate(format: RelationFormat, context: &EntityWriterContext) -> Vec<OutputFile> {
    let schema = SchemaCompiler::new()
        .relation_format(format)
        .compile_value(blog_schema())
        .unwrap()
        .into_schema();
    EntityWriter::new(&schema).generate(context).files
}

fn find<'a>(files: &'a [OutputFile], name: &str) -> &'a str {
    &files
        .iter()
        .find(|file| file.name == name)
        .unwrap_or_else(|| panic!("missing {name}"))
        .content
}

#[test]
fn test_generate_blog() {
    let files = generate(RelationFormat::Extended, &EntityWriterContext::default());
    let names: Vec<_> = files.iter().map(|file| file.name.as_str()).collect();
    assert_eq!(names, ["user.rs", "post.rs", "mod.rs", "prelude.rs"]);

    let user = find(&files, "user.rs");
    assert!(user.contains("pub name: String,"));
    assert!(user.contains("pub avatar_id: Option<i64>,"));
    assert!(user.contains("Self::Avatar => Some((\"User\", \"avatarId\")),"));
    assert!(user.contains("Self::ChildsPost => Some((\"Post\", \"parentId\")),"));

    let post = find(&files, "post.rs");
    assert!(post.contains("pub title: Option<String>,"));
    assert!(post.contains("pub parent_id: i64,"));
    assert!(post.contains("Self::User => \"User\","));

    let index = find(&files, "mod.rs");
    assert!(index.contains("pub const PACKAGE_NAME: &str = \"com.example.blog\";"));
    assert!(index.contains("pub const SCHEMA_VERSION: u32 = 2;"));
    assert!(index.contains("pub mod post;"));
}

#[test]
fn test_generate_legacy_has_one() {
    let files = generate(RelationFormat::Legacy, &EntityWriterContext::default());

    // the key of a legacy has_one lives on the right side
    let user = find(&files, "user.rs");
    assert!(!user.contains("avatar_id"));
    assert!(user.contains("Self::Post => Some((\"Post\", \"UserId\")),"));

    let post = find(&files, "post.rs");
    assert!(post.contains("pub user_id: Option<i64>,"));
}

#[test]
fn test_generate_with_serde() {
    let context = EntityWriterContext::new(WithSerde::Both, DateTimeCrate::Time, true);
    let files = generate(RelationFormat::Extended, &context);
    assert!(files.iter().any(|file| file.name == "lib.rs"));

    let user = find(&files, "user.rs");
    assert!(user.contains("use serde::{Deserialize, Serialize};"));
    assert!(user.contains("#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]"));
}

#[test]
fn test_regenerate_keeps_sections() {
    let files = generate(RelationFormat::Extended, &EntityWriterContext::default());
    let mut edited = find(&files, "post.rs").to_owned();
    edited.push_str(
        "\nimpl Model {\n    pub fn has_title(&self) -> bool {\n        self.title.is_some()\n    }\n}\n",
    );

    let context = EntityWriterContext::new(WithSerde::Serialize, DateTimeCrate::Chrono, false);
    let files = generate(RelationFormat::Extended, &context);
    let merged = merge_entity_file(&edited, find(&files, "post.rs")).unwrap();

    assert!(merged.contains("pub fn has_title(&self) -> bool"));
    assert!(merged.contains("use serde::Serialize;"));
    assert_eq!(merged.matches("pub struct Model").count(), 1);
    assert_eq!(merged.matches("impl Column").count(), 1);
    assert_eq!(merged.matches("impl Relation").count(), 1);
}
