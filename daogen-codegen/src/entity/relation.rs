use crate::util::{escape_rust_keyword, sanitize_ident};
use daogen::{ForeignKey, Schema, ToMany, ToOne};
use heck::ToUpperCamelCase;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelationType {
    ToOne,
    ToMany,
}

#[derive(Clone, Debug)]
pub struct Relation {
    pub(crate) name: String,
    pub(crate) target: String,
    pub(crate) rel_type: RelationType,
    /// Entity and column holding the key, when the link has one
    pub(crate) foreign_key: Option<(String, String)>,
    /// Variant name, made unique within the entity
    pub(crate) variant_name: String,
}

impl Relation {
    pub fn from_to_one(schema: &Schema, link: &ToOne) -> Self {
        let name = link.name.clone().unwrap_or_else(|| link.target.clone());
        Self::new(
            schema,
            name,
            &link.target,
            RelationType::ToOne,
            link.foreign_key.as_ref(),
        )
    }

    pub fn from_to_many(schema: &Schema, link: &ToMany) -> Self {
        Self::new(
            schema,
            link.name.clone(),
            &link.target,
            RelationType::ToMany,
            Some(&link.foreign_key),
        )
    }

    fn new(
        schema: &Schema,
        name: String,
        target: &str,
        rel_type: RelationType,
        foreign_key: Option<&ForeignKey>,
    ) -> Self {
        let foreign_key = foreign_key.and_then(|fk| {
            schema
                .get_foreign_key_property(fk)
                .map(|prop| (fk.entity.clone(), prop.get_name().to_owned()))
        });
        Self {
            variant_name: sanitize_ident(&name.to_upper_camel_case(), "Unnamed"),
            name,
            target: target.to_owned(),
            rel_type,
            foreign_key,
        }
    }

    pub fn get_variant(&self) -> Ident {
        format_ident!("{}", escape_rust_keyword(&self.variant_name))
    }

    pub fn get_target(&self) -> &str {
        &self.target
    }

    pub fn is_to_many(&self) -> bool {
        self.rel_type == RelationType::ToMany
    }

    pub fn get_foreign_key(&self) -> TokenStream {
        match &self.foreign_key {
            Some((entity, column)) => quote! { Some((#entity, #column)) },
            None => quote! { None },
        }
    }

    pub fn get_info(&self) -> String {
        let arrow = match self.rel_type {
            RelationType::ToOne => "->",
            RelationType::ToMany => "->>",
        };
        match &self.foreign_key {
            Some((entity, column)) => format!(
                "Relation `{}`: {} {} via {}.{}",
                self.name, arrow, self.target, entity, column
            ),
            None => format!("Relation `{}`: {} {}", self.name, arrow, self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daogen::SchemaCompiler;
    use serde_json::json;

    fn setup() -> (Schema, Vec<Relation>) {
        let schema = SchemaCompiler::new()
            .compile_value(json!({
                "tables": [{ "name": "User" }, { "name": "Post" }, { "name": "Avatar" }],
                "relationships": [
                    { "type": "to_many", "left_table": "User", "right_table": "Post" },
                    { "name": "avatar", "type": "has_one", "left_table": "User", "right_table": "Avatar" },
                    { "name": "drafts", "type": "has_many", "left_table": "User", "right_table": "Post" }
                ]
            }))
            .unwrap()
            .into_schema();
        let user = schema.get_entity("User").unwrap();
        let mut relations: Vec<_> = user
            .get_to_one()
            .iter()
            .map(|link| Relation::from_to_one(&schema, link))
            .collect();
        relations.extend(
            user.get_to_many()
                .iter()
                .map(|link| Relation::from_to_many(&schema, link)),
        );
        let post = schema.get_entity("Post").unwrap();
        relations.extend(
            post.get_to_one()
                .iter()
                .map(|link| Relation::from_to_one(&schema, link)),
        );
        (schema, relations)
    }

    #[test]
    fn test_get_variant() {
        let (_, relations) = setup();
        let variants = ["Avatar", "Drafts", "ChildsPost", "User"];
        for (rel, variant) in relations.iter().zip(variants) {
            assert_eq!(rel.get_variant().to_string(), variant);
        }
    }

    #[test]
    fn test_variant_of_unusable_name() {
        let schema = SchemaCompiler::new()
            .compile_value(json!({
                "tables": [{ "name": "User" }, { "name": "Avatar" }, { "name": "Badge" }],
                "relationships": [
                    { "name": "", "type": "has_one", "left_table": "User", "right_table": "Avatar" },
                    { "name": "1st badge", "type": "has_one", "left_table": "User", "right_table": "Badge" }
                ]
            }))
            .unwrap()
            .into_schema();
        let user = schema.get_entity("User").unwrap();
        let variants: Vec<_> = user
            .get_to_one()
            .iter()
            .map(|link| Relation::from_to_one(&schema, link).get_variant().to_string())
            .collect();
        assert_eq!(variants, ["Unnamed", "_1stBadge"]);
    }

    #[test]
    fn test_get_foreign_key() {
        let (_, relations) = setup();
        let foreign_keys = [
            quote! { Some(("User", "avatarId")) },
            quote! { None },
            quote! { Some(("Post", "parentId")) },
            quote! { Some(("Post", "parentId")) },
        ];
        for (rel, foreign_key) in relations.iter().zip(foreign_keys) {
            assert_eq!(rel.get_foreign_key().to_string(), foreign_key.to_string());
        }
    }

    #[test]
    fn test_is_to_many() {
        let (_, relations) = setup();
        let to_many: Vec<_> = relations.iter().map(|rel| rel.is_to_many()).collect();
        assert_eq!(to_many, [false, false, true, false]);
    }

    #[test]
    fn test_get_info() {
        let (_, relations) = setup();
        assert_eq!(
            relations[1].get_info(),
            "Relation `drafts`: -> Post"
        );
        assert_eq!(
            relations[2].get_info(),
            "Relation `childsPost`: ->> Post via Post.parentId"
        );
    }
}
