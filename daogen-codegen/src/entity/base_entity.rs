use crate::{
    Column, DateTimeCrate, Relation,
    util::{escape_rust_keyword, module_name, number_duplicates, sanitize_ident},
};
use daogen::Schema;
use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, TokenStream};
use quote::format_ident;

#[derive(Clone, Debug)]
pub struct Entity {
    pub(crate) table_name: String,
    /// File stem and module of the entity, unique within the writer
    pub(crate) module_name: String,
    /// Name the prelude re-exports the entity under, unique within the writer
    pub(crate) type_name: String,
    pub(crate) columns: Vec<Column>,
    pub(crate) relations: Vec<Relation>,
    pub(crate) keep_sections: bool,
}

impl Entity {
    /// Collect the columns and links of one entity of a compiled schema.
    ///
    /// To-one links come before to-many links, each in the order they were
    /// added. Names that collide after case conversion are numbered.
    pub fn from_schema(schema: &Schema, entity: &daogen::Entity) -> Self {
        let mut columns: Vec<Column> = entity.get_properties().iter().map(Column::from).collect();
        let field_names = number_duplicates(
            columns.iter().map(|col| col.field_name.clone()).collect(),
            "_",
        );
        let variant_names = number_duplicates(
            columns.iter().map(|col| col.variant_name.clone()).collect(),
            "",
        );
        for ((col, field_name), variant_name) in columns.iter_mut().zip(field_names).zip(variant_names)
        {
            col.field_name = field_name;
            col.variant_name = variant_name;
        }

        let mut relations: Vec<Relation> = entity
            .get_to_one()
            .iter()
            .map(|link| Relation::from_to_one(schema, link))
            .chain(
                entity
                    .get_to_many()
                    .iter()
                    .map(|link| Relation::from_to_many(schema, link)),
            )
            .collect();
        let variant_names = number_duplicates(
            relations.iter().map(|rel| rel.variant_name.clone()).collect(),
            "",
        );
        for (rel, variant_name) in relations.iter_mut().zip(variant_names) {
            rel.variant_name = variant_name;
        }

        let table_name = entity.get_name().to_owned();
        Self {
            module_name: module_name(&table_name.to_snake_case()),
            type_name: sanitize_ident(&table_name.to_upper_camel_case(), "Unnamed"),
            table_name,
            columns,
            relations,
            keep_sections: entity.has_keep_sections(),
        }
    }

    pub fn get_table_name_snake_case(&self) -> String {
        self.module_name.clone()
    }

    pub fn get_table_name_camel_case(&self) -> String {
        self.type_name.clone()
    }

    pub fn get_table_name_snake_case_ident(&self) -> Ident {
        format_ident!("{}", self.module_name)
    }

    pub fn get_table_name_camel_case_ident(&self) -> Ident {
        format_ident!("{}", escape_rust_keyword(self.get_table_name_camel_case()))
    }

    pub fn get_column_names_snake_case(&self) -> Vec<Ident> {
        self.columns
            .iter()
            .map(|col| col.get_name_snake_case())
            .collect()
    }

    pub fn get_column_names_camel_case(&self) -> Vec<Ident> {
        self.columns
            .iter()
            .map(|col| col.get_name_camel_case())
            .collect()
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub fn get_column_rs_types(&self, date_time_crate: &DateTimeCrate) -> Vec<TokenStream> {
        self.columns
            .iter()
            .map(|col| col.get_rs_type(date_time_crate))
            .collect()
    }

    pub fn get_column_indexed(&self) -> Vec<bool> {
        self.columns.iter().map(|col| col.indexed).collect()
    }

    pub fn get_column_nullable(&self) -> Vec<bool> {
        self.columns.iter().map(|col| !col.not_null).collect()
    }

    pub fn get_primary_key_camel_case(&self) -> Option<Ident> {
        self.columns
            .iter()
            .find(|col| col.primary_key)
            .map(|col| col.get_name_camel_case())
    }

    pub fn get_relation_variants(&self) -> Vec<Ident> {
        self.relations.iter().map(|rel| rel.get_variant()).collect()
    }

    pub fn get_relation_targets(&self) -> Vec<&str> {
        self.relations.iter().map(|rel| rel.get_target()).collect()
    }

    pub fn get_relation_to_many(&self) -> Vec<bool> {
        self.relations.iter().map(|rel| rel.is_to_many()).collect()
    }

    pub fn get_relation_foreign_keys(&self) -> Vec<TokenStream> {
        self.relations
            .iter()
            .map(|rel| rel.get_foreign_key())
            .collect()
    }
}
