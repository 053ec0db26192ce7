use crate::{Entity, util::number_duplicates};
use daogen::Schema;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use std::str::FromStr;
use tracing::info;

#[derive(Clone, Debug)]
pub struct EntityWriter {
    pub(crate) package_name: String,
    pub(crate) version: u32,
    pub(crate) entities: Vec<Entity>,
}

#[derive(Debug)]
pub struct WriterOutput {
    pub files: Vec<OutputFile>,
}

#[derive(Debug)]
pub struct OutputFile {
    pub name: String,
    pub content: String,
    /// Hand-written items of an existing file should survive regeneration
    pub mergeable: bool,
}

#[derive(PartialEq, Eq, Debug)]
pub enum WithSerde {
    None,
    Serialize,
    Deserialize,
    Both,
}

#[derive(Debug)]
pub enum DateTimeCrate {
    Chrono,
    Time,
}

#[derive(Debug)]
pub struct EntityWriterContext {
    pub(crate) with_serde: WithSerde,
    pub(crate) date_time_crate: DateTimeCrate,
    pub(crate) lib: bool,
}

impl WithSerde {
    pub fn extra_derive(&self) -> TokenStream {
        let mut extra_derive = match self {
            Self::None => {
                quote! {}
            }
            Self::Serialize => {
                quote! {
                    Serialize
                }
            }
            Self::Deserialize => {
                quote! {
                    Deserialize
                }
            }
            Self::Both => {
                quote! {
                    Serialize, Deserialize
                }
            }
        };

        if !extra_derive.is_empty() {
            extra_derive = quote! { , #extra_derive }
        }

        extra_derive
    }
}

impl FromStr for WithSerde {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "none" => Self::None,
            "serialize" => Self::Serialize,
            "deserialize" => Self::Deserialize,
            "both" => Self::Both,
            v => {
                return Err(crate::Error::InvalidOption(format!(
                    "unsupported serde derive `{v}`"
                )));
            }
        })
    }
}

impl FromStr for DateTimeCrate {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "chrono" => Self::Chrono,
            "time" => Self::Time,
            v => {
                return Err(crate::Error::InvalidOption(format!(
                    "unsupported date time crate `{v}`"
                )));
            }
        })
    }
}

impl EntityWriterContext {
    pub fn new(with_serde: WithSerde, date_time_crate: DateTimeCrate, lib: bool) -> Self {
        Self {
            with_serde,
            date_time_crate,
            lib,
        }
    }
}

impl Default for EntityWriterContext {
    fn default() -> Self {
        Self::new(WithSerde::None, DateTimeCrate::Chrono, false)
    }
}

impl From<&Schema> for EntityWriter {
    fn from(schema: &Schema) -> Self {
        Self::new(schema)
    }
}

impl EntityWriter {
    /// Entities whose module or type names collide after case conversion
    /// are numbered, e.g. `UserPost` and `user_post` become `user_post_1.rs`
    /// and `user_post_2.rs`.
    pub fn new(schema: &Schema) -> Self {
        let mut entities: Vec<Entity> = schema
            .get_entities()
            .iter()
            .map(|entity| Entity::from_schema(schema, entity))
            .collect();
        let module_names = number_duplicates(
            entities.iter().map(|entity| entity.module_name.clone()).collect(),
            "_",
        );
        let type_names = number_duplicates(
            entities.iter().map(|entity| entity.type_name.clone()).collect(),
            "",
        );
        for ((entity, module_name), type_name) in
            entities.iter_mut().zip(module_names).zip(type_names)
        {
            entity.module_name = module_name;
            entity.type_name = type_name;
        }

        Self {
            package_name: schema.get_package_name().to_owned(),
            version: schema.get_version(),
            entities,
        }
    }

    pub fn generate(self, context: &EntityWriterContext) -> WriterOutput {
        let mut files = Vec::new();
        files.extend(self.write_entities(context));
        files.push(self.write_index_file(context.lib));
        files.push(self.write_prelude());
        WriterOutput { files }
    }

    pub fn write_entities(&self, context: &EntityWriterContext) -> Vec<OutputFile> {
        self.entities
            .iter()
            .map(|entity| {
                let entity_file = format!("{}.rs", entity.get_table_name_snake_case());
                info!("Generating {}", entity_file);
                for column in entity.columns.iter() {
                    info!("    > {}", column.get_info(&context.date_time_crate));
                }
                for relation in entity.relations.iter() {
                    info!("    > {}", relation.get_info());
                }

                let mut lines = Vec::new();
                Self::write_doc_comment(
                    &mut lines,
                    &format!("`{}` entity.", entity.table_name),
                );
                let code_blocks = Self::gen_code_blocks(entity, context);
                Self::write(&mut lines, code_blocks);
                OutputFile {
                    name: entity_file,
                    content: lines.join("\n"),
                    mergeable: entity.keep_sections,
                }
            })
            .collect()
    }

    pub fn write_index_file(&self, lib: bool) -> OutputFile {
        let mut lines = Vec::new();
        Self::write_doc_comment(&mut lines, &format!("Package `{}`.", self.package_name));
        let mut code_blocks = vec![self.gen_schema_consts(), quote! { pub mod prelude; }];
        code_blocks.extend(self.entities.iter().map(Self::gen_mod));
        Self::write(&mut lines, code_blocks);

        let file_name = match lib {
            true => "lib.rs".to_owned(),
            false => "mod.rs".to_owned(),
        };

        OutputFile {
            name: file_name,
            content: lines.join("\n"),
            mergeable: false,
        }
    }

    pub fn write_prelude(&self) -> OutputFile {
        let mut lines = Vec::new();
        Self::write_doc_comment(&mut lines, "Prelude.");
        let code_blocks = self.entities.iter().map(Self::gen_prelude_use).collect();
        Self::write(&mut lines, code_blocks);
        OutputFile {
            name: "prelude.rs".to_owned(),
            content: lines.join("\n"),
            mergeable: false,
        }
    }

    /// Format the code blocks as one source file and append it
    pub fn write(lines: &mut Vec<String>, code_blocks: Vec<TokenStream>) {
        let tokens: TokenStream = code_blocks.into_iter().collect();
        let code = match syn::parse2::<syn::File>(tokens.clone()) {
            Ok(file) => prettyplease::unparse(&file),
            Err(_) => tokens.to_string(),
        };
        lines.push(code);
    }

    pub fn write_doc_comment(lines: &mut Vec<String>, title: &str) {
        let ver = env!("CARGO_PKG_VERSION");
        lines.push(format!("//! {title} Generated by daogen-codegen {ver}"));
        lines.push("".to_owned());
    }

    pub fn gen_code_blocks(entity: &Entity, context: &EntityWriterContext) -> Vec<TokenStream> {
        vec![
            Self::gen_import(&context.with_serde),
            Self::gen_table_name(entity),
            Self::gen_model_struct(entity, &context.with_serde, &context.date_time_crate),
            Self::gen_column_enum(entity),
            Self::gen_impl_column(entity),
            Self::gen_primary_key(entity),
            Self::gen_relation_enum(entity),
            Self::gen_impl_relation(entity),
        ]
    }

    pub fn gen_import(with_serde: &WithSerde) -> TokenStream {
        match with_serde {
            WithSerde::None => quote! {},
            WithSerde::Serialize => {
                quote! {
                    use serde::Serialize;
                }
            }
            WithSerde::Deserialize => {
                quote! {
                    use serde::Deserialize;
                }
            }
            WithSerde::Both => {
                quote! {
                    use serde::{Deserialize, Serialize};
                }
            }
        }
    }

    pub fn gen_table_name(entity: &Entity) -> TokenStream {
        let table_name = entity.table_name.as_str();
        quote! {
            pub const TABLE_NAME: &str = #table_name;
        }
    }

    pub fn gen_model_struct(
        entity: &Entity,
        with_serde: &WithSerde,
        date_time_crate: &DateTimeCrate,
    ) -> TokenStream {
        let column_names_snake_case = entity.get_column_names_snake_case();
        let column_rs_types = entity.get_column_rs_types(date_time_crate);
        let extra_derive = with_serde.extra_derive();

        quote! {
            #[derive(Clone, Debug, PartialEq #extra_derive)]
            pub struct Model {
                #(pub #column_names_snake_case: #column_rs_types,)*
            }
        }
    }

    pub fn gen_column_enum(entity: &Entity) -> TokenStream {
        let column_names_camel_case = entity.get_column_names_camel_case();
        quote! {
            #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
            pub enum Column {
                #(#column_names_camel_case,)*
            }
        }
    }

    pub fn gen_impl_column(entity: &Entity) -> TokenStream {
        let column_names_camel_case = entity.get_column_names_camel_case();
        let column_names = entity.get_column_names();
        let column_indexed = entity.get_column_indexed();
        let column_nullable = entity.get_column_nullable();
        quote! {
            impl Column {
                pub fn name(&self) -> &'static str {
                    match *self {
                        #(Self::#column_names_camel_case => #column_names,)*
                    }
                }

                pub fn is_indexed(&self) -> bool {
                    match *self {
                        #(Self::#column_names_camel_case => #column_indexed,)*
                    }
                }

                pub fn is_nullable(&self) -> bool {
                    match *self {
                        #(Self::#column_names_camel_case => #column_nullable,)*
                    }
                }
            }
        }
    }

    pub fn gen_primary_key(entity: &Entity) -> TokenStream {
        match entity.get_primary_key_camel_case() {
            Some(primary_key) => quote! {
                pub const PRIMARY_KEY: Column = Column::#primary_key;
            },
            None => quote! {},
        }
    }

    pub fn gen_relation_enum(entity: &Entity) -> TokenStream {
        let relation_variants = entity.get_relation_variants();
        quote! {
            #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
            pub enum Relation {
                #(#relation_variants,)*
            }
        }
    }

    pub fn gen_impl_relation(entity: &Entity) -> TokenStream {
        let relation_variants = entity.get_relation_variants();
        let relation_targets = entity.get_relation_targets();
        let relation_to_many = entity.get_relation_to_many();
        let relation_foreign_keys = entity.get_relation_foreign_keys();
        quote! {
            impl Relation {
                pub fn target(&self) -> &'static str {
                    match *self {
                        #(Self::#relation_variants => #relation_targets,)*
                    }
                }

                pub fn is_to_many(&self) -> bool {
                    match *self {
                        #(Self::#relation_variants => #relation_to_many,)*
                    }
                }

                pub fn foreign_key(&self) -> Option<(&'static str, &'static str)> {
                    match *self {
                        #(Self::#relation_variants => #relation_foreign_keys,)*
                    }
                }
            }
        }
    }

    pub fn gen_schema_consts(&self) -> TokenStream {
        let package_name = self.package_name.as_str();
        let version = Literal::u32_unsuffixed(self.version);
        quote! {
            pub const PACKAGE_NAME: &str = #package_name;
            pub const SCHEMA_VERSION: u32 = #version;
        }
    }

    pub fn gen_mod(entity: &Entity) -> TokenStream {
        let table_name_snake_case_ident = entity.get_table_name_snake_case_ident();
        quote! {
            pub mod #table_name_snake_case_ident;
        }
    }

    pub fn gen_prelude_use(entity: &Entity) -> TokenStream {
        let table_name_snake_case_ident = entity.get_table_name_snake_case_ident();
        let table_name_camel_case_ident = entity.get_table_name_camel_case_ident();
        quote! {
            pub use super::#table_name_snake_case_ident::Model as #table_name_camel_case_ident;
        }
    }
}
