use crate::{
    DateTimeCrate,
    util::{escape_rust_keyword, sanitize_ident},
};
use daogen::{Property, ScalarType};
use heck::{ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

#[derive(Clone, Debug)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) col_type: ScalarType,
    pub(crate) not_null: bool,
    pub(crate) indexed: bool,
    pub(crate) primary_key: bool,
    /// Field and variant names, made unique within the entity
    pub(crate) field_name: String,
    pub(crate) variant_name: String,
}

impl Column {
    pub fn get_name_snake_case(&self) -> Ident {
        format_ident!("{}", escape_rust_keyword(&self.field_name))
    }

    pub fn get_name_camel_case(&self) -> Ident {
        format_ident!("{}", escape_rust_keyword(&self.variant_name))
    }

    pub fn get_rs_type(&self, date_time_crate: &DateTimeCrate) -> TokenStream {
        let ident: TokenStream = match self.col_type {
            ScalarType::Date => match date_time_crate {
                DateTimeCrate::Chrono => quote! { chrono::NaiveDateTime },
                DateTimeCrate::Time => quote! { time::PrimitiveDateTime },
            },
            ScalarType::Double => quote! { f64 },
            ScalarType::Float => quote! { f32 },
            ScalarType::String => quote! { String },
            ScalarType::Integer => quote! { i32 },
            ScalarType::Boolean => quote! { bool },
            ScalarType::Long => quote! { i64 },
            ScalarType::Blob => quote! { Vec<u8> },
        };
        if self.not_null {
            ident
        } else {
            quote! { Option<#ident> }
        }
    }

    pub fn get_info(&self, date_time_crate: &DateTimeCrate) -> String {
        let mut info = String::new();
        let type_info = self
            .get_rs_type(date_time_crate)
            .to_string()
            .replace(' ', "");
        info.push_str(&format!(
            "Column `{}`: {}, {}",
            self.name,
            type_info,
            if self.not_null { "not null" } else { "nullable" }
        ));
        if self.primary_key {
            info.push_str(", primary key");
        }
        if self.indexed {
            info.push_str(", indexed");
        }
        info
    }
}

impl From<&Property> for Column {
    fn from(prop: &Property) -> Self {
        let name = prop.get_name().to_owned();
        Self {
            field_name: sanitize_ident(&name.to_snake_case(), "unnamed"),
            variant_name: sanitize_ident(&name.to_upper_camel_case(), "Unnamed"),
            name,
            col_type: prop.get_scalar_type(),
            not_null: prop.is_not_null(),
            indexed: prop.is_indexed(),
            primary_key: prop.is_primary_key(),
        }
    }
}
