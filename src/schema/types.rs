use crate::SchemaErr;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Canonical scalar kind of a property
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScalarType {
    Date,
    Double,
    Float,
    String,
    Integer,
    Boolean,
    Long,
    Blob,
}

impl ScalarType {
    /// Map a declared type token, in any letter case, to its scalar kind
    pub fn from_token(token: &str) -> Result<Self, SchemaErr> {
        Self::from_str(token).map_err(|_| SchemaErr::UnknownType(token.to_owned()))
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
