use thiserror::Error;

/// An error raised while interpreting a schema description
#[derive(Debug, Error)]
pub enum SchemaErr {
    /// A required field is missing, or a declaration conflicts with an earlier one
    #[error("Malformed schema: {0}")]
    Malformed(String),
    /// A property type token outside the recognized set
    #[error("Unknown property type `{0}`")]
    UnknownType(String),
    /// A relationship type token outside the active vocabulary
    #[error("Unknown relationship type `{0}`")]
    UnknownRelationKind(String),
    /// A relationship names a table that was never declared.
    /// The directive is skipped; compilation continues.
    #[error("Unresolved table reference `{0}`")]
    UnresolvedReference(String),
    /// A schema compiled in batch mode does not say where its output goes
    #[error("Schema does not declare an `output_dir`")]
    MissingOutputTarget,
    /// The document could not be decoded into the schema structure
    #[error("Failed to decode schema: {0}")]
    Json(#[from] serde_json::Error),
    /// Any of the above, annotated with the declaration or file it came from
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<SchemaErr>,
    },
}

impl SchemaErr {
    /// Wrap this error with a description of where it happened
    pub fn context<C>(self, context: C) -> Self
    where
        C: Into<String>,
    {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context wrappers removed
    pub fn root(&self) -> &SchemaErr {
        match self {
            Self::Context { source, .. } => source.root(),
            err => err,
        }
    }

    /// Whether this error aborts the compilation of the current file.
    /// Only unresolved references are tolerated.
    pub fn is_fatal(&self) -> bool {
        !matches!(self.root(), Self::UnresolvedReference(_))
    }
}
