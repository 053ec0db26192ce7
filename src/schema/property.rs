use super::ScalarType;

/// One typed column of an entity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub(crate) name: String,
    pub(crate) scalar_type: ScalarType,
    pub(crate) not_null: bool,
    pub(crate) indexed: bool,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
}

impl Property {
    pub fn new<N>(name: N, scalar_type: ScalarType) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            scalar_type,
            not_null: false,
            indexed: false,
            primary_key: false,
            auto_increment: false,
        }
    }

    pub fn not_null(&mut self) -> &mut Self {
        self.not_null = true;
        self
    }

    pub fn index(&mut self) -> &mut Self {
        self.indexed = true;
        self
    }

    /// Primary keys are implicitly not null
    pub fn primary_key(&mut self) -> &mut Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    pub fn is_nullable(&self) -> bool {
        !self.not_null
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_modifiers() {
        let mut prop = Property::new("title", ScalarType::String);
        assert!(prop.is_nullable());
        assert!(!prop.is_indexed());

        prop.not_null().index();
        assert!(prop.is_not_null());
        assert!(prop.is_indexed());
        assert!(!prop.is_primary_key());
    }

    #[test]
    fn test_primary_key_is_not_null() {
        let mut prop = Property::new("id", ScalarType::Long);
        prop.primary_key().auto_increment();
        assert!(prop.is_primary_key());
        assert!(prop.is_not_null());
        assert!(prop.is_auto_increment());
    }
}
