use super::{Property, PropertyDef, ScalarType};
use crate::SchemaErr;

/// Name of the implicit identity property every entity starts with
pub const ID_PROPERTY: &str = "id";

/// A compiled table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
    pub(crate) name: String,
    pub(crate) properties: Vec<Property>,
    pub(crate) to_one: Vec<ToOne>,
    pub(crate) to_many: Vec<ToMany>,
    pub(crate) keep_sections: bool,
}

/// Locates the property backing a link: the entity that owns it and its
/// position in that entity's property list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignKey {
    pub entity: String,
    pub property: usize,
}

/// Navigation from an entity to a single target
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToOne {
    pub target: String,
    /// Accessor name; when absent the generator derives one from the target
    pub name: Option<String>,
    /// Absent for purely virtual associations
    pub foreign_key: Option<ForeignKey>,
}

/// Navigation from an entity to a collection of targets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToMany {
    pub target: String,
    pub name: String,
    pub foreign_key: ForeignKey,
}

impl Entity {
    /// An entity holding only its identity property
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>,
    {
        let mut entity = Self {
            name: name.into(),
            properties: Vec::new(),
            to_one: Vec::new(),
            to_many: Vec::new(),
            keep_sections: false,
        };
        entity.add_id_property();
        entity
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    pub fn get_to_one(&self) -> &[ToOne] {
        &self.to_one
    }

    pub fn get_to_many(&self) -> &[ToMany] {
        &self.to_many
    }

    pub fn has_keep_sections(&self) -> bool {
        self.keep_sections
    }

    pub fn set_keep_sections(&mut self, keep_sections: bool) -> &mut Self {
        self.keep_sections = keep_sections;
        self
    }

    /// Append a property and return a handle to refine it
    pub fn add_property<N>(&mut self, name: N, scalar_type: ScalarType) -> &mut Property
    where
        N: Into<String>,
    {
        let index = self.properties.len();
        self.properties.push(Property::new(name, scalar_type));
        &mut self.properties[index]
    }

    /// Like [`Entity::add_property`], also returning the position of the new property
    pub(crate) fn add_property_indexed<N>(
        &mut self,
        name: N,
        scalar_type: ScalarType,
    ) -> (usize, &mut Property)
    where
        N: Into<String>,
    {
        let index = self.properties.len();
        (index, self.add_property(name, scalar_type))
    }

    fn add_id_property(&mut self) {
        self.add_property(ID_PROPERTY, ScalarType::Long)
            .primary_key()
            .auto_increment();
    }

    /// Build a declared property: resolve its type, then apply the
    /// mandatory and indexed modifiers
    pub fn add_declared_property(&mut self, def: &PropertyDef) -> Result<&mut Property, SchemaErr> {
        let name = def
            .name
            .as_deref()
            .ok_or_else(|| SchemaErr::Malformed("property is missing `name`".to_owned()))?;
        let context = || format!("property `{name}`");
        let token = def
            .type_token
            .as_deref()
            .ok_or_else(|| SchemaErr::Malformed("missing `type`".to_owned()).context(context()))?;
        let scalar_type = ScalarType::from_token(token).map_err(|e| e.context(context()))?;
        if self.get_property(name).is_some() {
            return Err(SchemaErr::Malformed("declared more than once".to_owned()).context(context()));
        }

        let prop = self.add_property(name, scalar_type);
        if def.mandatory {
            prop.not_null();
        }
        if def.indexed {
            prop.index();
        }
        Ok(prop)
    }

    pub(crate) fn add_to_one(
        &mut self,
        target: &str,
        name: Option<String>,
        foreign_key: Option<ForeignKey>,
    ) {
        self.to_one.push(ToOne {
            target: target.to_owned(),
            name,
            foreign_key,
        });
    }

    pub(crate) fn add_to_many(&mut self, target: &str, name: String, foreign_key: ForeignKey) {
        self.to_many.push(ToMany {
            target: target.to_owned(),
            name,
            foreign_key,
        });
    }
}
