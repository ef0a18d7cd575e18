#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value type of a scalar attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    String,
    Numeric,
    Date,
    Boolean,
}

impl AttrType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who must populate a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MandatoryType {
    /// Filled by the platform itself, never by a mapping.
    Internal,
    /// Always required from the mapping.
    External,
    /// Required when the type settings flag it.
    Customizable,
    #[default]
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Entity,
    Relationship,
}

/// Scalar attribute of a type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub attr_type: AttrType,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub mandatory: MandatoryType,
}

/// Reference from a type to other objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefDefinition {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub mandatory: MandatoryType,
}

/// One field of a type, either an attribute or a reference.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    Attribute(&'a AttributeDefinition),
    Reference(&'a RefDefinition),
}

impl<'a> Field<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Self::Attribute(def) => &def.name,
            Self::Reference(def) => &def.name,
        }
    }

    pub fn multiple(&self) -> bool {
        match self {
            Self::Attribute(def) => def.multiple,
            Self::Reference(def) => def.multiple,
        }
    }

    pub fn mandatory(&self) -> MandatoryType {
        match self {
            Self::Attribute(def) => def.mandatory,
            Self::Reference(def) => def.mandatory,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

/// Entity or relationship type as declared in the schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(skip_deserializing, default = "entity_kind")]
    pub kind: TypeKind,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub refs: Vec<RefDefinition>,
    /// Attribute names whose values make up the deterministic identity.
    #[serde(default)]
    pub id_contributors: Vec<String>,
}

fn entity_kind() -> TypeKind {
    TypeKind::Entity
}

impl TypeDefinition {
    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn reference(&self, name: &str) -> Option<&RefDefinition> {
        self.refs.iter().find(|r| r.name == name)
    }

    /// Looks the key up as an attribute first, then as a reference.
    pub fn field(&self, name: &str) -> Option<Field<'_>> {
        self.attribute(name)
            .map(Field::Attribute)
            .or_else(|| self.reference(name).map(Field::Reference))
    }

    pub fn fields(&self) -> impl Iterator<Item = Field<'_>> {
        self.attributes
            .iter()
            .map(Field::Attribute)
            .chain(self.refs.iter().map(Field::Reference))
    }
}

impl TypeDefinition {
    pub fn entity(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Entity)
    }

    pub fn relationship(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Relationship)
    }

    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            attributes: Vec::new(),
            refs: Vec::new(),
            id_contributors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        attr_type: AttrType,
        multiple: bool,
        mandatory: MandatoryType,
    ) -> Self {
        self.attributes.push(AttributeDefinition {
            name: name.into(),
            label: None,
            attr_type,
            multiple,
            mandatory,
        });
        self
    }

    #[must_use]
    pub fn with_ref(mut self, name: impl Into<String>, multiple: bool, mandatory: MandatoryType) -> Self {
        self.refs.push(RefDefinition {
            name: name.into(),
            label: None,
            multiple,
            mandatory,
        });
        self
    }

    #[must_use]
    pub fn with_id_contributors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.id_contributors = names.into_iter().map(Into::into).collect();
        self
    }
}
