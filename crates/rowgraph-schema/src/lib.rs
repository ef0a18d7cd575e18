//! Schema registry and the read-only collaborators the mapping engine consults.

pub mod definition;
pub mod error;
mod loader;
pub mod lookup;
pub mod registry;
pub mod settings;

pub use definition::{
    AttrType, AttributeDefinition, Field, MandatoryType, RefDefinition, TypeDefinition, TypeKind,
};
pub use error::SchemaError;
pub use lookup::{IdentityLookup, InMemoryIdentityStore, LookupError, NoIdentities, ResolvedIdentity};
pub use registry::{SchemaDocument, SchemaRegistry};
pub use settings::{AttributeSetting, DefaultValueProvider, StaticDefaults, TypeSettings};
