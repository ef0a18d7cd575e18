//! Identity lookup: resolves opaque identifiers of stored objects.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use rowgraph_model::{ObjectRef, StandardId};

/// Minimal record of an already stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub id: String,
    pub standard_id: StandardId,
    pub entity_type: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ResolvedIdentity {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef::new(self.standard_id.clone()).with_type(self.entity_type.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("failed to read identity store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse identity store {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("identity lookup unavailable: {0}")]
    Unavailable(String),
}

/// Resolves identifiers into stored identities.
///
/// Unknown identifiers are simply absent from the returned map.
pub trait IdentityLookup: Send + Sync {
    fn find_by_ids(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<BTreeMap<String, ResolvedIdentity>, LookupError>> + Send;
}

/// Identity store held in memory, matched by `id` or `standard_id`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    by_key: BTreeMap<String, ResolvedIdentity>,
}

impl InMemoryIdentityStore {
    pub fn new<I>(identities: I) -> Self
    where
        I: IntoIterator<Item = ResolvedIdentity>,
    {
        let mut by_key = BTreeMap::new();
        for identity in identities {
            by_key.insert(identity.standard_id.as_str().to_string(), identity.clone());
            by_key.insert(identity.id.clone(), identity);
        }
        Self { by_key }
    }

    /// Loads a JSON array of identities.
    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let contents = std::fs::read_to_string(path).map_err(|e| LookupError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let identities: Vec<ResolvedIdentity> =
            serde_json::from_str(&contents).map_err(|e| LookupError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Self::new(identities))
    }

    pub fn get(&self, key: &str) -> Option<&ResolvedIdentity> {
        self.by_key.get(key)
    }
}

impl IdentityLookup for InMemoryIdentityStore {
    async fn find_by_ids(
        &self,
        ids: &[String],
    ) -> Result<BTreeMap<String, ResolvedIdentity>, LookupError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.by_key.get(id).map(|found| (id.clone(), found.clone())))
            .collect())
    }
}

/// Lookup that knows no stored objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdentities;

impl IdentityLookup for NoIdentities {
    async fn find_by_ids(
        &self,
        _ids: &[String],
    ) -> Result<BTreeMap<String, ResolvedIdentity>, LookupError> {
        Ok(BTreeMap::new())
    }
}
