//! Cache identities and their namespaces.

use std::fmt;

/// Prefix shared by every cache namespace.
pub const NAMESPACE_PREFIX: &str = "ECSCache";

/// Identifies one persisted cache.
///
/// Snapshots from different chains, worlds, or schema versions never share
/// storage: each identity maps to its own namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheIdentity {
    /// Chain the events come from.
    pub chain_id: u64,
    /// Address of the world contract.
    pub world_address: String,
    /// Schema version of the cached data.
    pub version: u32,
}

impl CacheIdentity {
    /// Creates an identity.
    #[must_use]
    pub fn new(chain_id: u64, world_address: impl Into<String>, version: u32) -> Self {
        Self {
            chain_id,
            world_address: world_address.into(),
            version,
        }
    }

    /// Returns the backend namespace, `ECSCache-{chain}-{world}-v{version}`.
    #[must_use]
    pub fn namespace(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NAMESPACE_PREFIX}-{}-{}-v{}",
            self.chain_id, self.world_address, self.version
        )
    }
}
