//! The [`ProtocolRegistry`] and the [`Protocol`] identities it hands out.
//!
//! A registry is created once when a simulation starts, filled with the
//! protocols the stack knows about, and then shared by handle with every
//! dispatcher and layer that needs to name a protocol. Registration is
//! append-only: a protocol is never removed or changed once it has an id.
//!
//! ```
//! use fabric_core::protocol::{builtin, ProtocolRegistry};
//!
//! let registry = ProtocolRegistry::with_builtins();
//! assert_eq!(registry.get(builtin::TCP).unwrap().name(), "tcp");
//!
//! let quic = registry.register("quic", None);
//! assert_eq!(registry.find(quic.id()).as_deref(), Some(&*quic));
//! ```

use crate::{FxDashMap, ProtocolId};
use std::{
    fmt::{self, Display},
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};
use thiserror::Error as ThisError;

/// The immutable identity of a networking protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Protocol {
    id: ProtocolId,
    name: String,
    version: Option<String>,
}

impl Protocol {
    pub fn id(&self) -> ProtocolId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

/// Ids of the well-known protocols, as assigned by
/// [`ProtocolRegistry::with_builtins`].
pub mod builtin {
    use crate::ProtocolId;

    pub const ARP: ProtocolId = ProtocolId::new(0);
    pub const ETHERNET: ProtocolId = ProtocolId::new(1);
    pub const ICMPV4: ProtocolId = ProtocolId::new(2);
    pub const ICMPV6: ProtocolId = ProtocolId::new(3);
    pub const IGMP: ProtocolId = ProtocolId::new(4);
    pub const IPV4: ProtocolId = ProtocolId::new(5);
    pub const IPV6: ProtocolId = ProtocolId::new(6);
    pub const TCP: ProtocolId = ProtocolId::new(7);
    pub const UDP: ProtocolId = ProtocolId::new(8);
    pub const IEEE80211: ProtocolId = ProtocolId::new(9);

    /// Name and version of each built-in, in id order.
    pub(super) const ALL: [(&str, Option<&str>); 10] = [
        ("arp", None),
        ("ethernet", None),
        ("icmp", Some("4")),
        ("icmp", Some("6")),
        ("igmp", None),
        ("ip", Some("4")),
        ("ip", Some("6")),
        ("tcp", None),
        ("udp", None),
        ("ieee80211", None),
    ];
}

/// Assigns protocols sequential ids and looks them up by id.
#[derive(Debug, Default)]
pub struct ProtocolRegistry {
    next_id: AtomicU32,
    protocols: FxDashMap<ProtocolId, Arc<Protocol>>,
}

impl ProtocolRegistry {
    /// Creates an empty registry. The first protocol registered gets id 0.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a registry holding the well-known protocols listed in
    /// [`builtin`].
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for (name, version) in builtin::ALL {
            registry.register(name, version);
        }
        registry
    }

    /// Wraps the registry in an [`Arc`] for sharing.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Registers a protocol under the next free id and returns its handle.
    pub fn register(&self, name: impl Into<String>, version: Option<&str>) -> Arc<Protocol> {
        let id = ProtocolId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let protocol = Arc::new(Protocol {
            id,
            name: name.into(),
            version: version.map(str::to_owned),
        });
        tracing::debug!(%id, protocol = %protocol, "registered protocol");
        self.protocols.insert(id, protocol.clone());
        protocol
    }

    /// Looks up a protocol, returning `None` if no protocol has the id.
    pub fn find(&self, id: ProtocolId) -> Option<Arc<Protocol>> {
        self.protocols.get(&id).map(|entry| entry.value().clone())
    }

    /// Looks up a protocol that must exist.
    pub fn get(&self, id: ProtocolId) -> Result<Arc<Protocol>, RegistryError> {
        self.find(id).ok_or(RegistryError::UnknownProtocol(id))
    }

    /// The number of registered protocols.
    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A snapshot of every registered protocol, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = Arc<Protocol>> {
        let mut protocols: Vec<_> = self
            .protocols
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        protocols.sort_by_key(|protocol| protocol.id());
        protocols.into_iter()
    }
}

#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown protocol id: {0}")]
    UnknownProtocol(ProtocolId),
}
