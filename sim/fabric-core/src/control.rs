//! Sideband routing metadata attached to messages.
//!
//! A protocol attaches a control info to the packets and commands it sends
//! to describe where they come from: the socket that produced them, the
//! interface they should leave through, or the protocol that should
//! receive them. Different protocols attach different control infos, so a
//! dispatcher does not look at concrete types. It inspects the four
//! capabilities of the [`ControlInfo`] trait once, when the message
//! arrives, and works with the resulting [`Capabilities`].

use crate::ProtocolKey;
use std::fmt::{self, Debug, Display};

mod info;
pub use info::{LinkControlInfo, NetworkControlInfo, TransportControlInfo};

/// Identifies an application socket across the whole stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SocketId(pub i32);

impl Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a network interface of the simulated host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceId(pub i32);

impl Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The read-only routing capabilities a control info may expose.
///
/// Every method defaults to `None`, so implementors only override the
/// capabilities they actually carry.
pub trait ControlInfo: Debug + Send + Sync + 'static {
    /// A short name for diagnostics.
    fn name(&self) -> &str {
        "control info"
    }

    /// The socket that produced or should receive the message.
    fn socket_id(&self) -> Option<SocketId> {
        None
    }

    /// The interface the message arrived on or should leave through.
    fn interface_id(&self) -> Option<InterfaceId> {
        None
    }

    /// The protocol above the dispatcher that should receive the message.
    fn upper_protocol(&self) -> Option<ProtocolKey> {
        None
    }

    /// The protocol below the dispatcher that should receive the message.
    fn lower_protocol(&self) -> Option<ProtocolKey> {
        None
    }
}

/// The capabilities of a control info, resolved once.
///
/// `Capabilities` is also a [`ControlInfo`] in its own right, which makes it
/// a convenient catch-all control info for layers with no richer metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub socket_id: Option<SocketId>,
    pub interface_id: Option<InterfaceId>,
    pub upper_protocol: Option<ProtocolKey>,
    pub lower_protocol: Option<ProtocolKey>,
}

impl Capabilities {
    /// Creates an empty set of capabilities.
    pub fn new() -> Self {
        Default::default()
    }

    /// Inspects every capability of `control`. A message without a control
    /// info has no capabilities.
    pub fn inspect(control: Option<&dyn ControlInfo>) -> Self {
        match control {
            Some(control) => Self {
                socket_id: control.socket_id(),
                interface_id: control.interface_id(),
                upper_protocol: control.upper_protocol(),
                lower_protocol: control.lower_protocol(),
            },
            None => Self::new(),
        }
    }

    pub fn with_socket(mut self, socket: SocketId) -> Self {
        self.socket_id = Some(socket);
        self
    }

    pub fn with_interface(mut self, interface: InterfaceId) -> Self {
        self.interface_id = Some(interface);
        self
    }

    pub fn with_upper_protocol(mut self, key: ProtocolKey) -> Self {
        self.upper_protocol = Some(key);
        self
    }

    pub fn with_lower_protocol(mut self, key: ProtocolKey) -> Self {
        self.lower_protocol = Some(key);
        self
    }

    /// Whether no capability is present at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }
}

impl ControlInfo for Capabilities {
    fn name(&self) -> &str {
        "capabilities"
    }

    fn socket_id(&self) -> Option<SocketId> {
        self.socket_id
    }

    fn interface_id(&self) -> Option<InterfaceId> {
        self.interface_id
    }

    fn upper_protocol(&self) -> Option<ProtocolKey> {
        self.upper_protocol
    }

    fn lower_protocol(&self) -> Option<ProtocolKey> {
        self.lower_protocol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::builtin;

    #[derive(Debug)]
    struct SocketOnly;

    impl ControlInfo for SocketOnly {
        fn socket_id(&self) -> Option<SocketId> {
            Some(SocketId(9))
        }
    }

    #[test]
    fn inspect_uses_defaults_for_missing_capabilities() {
        let capabilities = Capabilities::inspect(Some(&SocketOnly));
        assert_eq!(capabilities, Capabilities::new().with_socket(SocketId(9)));
        assert!(Capabilities::inspect(None).is_empty());
    }

    #[test]
    fn capabilities_inspect_to_themselves() {
        let capabilities = Capabilities::new()
            .with_interface(InterfaceId(2))
            .with_lower_protocol(ProtocolKey::link(builtin::ETHERNET));
        assert_eq!(Capabilities::inspect(Some(&capabilities)), capabilities);
        assert!(!capabilities.is_empty());
    }
}
