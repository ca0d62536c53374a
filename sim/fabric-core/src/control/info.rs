use super::{ControlInfo, InterfaceId, SocketId};
use crate::{ProtocolId, ProtocolKey};

/// Attached by applications to what they hand a transport protocol, and by
/// transport protocols to what they deliver to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportControlInfo {
    pub socket_id: Option<SocketId>,
    pub transport_protocol: ProtocolId,
}

impl TransportControlInfo {
    pub fn new(socket_id: SocketId, transport_protocol: ProtocolId) -> Self {
        Self {
            socket_id: Some(socket_id),
            transport_protocol,
        }
    }
}

impl ControlInfo for TransportControlInfo {
    fn name(&self) -> &str {
        "transport control info"
    }

    fn socket_id(&self) -> Option<SocketId> {
        self.socket_id
    }

    fn lower_protocol(&self) -> Option<ProtocolKey> {
        Some(ProtocolKey::transport(self.transport_protocol))
    }
}

/// Exchanged between transport and network protocols.
///
/// Going down it names the network protocol to use; coming up it names the
/// transport protocol carried in the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkControlInfo {
    pub network_protocol: ProtocolId,
    pub transport_protocol: ProtocolId,
    pub interface_id: Option<InterfaceId>,
    pub socket_id: Option<SocketId>,
}

impl NetworkControlInfo {
    pub fn new(network_protocol: ProtocolId, transport_protocol: ProtocolId) -> Self {
        Self {
            network_protocol,
            transport_protocol,
            interface_id: None,
            socket_id: None,
        }
    }

    pub fn with_interface(mut self, interface: InterfaceId) -> Self {
        self.interface_id = Some(interface);
        self
    }

    pub fn with_socket(mut self, socket: SocketId) -> Self {
        self.socket_id = Some(socket);
        self
    }
}

impl ControlInfo for NetworkControlInfo {
    fn name(&self) -> &str {
        "network control info"
    }

    fn socket_id(&self) -> Option<SocketId> {
        self.socket_id
    }

    fn interface_id(&self) -> Option<InterfaceId> {
        self.interface_id
    }

    fn upper_protocol(&self) -> Option<ProtocolKey> {
        Some(ProtocolKey::transport(self.transport_protocol))
    }

    fn lower_protocol(&self) -> Option<ProtocolKey> {
        Some(ProtocolKey::network(self.network_protocol))
    }
}

/// Exchanged between network protocols and network interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkControlInfo {
    pub interface_id: InterfaceId,
    pub network_protocol: ProtocolId,
}

impl LinkControlInfo {
    pub fn new(interface_id: InterfaceId, network_protocol: ProtocolId) -> Self {
        Self {
            interface_id,
            network_protocol,
        }
    }
}

impl ControlInfo for LinkControlInfo {
    fn name(&self) -> &str {
        "link control info"
    }

    fn interface_id(&self) -> Option<InterfaceId> {
        Some(self.interface_id)
    }

    fn upper_protocol(&self) -> Option<ProtocolKey> {
        Some(ProtocolKey::network(self.network_protocol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{protocol::builtin, Capabilities};

    #[test]
    fn network_info_names_both_directions() {
        let info = NetworkControlInfo::new(builtin::IPV4, builtin::UDP);
        let capabilities = Capabilities::inspect(Some(&info));
        assert_eq!(
            capabilities.lower_protocol,
            Some(ProtocolKey::network(builtin::IPV4))
        );
        assert_eq!(
            capabilities.upper_protocol,
            Some(ProtocolKey::transport(builtin::UDP))
        );
        assert_eq!(capabilities.socket_id, None);
    }

    #[test]
    fn link_info_always_carries_an_interface() {
        let info = LinkControlInfo::new(InterfaceId(4), builtin::IPV6);
        let capabilities = Capabilities::inspect(Some(&info));
        assert_eq!(capabilities.interface_id, Some(InterfaceId(4)));
        assert_eq!(capabilities.lower_protocol, None);
    }
}
