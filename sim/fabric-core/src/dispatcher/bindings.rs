use super::{boundary::KeyKind, RoutingKey};
use crate::{Capabilities, InterfaceId, ProtocolKey, SocketId};
use rustc_hash::FxHashMap;

/// The binding tables of one dispatcher.
///
/// Sockets and upper protocols map to upper gate indices; interfaces and
/// lower protocols map to lower gate indices. Bindings are only ever
/// created or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    sockets: FxHashMap<SocketId, usize>,
    interfaces: FxHashMap<InterfaceId, usize>,
    upper_protocols: FxHashMap<ProtocolKey, usize>,
    lower_protocols: FxHashMap<ProtocolKey, usize>,
}

impl Bindings {
    /// The upper gate bound to the socket.
    pub fn socket(&self, socket: SocketId) -> Option<usize> {
        self.sockets.get(&socket).copied()
    }

    /// The lower gate bound to the interface.
    pub fn interface(&self, interface: InterfaceId) -> Option<usize> {
        self.interfaces.get(&interface).copied()
    }

    /// The upper gate the protocol registered from.
    pub fn upper_protocol(&self, key: ProtocolKey) -> Option<usize> {
        self.upper_protocols.get(&key).copied()
    }

    /// The lower gate the protocol registered from.
    pub fn lower_protocol(&self, key: ProtocolKey) -> Option<usize> {
        self.lower_protocols.get(&key).copied()
    }

    /// The total number of bindings across all tables.
    pub fn len(&self) -> usize {
        self.sockets.len()
            + self.interfaces.len()
            + self.upper_protocols.len()
            + self.lower_protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(super) fn bind_socket(&mut self, socket: SocketId, index: usize) -> Option<usize> {
        self.sockets.insert(socket, index)
    }

    pub(super) fn bind_interface(&mut self, interface: InterfaceId, index: usize) -> Option<usize> {
        self.interfaces.insert(interface, index)
    }

    pub(super) fn bind_upper_protocol(&mut self, key: ProtocolKey, index: usize) -> Option<usize> {
        self.upper_protocols.insert(key, index)
    }

    pub(super) fn bind_lower_protocol(&mut self, key: ProtocolKey, index: usize) -> Option<usize> {
        self.lower_protocols.insert(key, index)
    }

    /// Extracts the key of the given kind from `capabilities` and looks it up.
    ///
    /// Returns `None` if the message does not carry that kind of key, and
    /// the key with its binding (if any) otherwise.
    pub(super) fn lookup(
        &self,
        kind: KeyKind,
        capabilities: &Capabilities,
    ) -> Option<(RoutingKey, Option<usize>)> {
        match kind {
            KeyKind::Socket => capabilities
                .socket_id
                .map(|socket| (RoutingKey::Socket(socket), self.socket(socket))),
            KeyKind::Interface => capabilities
                .interface_id
                .map(|interface| (RoutingKey::Interface(interface), self.interface(interface))),
            KeyKind::UpperProtocol => capabilities
                .upper_protocol
                .map(|key| (RoutingKey::Protocol(key), self.upper_protocol(key))),
            KeyKind::LowerProtocol => capabilities
                .lower_protocol
                .map(|key| (RoutingKey::Protocol(key), self.lower_protocol(key))),
        }
    }
}
