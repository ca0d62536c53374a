//! The messages that travel through a dispatcher.
//!
//! What a message *is* decides how a dispatcher treats it, so the kind is
//! fixed when the message is built: data packets, the two registration
//! commands, and every other command (for example a socket being opened).

use crate::{
    control::{Capabilities, ControlInfo},
    InterfaceId, Layer, Protocol, ProtocolKey,
};
use bytes::Bytes;
use std::sync::Arc;

/// A message arriving at or leaving a dispatcher.
#[derive(Debug, Clone)]
pub enum Message {
    /// Data on its way through the stack.
    Data(Packet),
    /// A protocol announcing itself to the dispatcher.
    RegisterProtocol(RegisterProtocol),
    /// A network interface announcing itself to the dispatcher.
    RegisterInterface(RegisterInterface),
    /// Any other command.
    Other(Command),
}

impl Message {
    /// A human-readable name for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Message::Data(packet) => &packet.name,
            Message::RegisterProtocol(_) => "register protocol",
            Message::RegisterInterface(_) => "register interface",
            Message::Other(command) => &command.name,
        }
    }

    /// The attached control info, if any.
    pub fn control(&self) -> Option<&dyn ControlInfo> {
        match self {
            Message::Data(packet) => packet.control(),
            Message::RegisterProtocol(command) => command.control(),
            Message::RegisterInterface(command) => command.control(),
            Message::Other(command) => command.control(),
        }
    }

    /// Inspects the capabilities of the attached control info.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::inspect(self.control())
    }
}

impl From<Packet> for Message {
    fn from(packet: Packet) -> Self {
        Message::Data(packet)
    }
}

impl From<RegisterProtocol> for Message {
    fn from(command: RegisterProtocol) -> Self {
        Message::RegisterProtocol(command)
    }
}

impl From<RegisterInterface> for Message {
    fn from(command: RegisterInterface) -> Self {
        Message::RegisterInterface(command)
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message::Other(command)
    }
}

/// A data packet. Dispatchers never look at the payload.
#[derive(Debug, Clone)]
pub struct Packet {
    pub name: String,
    pub payload: Bytes,
    control: Option<Arc<dyn ControlInfo>>,
}

impl Packet {
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
            control: None,
        }
    }

    /// Attaches a control info, replacing any previous one.
    pub fn with_control(mut self, control: impl ControlInfo) -> Self {
        self.control = Some(Arc::new(control));
        self
    }

    pub fn control(&self) -> Option<&dyn ControlInfo> {
        self.control.as_deref()
    }
}

/// A command that is neither data nor a registration.
#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    control: Option<Arc<dyn ControlInfo>>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            control: None,
        }
    }

    pub fn with_control(mut self, control: impl ControlInfo) -> Self {
        self.control = Some(Arc::new(control));
        self
    }

    pub fn control(&self) -> Option<&dyn ControlInfo> {
        self.control.as_deref()
    }
}

/// Announces that a protocol is reachable through the gate the command
/// arrives on.
#[derive(Debug, Clone)]
pub struct RegisterProtocol {
    key: ProtocolKey,
    control: Option<Arc<dyn ControlInfo>>,
}

impl RegisterProtocol {
    pub fn new(layer: Layer, protocol: &Protocol) -> Self {
        Self::from_key(ProtocolKey::new(layer, protocol.id()))
    }

    pub fn from_key(key: ProtocolKey) -> Self {
        Self { key, control: None }
    }

    pub fn with_control(mut self, control: impl ControlInfo) -> Self {
        self.control = Some(Arc::new(control));
        self
    }

    pub fn key(&self) -> ProtocolKey {
        self.key
    }

    pub fn control(&self) -> Option<&dyn ControlInfo> {
        self.control.as_deref()
    }
}

/// Announces that an interface is reachable through the gate the command
/// arrives on.
///
/// Only the lower side of a dispatcher registers interfaces. Coming from
/// above, the command is forwarded like any other command.
#[derive(Debug, Clone)]
pub struct RegisterInterface {
    interface: InterfaceId,
    control: Option<Arc<dyn ControlInfo>>,
}

impl RegisterInterface {
    pub fn new(interface: InterfaceId) -> Self {
        Self {
            interface,
            control: None,
        }
    }

    pub fn with_control(mut self, control: impl ControlInfo) -> Self {
        self.control = Some(Arc::new(control));
        self
    }

    pub fn interface(&self) -> InterfaceId {
        self.interface
    }

    pub fn control(&self) -> Option<&dyn ControlInfo> {
        self.control.as_deref()
    }
}
