//! The [`Dispatcher`] and supporting types.
//!
//! A dispatcher has two sides. Each side is an array of gates, one per
//! attached layer, and a layer is known to the dispatcher only by the index
//! of the gate it is attached to. Messages from the upper side are sent
//! down and messages from the lower side are sent up, choosing the gate by
//! looking up the keys of the message's control info in the binding
//! tables. Registration commands fill those tables.
//!
//! ```
//! use fabric_core::{
//!     protocol::builtin, Capabilities, Gate, Layer, Message, Packet, ProtocolKey,
//!     ProtocolRegistry, RegisterProtocol, TransportToNetwork,
//! };
//!
//! let registry = ProtocolRegistry::with_builtins();
//! let ipv4 = registry.get(builtin::IPV4).unwrap();
//!
//! // Two transport protocols above, one network protocol below.
//! let mut dispatcher = TransportToNetwork::new(2, 1);
//!
//! // IPv4 registers on lower gate 0 and both transports hear about it.
//! let announced = dispatcher
//!     .handle(Gate::lower(0), RegisterProtocol::new(Layer::Network, &ipv4).into())
//!     .unwrap();
//! assert_eq!(announced.len(), 2);
//!
//! // Data naming IPv4 now goes down to lower gate 0.
//! let packet = Packet::new("segment", &b"..."[..])
//!     .with_control(Capabilities::new().with_lower_protocol(ProtocolKey::network(builtin::IPV4)));
//! let sent = dispatcher.handle(Gate::upper(1), packet.into()).unwrap();
//! assert_eq!(sent[0].gate, Gate::lower(0));
//! ```

use crate::{
    logging::{binding_event, broadcast_event, forward_event, rejected_event},
    InterfaceId, Message, ProtocolKey, RegisterInterface, RegisterProtocol, SocketId,
};
use std::{
    fmt::{self, Display},
    marker::PhantomData,
};
use thiserror::Error as ThisError;

pub mod boundary;
use boundary::{Boundary, KeyKind, Registration};

mod bindings;
pub use bindings::Bindings;


/// One side of a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Upper,
    Lower,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Upper => Side::Lower,
            Side::Lower => Side::Upper,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Upper => f.write_str("upper"),
            Side::Lower => f.write_str("lower"),
        }
    }
}

/// A gate of a dispatcher: a side and an index into that side's array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gate {
    pub side: Side,
    pub index: usize,
}

impl Gate {
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }

    pub const fn upper(index: usize) -> Self {
        Self::new(Side::Upper, index)
    }

    pub const fn lower(index: usize) -> Self {
        Self::new(Side::Lower, index)
    }
}

impl Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.side, self.index)
    }
}

/// A message leaving a dispatcher through a gate.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub gate: Gate,
    pub message: Message,
}

/// A key under which a binding can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingKey {
    Socket(SocketId),
    Interface(InterfaceId),
    Protocol(ProtocolKey),
}

impl Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingKey::Socket(socket) => write!(f, "socket {socket}"),
            RoutingKey::Interface(interface) => write!(f, "interface {interface}"),
            RoutingKey::Protocol(key) => write!(f, "protocol {key}"),
        }
    }
}

/// Whether a dispatcher has learned anything yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// No bindings exist; every data message fails.
    Unconfigured,
    /// At least one binding exists.
    Configured,
}

/// Forwards messages between an upper and a lower set of layers.
///
/// The [`Boundary`] parameter fixes the routing policy; see the
/// [`boundary`] module for the four available boundaries and their type
/// aliases.
#[derive(Debug, Clone)]
pub struct Dispatcher<B> {
    upper_gates: usize,
    lower_gates: usize,
    bindings: Bindings,
    boundary: PhantomData<B>,
}

impl<B: Boundary> Dispatcher<B> {
    /// Creates a dispatcher with the given number of gates on each side.
    pub fn new(upper_gates: usize, lower_gates: usize) -> Self {
        Self {
            upper_gates,
            lower_gates,
            bindings: Bindings::default(),
            boundary: PhantomData,
        }
    }

    /// The name of this kind of dispatcher.
    pub fn name(&self) -> &'static str {
        B::NAME
    }

    /// The number of gates on the given side.
    pub fn gates(&self, side: Side) -> usize {
        match side {
            Side::Upper => self.upper_gates,
            Side::Lower => self.lower_gates,
        }
    }

    /// The binding tables learned so far.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn state(&self) -> DispatcherState {
        if self.bindings.is_empty() {
            DispatcherState::Unconfigured
        } else {
            DispatcherState::Configured
        }
    }

    /// Handles one message that arrived on the given gate.
    ///
    /// On success, returns the deliveries to perform, in order. On failure
    /// the message is consumed and the binding tables are left untouched.
    pub fn handle(
        &mut self,
        arrival: Gate,
        message: Message,
    ) -> Result<Vec<Delivery>, DispatchError> {
        let result = if arrival.index >= self.gates(arrival.side) {
            Err(DispatchError::UnconnectedGate(arrival))
        } else {
            match arrival.side {
                Side::Upper => self.from_upper(arrival.index, message),
                Side::Lower => self.from_lower(arrival.index, message),
            }
        };
        if let Err(e) = &result {
            rejected_event(B::NAME, e);
        }
        result
    }

    fn from_upper(
        &mut self,
        index: usize,
        message: Message,
    ) -> Result<Vec<Delivery>, DispatchError> {
        match message {
            Message::Data(_) => {
                let out = self.resolve(B::DOWNWARD, &message)?;
                Ok(vec![self.forward(Gate::lower(out), message)])
            }
            Message::RegisterProtocol(command) => {
                self.register_protocol(Side::Upper, index, command, B::UPPER_PROTOCOL)
            }
            // Interfaces only register from below. From above the command is
            // forwarded like any other.
            Message::RegisterInterface(_) | Message::Other(_) => {
                // The destination is resolved before the socket is learned
                // so that a failing command leaves no binding behind.
                let out = self.resolve(B::DOWNWARD, &message)?;
                if let Some(socket) = message.capabilities().socket_id {
                    let previous = self.bindings.bind_socket(socket, index);
                    binding_event(
                        B::NAME,
                        RoutingKey::Socket(socket),
                        self.gate_name(Gate::upper(index)),
                        previous,
                    );
                }
                Ok(vec![self.forward(Gate::lower(out), message)])
            }
        }
    }

    fn from_lower(
        &mut self,
        index: usize,
        message: Message,
    ) -> Result<Vec<Delivery>, DispatchError> {
        match message {
            Message::Data(_) => {
                let out = self.resolve(B::UPWARD, &message)?;
                Ok(vec![self.forward(Gate::upper(out), message)])
            }
            Message::RegisterProtocol(command) => {
                self.register_protocol(Side::Lower, index, command, B::LOWER_PROTOCOL)
            }
            Message::RegisterInterface(command) => {
                self.register_interface(index, command, B::LOWER_INTERFACE)
            }
            Message::Other(_) => Err(unknown_message(&message, Side::Lower)),
        }
    }

    /// Finds the gate index for `message` using the first key in `order`
    /// that the message carries.
    fn resolve(&self, order: &[KeyKind], message: &Message) -> Result<usize, DispatchError> {
        let capabilities = message.capabilities();
        let (key, index) = order
            .iter()
            .find_map(|&kind| self.bindings.lookup(kind, &capabilities))
            .ok_or_else(|| unknown_destination(None, message))?;
        index.ok_or_else(|| unknown_destination(Some(key), message))
    }

    fn register_protocol(
        &mut self,
        side: Side,
        index: usize,
        command: RegisterProtocol,
        policy: Registration,
    ) -> Result<Vec<Delivery>, DispatchError> {
        if policy == Registration::Reject {
            return Err(unknown_message(&command.into(), side));
        }
        if policy.records() {
            let key = command.key();
            let previous = match side {
                Side::Upper => self.bindings.bind_upper_protocol(key, index),
                Side::Lower => self.bindings.bind_lower_protocol(key, index),
            };
            binding_event(
                B::NAME,
                RoutingKey::Protocol(key),
                self.gate_name(Gate::new(side, index)),
                previous,
            );
        }
        Ok(self.announce(side.opposite(), command.into(), policy))
    }

    fn register_interface(
        &mut self,
        index: usize,
        command: RegisterInterface,
        policy: Registration,
    ) -> Result<Vec<Delivery>, DispatchError> {
        if policy == Registration::Reject {
            return Err(unknown_message(&command.into(), Side::Lower));
        }
        if policy.records() {
            let interface = command.interface();
            let previous = self.bindings.bind_interface(interface, index);
            binding_event(
                B::NAME,
                RoutingKey::Interface(interface),
                self.gate_name(Gate::lower(index)),
                previous,
            );
        }
        Ok(self.announce(Side::Upper, command.into(), policy))
    }

    /// Duplicates a registration to every gate of `side` if the policy asks
    /// for it. The command itself is consumed either way.
    fn announce(&self, side: Side, message: Message, policy: Registration) -> Vec<Delivery> {
        if !policy.broadcasts() {
            return Vec::new();
        }
        let count = self.gates(side);
        broadcast_event(B::NAME, message.name(), self.side_name(side), count);
        (0..count)
            .map(|index| Delivery {
                gate: Gate::new(side, index),
                message: message.clone(),
            })
            .collect()
    }

    fn forward(&self, gate: Gate, message: Message) -> Delivery {
        let control = message.control().map_or("none", |control| control.name());
        forward_event(B::NAME, message.name(), control, self.gate_name(gate));
        Delivery { gate, message }
    }

    fn side_name(&self, side: Side) -> &'static str {
        match side {
            Side::Upper => B::UPPER,
            Side::Lower => B::LOWER,
        }
    }

    fn gate_name(&self, gate: Gate) -> String {
        format!("{}Out[{}]", self.side_name(gate.side), gate.index)
    }
}

fn unknown_destination(key: Option<RoutingKey>, message: &Message) -> DispatchError {
    DispatchError::UnknownDestination {
        key,
        message: message.name().to_owned(),
    }
}

fn unknown_message(message: &Message, side: Side) -> DispatchError {
    DispatchError::UnknownMessage {
        message: message.name().to_owned(),
        side,
    }
}

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("No destination for message `{message}`: {}", describe_key(.key))]
    UnknownDestination {
        key: Option<RoutingKey>,
        message: String,
    },
    #[error("Unknown message `{message}` from the {side} side")]
    UnknownMessage { message: String, side: Side },
    #[error("Message arrived on unconnected gate {0}")]
    UnconnectedGate(Gate),
}

impl DispatchError {
    /// The key that failed to resolve, if the error is about a destination
    /// and the message carried any key at all.
    pub fn key(&self) -> Option<RoutingKey> {
        match self {
            DispatchError::UnknownDestination { key, .. } => *key,
            _ => None,
        }
    }
}

fn describe_key(key: &Option<RoutingKey>) -> String {
    match key {
        Some(key) => format!("unknown {key}"),
        None => "no routing key".to_owned(),
    }
}
