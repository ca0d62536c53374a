//! The layer-dispatch fabric of a simulated protocol stack.
//!
//! Protocol layers in a stack rarely know, ahead of time, who sits above or
//! below them. The fabric sits between two sets of layers and forwards
//! packets and control messages from one side to the other. Layers announce
//! themselves to the dispatcher they are attached to by sending
//! registration commands, and packets carry lightweight [control
//! info](control) that the dispatcher inspects to pick a destination.
//!
//! # Organization
//! - [`ProtocolRegistry`] assigns every named protocol a stable numeric id
//! - [`ControlInfo`] and [`Capabilities`] describe the routing context a
//!   message carries
//! - [`Message`] is the closed set of things that travel through a
//!   dispatcher: data, the two registration commands, and other commands
//! - [`Dispatcher`] maintains the binding tables and forwards messages; the
//!   [`boundary`](dispatcher::boundary) module specializes it for the
//!   application/transport, transport/network and network/link boundaries
//!
//! # Processing model
//!
//! A dispatcher handles one message at a time, to completion. It never
//! sends anything itself: [`Dispatcher::handle`] returns the
//! [`Delivery`]s that the surrounding scheduler should perform, in order.
//! Every failure is a wiring defect and is returned as a
//! [`DispatchError`] without touching the binding tables.

use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

mod logging;

pub mod protocol;
pub use protocol::{Protocol, ProtocolRegistry, RegistryError};

mod protocol_id;
pub use protocol_id::{Layer, LayerError, ProtocolId, ProtocolKey};

pub mod control;
pub use control::{Capabilities, ControlInfo, InterfaceId, SocketId};

pub mod message;
pub use message::{Command, Message, Packet, RegisterInterface, RegisterProtocol};

pub mod dispatcher;
pub use dispatcher::{
    boundary::{
        ApplicationToTransport, NetworkToLink, PacketDispatcher, TransportToNetwork,
    },
    Delivery, DispatchError, Dispatcher, DispatcherState, Gate, RoutingKey, Side,
};

/// A [`DashMap`] using the Fx hashing algorithm.
pub type FxDashMap<K, V> = DashMap<K, V, BuildHasherDefault<FxHasher>>;
