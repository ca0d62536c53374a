//! The layer boundaries a [`Dispatcher`] can sit at.
//!
//! All dispatchers share one implementation. A [`Boundary`] decides what
//! differs between them: the names of the two sides, which keys are
//! consulted in which order, and what happens to each kind of registration.
//!
//! | boundary | downward keys | upward keys |
//! |---|---|---|
//! | [`UpperLower`] | interface, lower protocol | socket, upper protocol |
//! | [`ApplicationTransport`] | lower protocol | socket |
//! | [`TransportNetwork`] | lower protocol | socket, upper protocol |
//! | [`NetworkLink`] | interface | socket, upper protocol |

use super::Dispatcher;

/// A routing key a dispatcher may consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// The socket id, looked up among sockets bound to upper gates.
    Socket,
    /// The interface id, looked up among interfaces bound to lower gates.
    Interface,
    /// The upper protocol key, looked up among protocols registered from
    /// above.
    UpperProtocol,
    /// The lower protocol key, looked up among protocols registered from
    /// below.
    LowerProtocol,
}

/// What a dispatcher does with a registration command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The command is not expected here and fails the message.
    Reject,
    /// The command is consumed and has no effect.
    Discard,
    /// The binding is recorded.
    Record,
    /// A copy of the command goes to every gate on the opposite side.
    Broadcast,
    /// The binding is recorded, then the command is broadcast.
    RecordAndBroadcast,
}

impl Registration {
    pub fn records(self) -> bool {
        matches!(self, Self::Record | Self::RecordAndBroadcast)
    }

    pub fn broadcasts(self) -> bool {
        matches!(self, Self::Broadcast | Self::RecordAndBroadcast)
    }
}

/// The routing policy of one layer boundary.
///
/// A register-interface command coming from the upper side is not a
/// registration. It is forwarded down like any other command.
pub trait Boundary {
    /// The name used in diagnostics.
    const NAME: &'static str;
    /// The name of the layers above the dispatcher.
    const UPPER: &'static str;
    /// The name of the layers below the dispatcher.
    const LOWER: &'static str;
    /// The keys tried, in order, for messages going down.
    const DOWNWARD: &'static [KeyKind];
    /// The keys tried, in order, for data going up.
    const UPWARD: &'static [KeyKind];
    /// Register-protocol commands arriving from above.
    const UPPER_PROTOCOL: Registration;
    /// Register-protocol commands arriving from below.
    const LOWER_PROTOCOL: Registration;
    /// Register-interface commands arriving from below.
    const LOWER_INTERFACE: Registration;
}

/// Connects any set of upper protocols to any set of lower protocols.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpperLower;

impl Boundary for UpperLower {
    const NAME: &'static str = "PacketDispatcher";
    const UPPER: &'static str = "upperLayer";
    const LOWER: &'static str = "lowerLayer";
    const DOWNWARD: &'static [KeyKind] = &[KeyKind::Interface, KeyKind::LowerProtocol];
    const UPWARD: &'static [KeyKind] = &[KeyKind::Socket, KeyKind::UpperProtocol];
    const UPPER_PROTOCOL: Registration = Registration::RecordAndBroadcast;
    const LOWER_PROTOCOL: Registration = Registration::RecordAndBroadcast;
    const LOWER_INTERFACE: Registration = Registration::RecordAndBroadcast;
}

/// Connects applications to transport protocols.
///
/// Applications bind their sockets by sending a command (for example an
/// open) carrying the socket id and the transport protocol to use. Transport
/// protocols register themselves and address applications by socket only.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationTransport;

impl Boundary for ApplicationTransport {
    const NAME: &'static str = "ApplicationToTransport";
    const UPPER: &'static str = "application";
    const LOWER: &'static str = "transport";
    const DOWNWARD: &'static [KeyKind] = &[KeyKind::LowerProtocol];
    const UPWARD: &'static [KeyKind] = &[KeyKind::Socket];
    const UPPER_PROTOCOL: Registration = Registration::Reject;
    const LOWER_PROTOCOL: Registration = Registration::Record;
    const LOWER_INTERFACE: Registration = Registration::Discard;
}

/// Connects transport protocols to network protocols.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportNetwork;

impl Boundary for TransportNetwork {
    const NAME: &'static str = "TransportToNetwork";
    const UPPER: &'static str = "transport";
    const LOWER: &'static str = "network";
    const DOWNWARD: &'static [KeyKind] = &[KeyKind::LowerProtocol];
    const UPWARD: &'static [KeyKind] = &[KeyKind::Socket, KeyKind::UpperProtocol];
    const UPPER_PROTOCOL: Registration = Registration::RecordAndBroadcast;
    const LOWER_PROTOCOL: Registration = Registration::RecordAndBroadcast;
    const LOWER_INTERFACE: Registration = Registration::Broadcast;
}

/// Connects network protocols to network interfaces.
///
/// Everything going down must name its interface. Protocols registering
/// from above are announced to every interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkLink;

impl Boundary for NetworkLink {
    const NAME: &'static str = "NetworkToLink";
    const UPPER: &'static str = "network";
    const LOWER: &'static str = "if";
    const DOWNWARD: &'static [KeyKind] = &[KeyKind::Interface];
    const UPWARD: &'static [KeyKind] = &[KeyKind::Socket, KeyKind::UpperProtocol];
    const UPPER_PROTOCOL: Registration = Registration::RecordAndBroadcast;
    const LOWER_PROTOCOL: Registration = Registration::Reject;
    const LOWER_INTERFACE: Registration = Registration::RecordAndBroadcast;
}

pub type PacketDispatcher = Dispatcher<UpperLower>;
pub type ApplicationToTransport = Dispatcher<ApplicationTransport>;
pub type TransportToNetwork = Dispatcher<TransportNetwork>;
pub type NetworkToLink = Dispatcher<NetworkLink>;
