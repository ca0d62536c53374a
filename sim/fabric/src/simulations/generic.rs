use super::basic::{packets, registrations};
use crate::{Capture, Sim, SimError};
use fabric_core::{
    protocol::builtin, Capabilities, Command, Gate, InterfaceId, Packet, PacketDispatcher,
    ProtocolKey, RegisterInterface, RegisterProtocol, SocketId,
};

/// Runs a single generic dispatcher between `upper` stub layers and three
/// lower stub layers.
///
/// Checks that every registration reaches every gate on the opposite side,
/// that an interface takes priority over a protocol on the way down, and
/// that a socket bound by a command takes priority over a protocol on the
/// way up.
pub fn generic(upper: usize) -> Result<(), SimError> {
    let upper = upper.max(1);
    let mut sim = Sim::new();
    let dispatcher = sim.add(PacketDispatcher::new(upper, 3));
    let above: Vec<_> = (0..upper)
        .map(|i| sim.add(Capture::new(format!("upper{i}"))))
        .collect();
    let below: Vec<_> = (0..3)
        .map(|i| sim.add(Capture::new(format!("lower{i}"))))
        .collect();
    for (i, &layer) in above.iter().enumerate() {
        sim.link((layer, Gate::lower(0)), (dispatcher, Gate::upper(i)));
    }
    for (i, &layer) in below.iter().enumerate() {
        sim.link((layer, Gate::upper(0)), (dispatcher, Gate::lower(i)));
    }

    let ipv4 = ProtocolKey::network(builtin::IPV4);
    let ipv6 = ProtocolKey::network(builtin::IPV6);
    let udp = ProtocolKey::transport(builtin::UDP);
    let interface = InterfaceId(7);

    sim.send(below[0], Gate::upper(0), RegisterProtocol::from_key(ipv4).into())?;
    sim.send(below[1], Gate::upper(0), RegisterProtocol::from_key(ipv6).into())?;
    sim.send(below[2], Gate::upper(0), RegisterInterface::new(interface).into())?;
    sim.send(above[0], Gate::lower(0), RegisterProtocol::from_key(udp).into())?;
    let handled = sim.run()?;

    // Four commands, each handled once by the dispatcher and once per copy.
    assert_eq!(handled, 4 + 3 * upper + below.len());
    for &layer in above.iter() {
        assert_eq!(registrations(&sim, layer), 3);
    }
    for &layer in below.iter() {
        assert_eq!(registrations(&sim, layer), 1);
    }

    let last = above[upper - 1];
    let both = Capabilities::new()
        .with_interface(interface)
        .with_lower_protocol(ipv4);
    sim.send(
        last,
        Gate::lower(0),
        Packet::new("to interface 7", &b"a"[..])
            .with_control(both)
            .into(),
    )?;
    sim.send(
        above[0],
        Gate::lower(0),
        Packet::new("to ipv6", &b"b"[..])
            .with_control(Capabilities::new().with_lower_protocol(ipv6))
            .into(),
    )?;
    sim.send(
        below[1],
        Gate::upper(0),
        Packet::new("to udp", &b"c"[..])
            .with_control(Capabilities::new().with_upper_protocol(udp))
            .into(),
    )?;
    sim.run()?;
    assert_eq!(packets(&sim, below[2]), ["to interface 7"]);
    assert!(packets(&sim, below[0]).is_empty());
    assert_eq!(packets(&sim, below[1]), ["to ipv6"]);
    assert_eq!(packets(&sim, above[0]), ["to udp"]);

    let socket = Capabilities::new()
        .with_socket(SocketId(9))
        .with_lower_protocol(ipv4);
    sim.send(
        last,
        Gate::lower(0),
        Command::new("bind").with_control(socket).into(),
    )?;
    sim.run()?;
    sim.send(
        below[0],
        Gate::upper(0),
        Packet::new("to socket 9", &b"d"[..])
            .with_control(socket.with_upper_protocol(udp))
            .into(),
    )?;
    sim.run()?;
    assert_eq!(packets(&sim, last).last().map(String::as_str), Some("to socket 9"));

    tracing::info!(upper, "generic simulation complete");
    Ok(())
}
