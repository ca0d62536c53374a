use super::basic::packets;
use crate::{Capture, Sim, SimError};
use fabric_core::{
    control::NetworkControlInfo, protocol::builtin, DispatchError, Gate, Layer, Packet,
    ProtocolKey, ProtocolRegistry, RegisterProtocol, RoutingKey, TransportToNetwork,
};

/// Sends data through a dispatcher that has not learned where it goes.
///
/// The run stops at the first message with an unknown destination and
/// nothing queued behind it is delivered. Once the network protocol has
/// registered, the same data goes through.
pub fn unknown_destination() -> Result<(), SimError> {
    let registry = ProtocolRegistry::with_builtins();
    let mut sim = Sim::new();
    let dispatcher = sim.add(TransportToNetwork::new(2, 1));
    let tcp = sim.add(Capture::new("tcp"));
    let udp = sim.add(Capture::new("udp"));
    let ipv4 = sim.add(Capture::new("ipv4"));
    sim.link((tcp, Gate::lower(0)), (dispatcher, Gate::upper(0)));
    sim.link((udp, Gate::lower(0)), (dispatcher, Gate::upper(1)));
    sim.link((ipv4, Gate::upper(0)), (dispatcher, Gate::lower(0)));

    let segment = || {
        Packet::new("segment", &b"lost"[..])
            .with_control(NetworkControlInfo::new(builtin::IPV4, builtin::UDP))
    };
    sim.send(udp, Gate::lower(0), segment().into())?;
    sim.send(udp, Gate::lower(0), segment().into())?;

    let expected = RoutingKey::Protocol(ProtocolKey::network(builtin::IPV4));
    match sim.run() {
        Err(SimError::Dispatch {
            source: DispatchError::UnknownDestination { key: Some(key), .. },
            ..
        }) if key == expected => {}
        other => panic!("expected an unknown destination for {expected}, got {other:?}"),
    }
    assert_eq!(sim.pending(), 0);
    assert!(packets(&sim, ipv4).is_empty());

    let ipv4_protocol = registry.get(builtin::IPV4)?;
    let ip = RegisterProtocol::new(Layer::Network, &ipv4_protocol);
    sim.send(ipv4, Gate::upper(0), ip.into())?;
    sim.send(udp, Gate::lower(0), segment().into())?;
    sim.run()?;
    assert_eq!(packets(&sim, ipv4), ["segment"]);

    tracing::info!("unknown destination simulation complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn unknown_destination() {
        super::unknown_destination().unwrap()
    }
}
