use crate::{Capture, ModuleId, Sim, SimError};
use bytes::Bytes;
use fabric_core::{
    control::{LinkControlInfo, NetworkControlInfo, TransportControlInfo},
    protocol::builtin,
    ApplicationToTransport, Command, Gate, InterfaceId, Layer, NetworkToLink, Packet,
    ProtocolRegistry, RegisterInterface, RegisterProtocol, SocketId, TransportToNetwork,
};

/// Runs a basic simulation.
///
/// A full stack is built from the three specialized dispatchers:
/// `applications` applications over TCP and UDP, over IPv4, over two
/// interfaces. After every layer has registered, the last application opens
/// a UDP socket and sends a datagram out of the second interface, and a
/// reply comes back up to the same socket. Stub layers do not build headers,
/// so each hop is sent explicitly on their behalf.
pub fn basic(applications: usize) -> Result<(), SimError> {
    let applications = applications.max(1);
    let registry = ProtocolRegistry::with_builtins();
    let mut sim = Sim::new();

    let a2t = sim.add(ApplicationToTransport::new(applications, 2));
    let t2n = sim.add(TransportToNetwork::new(2, 1));
    let n2l = sim.add(NetworkToLink::new(1, 2));

    let apps: Vec<_> = (0..applications)
        .map(|i| sim.add(Capture::new(format!("app{i}"))))
        .collect();
    for (i, &app) in apps.iter().enumerate() {
        sim.link((app, Gate::lower(0)), (a2t, Gate::upper(i)));
    }

    let tcp = sim.add(Capture::new("tcp"));
    let udp = sim.add(Capture::new("udp"));
    for (i, transport) in [tcp, udp].into_iter().enumerate() {
        sim.link((transport, Gate::upper(0)), (a2t, Gate::lower(i)));
        sim.link((transport, Gate::lower(0)), (t2n, Gate::upper(i)));
    }

    let ipv4 = sim.add(Capture::new("ipv4"));
    sim.link((ipv4, Gate::upper(0)), (t2n, Gate::lower(0)));
    sim.link((ipv4, Gate::lower(0)), (n2l, Gate::upper(0)));

    let interfaces = [InterfaceId(100), InterfaceId(101)];
    let eth: Vec<_> = (0..interfaces.len())
        .map(|i| sim.add(Capture::new(format!("eth{i}"))))
        .collect();
    for (i, &link) in eth.iter().enumerate() {
        sim.link((link, Gate::upper(0)), (n2l, Gate::lower(i)));
    }

    // Registration
    for (&link, interface) in eth.iter().zip(interfaces) {
        sim.send(link, Gate::upper(0), RegisterInterface::new(interface).into())?;
    }
    let protocol = registry.get(builtin::IPV4)?;
    let ip = RegisterProtocol::new(Layer::Network, &protocol);
    sim.send(ipv4, Gate::upper(0), ip.clone().into())?;
    sim.send(ipv4, Gate::lower(0), ip.into())?;
    for (transport, id) in [(tcp, builtin::TCP), (udp, builtin::UDP)] {
        let protocol = registry.get(id)?;
        let command = RegisterProtocol::new(Layer::Transport, &protocol);
        sim.send(transport, Gate::upper(0), command.clone().into())?;
        sim.send(transport, Gate::lower(0), command.into())?;
    }
    sim.run()?;

    assert_eq!(registrations(&sim, ipv4), 4);
    for module in eth.iter().chain([&tcp, &udp]) {
        assert_eq!(registrations(&sim, *module), 1);
    }
    for &app in apps.iter() {
        assert_eq!(registrations(&sim, app), 0);
    }

    // Down
    let app = apps[applications - 1];
    let socket = SocketId(5);
    let transport_control = TransportControlInfo::new(socket, builtin::UDP);
    let network_control =
        NetworkControlInfo::new(builtin::IPV4, builtin::UDP).with_interface(interfaces[1]);
    let link_control = LinkControlInfo::new(interfaces[1], builtin::IPV4);
    let message = Bytes::from_static(b"Hello!");

    sim.send(
        app,
        Gate::lower(0),
        Command::new("open").with_control(transport_control).into(),
    )?;
    sim.send(
        app,
        Gate::lower(0),
        Packet::new("datagram", message.clone())
            .with_control(transport_control)
            .into(),
    )?;
    sim.run()?;
    assert_eq!(packets(&sim, udp), ["datagram"]);

    sim.send(
        udp,
        Gate::lower(0),
        Packet::new("segment", message.clone())
            .with_control(network_control)
            .into(),
    )?;
    sim.run()?;
    assert_eq!(packets(&sim, ipv4), ["segment"]);

    sim.send(
        ipv4,
        Gate::lower(0),
        Packet::new("frame", message).with_control(link_control).into(),
    )?;
    sim.run()?;
    assert_eq!(packets(&sim, eth[1]), ["frame"]);
    assert!(packets(&sim, eth[0]).is_empty());

    // Up
    let reply = Bytes::from_static(b"Hello back!");
    sim.send(
        eth[1],
        Gate::upper(0),
        Packet::new("frame", reply.clone())
            .with_control(link_control)
            .into(),
    )?;
    sim.send(
        ipv4,
        Gate::upper(0),
        Packet::new("segment", reply.clone())
            .with_control(network_control)
            .into(),
    )?;
    sim.send(
        udp,
        Gate::upper(0),
        Packet::new("datagram", reply.clone())
            .with_control(transport_control)
            .into(),
    )?;
    sim.run()?;

    assert_eq!(packets(&sim, ipv4), ["segment", "frame"]);
    assert_eq!(packets(&sim, udp), ["datagram", "segment"]);
    let received: Vec<_> = sim
        .module::<Capture>(app)
        .into_iter()
        .flat_map(Capture::packets)
        .map(|packet| packet.payload.clone())
        .collect();
    assert_eq!(received, [reply]);
    for &other in apps.iter().filter(|&&other| other != app) {
        assert!(packets(&sim, other).is_empty());
    }

    tracing::info!(applications, "basic simulation complete");
    Ok(())
}

/// The names of the packets a capture has received.
pub(super) fn packets(sim: &Sim, id: ModuleId) -> Vec<String> {
    sim.module::<Capture>(id)
        .into_iter()
        .flat_map(Capture::packets)
        .map(|packet| packet.name.clone())
        .collect()
}

pub(super) fn registrations(sim: &Sim, id: ModuleId) -> usize {
    sim.module::<Capture>(id)
        .map(Capture::registrations)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    #[test]
    fn basic() {
        super::basic(2).unwrap()
    }

    #[test]
    fn basic_single_application() {
        super::basic(1).unwrap()
    }
}
