use fabric::{simulations, Capture, Sim, SimError};
use fabric_core::{
    protocol::builtin, ApplicationToTransport, DispatchError, Gate, Packet, ProtocolKey,
    RegisterProtocol, Side,
};

#[test]
fn basic() -> anyhow::Result<()> {
    simulations::basic(2)?;
    Ok(())
}

#[test]
fn basic_wide() -> anyhow::Result<()> {
    simulations::basic(16)?;
    Ok(())
}

#[test]
fn generic() -> anyhow::Result<()> {
    simulations::generic(4)?;
    Ok(())
}

#[test]
fn unknown_destination() -> anyhow::Result<()> {
    simulations::unknown_destination()?;
    Ok(())
}

#[test]
fn unexpected_registration_stops_the_run() -> anyhow::Result<()> {
    let mut sim = Sim::new();
    let dispatcher = sim.add(ApplicationToTransport::new(1, 1));
    let app = sim.add(Capture::new("app"));
    sim.link((app, Gate::lower(0)), (dispatcher, Gate::upper(0)));

    let register = RegisterProtocol::from_key(ProtocolKey::transport(builtin::UDP));
    sim.send(app, Gate::lower(0), register.into())?;
    sim.send(app, Gate::lower(0), Packet::new("never", &b""[..]).into())?;

    let error = sim.run().unwrap_err();
    assert!(matches!(
        error,
        SimError::Dispatch {
            source: DispatchError::UnknownMessage {
                side: Side::Upper,
                ..
            },
            ..
        }
    ));
    assert_eq!(sim.pending(), 0);
    assert_eq!(error.dispatch_error().and_then(DispatchError::key), None);
    Ok(())
}
