use fabric_core::{
    protocol::builtin, Layer, ProtocolId, ProtocolKey, ProtocolRegistry, RegisterProtocol,
    RegistryError,
};
use std::{sync::Arc, thread};

#[test]
fn shared_registry_hands_out_unique_ids() {
    let registry = ProtocolRegistry::with_builtins().shared();
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..8)
                    .map(|i| registry.register(format!("custom-{n}-{i}"), None).id())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u32> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .map(ProtocolId::into_inner)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (10..42).collect::<Vec<_>>());
    assert_eq!(registry.len(), 42);
}

#[test]
fn registration_requires_a_known_protocol() -> anyhow::Result<()> {
    let registry = ProtocolRegistry::with_builtins();
    let udp = registry.get(builtin::UDP)?;
    assert_eq!(
        RegisterProtocol::new(Layer::Transport, &udp).key(),
        ProtocolKey::transport(builtin::UDP)
    );

    let error = registry.get(ProtocolId::new(64)).unwrap_err();
    assert_eq!(error, RegistryError::UnknownProtocol(ProtocolId::new(64)));
    assert_eq!(error.to_string(), "Unknown protocol id: 64");
    Ok(())
}

#[test]
fn builtin_names() {
    let registry = ProtocolRegistry::with_builtins();
    let names: Vec<String> = registry.iter().map(|p| p.to_string()).collect();
    assert_eq!(
        names,
        [
            "arp", "ethernet", "icmp/4", "icmp/6", "igmp", "ip/4", "ip/6", "tcp", "udp",
            "ieee80211"
        ]
    );
}
