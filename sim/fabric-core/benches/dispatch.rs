use criterion::{criterion_group, criterion_main, Criterion};
use fabric_core::{
    protocol::builtin, Capabilities, Gate, PacketDispatcher, Packet, ProtocolKey, RegisterProtocol,
};

fn criterion_benchmark(c: &mut Criterion) {
    let ip = ProtocolKey::network(builtin::IPV4);
    let mut dispatcher = PacketDispatcher::new(8, 8);
    dispatcher
        .handle(Gate::lower(3), RegisterProtocol::from_key(ip).into())
        .unwrap();
    let packet = Packet::new("bench", &b"payload"[..])
        .with_control(Capabilities::new().with_lower_protocol(ip));

    c.bench_function("forward by protocol", |b| {
        b.iter(|| dispatcher.handle(Gate::upper(0), packet.clone().into()).unwrap())
    });
    c.bench_function("broadcast registration", |b| {
        b.iter(|| {
            dispatcher
                .handle(Gate::lower(1), RegisterProtocol::from_key(ip).into())
                .unwrap()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
