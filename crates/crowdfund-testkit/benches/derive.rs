//! Benchmarks for address derivation and record encoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crowdfund_core::{
    decode_campaign, derive_address, encode_campaign, Address, Campaign, Namespace,
};

fn bench_derive(c: &mut Criterion) {
    let program_id = Address::from_bytes([0x11; 32]);
    let owner = Address::from_bytes([0x22; 32]);

    c.bench_function("derive/campaign_state", |b| {
        b.iter(|| derive_address(black_box(&program_id), Namespace::CampaignState, black_box(&owner)))
    });

    c.bench_function("derive/receiving_account", |b| {
        b.iter(|| {
            derive_address(black_box(&program_id), Namespace::ReceivingAccount, black_box(&owner))
        })
    });
}

fn bench_codec(c: &mut Criterion) {
    let campaign = Campaign::new(
        Address::from_bytes([1; 32]),
        "d".repeat(200),
        1_000,
        Address::from_bytes([2; 32]),
        Address::from_bytes([3; 32]),
        255,
    )
    .unwrap();
    let bytes = encode_campaign(&campaign).unwrap();

    c.bench_function("codec/encode", |b| b.iter(|| encode_campaign(black_box(&campaign))));
    c.bench_function("codec/decode", |b| b.iter(|| decode_campaign(black_box(&bytes))));
}

criterion_group!(benches, bench_derive, bench_codec);
criterion_main!(benches);
