use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::hint::black_box;
use zether_primitives::codec::{
    encode_abi_packed_burn_verification, encode_abi_packed_transfer_verification,
};
use zether_primitives::{generator, Commitment, Keypair, ProtocolConfig, Scalar, SchnorrEngine};
use zether_prover::{prove_burn, prove_transfer, BurnInput, TransferInput};
use zether_verifier::ZetherVerifier;

const SELECTOR: [u8; 4] = [0u8; 4];

fn transfer_calldata(n: usize) -> Vec<u8> {
    let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
    let keys: Vec<Keypair> = (0..n).map(|_| Keypair::generate(&mut rng)).collect();
    let g = generator();
    let input = TransferInput {
        cl: vec![g * Scalar::from(100u64); n],
        cr: vec![g * Scalar::from(0u64); n],
        y: keys.iter().map(|k| *k.public()).collect(),
        x: *keys[0].secret(),
        r: Scalar::from(12345u64),
        sender_index: 0,
        receiver_index: n - 1,
        amount: 40,
        remaining: 60,
        epoch: 1,
    };
    let out = prove_transfer(&SchnorrEngine, &input, &ProtocolConfig::default())
        .expect("transfer prove");
    encode_abi_packed_transfer_verification(SELECTOR, &out.statement, &out.proof_bytes)
        .expect("transfer encode")
}

fn burn_calldata() -> Vec<u8> {
    let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
    let key = Keypair::generate(&mut rng);
    let old = Commitment::commit(&Scalar::from(20u64), &Scalar::from(3u64), key.public());
    let input = BurnInput {
        cl: old.left,
        cr: old.right,
        y: *key.public(),
        x: *key.secret(),
        amount: 7,
        remaining: 13,
        epoch: 1,
    };
    let out = prove_burn(&SchnorrEngine, &input, &ProtocolConfig::default()).expect("burn prove");
    encode_abi_packed_burn_verification(SELECTOR, &out.statement, &out.proof_bytes)
        .expect("burn encode")
}

fn bench_transfer_verify(c: &mut Criterion) {
    let verifier = ZetherVerifier::new(SchnorrEngine);
    let mut g = c.benchmark_group("verify_transfer");
    g.throughput(Throughput::Elements(1));

    for n in [2usize, 8, 32] {
        let calldata = transfer_calldata(n);
        g.bench_with_input(BenchmarkId::from_parameter(n), &calldata, |b, calldata| {
            b.iter(|| {
                let ok = verifier.verify_transfer(black_box(calldata)).expect("transfer verify");
                assert!(ok);
            });
        });
    }

    g.finish();
}

fn bench_burn_verify(c: &mut Criterion) {
    let verifier = ZetherVerifier::new(SchnorrEngine);
    let calldata = burn_calldata();
    let mut g = c.benchmark_group("verify_burn");
    g.throughput(Throughput::Elements(1));

    g.bench_function(BenchmarkId::from_parameter("burn"), |b| {
        b.iter(|| {
            let ok = verifier.verify_burn(black_box(&calldata)).expect("burn verify");
            black_box(ok);
        });
    });

    g.finish();
}

criterion_group!(benches, bench_transfer_verify, bench_burn_verify);
criterion_main!(benches);
