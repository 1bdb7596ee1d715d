use crate::*;

use ark_ff::Zero;
use hex_literal::hex;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use zether_primitives::codec::{
    encode_abi_packed_burn_verification, encode_abi_packed_transfer_verification, encode_hex,
};
use zether_primitives::{
    generator, BurnWitness, Commitment, GeneratorParams, Keypair, Point, Scalar, SchnorrEngine,
    TransferWitness,
};
use zether_prover::{build_transfer, prove_burn, prove_transfer, BurnInput, TransferInput};

const TRANSFER_SELECTOR: [u8; 4] = hex!("2c9b7f6b");
const BURN_SELECTOR: [u8; 4] = hex!("8a8f9b53");

fn keys(n: usize) -> Vec<Keypair> {
    let mut rng = ChaCha20Rng::from_seed([21u8; 32]);
    (0..n).map(|_| Keypair::generate(&mut rng)).collect()
}

/// Two accounts holding 10 and 3 under blinding zero; account 0 sends 5 to account 1.
fn transfer_input(epoch: u64) -> TransferInput {
    let keys = keys(2);
    let g = generator();
    TransferInput {
        cl: vec![g * Scalar::from(10u64), g * Scalar::from(3u64)],
        cr: vec![Point::zero(); 2],
        y: keys.iter().map(|k| *k.public()).collect(),
        x: *keys[0].secret(),
        r: Scalar::from(0x5eedu64),
        sender_index: 0,
        receiver_index: 1,
        amount: 5,
        remaining: 5,
        epoch,
    }
}

fn burn_input() -> BurnInput {
    let keys = keys(1);
    let old = Commitment::commit(&Scalar::from(20u64), &Scalar::from(31u64), keys[0].public());
    BurnInput {
        cl: old.left,
        cr: old.right,
        y: *keys[0].public(),
        x: *keys[0].secret(),
        amount: 7,
        remaining: 13,
        epoch: 5,
    }
}

fn transfer_calldata(epoch: u64) -> Vec<u8> {
    let out = prove_transfer(&SchnorrEngine, &transfer_input(epoch), &ProtocolConfig::default())
        .expect("prove transfer");
    encode_abi_packed_transfer_verification(TRANSFER_SELECTOR, &out.statement, &out.proof_bytes)
        .expect("encode transfer")
}

/// Engine whose verification always breaks.
struct FaultyEngine;

impl ProofEngine for FaultyEngine {
    fn prove_transfer(
        &self,
        _: &GeneratorParams,
        _: &TransferStatement,
        _: &TransferWitness,
    ) -> Result<Vec<u8>, EngineError> {
        Ok(Vec::new())
    }

    fn verify_transfer(
        &self,
        _: &GeneratorParams,
        _: &TransferStatement,
        _: &[u8],
    ) -> Result<(), EngineError> {
        Err(EngineError::Internal("backend unavailable".into()))
    }

    fn prove_burn(
        &self,
        _: &GeneratorParams,
        _: &BurnStatement,
        _: &BurnWitness,
    ) -> Result<Vec<u8>, EngineError> {
        Ok(Vec::new())
    }

    fn verify_burn(
        &self,
        _: &GeneratorParams,
        _: &BurnStatement,
        _: &[u8],
    ) -> Result<(), EngineError> {
        Err(EngineError::Internal("backend unavailable".into()))
    }
}

#[test]
fn two_account_transfer_verifies_end_to_end() {
    let verifier = ZetherVerifier::new(SchnorrEngine);
    let calldata = transfer_calldata(17);
    assert_eq!(verifier.verify_transfer(&calldata), Ok(true));
    assert_eq!(verifier.verify_transfer_hex(&encode_hex(&calldata)), Ok(true));
}

#[test]
fn tampered_transfer_proof_is_rejected_not_an_error() {
    let verifier = ZetherVerifier::new(SchnorrEngine);
    let mut calldata = transfer_calldata(17);
    let last = calldata.len() - 1;
    calldata[last] ^= 0x01;
    assert_eq!(verifier.verify_transfer(&calldata), Ok(false));

    // a proof of the right length filled with garbage
    let out = prove_transfer(&SchnorrEngine, &transfer_input(17), &ProtocolConfig::default())
        .expect("prove");
    let garbage = vec![0xffu8; out.proof_bytes.len()];
    let calldata =
        encode_abi_packed_transfer_verification(TRANSFER_SELECTOR, &out.statement, &garbage)
            .expect("encode");
    assert_eq!(verifier.verify_transfer(&calldata), Ok(false));
}

#[test]
fn proof_from_another_epoch_is_rejected() {
    let verifier = ZetherVerifier::new(SchnorrEngine);
    let old = prove_transfer(&SchnorrEngine, &transfer_input(1), &ProtocolConfig::default())
        .expect("prove epoch 1");
    let current = build_transfer(&transfer_input(2), &ProtocolConfig::default())
        .expect("build epoch 2");
    assert_ne!(old.statement.epoch, current.statement.epoch);

    let replayed = encode_abi_packed_transfer_verification(
        TRANSFER_SELECTOR,
        &current.statement,
        &old.proof_bytes,
    )
    .expect("encode");
    assert_eq!(verifier.verify_transfer(&replayed), Ok(false));
}

#[test]
fn truncated_transfer_calldata_is_a_decode_error() {
    let verifier = ZetherVerifier::new(SchnorrEngine);
    let calldata = transfer_calldata(17);
    // cut inside the L section
    let cut = 4 + 320 + 2 * (32 + 2 * 64) + 50;
    assert!(matches!(
        verifier.verify_transfer(&calldata[..cut]),
        Err(VerifierError::Codec(CodecError::TruncatedInput { .. }))
    ));
    assert!(matches!(
        verifier.verify_transfer_hex("0x1234zz"),
        Err(VerifierError::Codec(CodecError::MalformedInput(_)))
    ));
}

#[test]
fn bytes_appended_to_calldata_are_a_decode_error() {
    let verifier = ZetherVerifier::new(SchnorrEngine);
    let mut calldata = transfer_calldata(17);
    calldata.extend_from_slice(&[0xab; 100]);
    assert!(matches!(
        verifier.verify_transfer(&calldata),
        Err(VerifierError::Codec(CodecError::MalformedInput(_)))
    ));

    let out = prove_burn(&SchnorrEngine, &burn_input(), &ProtocolConfig::default())
        .expect("prove burn");
    let mut calldata =
        encode_abi_packed_burn_verification(BURN_SELECTOR, &out.statement, &out.proof_bytes)
            .expect("encode burn");
    calldata.push(0);
    assert!(matches!(
        verifier.verify_burn(&calldata),
        Err(VerifierError::Codec(CodecError::MalformedInput(_)))
    ));
}

#[test]
fn burn_verifies_and_binds_the_amount() {
    let verifier = ZetherVerifier::new(SchnorrEngine);
    let out = prove_burn(&SchnorrEngine, &burn_input(), &ProtocolConfig::default())
        .expect("prove burn");
    let expected = Commitment::commit(
        &Scalar::from(13u64),
        &Scalar::from(31u64),
        &out.statement.y,
    );
    assert_eq!(out.statement.cl_new, expected.left);

    let calldata =
        encode_abi_packed_burn_verification(BURN_SELECTOR, &out.statement, &out.proof_bytes)
            .expect("encode burn");
    assert_eq!(verifier.verify_burn(&calldata), Ok(true));
    assert_eq!(verifier.verify_burn_hex(&encode_hex(&calldata)), Ok(true));

    let mut altered = out.statement.clone();
    altered.b_transfer = 8;
    let calldata = encode_abi_packed_burn_verification(BURN_SELECTOR, &altered, &out.proof_bytes)
        .expect("encode altered burn");
    assert_eq!(verifier.verify_burn(&calldata), Ok(false));

    assert!(matches!(
        verifier.verify_burn(&calldata[..200]),
        Err(VerifierError::Codec(CodecError::TruncatedInput { .. }))
    ));
}

#[test]
fn engine_failure_during_verification_yields_false() {
    let verifier = ZetherVerifier::new(FaultyEngine);
    assert_eq!(verifier.verify_transfer(&transfer_calldata(3)), Ok(false));

    let out = prove_burn(&SchnorrEngine, &burn_input(), &ProtocolConfig::default())
        .expect("prove burn");
    assert!(!verifier.verify_burn_statement(&out.statement, &out.proof_bytes));
}

#[test]
fn legacy_verifier_ignores_wire_epoch() {
    let legacy = ProtocolConfig { epoch_nonce: false, ..ProtocolConfig::default() };
    let out = prove_transfer(&SchnorrEngine, &transfer_input(9), &legacy).expect("prove");
    assert!(out.statement.epoch.is_none());

    let verifier = ZetherVerifier::with_config(SchnorrEngine, legacy);
    assert!(verifier.verify_transfer_statement(&out.statement, &out.proof_bytes));

    // the calldata always carries an epoch word and nonce; a legacy verifier drops them
    let mut on_wire = out.statement.clone();
    on_wire.epoch = Some(EpochBinding::from_wire(0, Point::zero()));
    let calldata =
        encode_abi_packed_transfer_verification(TRANSFER_SELECTOR, &on_wire, &out.proof_bytes)
            .expect("encode");
    assert_eq!(verifier.verify_transfer(&calldata), Ok(true));
    assert_eq!(ZetherVerifier::new(SchnorrEngine).verify_transfer(&calldata), Ok(false));
}
