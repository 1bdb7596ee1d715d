//! Fiat-Shamir transcript helpers over merlin.

use ark_ff::PrimeField;
use merlin::Transcript;

use crate::epoch::EpochBinding;
use crate::group::{point_to_bytes, Point, Scalar};

pub mod labels {
    pub const PROTOCOL: &[u8] = b"zether/v1";
    pub const DOMAIN: &[u8] = b"dom";
    pub const TRANSFER: &[u8] = b"transfer";
    pub const BURN: &[u8] = b"burn";
    pub const SIZE: &[u8] = b"n";
    pub const INDEX: &[u8] = b"idx";
    pub const AMOUNT: &[u8] = b"amount";
    pub const CL: &[u8] = b"CL";
    pub const CR: &[u8] = b"CR";
    pub const L: &[u8] = b"L";
    pub const R: &[u8] = b"R";
    pub const Y: &[u8] = b"y";
    pub const EPOCH: &[u8] = b"epoch";
    pub const G_EPOCH: &[u8] = b"gEpoch";
    pub const U: &[u8] = b"u";
    pub const NO_EPOCH: &[u8] = b"no-epoch";
    pub const COMMIT: &[u8] = b"A";
    pub const CHALLENGE: &[u8] = b"c";
}

pub fn new_transcript(domain: &'static [u8]) -> Transcript {
    let mut t = Transcript::new(labels::PROTOCOL);
    t.append_message(labels::DOMAIN, domain);
    t
}

pub fn append_point(t: &mut Transcript, label: &'static [u8], p: &Point) {
    t.append_message(label, &point_to_bytes(p));
}

pub fn append_points(t: &mut Transcript, label: &'static [u8], points: &[Point]) {
    t.append_u64(labels::SIZE, points.len() as u64);
    for p in points {
        append_point(t, label, p);
    }
}

/// Absorbs the epoch binding, or a marker for the legacy form without one.
pub fn append_epoch(t: &mut Transcript, epoch: Option<&EpochBinding>) {
    match epoch {
        Some(binding) => {
            t.append_u64(labels::EPOCH, binding.epoch);
            append_point(t, labels::G_EPOCH, &binding.g_epoch);
            append_point(t, labels::U, &binding.u);
        }
        None => t.append_message(labels::NO_EPOCH, &[]),
    }
}

/// Squeezes 64 bytes and reduces them to a scalar.
pub fn challenge_scalar(t: &mut Transcript, label: &'static [u8]) -> Scalar {
    let mut buf = [0u8; 64];
    t.challenge_bytes(label, &mut buf);
    Scalar::from_le_bytes_mod_order(&buf)
}
