//! Epoch nonce scheme.
//!
//! Each epoch has its own generator `gEpoch = map_into(keccak256("Zether" || uint256(epoch)))`.
//! A spender publishes `u = gEpoch^x`; since `u` is fixed for a key within an
//! epoch, two spends by the same key in the same epoch carry the same nonce.

use std::num::NonZeroU64;

use crate::group::{hash_to_point, u64_word, Point, Scalar};

pub fn epoch_generator(epoch: u64) -> Point {
    hash_to_point(&[b"Zether", &u64_word(epoch)])
}

/// `u = gEpoch^x`.
pub fn epoch_nonce(epoch: u64, x: &Scalar) -> Point {
    epoch_generator(epoch) * x
}

/// Binds a statement to one epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochBinding {
    pub epoch: u64,
    pub g_epoch: Point,
    pub u: Point,
}

impl EpochBinding {
    /// Binding a prover computes from its secret key.
    pub fn derive(epoch: u64, x: &Scalar) -> Self {
        let g_epoch = epoch_generator(epoch);
        Self { epoch, g_epoch, u: g_epoch * x }
    }

    /// Binding reconstructed from an epoch number and nonce taken off the wire.
    pub fn from_wire(epoch: u64, u: Point) -> Self {
        Self { epoch, g_epoch: epoch_generator(epoch), u }
    }
}

/// Maps wall-clock milliseconds onto epochs of fixed length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochClock {
    epoch_length_ms: NonZeroU64,
}

impl EpochClock {
    pub fn new(epoch_length_ms: NonZeroU64) -> Self {
        Self { epoch_length_ms }
    }

    pub fn epoch_length_ms(&self) -> u64 {
        self.epoch_length_ms.get()
    }

    pub fn epoch_at(&self, timestamp_ms: u64) -> u64 {
        timestamp_ms / self.epoch_length_ms.get()
    }

    /// Milliseconds until the next epoch boundary; zero exactly on a boundary.
    pub fn until_next_epoch(&self, timestamp_ms: u64) -> u64 {
        let len = self.epoch_length_ms.get();
        match timestamp_ms % len {
            0 => 0,
            rem => len - rem,
        }
    }
}
