//! Public generator parameters.
//!
//! Two parameter sets exist per process: one sized for transfers and one for
//! burns. They are derived on first use and never change afterwards.

use std::sync::OnceLock;

use log::debug;

use crate::group::{hash_to_point, u64_word, Point};

/// Vector generator count used by transfer proofs.
pub const TRANSFER_PARAMS_SIZE: usize = 64;
/// Vector generator count used by burn proofs.
pub const BURN_PARAMS_SIZE: usize = 32;
/// Largest balance or amount the protocol can represent (32-bit range).
pub const MAX_AMOUNT: u64 = (1 << 32) - 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorParams {
    size: usize,
    g: Point,
    h: Point,
    gs: Vec<Point>,
    hs: Vec<Point>,
}

impl GeneratorParams {
    /// Derive `size` pairs of vector generators plus the fixed `g`/`h` bases.
    pub fn generate(size: usize) -> Self {
        let gs = (0..size)
            .map(|i| hash_to_point(&[b"G", &u64_word(i as u64)]))
            .collect();
        let hs = (0..size)
            .map(|i| hash_to_point(&[b"H", &u64_word(i as u64)]))
            .collect();
        Self {
            size,
            g: generator(),
            h: blinding_generator(),
            gs,
            hs,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Amount generator `g`.
    pub fn g(&self) -> &Point {
        &self.g
    }

    /// Pedersen blinding base `h`.
    pub fn h(&self) -> &Point {
        &self.h
    }

    pub fn gs(&self) -> &[Point] {
        &self.gs
    }

    pub fn hs(&self) -> &[Point] {
        &self.hs
    }
}

static G: OnceLock<Point> = OnceLock::new();
static H: OnceLock<Point> = OnceLock::new();
static TRANSFER_PARAMS: OnceLock<GeneratorParams> = OnceLock::new();
static BURN_PARAMS: OnceLock<GeneratorParams> = OnceLock::new();

/// The amount generator `g = map_into(keccak256("G"))`.
pub fn generator() -> Point {
    *G.get_or_init(|| hash_to_point(&[b"G"]))
}

/// The blinding base `h = map_into(keccak256("V"))`.
pub fn blinding_generator() -> Point {
    *H.get_or_init(|| hash_to_point(&[b"V"]))
}

/// Parameters used by transfer proofs.
pub fn zether_params() -> &'static GeneratorParams {
    TRANSFER_PARAMS.get_or_init(|| {
        debug!("deriving transfer params, size {TRANSFER_PARAMS_SIZE}");
        GeneratorParams::generate(TRANSFER_PARAMS_SIZE)
    })
}

/// Parameters used by burn proofs.
pub fn burn_params() -> &'static GeneratorParams {
    BURN_PARAMS.get_or_init(|| {
        debug!("deriving burn params, size {BURN_PARAMS_SIZE}");
        GeneratorParams::generate(BURN_PARAMS_SIZE)
    })
}
