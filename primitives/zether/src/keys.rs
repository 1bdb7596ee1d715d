//! Account keys and the registration signature that proves knowledge of `x`.

use core::fmt;

use rand::RngCore;

use crate::group::{
    keccak256, point_to_bytes, random_scalar, scalar_from_be_bytes, Point, Scalar, WORD_LEN,
};
use crate::params::generator;

pub const ADDRESS_LEN: usize = 20;

#[derive(Clone, PartialEq, Eq)]
pub struct Keypair {
    x: Scalar,
    y: Point,
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair").field("y", &self.y).finish_non_exhaustive()
    }
}

impl Keypair {
    pub fn generate<R: RngCore>(rng: &mut R) -> Self {
        Self::from_secret(random_scalar(rng))
    }

    pub fn from_secret(x: Scalar) -> Self {
        Self { x, y: generator() * x }
    }

    pub fn secret(&self) -> &Scalar {
        &self.x
    }

    pub fn public(&self) -> &Point {
        &self.y
    }

    /// `true` when `y` is this key's public point.
    pub fn owns(&self, y: &Point) -> bool {
        self.y == *y
    }

    /// Schnorr signature over `(address, y)` used when registering `y` on chain.
    pub fn sign_registration<R: RngCore>(
        &self,
        address: &[u8; ADDRESS_LEN],
        rng: &mut R,
    ) -> RegistrationSignature {
        let k = random_scalar(rng);
        let commitment = generator() * k;
        let c = registration_challenge(address, &self.y, &commitment);
        RegistrationSignature { c, s: c * self.x + k }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistrationSignature {
    pub c: Scalar,
    pub s: Scalar,
}

/// `keccak256(abi.encode(address, y, K)) mod q`.
fn registration_challenge(address: &[u8; ADDRESS_LEN], y: &Point, k: &Point) -> Scalar {
    let mut padded = [0u8; WORD_LEN];
    padded[WORD_LEN - ADDRESS_LEN..].copy_from_slice(address);
    scalar_from_be_bytes(&keccak256(&[&padded, &point_to_bytes(y), &point_to_bytes(k)]))
}

/// Recomputes `K = g^s * y^-c` and checks the challenge.
pub fn verify_registration(
    y: &Point,
    address: &[u8; ADDRESS_LEN],
    signature: &RegistrationSignature,
) -> bool {
    let k = generator() * signature.s - *y * signature.c;
    registration_challenge(address, y, &k) == signature.c
}
