//! bn128 (alt_bn128 / BN254) G1 helpers.
//!
//! Wire forms:
//! ```text
//! Scalar: 32-byte big-endian, reduced mod q
//! Point:  x(32) || y(32), big-endian base-field coordinates; identity = 64 zero bytes
//! ```

use ark_bn254::{Fq, Fr, G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInt, BigInteger, Field, One, PrimeField, Zero};
use rand::RngCore;
use sha3::{Digest, Keccak256};

use crate::error::CodecError;

pub type Scalar = Fr;
pub type Point = G1Projective;

pub const SCALAR_LEN: usize = 32;
pub const POINT_LEN: usize = 64;
pub const WORD_LEN: usize = 32;

/// Keccak-256 over the concatenation of `parts`.
pub fn keccak256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Big-endian `uint256` word holding `value`.
pub fn u64_word(value: u64) -> [u8; WORD_LEN] {
    let mut word = [0u8; WORD_LEN];
    word[WORD_LEN - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Reads a big-endian unsigned integer that must fit in a `u64`.
pub fn be_bytes_to_u64(bytes: &[u8]) -> Option<u64> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > 8 {
        return None;
    }
    let mut buf = [0u8; 8];
    buf[8 - significant.len()..].copy_from_slice(significant);
    Some(u64::from_be_bytes(buf))
}

pub fn scalar_to_bytes(s: &Scalar) -> [u8; SCALAR_LEN] {
    let mut out = [0u8; SCALAR_LEN];
    out.copy_from_slice(&s.into_bigint().to_bytes_be());
    out
}

/// Interprets `bytes` as a big-endian unsigned integer and reduces it mod q.
pub fn scalar_from_be_bytes(bytes: &[u8]) -> Scalar {
    Scalar::from_be_bytes_mod_order(bytes)
}

/// Returns the scalar as a `u64` when its canonical value fits.
pub fn scalar_to_u64(s: &Scalar) -> Option<u64> {
    let limbs = s.into_bigint().0;
    if limbs[1..].iter().all(|l| *l == 0) {
        Some(limbs[0])
    } else {
        None
    }
}

/// Generate a random scalar from 512 bits of entropy, reduced mod q.
pub fn random_scalar<R: RngCore>(rng: &mut R) -> Scalar {
    let mut bytes = [0u8; 64];
    rng.fill_bytes(&mut bytes);
    Scalar::from_le_bytes_mod_order(&bytes)
}

fn fq_from_be_canonical(bytes: &[u8]) -> Option<Fq> {
    let mut limbs = [0u64; 4];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let mut limb = [0u8; 8];
        limb.copy_from_slice(chunk);
        limbs[3 - i] = u64::from_be_bytes(limb);
    }
    // from_bigint refuses values >= p
    Fq::from_bigint(BigInt::new(limbs))
}

pub fn point_to_bytes(p: &Point) -> [u8; POINT_LEN] {
    let mut out = [0u8; POINT_LEN];
    let affine = p.into_affine();
    if affine.infinity {
        return out;
    }
    out[..32].copy_from_slice(&affine.x.into_bigint().to_bytes_be());
    out[32..].copy_from_slice(&affine.y.into_bigint().to_bytes_be());
    out
}

/// Decodes a 64-byte point, checking coordinate range, curve and subgroup membership.
pub fn point_from_bytes(bytes: &[u8]) -> Result<Point, CodecError> {
    if bytes.len() != POINT_LEN {
        return Err(CodecError::MalformedInput(format!(
            "point must be {POINT_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    if bytes.iter().all(|b| *b == 0) {
        return Ok(Point::zero());
    }
    let x = fq_from_be_canonical(&bytes[..32])
        .ok_or_else(|| CodecError::malformed("point x coordinate is not below the field modulus"))?;
    let y = fq_from_be_canonical(&bytes[32..])
        .ok_or_else(|| CodecError::malformed("point y coordinate is not below the field modulus"))?;
    let affine = G1Affine::new_unchecked(x, y);
    if !affine.is_on_curve() {
        return Err(CodecError::malformed("point is not on the curve"));
    }
    if !affine.is_in_correct_subgroup_assuming_on_curve() {
        return Err(CodecError::malformed("point is not in the prime-order subgroup"));
    }
    Ok(affine.into_group())
}

fn sqrt_exponent() -> BigInt<4> {
    // (p + 1) / 4, valid since p = 3 mod 4
    let mut exponent = Fq::MODULUS;
    let _carry = exponent.add_with_carry(&BigInt::from(1u64));
    exponent.div2();
    exponent.div2();
    exponent
}

/// Deterministically maps a 32-byte seed onto G1 by try-and-increment on `y^2 = x^3 + 3`.
pub fn map_into(seed: &[u8; 32]) -> Point {
    let exponent = sqrt_exponent();
    let b = Fq::from(3u64);
    let mut x = Fq::from_be_bytes_mod_order(seed);
    loop {
        let y_squared = x.square() * x + b;
        let y = y_squared.pow(exponent);
        if y.square() == y_squared {
            return G1Affine::new_unchecked(x, y).into_group();
        }
        x += Fq::one();
    }
}

/// `map_into(keccak256(parts...))`.
pub fn hash_to_point(parts: &[&[u8]]) -> Point {
    map_into(&keccak256(parts))
}
