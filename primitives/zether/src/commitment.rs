//! Account model: ElGamal-style balance commitments and their homomorphic updates.
//!
//! ```text
//! CL = g^b * y^r
//! CR = g^r
//! ```
//! The owner of `x` (with `y = g^x`) recovers `g^b = CL - x*CR`.

use core::ops::{Add, AddAssign};

use ark_ff::Zero;

use crate::group::{Point, Scalar};
use crate::params::generator;

/// A `(CL, CR)` balance commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commitment {
    pub left: Point,
    pub right: Point,
}

impl Commitment {
    pub fn new(left: Point, right: Point) -> Self {
        Self { left, right }
    }

    /// Commitment to a zero balance with zero randomness (both halves are the identity).
    pub fn zero() -> Self {
        Self { left: Point::zero(), right: Point::zero() }
    }

    pub fn commit(balance: &Scalar, randomness: &Scalar, pubkey: &Point) -> Self {
        let g = generator();
        Self { left: g * balance + *pubkey * randomness, right: g * randomness }
    }

    pub fn apply(&self, delta: &Delta) -> Self {
        Self { left: self.left + delta.left, right: self.right + delta.right }
    }
}

impl Add for Commitment {
    type Output = Commitment;

    fn add(self, rhs: Commitment) -> Commitment {
        Commitment { left: self.left + rhs.left, right: self.right + rhs.right }
    }
}

impl AddAssign for Commitment {
    fn add_assign(&mut self, rhs: Commitment) {
        self.left += rhs.left;
        self.right += rhs.right;
    }
}

/// Additive change to a commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delta {
    pub left: Point,
    pub right: Point,
}

impl Delta {
    /// `(g^amount * pubkey^randomness, g^randomness)`.
    pub fn new(amount: &Scalar, randomness: &Scalar, pubkey: &Point) -> Self {
        let g = generator();
        Self { left: g * amount + *pubkey * randomness, right: g * randomness }
    }

    /// `(g^amount, identity)`: a public amount with no randomness.
    pub fn plain(amount: &Scalar) -> Self {
        Self { left: generator() * amount, right: Point::zero() }
    }
}

/// `(CL + g^delta * pubkey^randomness, CR + g^randomness)`.
pub fn apply_delta(
    commitment: &Commitment,
    delta_amount: &Scalar,
    randomness: &Scalar,
    pubkey: &Point,
) -> Commitment {
    commitment.apply(&Delta::new(delta_amount, randomness, pubkey))
}

/// Recovers the committed balance by searching `g^b` for `b` in `0..=max`.
///
/// Returns `None` when the balance is outside the range. A wrong `x` is not
/// detected: it shifts the exponent by `r(x - x')`, which can land inside the
/// range. Check `y == g^x` (see [`Keypair::owns`](crate::keys::Keypair::owns)) first.
pub fn read_balance(commitment: &Commitment, x: &Scalar, max: u64) -> Option<u64> {
    let target = commitment.left - commitment.right * x;
    let g = generator();
    let mut acc = Point::zero();
    for b in 0..=max {
        if acc == target {
            return Some(b);
        }
        acc += g;
    }
    None
}

/// On-chain view of one account: spendable balance plus incoming transfers
/// that have not yet been folded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    pub available: Commitment,
    pub pending: Commitment,
    pub last_roll_over: u64,
}

impl Account {
    pub fn new(available: Commitment, epoch: u64) -> Self {
        Self { available, pending: Commitment::zero(), last_roll_over: epoch }
    }

    /// Credits an incoming delta to the pending commitment.
    pub fn credit(&mut self, delta: &Delta) {
        self.pending = self.pending.apply(delta);
    }

    /// Folds `pending` into `available` the first time the account is touched in `epoch`.
    ///
    /// Returns `true` when a roll-over happened.
    pub fn roll_over(&mut self, epoch: u64) -> bool {
        if self.last_roll_over >= epoch {
            return false;
        }
        self.available += self.pending;
        self.pending = Commitment::zero();
        self.last_roll_over = epoch;
        true
    }

    /// The commitment a prover must use in `epoch`: `available + pending` if a
    /// roll-over is due, `available` otherwise.
    pub fn effective_balance(&self, epoch: u64) -> Commitment {
        if self.last_roll_over < epoch {
            self.available + self.pending
        } else {
            self.available
        }
    }
}
