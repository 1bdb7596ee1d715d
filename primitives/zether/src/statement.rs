//! Statements (public) and witnesses (private) handed to a proof engine.

use core::fmt;

use crate::epoch::EpochBinding;
use crate::error::CodecError;
use crate::group::{Point, Scalar};

/// Public side of an anonymous transfer over an anonymity set of size `n`.
///
/// All vectors are indexed by the same account index `0..n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferStatement {
    /// Updated left commitment halves.
    pub cl_new: Vec<Point>,
    /// Updated right commitment halves.
    pub cr_new: Vec<Point>,
    /// Per-account left deltas `y_i^r * g^b_i`.
    pub l: Vec<Point>,
    /// Shared right delta `g^r`.
    pub r: Point,
    /// Anonymity set public keys.
    pub y: Vec<Point>,
    /// `None` in the legacy form without an epoch nonce.
    pub epoch: Option<EpochBinding>,
}

impl TransferStatement {
    /// Anonymity set size.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Structural check: every vector has the same non-zero length.
    pub fn validate(&self) -> Result<(), CodecError> {
        let n = self.y.len();
        if n == 0 {
            return Err(CodecError::malformed("anonymity set is empty"));
        }
        if self.cl_new.len() != n || self.cr_new.len() != n || self.l.len() != n {
            return Err(CodecError::MalformedInput(format!(
                "statement vectors disagree: CLn {} CRn {} L {} y {n}",
                self.cl_new.len(),
                self.cr_new.len(),
                self.l.len()
            )));
        }
        Ok(())
    }
}

/// Private side of a transfer.
#[derive(Clone, PartialEq, Eq)]
pub struct TransferWitness {
    /// Sender secret key.
    pub x: Scalar,
    /// Transfer randomness shared by every account's update.
    pub r: Scalar,
    pub b_transfer: u64,
    /// Sender balance remaining after the transfer.
    pub b_diff: u64,
    pub sender_index: usize,
    pub receiver_index: usize,
}

impl fmt::Debug for TransferWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferWitness")
            .field("sender_index", &self.sender_index)
            .field("receiver_index", &self.receiver_index)
            .finish_non_exhaustive()
    }
}

/// Public side of a burn (withdrawal of a public amount).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnStatement {
    pub cl_new: Point,
    pub cr_new: Point,
    pub y: Point,
    pub b_transfer: u64,
    pub epoch: Option<EpochBinding>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct BurnWitness {
    pub x: Scalar,
    pub b_diff: u64,
}

impl fmt::Debug for BurnWitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BurnWitness").finish_non_exhaustive()
    }
}
