//! # zether-prover: Zether statement construction and proving
//!
//! Builds the statement/witness pairs a [`ProofEngine`] consumes and asks the
//! engine for a proof.
//!
//! ## Transfer
//!
//! [`build_transfer`] moves `amount` from `sender_index` to `receiver_index`
//! inside an anonymity set `y[0..n)`. Every account in the set is updated with
//! the same randomness `r`, so the updated commitments do not reveal who sent
//! or received:
//! ```text
//! b[s] = -amount, b[t] = +amount, b[i] = 0 otherwise
//! L[i]   = y[i]^r * g^b[i]
//! R      = g^r
//! CLn[i] = CL[i] * L[i]
//! CRn[i] = CR[i] * R
//! u      = gEpoch^x                (when the epoch nonce is enabled)
//! ```
//!
//! ## Burn
//!
//! [`build_burn`] withdraws a public amount from a single account:
//! ```text
//! CLn = CL * g^-amount,  CRn = CR,  u = gEpoch^x
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zether_prover::{prove_transfer, TransferInput};
//! use zether_primitives::{ProtocolConfig, SchnorrEngine};
//!
//! let input = TransferInput {
//!     cl, cr, y,                      // current commitments and keys of the anonymity set
//!     x: sender_secret,
//!     r: transfer_randomness,
//!     sender_index: 0,
//!     receiver_index: 1,
//!     amount: 5,
//!     remaining: 5,
//!     epoch: 42,
//! };
//! let out = prove_transfer(&SchnorrEngine, &input, &ProtocolConfig::default())?;
//! // out.statement goes on the wire next to out.proof_bytes
//! ```

pub mod anonset;
pub mod request;

pub use anonset::{build_anonymity_set, AnonymitySet};

use ark_ff::Zero;
use log::debug;
use thiserror::Error;

use zether_primitives::{
    burn_params, generator, zether_params, Account, BurnStatement, BurnWitness, CodecError,
    Commitment, ConfigError, Delta, EngineError, EpochBinding, Point, ProofEngine, ProtocolConfig,
    Scalar, TransferStatement, TransferWitness,
};

#[derive(Debug, Error)]
pub enum ProverError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("malformed input: {0}")]
    Malformed(&'static str),
    #[error("invalid request: {0}")]
    Request(String),
    #[error("invalid index: sender {sender}, receiver {receiver}, anonymity set size {size}")]
    InvalidIndex { sender: usize, receiver: usize, size: usize },
    #[error("amount {amount} out of range, maximum is {max}")]
    AmountOutOfRange { amount: u64, max: u64 },
    #[error("anonymity set size {size} is not a power of two")]
    AnonymitySetSize { size: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("proof engine failure: {0}")]
    Engine(EngineError),
}

fn check_amount(amount: u64, config: &ProtocolConfig) -> Result<(), ProverError> {
    if amount > config.max_amount {
        return Err(ProverError::AmountOutOfRange { amount, max: config.max_amount });
    }
    Ok(())
}

fn epoch_binding(epoch: u64, x: &Scalar, config: &ProtocolConfig) -> Option<EpochBinding> {
    config.epoch_nonce.then(|| EpochBinding::derive(epoch, x))
}

/// Per-account balance changes of a transfer: `-amount` at the sender,
/// `+amount` at the receiver, zero elsewhere. The entries always sum to zero.
///
/// Panics if `sender` or `receiver` is not below `n`.
pub fn balance_deltas(n: usize, sender: usize, receiver: usize, amount: u64) -> Vec<Scalar> {
    let mut b = vec![Scalar::zero(); n];
    let amount = Scalar::from(amount);
    b[sender] = -amount;
    b[receiver] = amount;
    b
}

/// Commitments a prover has to use in `epoch`, with pending transfers folded
/// into any account that has not rolled over yet.
pub fn effective_commitments(accounts: &[Account], epoch: u64) -> (Vec<Point>, Vec<Point>) {
    accounts
        .iter()
        .map(|account| {
            let c = account.effective_balance(epoch);
            (c.left, c.right)
        })
        .unzip()
}

// ========================= Transfer =========================

#[derive(Clone)]
pub struct TransferInput {
    /// Current left commitment halves of the anonymity set.
    pub cl: Vec<Point>,
    /// Current right commitment halves of the anonymity set.
    pub cr: Vec<Point>,
    /// Anonymity set public keys; order fixes the indices.
    pub y: Vec<Point>,
    /// Sender secret key.
    pub x: Scalar,
    /// Transfer randomness, shared by every account update.
    pub r: Scalar,
    pub sender_index: usize,
    pub receiver_index: usize,
    pub amount: u64,
    /// Sender balance left after the transfer.
    pub remaining: u64,
    pub epoch: u64,
}

#[derive(Clone, Debug)]
pub struct TransferOutput {
    pub statement: TransferStatement,
    pub witness: TransferWitness,
}

#[derive(Clone, Debug)]
pub struct TransferProofOutput {
    pub statement: TransferStatement,
    pub proof_bytes: Vec<u8>,
}

/// Build the statement and witness for a transfer inside an anonymity set.
///
/// # Arguments
/// * `inp` - commitments and keys of the anonymity set plus the sender's secrets
/// * `config` - amount limit and epoch nonce switch
///
/// # Returns
/// * `TransferOutput` with the statement every account update is folded into
///
/// # Errors
/// * `ProverError::Malformed` - empty anonymity set or vectors of different lengths
/// * `ProverError::InvalidIndex` - an index outside `0..n`, or sender equal to receiver
/// * `ProverError::AmountOutOfRange` - amount or remaining balance above `config.max_amount`
pub fn build_transfer(
    inp: &TransferInput,
    config: &ProtocolConfig,
) -> Result<TransferOutput, ProverError> {
    config.validate()?;
    let n = inp.y.len();
    if n == 0 {
        return Err(ProverError::Malformed("anonymity set is empty"));
    }
    if inp.cl.len() != n || inp.cr.len() != n {
        return Err(ProverError::Malformed("CL, CR and y must have the same length"));
    }
    let (s, t) = (inp.sender_index, inp.receiver_index);
    if s >= n || t >= n || s == t {
        return Err(ProverError::InvalidIndex { sender: s, receiver: t, size: n });
    }
    check_amount(inp.amount, config)?;
    check_amount(inp.remaining, config)?;

    let b = balance_deltas(n, s, t, inp.amount);
    let mut l = Vec::with_capacity(n);
    let mut cl_new = Vec::with_capacity(n);
    let mut cr_new = Vec::with_capacity(n);
    for i in 0..n {
        let delta = Delta::new(&b[i], &inp.r, &inp.y[i]);
        let updated = Commitment::new(inp.cl[i], inp.cr[i]).apply(&delta);
        l.push(delta.left);
        cl_new.push(updated.left);
        cr_new.push(updated.right);
    }

    let statement = TransferStatement {
        cl_new,
        cr_new,
        l,
        r: generator() * inp.r,
        y: inp.y.clone(),
        epoch: epoch_binding(inp.epoch, &inp.x, config),
    };
    debug!(
        "built transfer statement: n = {n}, epoch nonce {}",
        statement.epoch.is_some()
    );
    let witness = TransferWitness {
        x: inp.x,
        r: inp.r,
        b_transfer: inp.amount,
        b_diff: inp.remaining,
        sender_index: s,
        receiver_index: t,
    };
    Ok(TransferOutput { statement, witness })
}

/// Build a transfer statement and prove it with `engine` over the transfer parameters.
///
/// # Errors
/// Everything [`build_transfer`] reports, plus `ProverError::Engine` when the
/// engine fails; engine failures are passed through unchanged.
pub fn prove_transfer<E: ProofEngine + ?Sized>(
    engine: &E,
    inp: &TransferInput,
    config: &ProtocolConfig,
) -> Result<TransferProofOutput, ProverError> {
    let TransferOutput { statement, witness } = build_transfer(inp, config)?;
    let proof_bytes = engine
        .prove_transfer(zether_params(), &statement, &witness)
        .map_err(ProverError::Engine)?;
    debug!("transfer proof: {} bytes", proof_bytes.len());
    Ok(TransferProofOutput { statement, proof_bytes })
}

// ========================= Burn =========================

#[derive(Clone)]
pub struct BurnInput {
    pub cl: Point,
    pub cr: Point,
    pub y: Point,
    pub x: Scalar,
    /// Amount withdrawn into the public balance.
    pub amount: u64,
    /// Balance left after the burn.
    pub remaining: u64,
    pub epoch: u64,
}

#[derive(Clone, Debug)]
pub struct BurnOutput {
    pub statement: BurnStatement,
    pub witness: BurnWitness,
}

#[derive(Clone, Debug)]
pub struct BurnProofOutput {
    pub statement: BurnStatement,
    pub proof_bytes: Vec<u8>,
}

/// Build the statement and witness for burning `amount` from a single account.
///
/// # Errors
/// * `ProverError::AmountOutOfRange` - amount or remaining balance above `config.max_amount`
pub fn build_burn(inp: &BurnInput, config: &ProtocolConfig) -> Result<BurnOutput, ProverError> {
    config.validate()?;
    check_amount(inp.amount, config)?;
    check_amount(inp.remaining, config)?;

    let updated =
        Commitment::new(inp.cl, inp.cr).apply(&Delta::plain(&-Scalar::from(inp.amount)));
    let statement = BurnStatement {
        cl_new: updated.left,
        cr_new: updated.right,
        y: inp.y,
        b_transfer: inp.amount,
        epoch: epoch_binding(inp.epoch, &inp.x, config),
    };
    debug!("built burn statement: amount {}", inp.amount);
    Ok(BurnOutput { statement, witness: BurnWitness { x: inp.x, b_diff: inp.remaining } })
}

pub fn prove_burn<E: ProofEngine + ?Sized>(
    engine: &E,
    inp: &BurnInput,
    config: &ProtocolConfig,
) -> Result<BurnProofOutput, ProverError> {
    let BurnOutput { statement, witness } = build_burn(inp, config)?;
    let proof_bytes = engine
        .prove_burn(burn_params(), &statement, &witness)
        .map_err(ProverError::Engine)?;
    Ok(BurnProofOutput { statement, proof_bytes })
}
