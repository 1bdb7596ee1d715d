//! # zether-verifier
//!
//! Verification path for Zether transfers and burns: calldata is decoded into
//! a statement plus proof bytes, then handed to a [`ProofEngine`].
//!
//! Outcomes are kept in two classes:
//! - `Err(VerifierError::Codec(_))` when the calldata cannot be decoded; this is
//!   decided before any proof checking happens.
//! - `Ok(false)` when the engine rejects the proof (a well-formed but invalid
//!   proof is an expected outcome, not an error).

#[cfg(test)]
mod tests;

use log::{debug, warn};
use thiserror::Error;

use zether_primitives::codec::{
    decode_abi_packed_burn_verification, decode_abi_packed_transfer_verification, decode_hex,
};
use zether_primitives::{
    burn_params, zether_params, BurnStatement, CodecError, EngineError, EpochBinding,
    ProofEngine, ProtocolConfig, TransferStatement,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifierError {
    #[error(transparent)]
    Codec(#[from] CodecError),
}

fn accepted(kind: &str, outcome: Result<(), EngineError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(EngineError::Rejected(reason)) => {
            warn!("{kind} proof rejected: {reason}");
            false
        }
        Err(EngineError::Internal(reason)) => {
            warn!("{kind} verification failed inside the proof engine: {reason}");
            false
        }
    }
}

pub struct ZetherVerifier<E> {
    engine: E,
    config: ProtocolConfig,
}

impl<E: ProofEngine> ZetherVerifier<E> {
    pub fn new(engine: E) -> Self {
        Self { engine, config: ProtocolConfig::default() }
    }

    pub fn with_config(engine: E, config: ProtocolConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Drops the wire epoch binding when the epoch nonce is switched off.
    fn apply_epoch_policy(&self, epoch: &mut Option<EpochBinding>) {
        if !self.config.epoch_nonce {
            *epoch = None;
        }
    }

    /// Verify an already decoded transfer statement.
    pub fn verify_transfer_statement(&self, statement: &TransferStatement, proof: &[u8]) -> bool {
        accepted("transfer", self.engine.verify_transfer(zether_params(), statement, proof))
    }

    pub fn verify_burn_statement(&self, statement: &BurnStatement, proof: &[u8]) -> bool {
        accepted("burn", self.engine.verify_burn(burn_params(), statement, proof))
    }

    /// Verify ABI-packed transfer calldata (selector included).
    ///
    /// # Errors
    /// * `VerifierError::Codec` - the calldata is malformed or truncated
    pub fn verify_transfer(&self, calldata: &[u8]) -> Result<bool, VerifierError> {
        let mut decoded = decode_abi_packed_transfer_verification(calldata)?;
        self.apply_epoch_policy(&mut decoded.statement.epoch);
        debug!(
            "verifying transfer: n = {}, proof {} bytes",
            decoded.statement.len(),
            decoded.proof.len()
        );
        Ok(self.verify_transfer_statement(&decoded.statement, &decoded.proof))
    }

    /// Verify ABI-packed burn calldata (selector included).
    pub fn verify_burn(&self, calldata: &[u8]) -> Result<bool, VerifierError> {
        let mut decoded = decode_abi_packed_burn_verification(calldata)?;
        self.apply_epoch_policy(&mut decoded.statement.epoch);
        debug!("verifying burn: amount {}", decoded.statement.b_transfer);
        Ok(self.verify_burn_statement(&decoded.statement, &decoded.proof))
    }

    /// [`Self::verify_transfer`] over `0x` hex calldata.
    pub fn verify_transfer_hex(&self, calldata: &str) -> Result<bool, VerifierError> {
        self.verify_transfer(&decode_hex(calldata)?)
    }

    pub fn verify_burn_hex(&self, calldata: &str) -> Result<bool, VerifierError> {
        self.verify_burn(&decode_hex(calldata)?)
    }
}
