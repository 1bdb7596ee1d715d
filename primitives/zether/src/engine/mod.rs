//! Proof engine boundary.
//!
//! Builders produce statements and witnesses; an engine turns them into opaque
//! proof bytes and checks proofs against statements. The production engine
//! (one-out-of-many plus range proofs) lives outside this workspace; any
//! implementation plugs in through [`ProofEngine`].

mod schnorr;

pub use schnorr::SchnorrEngine;

use crate::error::EngineError;
use crate::params::GeneratorParams;
use crate::statement::{BurnStatement, BurnWitness, TransferStatement, TransferWitness};

pub trait ProofEngine: Send + Sync {
    fn prove_transfer(
        &self,
        params: &GeneratorParams,
        statement: &TransferStatement,
        witness: &TransferWitness,
    ) -> Result<Vec<u8>, EngineError>;

    /// `Ok(())` when the proof verifies, `Err(EngineError::Rejected(_))` when it does not.
    fn verify_transfer(
        &self,
        params: &GeneratorParams,
        statement: &TransferStatement,
        proof: &[u8],
    ) -> Result<(), EngineError>;

    fn prove_burn(
        &self,
        params: &GeneratorParams,
        statement: &BurnStatement,
        witness: &BurnWitness,
    ) -> Result<Vec<u8>, EngineError>;

    fn verify_burn(
        &self,
        params: &GeneratorParams,
        statement: &BurnStatement,
        proof: &[u8],
    ) -> Result<(), EngineError>;
}
