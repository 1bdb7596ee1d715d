//! # zether-primitives
//!
//! Types and helpers shared by the Zether prover and verifier: bn128 point and
//! scalar encoding, generator parameters, the epoch nonce, balance commitments,
//! transfer/burn statements and witnesses, the calldata codec and the
//! [`ProofEngine`] boundary.
//!
//! ## Commitments
//! ```text
//! y  = g^x                      (account public key)
//! CL = g^b * y^r,  CR = g^r     (balance commitment)
//! u  = gEpoch^x                 (epoch nonce)
//! ```

pub mod codec;
pub mod commitment;
pub mod config;
pub mod engine;
pub mod epoch;
pub mod error;
pub mod group;
pub mod keys;
pub mod params;
pub mod statement;
pub mod transcript;


pub use commitment::{apply_delta, read_balance, Account, Commitment, Delta};
pub use config::ProtocolConfig;
pub use engine::{ProofEngine, SchnorrEngine};
pub use epoch::{epoch_generator, epoch_nonce, EpochBinding, EpochClock};
pub use error::{CodecError, ConfigError, EngineError};
pub use group::{Point, Scalar};
pub use keys::{verify_registration, Keypair, RegistrationSignature};
pub use params::{burn_params, generator, zether_params, GeneratorParams, MAX_AMOUNT};
pub use statement::{BurnStatement, BurnWitness, TransferStatement, TransferWitness};
