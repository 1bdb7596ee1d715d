//! Hex request front-end.
//!
//! Requests carry every value as a `0x` hex string: points as 64-byte
//! `x || y`, point vectors as concatenations, integers big-endian. Responses
//! carry the proven statement next to the proof, as `0x`-prefixed upper-case
//! hex, so the caller can submit both even when `r` was drawn here.

use serde::{Deserialize, Serialize};

use zether_primitives::codec::{
    decode_hex, decode_point, decode_point_vector, decode_scalar, decode_u64, encode_hex,
    encode_point, encode_point_vector, encode_proof,
};
use zether_primitives::group::{be_bytes_to_u64, random_scalar, u64_word};
use zether_primitives::{
    BurnStatement, CodecError, EpochBinding, ProofEngine, ProtocolConfig, TransferStatement,
};

use crate::{prove_burn, prove_transfer, BurnInput, ProverError, TransferInput};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(rename = "CL")]
    pub cl: String,
    #[serde(rename = "CR")]
    pub cr: String,
    pub y: String,
    pub epoch: String,
    pub x: String,
    /// Transfer randomness; drawn fresh when absent.
    #[serde(default)]
    pub r: Option<String>,
    pub b_transfer: String,
    pub b_diff: String,
    pub sender_index: String,
    pub receiver_index: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRequest {
    #[serde(rename = "CL")]
    pub cl: String,
    #[serde(rename = "CR")]
    pub cr: String,
    pub y: String,
    pub epoch: String,
    pub x: String,
    pub b_transfer: String,
    pub b_diff: String,
}

/// Anything too large for `usize` is out of range for every anonymity set.
fn decode_index(input: &str) -> Result<usize, ProverError> {
    let bytes = decode_hex(input)?;
    Ok(be_bytes_to_u64(&bytes)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(usize::MAX))
}

impl TransferRequest {
    pub fn from_json(json: &str) -> Result<Self, ProverError> {
        serde_json::from_str(json).map_err(|e| ProverError::Request(e.to_string()))
    }

    pub fn to_input(&self) -> Result<TransferInput, ProverError> {
        let r = match &self.r {
            Some(r) => decode_scalar(r)?,
            None => random_scalar(&mut rand::rng()),
        };
        Ok(TransferInput {
            cl: decode_point_vector(&self.cl)?,
            cr: decode_point_vector(&self.cr)?,
            y: decode_point_vector(&self.y)?,
            x: decode_scalar(&self.x)?,
            r,
            sender_index: decode_index(&self.sender_index)?,
            receiver_index: decode_index(&self.receiver_index)?,
            amount: decode_u64(&self.b_transfer)?,
            remaining: decode_u64(&self.b_diff)?,
            epoch: decode_u64(&self.epoch)?,
        })
    }
}

impl BurnRequest {
    pub fn from_json(json: &str) -> Result<Self, ProverError> {
        serde_json::from_str(json).map_err(|e| ProverError::Request(e.to_string()))
    }

    pub fn to_input(&self) -> Result<BurnInput, ProverError> {
        Ok(BurnInput {
            cl: decode_point(&self.cl)?,
            cr: decode_point(&self.cr)?,
            y: decode_point(&self.y)?,
            x: decode_scalar(&self.x)?,
            amount: decode_u64(&self.b_transfer)?,
            remaining: decode_u64(&self.b_diff)?,
            epoch: decode_u64(&self.epoch)?,
        })
    }
}

fn encode_epoch(epoch: Option<&EpochBinding>) -> (Option<String>, Option<String>) {
    match epoch {
        Some(binding) => {
            (Some(encode_hex(&u64_word(binding.epoch))), Some(encode_point(&binding.u)))
        }
        None => (None, None),
    }
}

fn decode_epoch(
    epoch: &Option<String>,
    u: &Option<String>,
) -> Result<Option<EpochBinding>, CodecError> {
    match (epoch, u) {
        (Some(epoch), Some(u)) => {
            Ok(Some(EpochBinding::from_wire(decode_u64(epoch)?, decode_point(u)?)))
        }
        (None, None) => Ok(None),
        _ => Err(CodecError::MalformedInput("epoch and u must be given together".into())),
    }
}

/// A proven transfer: the statement the proof was made for, plus the proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    #[serde(rename = "CLn")]
    pub cl_new: String,
    #[serde(rename = "CRn")]
    pub cr_new: String,
    #[serde(rename = "L")]
    pub l: String,
    #[serde(rename = "R")]
    pub r: String,
    pub y: String,
    /// Absent together with `u` when the epoch nonce is switched off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<String>,
    pub proof: String,
}

impl TransferResponse {
    fn new(statement: &TransferStatement, proof: &[u8]) -> Self {
        let (epoch, u) = encode_epoch(statement.epoch.as_ref());
        Self {
            cl_new: encode_point_vector(&statement.cl_new),
            cr_new: encode_point_vector(&statement.cr_new),
            l: encode_point_vector(&statement.l),
            r: encode_point(&statement.r),
            y: encode_point_vector(&statement.y),
            epoch,
            u,
            proof: encode_proof(proof),
        }
    }

    pub fn statement(&self) -> Result<TransferStatement, CodecError> {
        let statement = TransferStatement {
            cl_new: decode_point_vector(&self.cl_new)?,
            cr_new: decode_point_vector(&self.cr_new)?,
            l: decode_point_vector(&self.l)?,
            r: decode_point(&self.r)?,
            y: decode_point_vector(&self.y)?,
            epoch: decode_epoch(&self.epoch, &self.u)?,
        };
        statement.validate()?;
        Ok(statement)
    }

    pub fn proof_bytes(&self) -> Result<Vec<u8>, CodecError> {
        decode_hex(&self.proof)
    }
}

/// A proven burn: the statement the proof was made for, plus the proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnResponse {
    #[serde(rename = "CLn")]
    pub cl_new: String,
    #[serde(rename = "CRn")]
    pub cr_new: String,
    pub y: String,
    pub b_transfer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<String>,
    pub proof: String,
}

impl BurnResponse {
    fn new(statement: &BurnStatement, proof: &[u8]) -> Self {
        let (epoch, u) = encode_epoch(statement.epoch.as_ref());
        Self {
            cl_new: encode_point(&statement.cl_new),
            cr_new: encode_point(&statement.cr_new),
            y: encode_point(&statement.y),
            b_transfer: encode_hex(&u64_word(statement.b_transfer)),
            epoch,
            u,
            proof: encode_proof(proof),
        }
    }

    pub fn statement(&self) -> Result<BurnStatement, CodecError> {
        Ok(BurnStatement {
            cl_new: decode_point(&self.cl_new)?,
            cr_new: decode_point(&self.cr_new)?,
            y: decode_point(&self.y)?,
            b_transfer: decode_u64(&self.b_transfer)?,
            epoch: decode_epoch(&self.epoch, &self.u)?,
        })
    }

    pub fn proof_bytes(&self) -> Result<Vec<u8>, CodecError> {
        decode_hex(&self.proof)
    }
}

/// Prove a hex transfer request.
pub fn prove_transfer_hex<E: ProofEngine + ?Sized>(
    engine: &E,
    request: &TransferRequest,
    config: &ProtocolConfig,
) -> Result<TransferResponse, ProverError> {
    let out = prove_transfer(engine, &request.to_input()?, config)?;
    Ok(TransferResponse::new(&out.statement, &out.proof_bytes))
}

pub fn prove_burn_hex<E: ProofEngine + ?Sized>(
    engine: &E,
    request: &BurnRequest,
    config: &ProtocolConfig,
) -> Result<BurnResponse, ProverError> {
    let out = prove_burn(engine, &request.to_input()?, config)?;
    Ok(BurnResponse::new(&out.statement, &out.proof_bytes))
}
