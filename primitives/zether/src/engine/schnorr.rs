//! Reference proof engine: a Fiat-Shamir Schnorr proof of the statement's
//! linear relations.
//!
//! For transfers the witness vector is `[x, r, bTransfer, bDiff]` and the proven
//! relations are
//! ```text
//! y_s   = x*g
//! CLn_s = bDiff*g + x*CRn_s
//! R     = r*g
//! L_i   = r*y_i                 (i != s, t)
//! L_s   = r*y_s - bTransfer*g
//! L_t   = r*y_t + bTransfer*g
//! u     = x*gEpoch              (when the statement carries an epoch)
//! ```
//! For burns the witness is `[x, bDiff]` with the `y`, `CLn` and `u` relations;
//! `bTransfer` is bound through the transcript.
//!
//! ## Proof layout
//! ```text
//! transfer: sender(32) || receiver(32) || A_1..A_m (64 each) || z_1..z_4 (32 each)
//! burn:     A_1..A_m (64 each) || z_1..z_2 (32 each)
//! ```
//!
//! This engine reveals the sender and receiver indices and proves no ranges.
//! It is meant for exercising the statement layer end to end, NOT for hiding
//! anything.

use ark_ff::Zero;
use log::warn;
use merlin::Transcript;
use rand::RngCore;

use crate::engine::ProofEngine;
use crate::error::EngineError;
use crate::group::{
    be_bytes_to_u64, point_from_bytes, point_to_bytes, random_scalar, scalar_from_be_bytes,
    scalar_to_bytes, u64_word, Point, Scalar, POINT_LEN, SCALAR_LEN, WORD_LEN,
};
use crate::params::GeneratorParams;
use crate::statement::{BurnStatement, BurnWitness, TransferStatement, TransferWitness};
use crate::transcript::{
    append_epoch, append_point, append_points, challenge_scalar, labels, new_transcript,
};

// transfer witness slots
const X: usize = 0;
const R: usize = 1;
const B: usize = 2;
const DIFF: usize = 3;
const TRANSFER_WITNESS_LEN: usize = 4;

// burn witness slots
const BURN_X: usize = 0;
const BURN_DIFF: usize = 1;
const BURN_WITNESS_LEN: usize = 2;

/// `image = sum(witness[slot] * base)`.
struct Relation {
    image: Point,
    terms: Vec<(usize, Point)>,
}

impl Relation {
    fn new(image: Point, terms: Vec<(usize, Point)>) -> Self {
        Self { image, terms }
    }

    fn eval(&self, values: &[Scalar]) -> Point {
        self.terms
            .iter()
            .fold(Point::zero(), |acc, (slot, base)| acc + *base * values[*slot])
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SchnorrEngine;

fn transfer_relations(
    params: &GeneratorParams,
    statement: &TransferStatement,
    sender: usize,
    receiver: usize,
) -> Vec<Relation> {
    let g = *params.g();
    let mut relations = Vec::with_capacity(statement.len() + 4);
    relations.push(Relation::new(statement.y[sender], vec![(X, g)]));
    relations.push(Relation::new(
        statement.cl_new[sender],
        vec![(DIFF, g), (X, statement.cr_new[sender])],
    ));
    relations.push(Relation::new(statement.r, vec![(R, g)]));
    for (i, (l, y)) in statement.l.iter().zip(&statement.y).enumerate() {
        let mut terms = vec![(R, *y)];
        if i == sender {
            terms.push((B, -g));
        } else if i == receiver {
            terms.push((B, g));
        }
        relations.push(Relation::new(*l, terms));
    }
    if let Some(binding) = &statement.epoch {
        relations.push(Relation::new(binding.u, vec![(X, binding.g_epoch)]));
    }
    relations
}

fn burn_relations(params: &GeneratorParams, statement: &BurnStatement) -> Vec<Relation> {
    let g = *params.g();
    let mut relations = vec![
        Relation::new(statement.y, vec![(BURN_X, g)]),
        Relation::new(statement.cl_new, vec![(BURN_DIFF, g), (BURN_X, statement.cr_new)]),
    ];
    if let Some(binding) = &statement.epoch {
        relations.push(Relation::new(binding.u, vec![(BURN_X, binding.g_epoch)]));
    }
    relations
}

fn transfer_transcript(
    statement: &TransferStatement,
    sender: usize,
    receiver: usize,
) -> Transcript {
    let mut t = new_transcript(labels::TRANSFER);
    append_points(&mut t, labels::CL, &statement.cl_new);
    append_points(&mut t, labels::CR, &statement.cr_new);
    append_points(&mut t, labels::L, &statement.l);
    append_point(&mut t, labels::R, &statement.r);
    append_points(&mut t, labels::Y, &statement.y);
    append_epoch(&mut t, statement.epoch.as_ref());
    t.append_u64(labels::INDEX, sender as u64);
    t.append_u64(labels::INDEX, receiver as u64);
    t
}

fn burn_transcript(statement: &BurnStatement) -> Transcript {
    let mut t = new_transcript(labels::BURN);
    append_point(&mut t, labels::CL, &statement.cl_new);
    append_point(&mut t, labels::CR, &statement.cr_new);
    append_point(&mut t, labels::Y, &statement.y);
    t.append_u64(labels::AMOUNT, statement.b_transfer);
    append_epoch(&mut t, statement.epoch.as_ref());
    t
}

fn prove_relations<Rng: RngCore>(
    t: &mut Transcript,
    relations: &[Relation],
    witness: &[Scalar],
    rng: &mut Rng,
) -> Result<Vec<u8>, EngineError> {
    if relations.iter().any(|rel| rel.eval(witness) != rel.image) {
        return Err(EngineError::Internal("witness does not satisfy the statement".into()));
    }
    let nonces: Vec<Scalar> = witness.iter().map(|_| random_scalar(&mut *rng)).collect();
    let commitments: Vec<Point> = relations.iter().map(|rel| rel.eval(&nonces)).collect();
    for a in &commitments {
        append_point(t, labels::COMMIT, a);
    }
    let c = challenge_scalar(t, labels::CHALLENGE);

    let mut out = Vec::with_capacity(commitments.len() * POINT_LEN + witness.len() * SCALAR_LEN);
    for a in &commitments {
        out.extend_from_slice(&point_to_bytes(a));
    }
    for (k, w) in nonces.iter().zip(witness) {
        out.extend_from_slice(&scalar_to_bytes(&(*k + c * w)));
    }
    Ok(out)
}

fn verify_relations(
    t: &mut Transcript,
    relations: &[Relation],
    witness_len: usize,
    body: &[u8],
) -> Result<(), EngineError> {
    let commit_len = relations.len() * POINT_LEN;
    if body.len() != commit_len + witness_len * SCALAR_LEN {
        return Err(EngineError::Rejected("proof length does not match the statement"));
    }
    let commitments = body[..commit_len]
        .chunks_exact(POINT_LEN)
        .map(point_from_bytes)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| EngineError::Rejected("proof commitment is not a valid point"))?;
    for a in &commitments {
        append_point(t, labels::COMMIT, a);
    }
    let c = challenge_scalar(t, labels::CHALLENGE);
    let responses: Vec<Scalar> =
        body[commit_len..].chunks_exact(SCALAR_LEN).map(scalar_from_be_bytes).collect();

    for (rel, a) in relations.iter().zip(&commitments) {
        if rel.eval(&responses) != *a + rel.image * c {
            return Err(EngineError::Rejected("proof equation does not hold"));
        }
    }
    Ok(())
}

fn read_index(word: &[u8], n: usize) -> Result<usize, EngineError> {
    be_bytes_to_u64(word)
        .and_then(|v| usize::try_from(v).ok())
        .filter(|i| *i < n)
        .ok_or(EngineError::Rejected("proof index outside the anonymity set"))
}

impl ProofEngine for SchnorrEngine {
    fn prove_transfer(
        &self,
        params: &GeneratorParams,
        statement: &TransferStatement,
        witness: &TransferWitness,
    ) -> Result<Vec<u8>, EngineError> {
        statement
            .validate()
            .map_err(|e| EngineError::Internal(format!("statement: {e}")))?;
        let (s, t) = (witness.sender_index, witness.receiver_index);
        let n = statement.len();
        if s >= n || t >= n || s == t {
            return Err(EngineError::Internal(format!(
                "witness indices ({s}, {t}) invalid for anonymity set of {n}"
            )));
        }

        let relations = transfer_relations(params, statement, s, t);
        let values = [
            witness.x,
            witness.r,
            Scalar::from(witness.b_transfer),
            Scalar::from(witness.b_diff),
        ];
        let mut transcript = transfer_transcript(statement, s, t);
        let body = prove_relations(&mut transcript, &relations, &values, &mut rand::rng())?;

        let mut out = Vec::with_capacity(2 * WORD_LEN + body.len());
        out.extend_from_slice(&u64_word(s as u64));
        out.extend_from_slice(&u64_word(t as u64));
        out.extend_from_slice(&body);
        Ok(out)
    }

    fn verify_transfer(
        &self,
        params: &GeneratorParams,
        statement: &TransferStatement,
        proof: &[u8],
    ) -> Result<(), EngineError> {
        if let Err(e) = statement.validate() {
            warn!("rejecting transfer proof for malformed statement: {e}");
            return Err(EngineError::Rejected("statement is malformed"));
        }
        if proof.len() < 2 * WORD_LEN {
            return Err(EngineError::Rejected("proof too short"));
        }
        let n = statement.len();
        let s = read_index(&proof[..WORD_LEN], n)?;
        let t = read_index(&proof[WORD_LEN..2 * WORD_LEN], n)?;
        if s == t {
            return Err(EngineError::Rejected("sender and receiver coincide"));
        }

        let relations = transfer_relations(params, statement, s, t);
        let mut transcript = transfer_transcript(statement, s, t);
        verify_relations(&mut transcript, &relations, TRANSFER_WITNESS_LEN, &proof[2 * WORD_LEN..])
    }

    fn prove_burn(
        &self,
        params: &GeneratorParams,
        statement: &BurnStatement,
        witness: &BurnWitness,
    ) -> Result<Vec<u8>, EngineError> {
        let relations = burn_relations(params, statement);
        let values = [witness.x, Scalar::from(witness.b_diff)];
        let mut transcript = burn_transcript(statement);
        prove_relations(&mut transcript, &relations, &values, &mut rand::rng())
    }

    fn verify_burn(
        &self,
        params: &GeneratorParams,
        statement: &BurnStatement,
        proof: &[u8],
    ) -> Result<(), EngineError> {
        let relations = burn_relations(params, statement);
        let mut transcript = burn_transcript(statement);
        verify_relations(&mut transcript, &relations, BURN_WITNESS_LEN, proof)
    }
}
