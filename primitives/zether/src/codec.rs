//! Wire codec: `0x` hex values and ABI-packed verification calldata.
//!
//! ## Transfer calldata
//! ```text
//! selector(4)
//! head:  [ptr CL][ptr CR][ptr L][R.x][R.y][ptr y][epoch][u.x][u.y][ptr proof]   (10 words)
//! CL:    len(32) || n x point(64)
//! CR:    len(32) || n x point(64)
//! L:     len(32) || n x point(64)
//! y:     len(32) || n x point(64)
//! proof: len(32) || bytes, zero padded to a word boundary; nothing may follow
//! ```
//! Section offsets are recomputed from the declared lengths; the head pointer
//! words are written by the encoder but never read back.
//!
//! ## Burn calldata
//! ```text
//! selector(4) || CLn(64) || CRn(64) || y(64) || bTransfer(32) || epoch(32) || u(64)
//!             || ptr proof(32) || len(32) || proof
//! ```

use log::debug;

use crate::epoch::EpochBinding;
use crate::error::CodecError;
use crate::group::{
    be_bytes_to_u64, point_from_bytes, point_to_bytes, scalar_from_be_bytes, scalar_to_bytes,
    u64_word, Point, Scalar, POINT_LEN, WORD_LEN,
};
use crate::statement::{BurnStatement, TransferStatement};

pub const SELECTOR_LEN: usize = 4;

// ====== Hex ======

/// Decodes a `0x`-prefixed hex string; an odd digit count gets a leading `0`.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, CodecError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .ok_or_else(|| CodecError::malformed("hex value must start with 0x"))?;
    let decoded = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    decoded.map_err(|e| CodecError::MalformedInput(format!("invalid hex: {e}")))
}

/// `0x` followed by upper-case hex digits.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode_upper(bytes))
}

/// Big-endian unsigned integer reduced mod q.
pub fn decode_scalar(input: &str) -> Result<Scalar, CodecError> {
    Ok(scalar_from_be_bytes(&decode_hex(input)?))
}

/// Big-endian unsigned integer that must fit in a `u64`.
pub fn decode_u64(input: &str) -> Result<u64, CodecError> {
    let bytes = decode_hex(input)?;
    be_bytes_to_u64(&bytes)
        .ok_or_else(|| CodecError::MalformedInput(format!("value {input} does not fit in 64 bits")))
}

pub fn decode_point(input: &str) -> Result<Point, CodecError> {
    point_from_bytes(&decode_hex(input)?)
}

/// Concatenation of 64-byte points.
pub fn decode_point_vector(input: &str) -> Result<Vec<Point>, CodecError> {
    let bytes = decode_hex(input)?;
    if bytes.len() % POINT_LEN != 0 {
        return Err(CodecError::MalformedInput(format!(
            "point vector length {} is not a multiple of {POINT_LEN}",
            bytes.len()
        )));
    }
    bytes.chunks_exact(POINT_LEN).map(point_from_bytes).collect()
}

pub fn encode_scalar(s: &Scalar) -> String {
    encode_hex(&scalar_to_bytes(s))
}

pub fn encode_point(p: &Point) -> String {
    encode_hex(&point_to_bytes(p))
}

pub fn encode_point_vector(points: &[Point]) -> String {
    let mut out = Vec::with_capacity(points.len() * POINT_LEN);
    for p in points {
        out.extend_from_slice(&point_to_bytes(p));
    }
    encode_hex(&out)
}

pub fn encode_proof(proof: &[u8]) -> String {
    encode_hex(proof)
}

// ====== ABI helpers ======

/// Decode a word holding an integer that must fit in a `u64`.
fn decode_u64_word(word: &[u8]) -> Result<u64, CodecError> {
    be_bytes_to_u64(word).ok_or_else(|| CodecError::malformed("ABI word does not fit in 64 bits"))
}

/// Decode a word used as a length or count.
fn decode_word_as_usize(word: &[u8]) -> Result<usize, CodecError> {
    usize::try_from(decode_u64_word(word)?)
        .map_err(|_| CodecError::malformed("ABI length does not fit in usize"))
}

/// Slice `len` bytes at `offset` of the argument area, reporting shortfalls
/// against the full calldata (selector included).
fn slice_at(args: &[u8], offset: usize, len: usize) -> Result<&[u8], CodecError> {
    let available = args.len() + SELECTOR_LEN;
    let end = offset.checked_add(len).ok_or(CodecError::TruncatedInput {
        needed: usize::MAX,
        available,
    })?;
    if end > args.len() {
        return Err(CodecError::TruncatedInput {
            needed: end.saturating_add(SELECTOR_LEN),
            available,
        });
    }
    Ok(&args[offset..end])
}

fn point_at(args: &[u8], offset: usize) -> Result<Point, CodecError> {
    point_from_bytes(slice_at(args, offset, POINT_LEN)?)
}

fn split_selector(blob: &[u8]) -> Result<([u8; SELECTOR_LEN], &[u8]), CodecError> {
    if blob.len() < SELECTOR_LEN {
        return Err(CodecError::TruncatedInput { needed: SELECTOR_LEN, available: blob.len() });
    }
    let mut selector = [0u8; SELECTOR_LEN];
    selector.copy_from_slice(&blob[..SELECTOR_LEN]);
    Ok((selector, &blob[SELECTOR_LEN..]))
}

/// Decode a `len || bytes` section at `offset`, returning the payload.
fn decode_dynamic_bytes(args: &[u8], offset: usize) -> Result<&[u8], CodecError> {
    let len = decode_word_as_usize(slice_at(args, offset, WORD_LEN)?)?;
    slice_at(args, offset + WORD_LEN, len)
}

/// Decode the trailing `len || bytes` section at `offset`. Only the zero
/// padding up to the next word boundary may follow the payload.
fn decode_trailing_bytes(args: &[u8], offset: usize) -> Result<&[u8], CodecError> {
    let payload = decode_dynamic_bytes(args, offset)?;
    let tail = &args[offset + WORD_LEN + payload.len()..];
    let padding = padded_len(payload.len()) - payload.len();
    if tail.len() > padding || tail.iter().any(|b| *b != 0) {
        return Err(CodecError::MalformedInput(format!(
            "{} unexpected bytes after the proof",
            tail.len()
        )));
    }
    Ok(payload)
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD_LEN) * WORD_LEN
}

fn push_dynamic_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(&u64_word(bytes.len() as u64));
    out.extend_from_slice(bytes);
    out.resize(out.len() + padded_len(bytes.len()) - bytes.len(), 0);
}

fn push_point_section(out: &mut Vec<u8>, points: &[Point]) {
    out.extend_from_slice(&u64_word(points.len() as u64));
    for p in points {
        out.extend_from_slice(&point_to_bytes(p));
    }
}

// ====== Transfer calldata ======

/// Number of head words in transfer calldata.
pub const TRANSFER_HEAD_WORDS: usize = 10;
pub const TRANSFER_HEAD_LEN: usize = TRANSFER_HEAD_WORDS * WORD_LEN;

const TRANSFER_R: usize = 3 * WORD_LEN;
const TRANSFER_EPOCH: usize = 6 * WORD_LEN;
const TRANSFER_U: usize = 7 * WORD_LEN;

/// Section offsets (relative to the end of the selector) for an anonymity set of size `n`.
///
/// Offsets accumulate from the end of the head: each point section occupies
/// `32 + 64 * n` bytes and the proof section follows the last one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferLayout {
    pub size: usize,
    /// Offsets of the `CL`, `CR`, `L` and `y` length words.
    pub sections: [usize; 4],
    /// Offset of the proof length word.
    pub proof: usize,
}

impl TransferLayout {
    pub fn new(size: usize) -> Result<Self, CodecError> {
        let overflow = || CodecError::malformed("anonymity set size overflows the layout");
        let section_len = size
            .checked_mul(POINT_LEN)
            .and_then(|b| b.checked_add(WORD_LEN))
            .ok_or_else(overflow)?;
        let mut cursor = TRANSFER_HEAD_LEN;
        let mut sections = [0usize; 4];
        for section in sections.iter_mut() {
            *section = cursor;
            cursor = cursor.checked_add(section_len).ok_or_else(overflow)?;
        }
        Ok(Self { size, sections, proof: cursor })
    }

    /// Offset of the proof payload; also the smallest argument area that can
    /// hold this layout with an empty proof.
    pub fn proof_data(&self) -> usize {
        self.proof + WORD_LEN
    }
}

/// Decoded transfer calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferVerification {
    pub selector: [u8; SELECTOR_LEN],
    pub statement: TransferStatement,
    pub proof: Vec<u8>,
}

pub fn decode_abi_packed_transfer_verification(
    blob: &[u8],
) -> Result<TransferVerification, CodecError> {
    let (selector, args) = split_selector(blob)?;
    // the CL length word right after the head fixes n for every section
    let first_len = slice_at(args, TRANSFER_HEAD_LEN, WORD_LEN)?;
    let n = decode_word_as_usize(first_len)?;
    if n == 0 {
        return Err(CodecError::malformed("anonymity set is empty"));
    }
    let layout = TransferLayout::new(n)?;
    if args.len() < layout.proof_data() {
        return Err(CodecError::TruncatedInput {
            needed: layout.proof_data() + SELECTOR_LEN,
            available: blob.len(),
        });
    }
    debug!("decoding transfer calldata: n = {n}, {} bytes", blob.len());

    let r = point_at(args, TRANSFER_R)?;
    let epoch = decode_u64_word(slice_at(args, TRANSFER_EPOCH, WORD_LEN)?)?;
    let u = point_at(args, TRANSFER_U)?;

    let mut vectors: [Vec<Point>; 4] = Default::default();
    for (k, (offset, points)) in layout.sections.iter().zip(vectors.iter_mut()).enumerate() {
        let declared = decode_word_as_usize(slice_at(args, *offset, WORD_LEN)?)?;
        if declared != n {
            return Err(CodecError::MalformedInput(format!(
                "section {k} declares {declared} points, expected {n}"
            )));
        }
        let body = slice_at(args, offset + WORD_LEN, n * POINT_LEN)?;
        *points = body.chunks_exact(POINT_LEN).map(point_from_bytes).collect::<Result<_, _>>()?;
    }
    let proof = decode_trailing_bytes(args, layout.proof)?.to_vec();

    let [cl_new, cr_new, l, y] = vectors;
    Ok(TransferVerification {
        selector,
        statement: TransferStatement {
            cl_new,
            cr_new,
            l,
            r,
            y,
            epoch: Some(EpochBinding::from_wire(epoch, u)),
        },
        proof,
    })
}

/// Inverse of [`decode_abi_packed_transfer_verification`].
///
/// # Errors
/// `MalformedInput` when the statement is structurally invalid or carries no
/// epoch binding (the calldata always has an epoch and nonce).
pub fn encode_abi_packed_transfer_verification(
    selector: [u8; SELECTOR_LEN],
    statement: &TransferStatement,
    proof: &[u8],
) -> Result<Vec<u8>, CodecError> {
    statement.validate()?;
    let binding = statement
        .epoch
        .as_ref()
        .ok_or_else(|| CodecError::malformed("transfer calldata requires an epoch binding"))?;
    let layout = TransferLayout::new(statement.len())?;

    let mut out =
        Vec::with_capacity(SELECTOR_LEN + layout.proof_data() + padded_len(proof.len()));
    out.extend_from_slice(&selector);
    let r = point_to_bytes(&statement.r);
    let u = point_to_bytes(&binding.u);
    out.extend_from_slice(&u64_word(layout.sections[0] as u64));
    out.extend_from_slice(&u64_word(layout.sections[1] as u64));
    out.extend_from_slice(&u64_word(layout.sections[2] as u64));
    out.extend_from_slice(&r);
    out.extend_from_slice(&u64_word(layout.sections[3] as u64));
    out.extend_from_slice(&u64_word(binding.epoch));
    out.extend_from_slice(&u);
    out.extend_from_slice(&u64_word(layout.proof as u64));

    push_point_section(&mut out, &statement.cl_new);
    push_point_section(&mut out, &statement.cr_new);
    push_point_section(&mut out, &statement.l);
    push_point_section(&mut out, &statement.y);
    push_dynamic_bytes(&mut out, proof);
    Ok(out)
}

// ====== Burn calldata ======

const BURN_CL: usize = 0;
const BURN_CR: usize = POINT_LEN;
const BURN_Y: usize = 2 * POINT_LEN;
const BURN_AMOUNT: usize = 3 * POINT_LEN;
const BURN_EPOCH: usize = BURN_AMOUNT + WORD_LEN;
const BURN_U: usize = BURN_EPOCH + WORD_LEN;
const BURN_PROOF_PTR: usize = BURN_U + POINT_LEN;
/// Offset of the proof length word in burn calldata (selector excluded).
pub const BURN_PROOF_LEN: usize = BURN_PROOF_PTR + WORD_LEN;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnVerification {
    pub selector: [u8; SELECTOR_LEN],
    pub statement: BurnStatement,
    pub proof: Vec<u8>,
}

pub fn decode_abi_packed_burn_verification(blob: &[u8]) -> Result<BurnVerification, CodecError> {
    let (selector, args) = split_selector(blob)?;
    let min = BURN_PROOF_LEN + WORD_LEN;
    if args.len() < min {
        return Err(CodecError::TruncatedInput {
            needed: min + SELECTOR_LEN,
            available: blob.len(),
        });
    }
    debug!("decoding burn calldata: {} bytes", blob.len());

    let cl_new = point_at(args, BURN_CL)?;
    let cr_new = point_at(args, BURN_CR)?;
    let y = point_at(args, BURN_Y)?;
    let b_transfer = decode_u64_word(slice_at(args, BURN_AMOUNT, WORD_LEN)?)?;
    let epoch = decode_u64_word(slice_at(args, BURN_EPOCH, WORD_LEN)?)?;
    let u = point_at(args, BURN_U)?;
    let proof = decode_trailing_bytes(args, BURN_PROOF_LEN)?.to_vec();

    Ok(BurnVerification {
        selector,
        statement: BurnStatement {
            cl_new,
            cr_new,
            y,
            b_transfer,
            epoch: Some(EpochBinding::from_wire(epoch, u)),
        },
        proof,
    })
}

pub fn encode_abi_packed_burn_verification(
    selector: [u8; SELECTOR_LEN],
    statement: &BurnStatement,
    proof: &[u8],
) -> Result<Vec<u8>, CodecError> {
    let binding = statement
        .epoch
        .as_ref()
        .ok_or_else(|| CodecError::malformed("burn calldata requires an epoch binding"))?;
    let mut out =
        Vec::with_capacity(SELECTOR_LEN + BURN_PROOF_LEN + WORD_LEN + padded_len(proof.len()));
    out.extend_from_slice(&selector);
    out.extend_from_slice(&point_to_bytes(&statement.cl_new));
    out.extend_from_slice(&point_to_bytes(&statement.cr_new));
    out.extend_from_slice(&point_to_bytes(&statement.y));
    out.extend_from_slice(&u64_word(statement.b_transfer));
    out.extend_from_slice(&u64_word(binding.epoch));
    out.extend_from_slice(&point_to_bytes(&binding.u));
    out.extend_from_slice(&u64_word(BURN_PROOF_LEN as u64));
    push_dynamic_bytes(&mut out, proof);
    Ok(out)
}
