//! Anonymity set assembly.
//!
//! The sender, the receiver and the decoys are shuffled into one key vector.
//! Sender and receiver always end up at indices of opposite parity; when the
//! shuffle puts them on the same parity the receiver swaps places with its
//! neighbour.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use zether_primitives::{Point, ProtocolConfig};

use crate::ProverError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnonymitySet {
    pub y: Vec<Point>,
    pub sender_index: usize,
    pub receiver_index: usize,
}

/// Shuffle `sender`, `receiver` and `decoys` into an anonymity set.
///
/// # Errors
/// * `ProverError::Malformed` - sender and receiver share a key, or a decoy repeats one of them
/// * `ProverError::AnonymitySetSize` - `config.power_of_two_sets` is on and `2 + decoys.len()`
///   is not a power of two
pub fn build_anonymity_set<R: Rng + ?Sized>(
    sender: Point,
    receiver: Point,
    decoys: &[Point],
    config: &ProtocolConfig,
    rng: &mut R,
) -> Result<AnonymitySet, ProverError> {
    if sender == receiver {
        return Err(ProverError::Malformed("sender and receiver keys coincide"));
    }
    if decoys.iter().any(|d| *d == sender || *d == receiver) {
        return Err(ProverError::Malformed("decoy repeats the sender or receiver key"));
    }
    let size = decoys.len() + 2;
    if config.power_of_two_sets && !size.is_power_of_two() {
        return Err(ProverError::AnonymitySetSize { size });
    }

    // slot 0 is the sender, slot 1 the receiver
    let mut order: Vec<usize> = (0..size).collect();
    order.shuffle(rng);
    let member = |slot: usize| match slot {
        0 => sender,
        1 => receiver,
        k => decoys[k - 2],
    };
    let mut y: Vec<Point> = order.iter().map(|slot| member(*slot)).collect();
    let mut sender_index = 0;
    let mut receiver_index = 0;
    for (i, slot) in order.iter().enumerate() {
        match slot {
            0 => sender_index = i,
            1 => receiver_index = i,
            _ => {}
        }
    }

    if sender_index % 2 == receiver_index % 2 {
        // an odd-sized set has no right neighbour for its last index
        let neighbour =
            if receiver_index ^ 1 < size { receiver_index ^ 1 } else { receiver_index - 1 };
        y.swap(receiver_index, neighbour);
        receiver_index = neighbour;
    }
    debug!("anonymity set of {size}: sender {sender_index}, receiver {receiver_index}");
    Ok(AnonymitySet { y, sender_index, receiver_index })
}
