//! The Sparse on-wire form: a list of `(index, value)` pairs for non-zero
//! registers. Sparse is never a stored representation in memory — it
//! exists only as a size-driven encoding choice at serialization time,
//! and decodes straight into a [`DenseRegisters`] bank. A claim of Sparse
//! in an in-memory sketch has nowhere to land, since
//! [`crate::Representation`] never constructs one.

use crate::bitstream::{fields_in, packed_byte_len, BitCursor};
use crate::dense::DenseRegisters;
use crate::error::HllError;
use crate::params::Params;

fn bits_per_pair(params: &Params) -> u32 {
    params.log2m as u32 + params.regwidth as u32
}

/// Number of non-zero registers the Sparse frame would carry.
pub fn pair_count(dense: &DenseRegisters) -> usize {
    dense.nonzero_count()
}

/// Byte length of the Sparse encoding of `dense`, without materializing it —
/// used by the pack-time size comparison against the Dense encoding.
pub fn encoded_len(dense: &DenseRegisters, params: &Params) -> usize {
    packed_byte_len(pair_count(dense), bits_per_pair(params))
}

/// Packs the non-zero `(index, value)` pairs of `dense` into `buf`, each
/// pair as the `bits_per_pair`-bit concatenation `(index << regwidth) |
/// value`, ascending by register index.
pub fn encode(dense: &DenseRegisters, params: &Params, buf: &mut [u8]) {
    let bits = bits_per_pair(params);
    let mut cursor = BitCursor::new(bits);
    for (idx, value) in dense.iter().filter(|&(_, v)| v != 0) {
        let packed = ((idx as u64) << params.regwidth) | value as u64;
        cursor.write(buf, packed);
    }
}

/// Decodes a Sparse frame directly into a [`DenseRegisters`] bank. The pair
/// count is derived from the payload length and `bits_per_pair`, relying on
/// the invariant `log2m + regwidth >= 8` so that leftover padding bits can
/// never be mistaken for another whole pair.
pub fn decode(params: Params, buf: &[u8]) -> Result<DenseRegisters, HllError> {
    let bits = bits_per_pair(&params);
    if bits < 8 {
        return Err(HllError::Data(format!(
            "sparse pair width {bits} is below the minimum of 8 bits"
        )));
    }

    let n_pairs = fields_in(buf.len(), bits);
    let reg_mask = (1u64 << params.regwidth) - 1;

    let mut dense = DenseRegisters::new(params);
    let mut cursor = BitCursor::new(bits);
    for _ in 0..n_pairs {
        let packed = cursor.read(buf);
        let reg_value = (packed & reg_mask) as u8;
        let reg_num = (packed >> params.regwidth) as u32;
        dense.set_if_greater(reg_num, reg_value);
    }

    Ok(dense)
}
