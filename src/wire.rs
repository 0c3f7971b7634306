//! Version-1 wire framing: the 3-byte header, per-type bodies, and the
//! Sparse/Dense size-based selection at pack time.

use crate::config;
use crate::dense::DenseRegisters;
use crate::error::HllError;
use crate::explicit::ExplicitStorage;
use crate::params::Params;
use crate::representation::Representation;
use crate::sparse;

const HEADER_LEN: usize = 3;

const TYPE_EMPTY: u8 = 1;
const TYPE_EXPLICIT: u8 = 2;
const TYPE_SPARSE: u8 = 3;
const TYPE_DENSE: u8 = 4;
/// "0xFF-like sentinel" confined to the header's 4-bit type nibble.
const TYPE_UNDEFINED: u8 = 0x0F;

/// Bound on an in-memory body's size; any decode whose inferred body would
/// exceed this fails `Data` before any proportional allocation happens.
pub const MS_MAXDATA: usize = 128 * 1024;

fn pack_header(params: &Params, type_id: u8) -> [u8; HEADER_LEN] {
    let byte0 = (config::output_version() << 4) | type_id;
    let byte1 = ((params.regwidth - 1) << 5) | params.log2m;
    let byte2 = ((params.sparseon as u8) << 6) | Params::encode_expthresh(params.expthresh);
    [byte0, byte1, byte2]
}

fn unpack_header(buf: &[u8]) -> Result<(u8, u8, Params), HllError> {
    if buf.len() < HEADER_LEN {
        return Err(HllError::Data(format!(
            "frame shorter than the {HEADER_LEN}-byte header: {} bytes",
            buf.len()
        )));
    }

    let version = buf[0] >> 4;
    let type_id = buf[0] & 0x0F;
    if version != config::SUPPORTED_WIRE_VERSION {
        return Err(HllError::Data(format!("unknown wire version {version}")));
    }

    let regwidth = (buf[1] >> 5) + 1;
    let log2m = buf[1] & 0x1F;
    let sparseon = (buf[2] >> 6) & 1 != 0;
    let expthresh = Params::decode_expthresh(buf[2] & 0x3F);

    let params = Params::new(log2m as u32, regwidth as u32, expthresh, sparseon)?;
    Ok((version, type_id, params))
}

/// Whether encoding `dense` as Sparse beats encoding it as Dense, under the
/// current `max_sparse` override. `sparseon = false` always selects Dense
/// regardless of the override.
fn should_use_sparse(dense: &DenseRegisters, params: &Params) -> bool {
    if !params.sparseon {
        return false;
    }

    let n_filled = sparse::pair_count(dense);
    match config::max_sparse() {
        -1 => {
            let sparse_bits = n_filled as u64 * (params.log2m as u64 + params.regwidth as u64);
            let dense_bits = params.m() as u64 * params.regwidth as u64;
            sparse_bits < dense_bits
        }
        threshold => n_filled as i64 <= threshold,
    }
}

/// The exact byte count [`encode`] would produce for `repr`, without
/// allocating the frame — must mirror [`should_use_sparse`] exactly.
pub fn packed_size(repr: &Representation) -> usize {
    match repr {
        Representation::Undefined(_) | Representation::Empty(_) => HEADER_LEN,
        Representation::Explicit(e) => HEADER_LEN + e.bytes_len(),
        Representation::Dense(d) => {
            let params = repr.params();
            if should_use_sparse(d, &params) {
                HEADER_LEN + sparse::encoded_len(d, &params)
            } else {
                HEADER_LEN + d.bytes_len()
            }
        }
    }
}

pub fn encode(repr: &Representation) -> Vec<u8> {
    match repr {
        Representation::Undefined(params) => pack_header(params, TYPE_UNDEFINED).to_vec(),
        Representation::Empty(params) => pack_header(params, TYPE_EMPTY).to_vec(),
        Representation::Explicit(e) => {
            let mut out = pack_header(&e.params, TYPE_EXPLICIT).to_vec();
            let mut body = vec![0u8; e.bytes_len()];
            e.to_bytes(&mut body);
            out.extend_from_slice(&body);
            out
        }
        Representation::Dense(d) => {
            let params = repr.params();
            if should_use_sparse(d, &params) {
                let mut out = pack_header(&params, TYPE_SPARSE).to_vec();
                let mut body = vec![0u8; sparse::encoded_len(d, &params)];
                sparse::encode(d, &params, &mut body);
                out.extend_from_slice(&body);
                out
            } else {
                let mut out = pack_header(&params, TYPE_DENSE).to_vec();
                let mut body = vec![0u8; d.bytes_len()];
                d.to_bytes(&mut body);
                out.extend_from_slice(&body);
                out
            }
        }
    }
}

pub fn decode(buf: &[u8]) -> Result<Representation, HllError> {
    let (_version, type_id, params) = unpack_header(buf)?;
    let body = &buf[HEADER_LEN..];

    if body.len() > MS_MAXDATA {
        return Err(HllError::Data(format!(
            "body of {} bytes exceeds the {MS_MAXDATA}-byte bound",
            body.len()
        )));
    }

    match type_id {
        TYPE_UNDEFINED => {
            if !body.is_empty() {
                return Err(HllError::Data("undefined frame carries a body".to_string()));
            }
            Ok(Representation::Undefined(params))
        }
        TYPE_EMPTY => {
            if !body.is_empty() {
                return Err(HllError::Data("empty frame carries a body".to_string()));
            }
            Ok(Representation::Empty(params))
        }
        TYPE_EXPLICIT => Ok(Representation::Explicit(ExplicitStorage::from_bytes(
            params, body,
        )?)),
        TYPE_DENSE => Ok(Representation::Dense(DenseRegisters::from_bytes(
            params, body,
        )?)),
        TYPE_SPARSE => Ok(Representation::Dense(sparse::decode(params, body)?)),
        other => Err(HllError::Data(format!("unknown frame type {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representation::Representation;

    #[test]
    fn default_empty_sketch_encodes_to_three_byte_header() {
        // byte0 = (1<<4)|TYPE_EMPTY, byte1 = ((regwidth-1)<<5)|log2m =
        // (4<<5)|11, byte2 = (sparseon<<6) | encode_expthresh(-1) =
        // 0x40 | 0x3F = 0x7F.
        let params = Params::new(11, 5, -1, true).unwrap();
        let repr = Representation::Empty(params);
        let bytes = encode(&repr);
        assert_eq!(bytes, vec![0x11, 0x8B, 0x7F]);
        assert_eq!(packed_size(&repr), 3);
    }

    #[test]
    fn explicit_body_is_header_plus_eight_bytes_per_token() {
        let params = Params::new(11, 5, -1, true).unwrap();
        let mut repr = Representation::Empty(params);
        for t in [1u64, 2, 3] {
            repr.add(t);
        }
        let bytes = encode(&repr);
        assert_eq!(bytes.len(), 3 + 24);
        assert_eq!(packed_size(&repr), bytes.len());
    }

    #[test]
    fn dense_sketch_with_few_set_registers_packs_as_sparse() {
        let params = Params::new(4, 5, 0, true).unwrap();
        let mut repr = Representation::new_empty(params);
        repr.add(1u64 << params.log2m); // idx 0, one set register

        let bytes = encode(&repr);
        assert_eq!(bytes[0] & 0x0F, TYPE_SPARSE);

        let expected_body_bits = params.log2m as usize + params.regwidth as usize;
        let expected_body_bytes = expected_body_bits.div_ceil(8);
        assert_eq!(bytes.len(), HEADER_LEN + expected_body_bytes);
        assert_eq!(packed_size(&repr), bytes.len());
    }

    #[test]
    fn round_trip_preserves_dense_bytes() {
        let params = Params::new(11, 5, 0, false).unwrap();
        let mut repr = Representation::Empty(params);
        for i in 0u64..500 {
            repr.add(i * 2654435761);
        }
        let bytes = encode(&repr);
        let back = decode(&bytes).unwrap();
        assert_eq!(repr, back);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let buf = [0x21u8, 0x8B, 0x7E];
        assert!(decode(&buf).is_err());
    }

    #[test]
    fn oversize_body_is_rejected() {
        let params = Params::new(11, 5, 0, false).unwrap();
        let mut header = pack_header(&params, TYPE_DENSE).to_vec();
        header.extend(vec![0u8; MS_MAXDATA + 1]);
        assert!(decode(&header).is_err());
    }

    #[test]
    fn sparse_frame_decodes_to_dense_representation() {
        let params = Params::new(11, 5, 0, true).unwrap();
        let mut dense = DenseRegisters::new(params);
        dense.set_if_greater(0, 7);
        let mut header = pack_header(&params, TYPE_SPARSE).to_vec();
        let mut body = vec![0u8; sparse::encoded_len(&dense, &params)];
        sparse::encode(&dense, &params, &mut body);
        header.extend_from_slice(&body);

        let decoded = decode(&header).unwrap();
        assert!(matches!(decoded, Representation::Dense(_)));
    }
}
