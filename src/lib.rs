//! A HyperLogLog cardinality-estimation sketch core: hashing, register
//! storage, the tagged-union representation with automatic promotion, the
//! estimator, and the version-1 wire format.
//!
//! The public surface is deliberately small: [`Params`] describes a
//! sketch's shape, [`Representation`] is the sketch value itself, and
//! [`Accumulator`] is the aggregation state machine a reducer drives
//! across a fold of raw elements and unioned-in peers. Hashing inputs down
//! to the 64-bit tokens `Representation::add` expects is the caller's
//! responsibility (see [`hash`]).

mod bitstream;
mod config;
mod dense;
mod error;
mod estimator;
mod explicit;
mod hash;
mod params;
mod representation;
mod sparse;
mod state;
mod wire;

pub use config::{
    default_params, max_sparse, output_version, set_default_expthresh, set_default_log2m,
    set_default_regwidth, set_default_sparseon, set_max_sparse, set_output_version,
    SUPPORTED_WIRE_VERSION,
};
pub use error::HllError;
pub use hash::{hash128, hash_bytes};
pub use params::{Params, AUTO_EXPTHRESH};
pub use representation::Representation;
pub use state::Accumulator;
pub use wire::{decode, encode, packed_size, MS_MAXDATA};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_add_union_serialize_cardinality() {
        let params = Params::new(10, 4, -1, true).unwrap();

        let mut a = Representation::new_empty(params);
        a.add(hash_bytes(b"alpha", 0));

        let mut b = Representation::new_empty(params);
        b.add(hash_bytes(b"alpha", 0));
        b.add(hash_bytes(b"beta", 0));

        b.union(&a).unwrap();
        assert_eq!(b.cardinality().unwrap(), Some(2.0));

        let bytes = encode(&b);
        let restored = decode(&bytes).unwrap();
        assert_eq!(restored.cardinality().unwrap(), Some(2.0));
    }

    #[test]
    fn accumulator_drives_a_fold_of_raw_tokens() {
        let mut acc = Accumulator::new();
        for word in ["one", "two", "three", "two"] {
            acc.trans_add(hash_bytes(word.as_bytes(), 0), default_params().unwrap())
                .unwrap();
        }
        let estimate = acc.finalize_card().unwrap().unwrap();
        assert!((estimate - 3.0).abs() < 1.0);
    }
}
