//! MurmurHash3 x64/128, the fixed element-ingestion hash.
//!
//! Only the low 64 bits of the 128-bit output are used as the element
//! token fed into [`crate::Representation::add`]. The algorithm itself is
//! fixed by the wire contract (two implementations must agree byte-for-byte
//! on the token a given element hashes to), so this is a direct port of the
//! public-domain x64/128 variant rather than a pluggable hasher.

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

#[inline(always)]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

/// Computes the 128-bit MurmurHash3 x64 digest of `data` seeded with
/// `seed`, returning `(low64, high64)`.
///
/// `seed` is taken as `i32` to match the host-visible signature in the
/// spec; a negative seed is accepted (it is reinterpreted as its unsigned
/// bit pattern, matching an external reference implementation that takes
/// an unsigned seed) but logged as a warning since it is very likely a
/// caller mistake.
pub fn hash128(data: &[u8], seed: i32) -> (u64, u64) {
    if seed < 0 {
        tracing::warn!(seed, "hash_bytes called with a negative seed");
    }
    let seed = seed as u32 as u64;

    let mut h1 = seed;
    let mut h2 = seed;

    let nblocks = data.len() / 16;
    for i in 0..nblocks {
        let block = &data[i * 16..i * 16 + 16];
        let mut k1 = u64::from_le_bytes(block[0..8].try_into().unwrap());
        let mut k2 = u64::from_le_bytes(block[8..16].try_into().unwrap());

        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(31);
        k1 = k1.wrapping_mul(C2);
        h1 ^= k1;

        h1 = h1.rotate_left(27);
        h1 = h1.wrapping_add(h2);
        h1 = h1.wrapping_mul(5).wrapping_add(0x52dc_e729);

        k2 = k2.wrapping_mul(C2);
        k2 = k2.rotate_left(33);
        k2 = k2.wrapping_mul(C1);
        h2 ^= k2;

        h2 = h2.rotate_left(31);
        h2 = h2.wrapping_add(h1);
        h2 = h2.wrapping_mul(5).wrapping_add(0x3849_5ab5);
    }

    let tail = &data[nblocks * 16..];
    let mut k1: u64 = 0;
    let mut k2: u64 = 0;

    if tail.len() > 8 {
        for (i, &b) in tail[8..].iter().enumerate() {
            k2 ^= (b as u64) << (8 * i);
        }
        k2 = k2.wrapping_mul(C2);
        k2 = k2.rotate_left(33);
        k2 = k2.wrapping_mul(C1);
        h2 ^= k2;
    }
    if !tail.is_empty() {
        let lower_len = tail.len().min(8);
        for (i, &b) in tail[..lower_len].iter().enumerate() {
            k1 ^= (b as u64) << (8 * i);
        }
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(31);
        k1 = k1.wrapping_mul(C2);
        h1 ^= k1;
    }

    h1 ^= data.len() as u64;
    h2 ^= data.len() as u64;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = fmix64(h1);
    h2 = fmix64(h2);

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    (h1, h2)
}

/// Hashes `data` with `seed` and returns the low 64 bits: the element
/// token used everywhere else in the crate.
pub fn hash_bytes(data: &[u8], seed: i32) -> u64 {
    hash128(data, seed).0
}

/// Hashes the native little-endian bytes of a fixed-width integer key.
pub fn hash_u8(value: u8, seed: i32) -> u64 {
    hash_bytes(&value.to_le_bytes(), seed)
}

pub fn hash_u16(value: u16, seed: i32) -> u64 {
    hash_bytes(&value.to_le_bytes(), seed)
}

pub fn hash_u32(value: u32, seed: i32) -> u64 {
    hash_bytes(&value.to_le_bytes(), seed)
}

pub fn hash_u64(value: u64, seed: i32) -> u64 {
    hash_bytes(&value.to_le_bytes(), seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_seed_derived() {
        let (lo, hi) = hash128(b"", 0);
        assert_eq!(lo, 0);
        assert_eq!(hi, 0);
    }

    #[test]
    fn deterministic_across_calls() {
        let a = hash_bytes(b"the quick brown fox", 42);
        let b = hash_bytes(b"the quick brown fox", 42);
        assert_eq!(a, b);
    }

    #[test]
    fn seed_changes_output() {
        let a = hash_bytes(b"element", 0);
        let b = hash_bytes(b"element", 1);
        assert_ne!(a, b);
    }

    #[test]
    fn distinguishes_single_byte_inputs() {
        let mut seen = std::collections::HashSet::new();
        for b in 0u8..=255 {
            seen.insert(hash_bytes(&[b], 0));
        }
        assert_eq!(seen.len(), 256);
    }

    #[test]
    fn negative_seed_still_computes() {
        // Must not panic; the warning is a side channel only.
        let a = hash_bytes(b"x", -1);
        let b = hash_bytes(b"x", -1);
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_width_keys_hash_by_le_bytes() {
        assert_eq!(hash_u64(7, 0), hash_bytes(&7u64.to_le_bytes(), 0));
        assert_eq!(hash_u32(7, 0), hash_bytes(&7u32.to_le_bytes(), 0));
        assert_eq!(hash_u16(7, 0), hash_bytes(&7u16.to_le_bytes(), 0));
        assert_eq!(hash_u8(7, 0), hash_bytes(&7u8.to_le_bytes(), 0));
    }

    #[test]
    fn long_input_exercises_block_loop_and_tail() {
        let data: Vec<u8> = (0..200u32).map(|i| (i % 256) as u8).collect();
        let h1 = hash_bytes(&data, 0);
        let h2 = hash_bytes(&data, 0);
        assert_eq!(h1, h2);
    }
}
