//! The Explicit representation: an exact, ascending, duplicate-free set of
//! 64-bit tokens used below the Explicit capacity.

use std::collections::BTreeSet;

use crate::params::Params;

/// A `BTreeSet<i64>` keeps the signed-ascending, duplicate-free ordering by
/// construction rather than re-sorting a `Vec` on every insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitStorage {
    pub(crate) params: Params,
    tokens: BTreeSet<i64>,
}

impl ExplicitStorage {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            tokens: BTreeSet::new(),
        }
    }

    pub fn with_single(params: Params, token: u64) -> Self {
        let mut s = Self::new(params);
        s.insert(token);
        s
    }

    pub fn insert(&mut self, token: u64) {
        self.tokens.insert(token as i64);
    }

    pub fn len(&self) -> u64 {
        self.tokens.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tokens.len() as u64 > self.params.explicit_capacity()
    }

    pub fn union_from(&mut self, other: &Self) {
        self.tokens.extend(other.tokens.iter());
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.tokens.iter().map(|&t| t as u64)
    }

    pub fn bytes_len(&self) -> usize {
        self.tokens.len() * size_of::<i64>()
    }

    pub fn to_bytes(&self, buf: &mut [u8]) {
        for (i, token) in self.tokens.iter().enumerate() {
            let start = i * size_of::<i64>();
            buf[start..start + size_of::<i64>()].copy_from_slice(&token.to_be_bytes());
        }
    }

    /// Decodes a big-endian token list, revalidating ascending order as it
    /// goes. An out-of-order or duplicate frame is a `Data` error rather
    /// than being silently absorbed into the resulting set.
    pub fn from_bytes(params: Params, buf: &[u8]) -> Result<Self, crate::error::HllError> {
        if buf.len() % size_of::<i64>() != 0 {
            return Err(crate::error::HllError::Data(format!(
                "explicit body length {} is not a multiple of 8",
                buf.len()
            )));
        }

        let mut tokens = BTreeSet::new();
        let mut prev: Option<i64> = None;
        for chunk in buf.chunks_exact(size_of::<i64>()) {
            let value = i64::from_be_bytes(chunk.try_into().unwrap());
            if let Some(p) = prev {
                if value <= p {
                    return Err(crate::error::HllError::Data(
                        "explicit token list is not strictly ascending".to_string(),
                    ));
                }
            }
            prev = Some(value);
            tokens.insert(value);
        }

        Ok(Self { params, tokens })
    }
}
