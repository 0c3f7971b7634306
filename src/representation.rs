//! The sketch value itself: the tagged union of representations, plus the
//! cardinality estimator entry point.

use crate::dense::DenseRegisters;
use crate::error::HllError;
use crate::estimator;
use crate::explicit::ExplicitStorage;
use crate::params::Params;

/// A sketch's in-memory representation. `Sparse` is not a variant here —
/// it exists only as a wire encoding choice (`crate::wire`) and is always
/// materialized into `Dense` on decode: a claim of Sparse in memory
/// cannot even be expressed by this type, let alone constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum Representation {
    /// Absorbing element of union; the estimator yields "no result".
    Undefined(Params),
    /// Carries parameters only.
    Empty(Params),
    /// Ordered ascending, duplicate-free token list below capacity.
    Explicit(ExplicitStorage),
    /// Exactly `m` fixed-width registers.
    Dense(DenseRegisters),
}

impl Representation {
    pub fn new_empty(params: Params) -> Self {
        Representation::Empty(params)
    }

    pub fn params(&self) -> Params {
        match self {
            Representation::Undefined(p) => *p,
            Representation::Empty(p) => *p,
            Representation::Explicit(e) => e.params,
            Representation::Dense(d) => d.params,
        }
    }

    /// Inserts `token`, with automatic Empty → Explicit → Dense promotion.
    pub fn add(&mut self, token: u64) {
        match self {
            Representation::Undefined(_) => {}
            Representation::Empty(params) => {
                let params = *params;
                if params.explicit_capacity() == 0 {
                    let mut dense = DenseRegisters::new(params);
                    dense.add(token);
                    *self = Representation::Dense(dense);
                } else {
                    tracing::debug!(log2m = params.log2m, "promoting Empty to Explicit");
                    *self = Representation::Explicit(ExplicitStorage::with_single(params, token));
                }
            }
            Representation::Explicit(explicit) => {
                explicit.insert(token);
                if explicit.is_full() {
                    tracing::debug!(log2m = explicit.params.log2m, "promoting Explicit to Dense");
                    *self = Representation::Dense(promote_to_dense(explicit));
                }
            }
            Representation::Dense(dense) => dense.add(token),
        }
    }

    /// Unions `other` into `self`, mutating `self`. Callers are expected
    /// to have already enforced parameter equality via [`Self::params`]
    /// comparison — this method assumes `self` and `other` share
    /// parameters and only fails on a Dense/Dense register-count mismatch,
    /// which can arise if a caller skips that check.
    pub fn union(&mut self, other: &Self) -> Result<(), HllError> {
        match (&mut *self, other) {
            (_, Representation::Undefined(_)) => {
                let params = self.params();
                *self = Representation::Undefined(params);
            }
            (Representation::Undefined(_), _) => {}
            (_, Representation::Empty(_)) => {}
            (Representation::Empty(_), _) => {
                *self = other.clone();
            }
            (Representation::Explicit(a), Representation::Explicit(b)) => {
                a.union_from(b);
                if a.is_full() {
                    *self = Representation::Dense(promote_to_dense(a));
                }
            }
            (Representation::Explicit(a), Representation::Dense(b)) => {
                let mut dense = b.clone();
                dense.union_explicit(a);
                *self = Representation::Dense(dense);
            }
            (Representation::Dense(a), Representation::Explicit(b)) => {
                a.union_explicit(b);
            }
            (Representation::Dense(a), Representation::Dense(b)) => {
                a.union_dense(b)?;
            }
        }
        Ok(())
    }

    /// Estimates cardinality. `Ok(None)` is "no result" (Undefined); `Err`
    /// only arises for a Dense sketch whose `m <= 8`.
    pub fn cardinality(&self) -> Result<Option<f64>, HllError> {
        match self {
            Representation::Undefined(_) => Ok(None),
            Representation::Empty(_) => Ok(Some(0.0)),
            Representation::Explicit(e) => Ok(Some(e.len() as f64)),
            Representation::Dense(d) => {
                let (sum, zeros) = d.indicator();
                Ok(Some(estimator::cardinality(&d.params, sum, zeros)?))
            }
        }
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, Representation::Dense(_))
    }
}

fn promote_to_dense(explicit: &ExplicitStorage) -> DenseRegisters {
    let mut dense = DenseRegisters::new(explicit.params);
    for token in explicit.iter() {
        dense.add(token);
    }
    dense
}
