//! The aggregation state machine: the `Uninitialized` → parameterized →
//! finalized lifecycle a reducer drives across a fold.
//!
//! `Accumulator` is a thin wrapper around `Option<Representation>` rather
//! than a fifth parallel enum, since its four non-uninitialized states are
//! exactly `Representation`'s four variants — this keeps promotion/union
//! logic in one place instead of duplicated across two state machines.

use crate::error::HllError;
use crate::params::Params;
use crate::representation::Representation;
use crate::wire;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator(Option<Representation>);

impl Accumulator {
    pub fn new() -> Self {
        Self(None)
    }

    pub fn is_uninitialized(&self) -> bool {
        self.0.is_none()
    }

    pub fn representation(&self) -> Option<&Representation> {
        self.0.as_ref()
    }

    /// If uninitialized, adopts `default_params` and becomes Empty; then
    /// inserts `token`.
    pub fn trans_add(&mut self, token: u64, default_params: Params) -> Result<(), HllError> {
        if self.0.is_none() {
            self.0 = Some(Representation::new_empty(default_params));
        }
        self.0.as_mut().unwrap().add(token);
        Ok(())
    }

    /// Decodes `encoded`; if uninitialized, adopts its parameters and
    /// becomes Empty; else verifies parameter equality (`Data` on
    /// mismatch) before folding it in.
    pub fn trans_union(&mut self, encoded: &[u8]) -> Result<(), HllError> {
        let incoming = wire::decode(encoded)?;

        match &mut self.0 {
            None => {
                self.0 = Some(Representation::new_empty(incoming.params()));
                self.0.as_mut().unwrap().union(&incoming)?;
            }
            Some(current) => {
                if current.params() != incoming.params() {
                    return Err(HllError::Data(
                        "union of mismatched parameters in aggregation state".to_string(),
                    ));
                }
                current.union(&incoming)?;
            }
        }
        Ok(())
    }

    /// `Uninitialized` → no result; else the wire-encoded frame. Does not
    /// consume `self` — finalize may run more than once against
    /// host-owned, aggregation-scoped state.
    pub fn finalize_packed(&self) -> Option<Vec<u8>> {
        self.0.as_ref().map(wire::encode)
    }

    /// `Uninitialized` → no result; else the cardinality estimate.
    pub fn finalize_card(&self) -> Result<Option<f64>, HllError> {
        match &self.0 {
            None => Ok(None),
            Some(repr) => repr.cardinality(),
        }
    }
}
