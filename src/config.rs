//! Process-wide shared configuration: defaults used when an aggregation
//! absorbs its first element, the output wire version, and the
//! Sparse/Dense selection override. These are read only at operation
//! boundaries and never become part of a sketch's identity or its
//! serialized bytes.
//!
//! Each setting is an independent scalar, so plain atomics give the
//! "updates are observed by subsequent operations" behavior without
//! needing a lock spanning multiple fields.

use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU8, Ordering};

use crate::error::HllError;
use crate::params::Params;

static DEFAULT_LOG2M: AtomicU32 = AtomicU32::new(11);
static DEFAULT_REGWIDTH: AtomicU32 = AtomicU32::new(5);
static DEFAULT_EXPTHRESH: AtomicI64 = AtomicI64::new(-1);
static DEFAULT_SPARSEON: AtomicU8 = AtomicU8::new(1);
static OUTPUT_VERSION: AtomicU8 = AtomicU8::new(1);
static MAX_SPARSE: AtomicI64 = AtomicI64::new(-1);

/// The only wire version this crate can currently write (and the only one
/// it will accept on read).
pub const SUPPORTED_WIRE_VERSION: u8 = 1;

/// Builds a [`Params`] from the current process-wide defaults, for an
/// aggregation absorbing its first element with no explicit parameters.
pub fn default_params() -> Result<Params, HllError> {
    Params::new(
        DEFAULT_LOG2M.load(Ordering::Relaxed),
        DEFAULT_REGWIDTH.load(Ordering::Relaxed),
        DEFAULT_EXPTHRESH.load(Ordering::Relaxed),
        DEFAULT_SPARSEON.load(Ordering::Relaxed) != 0,
    )
}

pub fn set_default_log2m(value: u32) -> Result<u32, HllError> {
    if !(0..=31).contains(&value) {
        return Err(HllError::Data(format!("log2m default out of range: {value}")));
    }
    Ok(DEFAULT_LOG2M.swap(value, Ordering::Relaxed))
}

pub fn set_default_regwidth(value: u32) -> Result<u32, HllError> {
    if !(1..=8).contains(&value) {
        return Err(HllError::Data(format!("regwidth default out of range: {value}")));
    }
    Ok(DEFAULT_REGWIDTH.swap(value, Ordering::Relaxed))
}

pub fn set_default_expthresh(value: i64) -> Result<i64, HllError> {
    if !(-1..=(1i64 << 32)).contains(&value) {
        return Err(HllError::Data(format!("expthresh default out of range: {value}")));
    }
    Ok(DEFAULT_EXPTHRESH.swap(value, Ordering::Relaxed))
}

pub fn set_default_sparseon(value: bool) -> bool {
    DEFAULT_SPARSEON.swap(value as u8, Ordering::Relaxed) != 0
}

/// Sets the wire version this crate will write. Only version 1 is
/// currently supported; any other value is rejected.
pub fn set_output_version(version: u8) -> Result<u8, HllError> {
    if version != SUPPORTED_WIRE_VERSION {
        return Err(HllError::Data(format!(
            "unsupported output version {version}; only {SUPPORTED_WIRE_VERSION} is writable"
        )));
    }
    Ok(OUTPUT_VERSION.swap(version, Ordering::Relaxed))
}

pub fn output_version() -> u8 {
    OUTPUT_VERSION.load(Ordering::Relaxed)
}

/// Sets the Sparse/Dense selection override: `-1` selects by comparing
/// encoded bit counts; any non-negative value selects Sparse whenever the
/// pair count is at or below that many entries.
pub fn set_max_sparse(value: i64) -> Result<i64, HllError> {
    if value < -1 {
        return Err(HllError::Data(format!("max_sparse out of range: {value}")));
    }
    Ok(MAX_SPARSE.swap(value, Ordering::Relaxed))
}

pub fn max_sparse() -> i64 {
    MAX_SPARSE.load(Ordering::Relaxed)
}
