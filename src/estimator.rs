//! Cardinality estimation: the α-corrected raw HLL estimator with
//! small-range linear-counting and large-range rescue corrections.

use crate::error::HllError;
use crate::params::Params;

/// `α(m)`, the bias-correction constant. `m <= 8` (i.e. `log2m <= 3`) is
/// only valid above `m = 8`; callers reject smaller `m` before calling
/// this, since `Params` itself permits `log2m` values down to 0.
fn alpha(m: u32) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}

/// `2^L` where `L = (maxreg - 1) + log2m`, the large-range correction's
/// hash-space-size parameter.
fn two_to_l(params: &Params) -> f64 {
    let max_register_value = params.maxreg() as u32;
    let pw_bits = max_register_value - 1;
    let l = pw_bits + params.log2m as u32;
    2f64.powi(l as i32)
}

/// Estimates cardinality from a Dense bank's harmonic sum `S = Σ 2^(-r[i])`
/// and zero-register count `z`. `m <= 8` is a `Data` error.
pub fn cardinality(params: &Params, harmonic_sum: f64, zeros: u32) -> Result<f64, HllError> {
    let m = params.m();
    if m <= 8 {
        return Err(HllError::Data(format!(
            "cardinality estimator requires m > 8, got {m}"
        )));
    }

    let alpha_msquared = alpha(m) * (m as f64) * (m as f64);
    let estimate = alpha_msquared / harmonic_sum;

    let small_cutoff = 2.5 * m as f64;
    if zeros > 0 && estimate < small_cutoff {
        return Ok((m as f64) * ((m as f64) / zeros as f64).ln());
    }

    let two_to_l = two_to_l(params);
    let large_cutoff = two_to_l / 30.0;
    if estimate <= large_cutoff {
        return Ok(estimate);
    }

    Ok(-two_to_l * (1.0 - (estimate / two_to_l)).ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dense::DenseRegisters;

    #[test]
    fn linear_counting_scenario_from_spec_s3() {
        // log2m=4, regwidth=5: register[1] = 1, all other 15 registers zero.
        let params = Params::new(4, 5, 0, false).unwrap();
        let mut dense = DenseRegisters::new(params);
        dense.add(0x0000_0000_0000_0011); // idx=1, substream=1, p=1
        let (sum, zeros) = dense.indicator();
        assert_eq!(zeros, 15);

        let est = cardinality(&params, sum, zeros).unwrap();
        let expected = 16.0 * (16.0f64 / 15.0).ln();
        assert!((est - expected).abs() < 1e-9, "{est} vs {expected}");
    }

    #[test]
    fn alpha_matches_named_constants() {
        assert_eq!(alpha(16), 0.673);
        assert_eq!(alpha(32), 0.697);
        assert_eq!(alpha(64), 0.709);
        assert!((alpha(2048) - (0.7213 / (1.0 + 1.079 / 2048.0))).abs() < 1e-12);
    }

    #[test]
    fn large_range_rescue_formula_is_finite_near_cutoff() {
        let params = Params::new(11, 5, 0, false).unwrap();
        let two_l = two_to_l(&params);
        // force an estimate just over the large-range cutoff
        let harmonic_sum = alpha(params.m()) * (params.m() as f64).powi(2) / (two_l / 30.0 + 1.0);
        let est = cardinality(&params, harmonic_sum, 0).unwrap();
        assert!(est.is_finite());
        assert!(est > 0.0);
    }

    #[test]
    fn m_at_or_below_8_is_rejected() {
        let params = Params::new(3, 5, 0, false).unwrap(); // m = 8
        assert!(cardinality(&params, 1.0, 0).is_err());
    }
}
