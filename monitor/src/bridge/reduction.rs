use backend::Poly;
use hemon_core::{CkksError, ckks::CkksCiphertext, tfhe::GlweCiphertext};
use rug::Integer;

const POSITIVE_LIMIT: u64 = (1 << 63) - 1;
const NEGATIVE_LIMIT: u64 = 1 << 63;

/// Maps `c` in `[0, 2^log_q)` to the 64-bit torus: `round(|c| * 2^64 / Q)`,
/// negated when `c` lies in the upper half. Positive values saturate below
/// `2^63` so that the sign is kept.
pub fn torus_coefficient(c: &Integer, log_q: u32) -> u64 {
    let half: Integer = Integer::from(1) << (log_q - 1);
    if *c >= half {
        let magnitude: Integer = (Integer::from(1) << log_q) - c;
        let v: u64 = rescale_to_torus(&magnitude, log_q, &half)
            .to_u64()
            .unwrap_or(NEGATIVE_LIMIT)
            .min(NEGATIVE_LIMIT);
        v.wrapping_neg()
    } else {
        rescale_to_torus(c, log_q, &half)
            .to_u64()
            .unwrap_or(POSITIVE_LIMIT)
            .min(POSITIVE_LIMIT)
    }
}

/// `round(x * 2^64 / 2^log_q)`.
fn rescale_to_torus(x: &Integer, log_q: u32, half: &Integer) -> Integer {
    let mut scaled: Integer = Integer::from(x << 64u32);
    scaled += half;
    scaled >> log_q
}

/// Reads a size 2 CKKS ciphertext `(c0, c1)` as the 64-bit TRLWE `(b, a)`
/// with the same phase.
pub fn reduce_to_torus(ct: &CkksCiphertext) -> Result<GlweCiphertext<u64>, CkksError> {
    if ct.size() != 2 {
        return Err(CkksError::UnsupportedSize(ct.size()));
    }
    let log_q: u32 = ct.log_q_bits();
    let map = |i: usize| -> Poly<u64> {
        Poly::from_coeffs(
            ct.polys()[i]
                .coeffs
                .iter()
                .map(|c| torus_coefficient(c, log_q))
                .collect(),
        )
    };
    Ok(GlweCiphertext { b: map(0), a: map(1) })
}
