use hemon_core::{
    CkksError,
    ckks::{CkksCiphertext, CkksEvaluator, CkksPlaintext, NoEmbedEncoder},
};

/// Fraction of the half modulus an amplified value may reach.
pub const AMPLIFY_MARGIN: f64 = 0.9;

/// Integer factor bringing values bounded by `reference` close to, but
/// below, half of the modulus `2^log_q`.
pub fn amplification_factor(log_q: u32, scale: f64, reference: f64) -> f64 {
    let f: f64 = (2.0f64).powi(log_q as i32) * AMPLIFY_MARGIN / (2.0 * reference * scale);
    f.round().max(1.0)
}

/// Multiplies `ct` by [amplification_factor], encoded as a plaintext of
/// scale 1 so that the scale of `ct` is unchanged.
pub fn amplify(
    evaluator: &CkksEvaluator,
    encoder: &NoEmbedEncoder,
    ct: &CkksCiphertext,
    reference: f64,
) -> Result<CkksCiphertext, CkksError> {
    let f: f64 = amplification_factor(ct.log_q_bits(), ct.scale(), reference);
    let pt: CkksPlaintext = encoder.encode(f, ct.level(), 1.0)?;
    evaluator.multiply_plain(ct, &pt)
}
