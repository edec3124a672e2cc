//! Arithmetic predicates over encrypted samples.
//!
//! A [`Predicate`] maps one sample to one CKKS ciphertext per atomic
//! proposition, positive exactly when the proposition holds. Comparisons are
//! strict, see [`strict_margin`]. The [`PredicateEvaluator`] checks sample
//! sizes and brings every result down to the final level expected by the
//! bridge.

mod formulas;

pub use formulas::*;

use hemon_core::{
    CkksError,
    ckks::{CkksCiphertext, CkksEvaluator, CkksParameters, CkksPlaintext, NoEmbedEncoder, RelinearizationKey},
};

use crate::MonitorError;

/// Fraction of a coordinate's reference subtracted from every comparison.
pub const STRICT_MARGIN: f64 = 1.0 / 65536.0;

/// Bias that turns `a > b` into `a - b - margin > 0`.
///
/// The bridge reads the sign of a noisy value, and an exact tie `a == b`
/// would land on either side of zero. With the bias a tie is clearly
/// negative. Values within `margin` above the bound also read as false, in
/// the plain and the encrypted path alike.
pub fn strict_margin(reference: f64) -> f64 {
    reference * STRICT_MARGIN
}

/// Scheme-A operations available to a formula.
pub struct Arith<'a> {
    pub evaluator: &'a CkksEvaluator,
    pub encoder: &'a NoEmbedEncoder,
    pub rlk: &'a RelinearizationKey,
}

impl Arith<'_> {
    /// `value` encoded at the level and scale of `ct`, for additions.
    pub fn plain_like(&self, value: f64, ct: &CkksCiphertext) -> Result<CkksPlaintext, CkksError> {
        self.encoder.encode(value, ct.level(), ct.scale())
    }

    /// `value` encoded at the level of `ct` and the nominal scale, for products.
    pub fn plain_factor(&self, value: f64, ct: &CkksCiphertext) -> Result<CkksPlaintext, CkksError> {
        self.encoder.encode(value, ct.level(), self.evaluator.params().scale)
    }

    /// `ct * value` rescaled by one level.
    pub fn scale_by(&self, ct: &CkksCiphertext, value: f64) -> Result<CkksCiphertext, CkksError> {
        let k: CkksPlaintext = self.plain_factor(value, ct)?;
        self.evaluator
            .rescale_to_next(&self.evaluator.multiply_plain(ct, &k)?)
    }

    /// Multiplication by the constant 1 followed by a rescale: moves `ct` one
    /// level down along the same scale path as a genuine product.
    pub fn align(&self, ct: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        self.scale_by(ct, 1.0)
    }

    /// `ct^2`, relinearized and rescaled.
    pub fn square(&self, ct: &CkksCiphertext) -> Result<CkksCiphertext, CkksError> {
        let sq: CkksCiphertext = self.evaluator.square(ct)?;
        let sq: CkksCiphertext = self.evaluator.relinearize(&sq, self.rlk)?;
        self.evaluator.rescale_to_next(&sq)
    }
}

/// A fixed arithmetic formula over one signal sample.
///
/// `evaluate_plain` computes the same formula on cleartext values, so that
/// `evaluate_plain(x)[i] > 0` exactly when the decryption of
/// `evaluate(enc(x))[i]` is positive.
pub trait Predicate: Send {
    /// Number of ciphertexts in one sample.
    fn signal_size(&self) -> usize;

    /// Number of atomic propositions computed per sample.
    fn predicate_size(&self) -> usize;

    /// Upper bound on the magnitude of every output coordinate.
    fn references(&self) -> Vec<f64>;

    fn evaluate(&mut self, arith: &Arith, sample: &[CkksCiphertext]) -> Result<Vec<CkksCiphertext>, CkksError>;

    fn evaluate_plain(&mut self, sample: &[f64]) -> Vec<f64>;
}

pub struct PredicateEvaluator {
    predicate: Box<dyn Predicate>,
    evaluator: CkksEvaluator,
    encoder: NoEmbedEncoder,
    rlk: RelinearizationKey,
}

impl PredicateEvaluator {
    pub fn new(params: &CkksParameters, rlk: RelinearizationKey, predicate: Box<dyn Predicate>) -> Self {
        Self {
            predicate,
            evaluator: CkksEvaluator::new(params),
            encoder: NoEmbedEncoder::new(params),
            rlk,
        }
    }

    pub fn signal_size(&self) -> usize {
        self.predicate.signal_size()
    }

    pub fn predicate_size(&self) -> usize {
        self.predicate.predicate_size()
    }

    pub fn references(&self) -> Vec<f64> {
        self.predicate.references()
    }

    pub fn evaluator(&self) -> &CkksEvaluator {
        &self.evaluator
    }

    /// One final-level ciphertext per proposition.
    pub fn evaluate(&mut self, sample: &[CkksCiphertext]) -> Result<Vec<CkksCiphertext>, MonitorError> {
        self.check_size(sample.len())?;
        for ct in sample {
            self.evaluator.params().check_ciphertext(ct)?;
            if ct.size() != 2 {
                return Err(CkksError::UnsupportedSize(ct.size()).into());
            }
        }
        let arith: Arith = Arith {
            evaluator: &self.evaluator,
            encoder: &self.encoder,
            rlk: &self.rlk,
        };
        let predicates: Vec<CkksCiphertext> = self.predicate.evaluate(&arith, sample)?;
        #[cfg(debug_assertions)]
        {
            assert_eq!(predicates.len(), self.predicate.predicate_size());
        }
        predicates
            .iter()
            .map(|ct| Ok(self.evaluator.normalize_to_final(ct)?))
            .collect()
    }

    pub fn evaluate_plain(&mut self, sample: &[f64]) -> Result<Vec<f64>, MonitorError> {
        self.check_size(sample.len())?;
        Ok(self.predicate.evaluate_plain(sample))
    }

    fn check_size(&self, actual: usize) -> Result<(), MonitorError> {
        let expected: usize = self.predicate.signal_size();
        if actual != expected {
            return Err(MonitorError::SizeMismatch { expected, actual });
        }
        Ok(())
    }
}
