use backend::BigPoly;
use rug::Integer;

use crate::{CkksError, Infos, ckks::CkksParameters};

#[derive(Clone, Debug, PartialEq)]
pub struct CkksPlaintext {
    pub(crate) poly: BigPoly,
    pub(crate) level: usize,
    pub(crate) log_q: u32,
    pub(crate) scale: f64,
}

impl CkksPlaintext {
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn poly(&self) -> &BigPoly {
        &self.poly
    }
}

impl Infos for CkksPlaintext {
    fn n(&self) -> usize {
        self.poly.n()
    }

    fn log_q(&self) -> usize {
        self.log_q as usize
    }
}

/// Coefficient encoder: value i is stored as `round(value_i * scale)` in
/// coefficient i, so that one scalar lives in the constant coefficient.
pub struct NoEmbedEncoder {
    params: CkksParameters,
}

impl NoEmbedEncoder {
    pub fn new(params: &CkksParameters) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn encode(&self, value: f64, level: usize, scale: f64) -> Result<CkksPlaintext, CkksError> {
        self.encode_coeffs(&[value], level, scale)
    }

    pub fn encode_coeffs(&self, values: &[f64], level: usize, scale: f64) -> Result<CkksPlaintext, CkksError> {
        let n: usize = self.params.ring_degree;
        if level >= self.params.levels() {
            return Err(CkksError::InvalidTargetLevel {
                from: self.params.top_level(),
                to: level,
            });
        }
        #[cfg(debug_assertions)]
        {
            assert!(values.len() <= n, "{} values > ring degree {}", values.len(), n);
        }
        let log_q: u32 = self.params.log_q(level);
        if scale.log2() >= (log_q - 1) as f64 {
            return Err(CkksError::ScaleOutOfBounds {
                log_scale: scale.log2(),
                log_q,
            });
        }

        let bound: f64 = (2.0f64).powi(log_q as i32 - 1);
        let mut poly: BigPoly = BigPoly::alloc(n);
        for (c, v) in poly.coeffs.iter_mut().zip(values.iter()) {
            let x: f64 = (v * scale).round();
            if !x.is_finite() || x.abs() >= bound {
                return Err(CkksError::EncodingOverflow {
                    value: *v,
                    scale,
                    log_q,
                });
            }
            *c = Integer::from_f64(x).ok_or(CkksError::EncodingOverflow {
                value: *v,
                scale,
                log_q,
            })?;
        }
        poly.reduce(log_q);

        Ok(CkksPlaintext {
            poly,
            level,
            log_q,
            scale,
        })
    }

    /// Value held in the constant coefficient.
    pub fn decode(&self, pt: &CkksPlaintext) -> f64 {
        pt.poly.centered(0, pt.log_q).to_f64() / pt.scale
    }

    pub fn decode_coeffs(&self, pt: &CkksPlaintext) -> Vec<f64> {
        (0..pt.poly.n())
            .map(|i| pt.poly.centered(i, pt.log_q).to_f64() / pt.scale)
            .collect()
    }
}
