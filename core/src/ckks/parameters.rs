use serde::{Deserialize, Serialize};

use crate::{Infos, ckks::CkksCiphertext, error::CkksError};

/// Parameters of the approximate scheme.
///
/// `modulus_bits = [q_0, ..., q_{L-1}, p]`: data level l has modulus
/// 2^(q_0 + ... + q_l) and the trailing `p` is the special modulus used by
/// key switching. Level L-1 is where fresh ciphertexts live, level 0 is the
/// final level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CkksParameters {
    pub ring_degree: usize,
    pub modulus_bits: Vec<u32>,
    pub scale: f64,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
}

fn default_sigma() -> f64 {
    3.2
}

impl Default for CkksParameters {
    fn default() -> Self {
        Self {
            ring_degree: 8192,
            modulus_bits: vec![60, 40, 60],
            scale: (2.0f64).powi(40),
            sigma: default_sigma(),
        }
    }
}

impl CkksParameters {
    /// Small ring degree with three data levels. Not secure.
    pub fn insecure_test() -> Self {
        Self {
            ring_degree: 256,
            modulus_bits: vec![60, 40, 40, 60],
            scale: (2.0f64).powi(40),
            sigma: default_sigma(),
        }
    }

    pub fn validate(&self) -> Result<(), CkksError> {
        if !self.ring_degree.is_power_of_two() || self.ring_degree < 2 {
            return Err(CkksError::InvalidParameters(format!(
                "ring degree must be a power of two but is {}",
                self.ring_degree
            )));
        }
        if self.modulus_bits.len() < 2 {
            return Err(CkksError::InvalidParameters(
                "modulus chain needs at least one data modulus and the special modulus".to_string(),
            ));
        }
        if self.modulus_bits.iter().any(|b| *b == 0) {
            return Err(CkksError::InvalidParameters("empty modulus in chain".to_string()));
        }
        if !(self.scale > 1.0) || self.scale.log2() >= self.modulus_bits[0] as f64 {
            return Err(CkksError::InvalidParameters(format!(
                "scale {} must be in (1, 2^{})",
                self.scale, self.modulus_bits[0]
            )));
        }
        Ok(())
    }

    /// Number of data levels.
    pub fn levels(&self) -> usize {
        self.modulus_bits.len() - 1
    }

    pub fn top_level(&self) -> usize {
        self.levels() - 1
    }

    /// Base two logarithm of the modulus of data level `level`.
    pub fn log_q(&self, level: usize) -> u32 {
        #[cfg(debug_assertions)]
        {
            assert!(level < self.levels(), "level {} >= {}", level, self.levels());
        }
        self.modulus_bits[..=level].iter().sum()
    }

    /// Bits dropped by rescaling from `level` to `level - 1`.
    pub fn rescale_bits(&self, level: usize) -> u32 {
        self.modulus_bits[level]
    }

    pub fn log_special(&self) -> u32 {
        self.modulus_bits[self.levels()]
    }

    /// Modulus of the key switching keys.
    pub fn log_pq(&self) -> u32 {
        self.log_q(self.top_level()) + self.log_special()
    }

    /// Checks that `ct` has the ring degree of these parameters and sits
    /// on one of their levels with the matching modulus.
    pub fn check_ciphertext(&self, ct: &CkksCiphertext) -> Result<(), CkksError> {
        if ct.n() != self.ring_degree {
            return Err(CkksError::InvalidCiphertext(format!(
                "ring degree {} != {}",
                ct.n(),
                self.ring_degree
            )));
        }
        if ct.level() >= self.levels() {
            return Err(CkksError::InvalidCiphertext(format!(
                "level {} outside {} levels",
                ct.level(),
                self.levels()
            )));
        }
        if ct.log_q_bits() != self.log_q(ct.level()) {
            return Err(CkksError::InvalidCiphertext(format!(
                "modulus 2^{} at level {}, expected 2^{}",
                ct.log_q_bits(),
                ct.level(),
                self.log_q(ct.level())
            )));
        }
        Ok(())
    }
}
