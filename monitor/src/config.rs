use std::io::Read;

use hemon_core::{ckks::CkksParameters, tfhe::TfheParameters};
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Precision of the bridge descent from the coarse to the fine level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyMode {
    /// Digit decomposition over the top `high_digits * digit_bits` bits.
    #[default]
    High,
    /// Digit decomposition over the top `low_digits * digit_bits` bits.
    Low,
    /// Two key switches and a single sign bootstrap.
    Direct,
}

/// Ciphertext levels of the boolean scheme, in descent order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// 64-bit torus LWE under the CKKS secret.
    Coarse,
    /// 32-bit torus LWE/TRLWE/TRGSW, the monitor's working level.
    Mid,
    /// 32-bit torus LWE of small dimension, input of bootstrapping.
    Fine,
}

impl Level {
    pub fn next(self) -> Option<Level> {
        match self {
            Level::Coarse => Some(Level::Mid),
            Level::Mid => Some(Level::Fine),
            Level::Fine => None,
        }
    }

    pub fn word_bits(self) -> u32 {
        match self {
            Level::Coarse => u64::BITS,
            Level::Mid | Level::Fine => u32::BITS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub mode: AccuracyMode,
    /// Bits per digit of the decomposition.
    pub digit_bits: u32,
    pub high_digits: usize,
    pub low_digits: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mode: AccuracyMode::High,
            digit_bits: 4,
            high_digits: 8,
            low_digits: 3,
        }
    }
}

impl BridgeConfig {
    /// Number of digits walked by `mode`, `None` when it does not decompose.
    pub fn digits(&self, mode: AccuracyMode) -> Option<usize> {
        match mode {
            AccuracyMode::High => Some(self.high_digits),
            AccuracyMode::Low => Some(self.low_digits),
            AccuracyMode::Direct => None,
        }
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        let mid_bits: u32 = Level::Mid.word_bits();
        if self.digit_bits == 0 || self.digit_bits + 2 > mid_bits {
            return Err(MonitorError::InvalidConfig(format!(
                "digit_bits={} outside [1, {}]",
                self.digit_bits,
                mid_bits - 2
            )));
        }
        for digits in [self.high_digits, self.low_digits] {
            if digits == 0 || digits as u32 * self.digit_bits > mid_bits {
                return Err(MonitorError::InvalidConfig(format!(
                    "{} digits of {} bits do not fit a {}-bit torus",
                    digits, self.digit_bits, mid_bits
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerMode {
    Online,
    Block,
    Reverse,
    Offline,
}

/// Session configuration, loaded from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub ckks: CkksParameters,
    #[serde(default)]
    pub tfhe: TfheParameters,
    #[serde(default)]
    pub bridge: BridgeConfig,
    pub mode: RunnerMode,
    /// Elements between two refreshes of the backward engine.
    #[serde(default = "default_boot_interval")]
    pub boot_interval: usize,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Per-predicate references. Empty means the predicate's own.
    #[serde(default)]
    pub references: Vec<f64>,
}

fn default_boot_interval() -> usize {
    1
}

fn default_block_size() -> usize {
    1
}

impl MonitorConfig {
    pub fn new(mode: RunnerMode) -> Self {
        Self {
            ckks: CkksParameters::default(),
            tfhe: TfheParameters::default(),
            bridge: BridgeConfig::default(),
            mode,
            boot_interval: default_boot_interval(),
            block_size: default_block_size(),
            references: Vec::new(),
        }
    }

    /// Small parameters for tests. Not secure.
    pub fn insecure_test(mode: RunnerMode) -> Self {
        Self {
            ckks: CkksParameters::insecure_test(),
            tfhe: TfheParameters::insecure_test(),
            ..Self::new(mode)
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MonitorError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, MonitorError> {
        Self::from_reader(json.as_bytes())
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        self.ckks.validate()?;
        self.bridge.validate()?;
        if self.boot_interval == 0 {
            return Err(MonitorError::InvalidConfig("boot_interval must be positive".into()));
        }
        if self.block_size == 0 {
            return Err(MonitorError::InvalidConfig("block_size must be positive".into()));
        }
        if let Some(r) = self.references.iter().find(|r| !(r.is_finite() && **r > 0.0)) {
            return Err(MonitorError::InvalidConfig(format!("reference {} is not positive", r)));
        }
        Ok(())
    }
}
