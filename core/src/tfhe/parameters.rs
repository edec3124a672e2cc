use backend::Gadget;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GadgetParameters {
    pub base2k: usize,
    pub rows: usize,
}

impl GadgetParameters {
    pub const fn new(base2k: usize, rows: usize) -> Self {
        Self { base2k, rows }
    }

    pub fn gadget(&self) -> Gadget {
        Gadget::new(self.base2k, self.rows)
    }
}

/// Parameters of the boolean scheme and of the level chain
/// coarse (64-bit LWE) -> mid (32-bit TRLWE) -> fine (32-bit small LWE).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TfheParameters {
    /// Ring degree of the mid level TRLWE/TRGSW.
    pub mid_degree: usize,
    /// Noise standard deviation of mid level encryptions, as a torus fraction.
    pub mid_sigma: f64,
    /// Dimension of the fine level LWE.
    pub fine_dimension: usize,
    pub fine_sigma: f64,
    /// Gadget of the blind rotation key.
    pub blind_rotation: GadgetParameters,
    /// Gadget of the TRGSW produced by circuit bootstrapping.
    pub circuit_bootstrapping: GadgetParameters,
    pub ks_coarse_mid: GadgetParameters,
    pub ks_mid_fine: GadgetParameters,
    /// Gadget of the private functional key switching keys.
    pub private_ks: GadgetParameters,
}

impl Default for TfheParameters {
    fn default() -> Self {
        Self {
            mid_degree: 1024,
            mid_sigma: (2.0f64).powi(-25),
            fine_dimension: 635,
            fine_sigma: (2.0f64).powi(-15),
            blind_rotation: GadgetParameters::new(4, 5),
            circuit_bootstrapping: GadgetParameters::new(3, 5),
            ks_coarse_mid: GadgetParameters::new(2, 8),
            ks_mid_fine: GadgetParameters::new(2, 7),
            private_ks: GadgetParameters::new(4, 6),
        }
    }
}

impl TfheParameters {
    /// Small dimensions for tests. Not secure.
    pub fn insecure_test() -> Self {
        Self {
            mid_degree: 512,
            mid_sigma: (2.0f64).powi(-28),
            fine_dimension: 32,
            fine_sigma: (2.0f64).powi(-20),
            blind_rotation: GadgetParameters::new(4, 5),
            circuit_bootstrapping: GadgetParameters::new(3, 5),
            ks_coarse_mid: GadgetParameters::new(2, 7),
            ks_mid_fine: GadgetParameters::new(2, 7),
            private_ks: GadgetParameters::new(4, 6),
        }
    }
}
