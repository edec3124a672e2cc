//! Conversion of CKKS predicate ciphertexts into TFHE booleans.
//!
//! A final-level CKKS ciphertext is amplified so that its value fills the
//! modulus, read as a 64-bit torus TRLWE, sample-extracted to a coarse LWE
//! under the CKKS secret and walked down the level chain to a mid level LWE
//! of `±1/8`.

mod amplify;
mod descent;
mod keys;
mod reduction;

pub use amplify::*;
pub use descent::*;
pub use keys::*;
pub use reduction::*;

use std::sync::Arc;

use backend::{Module, Poly};
use hemon_core::{
    Infos,
    ckks::{CkksCiphertext, CkksEvaluator, CkksParameters, NoEmbedEncoder},
    tfhe::{GgswFourier, GlweCiphertext, LweCiphertext, TfheParameters, constant_test_vector},
};
use rayon::prelude::*;

use crate::{
    MonitorError,
    config::{AccuracyMode, BridgeConfig},
};

/// Level of the CKKS ciphertexts the bridge expects.
pub const ENTRY_LEVEL: usize = 0;

pub struct SchemeBridge {
    ckks: CkksParameters,
    tfhe: TfheParameters,
    config: BridgeConfig,
    module: Module,
    evaluator: CkksEvaluator,
    encoder: NoEmbedEncoder,
    keys: Option<Arc<KeyBundle>>,
}

impl SchemeBridge {
    pub fn new(ckks: &CkksParameters, tfhe: &TfheParameters, config: BridgeConfig) -> Self {
        Self {
            module: Module::new(tfhe.mid_degree),
            evaluator: CkksEvaluator::new(ckks),
            encoder: NoEmbedEncoder::new(ckks),
            ckks: ckks.clone(),
            tfhe: tfhe.clone(),
            config,
            keys: None,
        }
    }

    /// Installs the key bundle.
    ///
    /// # Panics
    /// If the dimensions of the bundle do not chain coarse -> mid -> fine
    /// for the bridge's parameters.
    pub fn initialize(&mut self, keys: Arc<KeyBundle>) {
        assert_eq!(
            keys.coarse_to_mid.n_in(),
            self.ckks.ring_degree,
            "coarse to mid key does not start from the CKKS ring degree"
        );
        assert_eq!(keys.coarse_to_mid.n_out(), self.tfhe.mid_degree);
        assert_eq!(keys.mid_to_fine.n_in(), self.tfhe.mid_degree);
        assert_eq!(keys.mid_to_fine.n_out(), self.tfhe.fine_dimension);
        assert_eq!(keys.blind_rotation.n_lwe(), self.tfhe.fine_dimension);
        assert_eq!(keys.blind_rotation.n_glwe(), self.tfhe.mid_degree);
        assert_eq!(
            keys.circuit_bootstrapping.gadget(),
            self.tfhe.circuit_bootstrapping.gadget()
        );
        self.keys = Some(keys);
    }

    pub fn is_initialized(&self) -> bool {
        self.keys.is_some()
    }

    /// # Panics
    /// If [SchemeBridge::initialize] has not been called.
    pub fn keys(&self) -> &KeyBundle {
        match &self.keys {
            Some(keys) => keys,
            None => panic!("scheme bridge used before initialize"),
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn mid_degree(&self) -> usize {
        self.tfhe.mid_degree
    }

    /// Mid level LWE of `+1/8` if `ct` decrypts to a non-negative value and
    /// `-1/8` otherwise. `reference` bounds the magnitude of that value.
    pub fn convert(
        &self,
        ct: &CkksCiphertext,
        reference: f64,
        mode: AccuracyMode,
    ) -> Result<LweCiphertext<u32>, MonitorError> {
        let keys: &KeyBundle = self.keys();
        if ct.level() != ENTRY_LEVEL {
            tracing::warn!(
                level = ct.level(),
                expected = ENTRY_LEVEL,
                "bridging a ciphertext above the final level"
            );
        }
        let amplified: CkksCiphertext = amplify(&self.evaluator, &self.encoder, ct, reference)?;
        let trlwe: GlweCiphertext<u64> = reduce_to_torus(&amplified)?;
        let coarse: LweCiphertext<u64> = trlwe.sample_extract(0);
        #[cfg(debug_assertions)]
        {
            assert_eq!(coarse.n(), keys.coarse_to_mid.n_in());
        }
        Ok(descend(keys, &self.module, &self.config, &coarse, mode))
    }

    /// [SchemeBridge::convert] on every ciphertext, in parallel.
    pub fn convert_all(
        &self,
        cts: &[CkksCiphertext],
        references: &[f64],
        mode: AccuracyMode,
    ) -> Result<Vec<LweCiphertext<u32>>, MonitorError> {
        #[cfg(debug_assertions)]
        {
            assert_eq!(cts.len(), references.len());
        }
        cts.par_iter()
            .zip(references.par_iter())
            .map(|(ct, r)| self.convert(ct, *r, mode))
            .collect()
    }

    /// TRGSW of the bit carried by a mid level LWE.
    pub fn circuit_bootstrap(&self, lwe: &LweCiphertext<u32>) -> GgswFourier {
        let keys: &KeyBundle = self.keys();
        keys.circuit_bootstrapping
            .circuit_bootstrap(&self.module, &keys.blind_rotation, &keys.mid_to_fine, lwe)
    }

    /// Mid level TRLWE whose constant coefficient is `+mu` when the phase of
    /// `lwe` is in [0, 1/2) and `-mu` otherwise.
    pub fn sign_rotate(&self, lwe: &LweCiphertext<u32>, mu: u32) -> GlweCiphertext<u32> {
        let keys: &KeyBundle = self.keys();
        let fine: LweCiphertext<u32> = keys.mid_to_fine.keyswitch(lwe);
        let tv: Poly<u32> = constant_test_vector(self.tfhe.mid_degree, mu);
        keys.blind_rotation.blind_rotate(&self.module, &fine, &tv)
    }
}
