use backend::Module;
use hemon_core::{
    ckks::CkksSecretKey,
    tfhe::{BlindRotationKey, CircuitBootstrappingKey, GlweSecret, LweSecret, LweSwitchingKey, TfheParameters},
};
use sampling::{Distributions, Source};

/// Secrets of the boolean scheme: the mid TRLWE key (its coefficients are
/// also the mid LWE key) and the fine LWE key.
pub struct BooleanSecret {
    pub glwe: GlweSecret,
    pub fine: LweSecret,
}

impl BooleanSecret {
    pub fn generate(params: &TfheParameters, source_xs: &mut Source) -> Self {
        Self {
            glwe: GlweSecret::generate(params.mid_degree, Distributions::Binary, source_xs),
            fine: LweSecret::generate(params.fine_dimension, Distributions::Binary, source_xs),
        }
    }

    /// Key of mid level LWE ciphertexts, verdicts included.
    pub fn mid(&self) -> LweSecret {
        self.glwe.to_lwe()
    }
}

/// One key per hop of the descent, plus the keys of the monitor's
/// bootstrapping operations.
pub struct KeyBundle {
    /// Coarse (CKKS secret) to mid.
    pub coarse_to_mid: LweSwitchingKey<u64, u32>,
    pub mid_to_fine: LweSwitchingKey<u32, u32>,
    /// Fine to mid.
    pub blind_rotation: BlindRotationKey,
    pub circuit_bootstrapping: CircuitBootstrappingKey,
}

impl KeyBundle {
    pub fn generate(
        module: &Module,
        params: &TfheParameters,
        sk_ckks: &CkksSecretKey,
        sk: &BooleanSecret,
        source_xa: &mut Source,
        source_xe: &mut Source,
    ) -> Self {
        let sk_coarse: LweSecret = LweSecret::from_coeffs(sk_ckks.coeffs().to_vec());
        let sk_mid: LweSecret = sk.mid();
        let coarse_to_mid: LweSwitchingKey<u64, u32> = LweSwitchingKey::generate(
            &sk_coarse,
            &sk_mid,
            params.ks_coarse_mid.gadget(),
            source_xa,
            source_xe,
            params.mid_sigma,
        );
        let mid_to_fine: LweSwitchingKey<u32, u32> = LweSwitchingKey::generate(
            &sk_mid,
            &sk.fine,
            params.ks_mid_fine.gadget(),
            source_xa,
            source_xe,
            params.fine_sigma,
        );
        let blind_rotation: BlindRotationKey = BlindRotationKey::generate(
            module,
            &sk.fine,
            &sk.glwe,
            params.blind_rotation.gadget(),
            source_xa,
            source_xe,
            params.mid_sigma,
        );
        let circuit_bootstrapping: CircuitBootstrappingKey = CircuitBootstrappingKey::generate(
            &sk.glwe,
            params.circuit_bootstrapping.gadget(),
            params.private_ks.gadget(),
            source_xa,
            source_xe,
            params.mid_sigma,
        );
        tracing::info!(
            coarse = coarse_to_mid.n_in(),
            mid = mid_to_fine.n_in(),
            fine = blind_rotation.n_lwe(),
            "generated key bundle"
        );
        Self {
            coarse_to_mid,
            mid_to_fine,
            blind_rotation,
            circuit_bootstrapping,
        }
    }
}
