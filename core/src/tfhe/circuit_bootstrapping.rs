use backend::{Gadget, Module};
use sampling::Source;

use crate::tfhe::{
    BlindRotationKey, GgswCiphertext, GgswFourier, GlweCiphertext, GlweSecret, KeySwitchFunction, LweCiphertext, LweSecret,
    LweSwitchingKey, PrivateKeySwitchingKey,
};

/// Keys turning a mid level LWE bit into a TRGSW of the same bit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircuitBootstrappingKey {
    pub(crate) identity: PrivateKeySwitchingKey,
    pub(crate) times_secret: PrivateKeySwitchingKey,
    pub(crate) gadget: Gadget,
}

impl CircuitBootstrappingKey {
    pub fn generate(
        sk_glwe: &GlweSecret,
        gadget: Gadget,
        pks_gadget: Gadget,
        source_xa: &mut Source,
        source_xe: &mut Source,
        sigma: f64,
    ) -> Self {
        let sk_lwe: LweSecret = sk_glwe.to_lwe();
        let identity: PrivateKeySwitchingKey = PrivateKeySwitchingKey::generate(
            &sk_lwe,
            sk_glwe,
            KeySwitchFunction::Identity,
            pks_gadget,
            source_xa,
            source_xe,
            sigma,
        );
        let times_secret: PrivateKeySwitchingKey = PrivateKeySwitchingKey::generate(
            &sk_lwe,
            sk_glwe,
            KeySwitchFunction::TimesSecret,
            pks_gadget,
            source_xa,
            source_xe,
            sigma,
        );
        Self {
            identity,
            times_secret,
            gadget,
        }
    }

    pub fn gadget(&self) -> Gadget {
        self.gadget
    }

    /// TRGSW of the bit `phase(lwe) in [0, 1/2)`.
    ///
    /// The input is key switched to the fine level; every gadget row is then
    /// produced by a blind rotation to `±w_i/2`, shifted to `bit * w_i`, and
    /// mapped to the TRGSW rows by the two private key switching keys.
    pub fn circuit_bootstrap(
        &self,
        module: &Module,
        brk: &BlindRotationKey,
        ks_mid_fine: &LweSwitchingKey<u32, u32>,
        lwe: &LweCiphertext<u32>,
    ) -> GgswFourier {
        let l: usize = self.gadget.rows;
        let fine: LweCiphertext<u32> = ks_mid_fine.keyswitch(lwe);

        let bits: Vec<LweCiphertext<u32>> = (0..l)
            .map(|i| {
                let half: u32 = self.gadget.weight::<u32>(i) >> 1;
                let mut bit: LweCiphertext<u32> = brk.gate_bootstrap(module, &fine, half);
                bit.add_constant(half);
                bit
            })
            .collect();

        let mut rows: Vec<GlweCiphertext<u32>> = Vec::with_capacity(2 * l);
        rows.extend(bits.iter().map(|bit| self.identity.keyswitch(bit)));
        rows.extend(bits.iter().map(|bit| self.times_secret.keyswitch(bit)));
        GgswCiphertext::from_rows(rows, self.gadget).prepare(module)
    }
}
