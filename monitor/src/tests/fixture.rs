use std::sync::{Arc, OnceLock};

use hemon_core::{
    ckks::{CkksCiphertext, CkksParameters, CkksPlaintext, CkksSecretKey, NoEmbedEncoder, RelinearizationKey},
    tfhe::{LweCiphertext, LweSecret, TfheParameters},
};
use sampling::Source;

use crate::{
    bridge::{BooleanSecret, KeyBundle, SchemeBridge},
    config::BridgeConfig,
    predicate::{Predicate, PredicateEvaluator},
    runner::StepPipeline,
};

/// Keys shared by every test of the crate, generated once.
pub(crate) struct Fixture {
    pub ckks: CkksParameters,
    pub tfhe: TfheParameters,
    pub sk_ckks: CkksSecretKey,
    pub sk_mid: LweSecret,
    pub rlk: RelinearizationKey,
    pub keys: Arc<KeyBundle>,
    pub bridge: Arc<SchemeBridge>,
}

pub(crate) fn fixture() -> &'static Fixture {
    static FIXTURE: OnceLock<Fixture> = OnceLock::new();
    FIXTURE.get_or_init(Fixture::new)
}

impl Fixture {
    fn new() -> Self {
        let ckks: CkksParameters = CkksParameters::insecure_test();
        let tfhe: TfheParameters = TfheParameters::insecure_test();
        let mut source_xs: Source = Source::new([0u8; 32]);
        let mut source_xa: Source = Source::new([1u8; 32]);
        let mut source_xe: Source = Source::new([2u8; 32]);

        let sk_ckks: CkksSecretKey = CkksSecretKey::generate(&ckks, &mut source_xs);
        let sk_bool: BooleanSecret = BooleanSecret::generate(&tfhe, &mut source_xs);
        let rlk: RelinearizationKey = RelinearizationKey::generate(&ckks, &sk_ckks, &mut source_xa, &mut source_xe);

        let mut bridge: SchemeBridge = SchemeBridge::new(&ckks, &tfhe, BridgeConfig::default());
        let keys: Arc<KeyBundle> = Arc::new(KeyBundle::generate(
            bridge.module(),
            &tfhe,
            &sk_ckks,
            &sk_bool,
            &mut source_xa,
            &mut source_xe,
        ));
        bridge.initialize(keys.clone());

        Self {
            sk_mid: sk_bool.mid(),
            ckks,
            tfhe,
            sk_ckks,
            rlk,
            keys,
            bridge: Arc::new(bridge),
        }
    }

    pub fn encryptor(&self, seed: u8) -> Encryptor {
        Encryptor {
            encoder: NoEmbedEncoder::new(&self.ckks),
            source_xa: Source::new([seed; 32]),
            source_xe: Source::new([seed.wrapping_add(128); 32]),
        }
    }

    pub fn decrypt(&self, ct: &CkksCiphertext) -> f64 {
        NoEmbedEncoder::new(&self.ckks).decode(&ct.decrypt(&self.sk_ckks))
    }

    pub fn decrypt_bool(&self, ct: &LweCiphertext<u32>) -> bool {
        ct.decrypt_bool(&self.sk_mid)
    }

    pub fn evaluator(&self, predicate: Box<dyn Predicate>) -> PredicateEvaluator {
        PredicateEvaluator::new(&self.ckks, self.rlk.clone(), predicate)
    }

    pub fn pipeline(&self, predicate: Box<dyn Predicate>) -> StepPipeline {
        StepPipeline::new(self.evaluator(predicate), self.bridge.clone())
    }
}

pub(crate) struct Encryptor {
    encoder: NoEmbedEncoder,
    source_xa: Source,
    source_xe: Source,
}

impl Encryptor {
    /// Fresh encryption at the top level and nominal scale.
    pub fn encrypt(&mut self, fx: &Fixture, value: f64) -> CkksCiphertext {
        self.encrypt_at(fx, value, fx.ckks.top_level())
    }

    pub fn encrypt_at(&mut self, fx: &Fixture, value: f64, level: usize) -> CkksCiphertext {
        let pt: CkksPlaintext = self.encoder.encode(value, level, fx.ckks.scale).unwrap();
        CkksCiphertext::encrypt_sk(&fx.ckks, &pt, &fx.sk_ckks, &mut self.source_xa, &mut self.source_xe)
    }

    pub fn encrypt_sample(&mut self, fx: &Fixture, values: &[f64]) -> Vec<CkksCiphertext> {
        values.iter().map(|v| self.encrypt(fx, *v)).collect()
    }
}
