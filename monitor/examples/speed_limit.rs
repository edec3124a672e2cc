use std::sync::Arc;

use hemon_core::{
    ckks::{CkksCiphertext, CkksPlaintext, CkksSecretKey, NoEmbedEncoder, RelinearizationKey},
    tfhe::{LweCiphertext, LweSecret},
};
use hemon_monitor::{
    Automaton, MonitorConfig, MonitorError, PrefixAutomaton, RunnerMode,
    bridge::{BooleanSecret, KeyBundle, SchemeBridge},
    predicate::{PredicateEvaluator, Threshold},
    runner::{Monitor, OnlineRunner, PlainRunner, StepPipeline},
};
use sampling::Source;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), MonitorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config: MonitorConfig = MonitorConfig::insecure_test(RunnerMode::Online);
    let mut source_xs: Source = Source::new([0u8; 32]);
    let mut source_xa: Source = Source::new([1u8; 32]);
    let mut source_xe: Source = Source::new([2u8; 32]);

    // Client side keys.
    let sk_ckks: CkksSecretKey = CkksSecretKey::generate(&config.ckks, &mut source_xs);
    let sk_bool: BooleanSecret = BooleanSecret::generate(&config.tfhe, &mut source_xs);
    let sk_verdict: LweSecret = sk_bool.mid();
    let rlk: RelinearizationKey = RelinearizationKey::generate(&config.ckks, &sk_ckks, &mut source_xa, &mut source_xe);

    let mut bridge: SchemeBridge = SchemeBridge::new(&config.ckks, &config.tfhe, config.bridge);
    let keys: KeyBundle = KeyBundle::generate(
        bridge.module(),
        &config.tfhe,
        &sk_ckks,
        &sk_bool,
        &mut source_xa,
        &mut source_xe,
    );
    bridge.initialize(Arc::new(keys));

    // G(speed < 130), speeds bounded by 300.
    let limit = || Box::new(Threshold::below(130.0, 300.0));
    let dfa: PrefixAutomaton = PrefixAutomaton::new(Automaton::globally(1, |b| b[0])?);
    let evaluator: PredicateEvaluator = PredicateEvaluator::new(&config.ckks, rlk, limit());
    let pipeline: StepPipeline = StepPipeline::from_config(&config, evaluator, Arc::new(bridge))?;
    let mut runner: OnlineRunner = OnlineRunner::new(pipeline, dfa.clone());
    let mut plain: PlainRunner = PlainRunner::new(limit(), dfa);

    let encoder: NoEmbedEncoder = NoEmbedEncoder::new(&config.ckks);
    for speed in [95.0, 110.0, 128.5, 131.0, 90.0] {
        let pt: CkksPlaintext = encoder.encode(speed, config.ckks.top_level(), config.ckks.scale)?;
        let ct: CkksCiphertext = CkksCiphertext::encrypt_sk(&config.ckks, &pt, &sk_ckks, &mut source_xa, &mut source_xe);
        let verdict: LweCiphertext<u32> = runner.feed(&[ct])?;
        println!(
            "speed {:>6.1}: encrypted {} plain {}",
            speed,
            verdict.decrypt_bool(&sk_verdict),
            plain.feed(&[speed])?
        );
    }
    Ok(())
}
