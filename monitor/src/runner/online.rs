use hemon_core::{
    ckks::CkksCiphertext,
    tfhe::{GgswFourier, LweCiphertext},
};

use crate::{
    MonitorError,
    automaton::PrefixAutomaton,
    engine::ForwardEngine,
    runner::{Monitor, StepPipeline},
};

/// Forward runner answering for every prefix, refreshing after every
/// transition.
pub struct OnlineRunner {
    pipeline: StepPipeline,
    engine: ForwardEngine,
    verdict: LweCiphertext<u32>,
}

impl OnlineRunner {
    pub fn new(pipeline: StepPipeline, automaton: PrefixAutomaton) -> Self {
        tracing::info!(
            states = automaton.automaton().num_states(),
            predicates = pipeline.predicate_size(),
            "online runner"
        );
        Self {
            engine: ForwardEngine::new(automaton, pipeline.bridge().mid_degree()),
            verdict: pipeline.initial_verdict(),
            pipeline,
        }
    }
}

impl Monitor for OnlineRunner {
    fn feed(&mut self, sample: &[CkksCiphertext]) -> Result<LweCiphertext<u32>, MonitorError> {
        let bits: Vec<GgswFourier> = self.pipeline.bits(sample)?;
        let bridge = self.pipeline.bridge();
        bits.iter().for_each(|bit| {
            self.engine.transition(bridge.module(), bit);
            self.engine.refresh(bridge);
        });
        self.verdict = self.engine.verdict();
        Ok(self.verdict.clone())
    }

    fn result(&self) -> LweCiphertext<u32> {
        self.verdict.clone()
    }

    fn signal_size(&self) -> usize {
        self.pipeline.signal_size()
    }
}
