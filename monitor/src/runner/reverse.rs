use hemon_core::{
    ckks::CkksCiphertext,
    tfhe::{GgswFourier, LweCiphertext},
};

use crate::{
    MonitorError,
    automaton::SuffixAutomaton,
    engine::BackwardEngine,
    runner::{Monitor, StepPipeline},
};

/// Runner fed `a_n, a_{n-1}, ..`: after `a_i` the verdict says whether
/// `a_i .. a_n` satisfies the property.
pub struct ReverseRunner {
    pipeline: StepPipeline,
    engine: BackwardEngine,
    boot_interval: usize,
    fed: usize,
}

impl ReverseRunner {
    pub fn new(pipeline: StepPipeline, automaton: SuffixAutomaton, boot_interval: usize) -> Self {
        assert!(boot_interval > 0, "boot interval must be positive");
        tracing::info!(
            states = automaton.automaton().num_states(),
            boot_interval,
            "reverse runner"
        );
        Self {
            engine: BackwardEngine::new(automaton, pipeline.bridge().mid_degree()),
            pipeline,
            boot_interval,
            fed: 0,
        }
    }
}

impl Monitor for ReverseRunner {
    fn feed(&mut self, sample: &[CkksCiphertext]) -> Result<LweCiphertext<u32>, MonitorError> {
        let bits: Vec<GgswFourier> = self.pipeline.bits(sample)?;
        let bridge = self.pipeline.bridge();
        bits.iter()
            .rev()
            .for_each(|bit| self.engine.transition(bridge.module(), bit));
        self.fed += 1;
        if self.fed % self.boot_interval == 0 {
            self.engine.refresh(bridge);
        }
        Ok(self.engine.verdict())
    }

    fn result(&self) -> LweCiphertext<u32> {
        self.engine.verdict()
    }

    fn signal_size(&self) -> usize {
        self.pipeline.signal_size()
    }
}
