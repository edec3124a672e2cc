use hemon_core::{ckks::CkksCiphertext, tfhe::LweCiphertext};

use crate::{MonitorError, automaton::SuffixAutomaton, engine::BackwardEngine, runner::StepPipeline};

/// Reverse evaluation of a whole trace known in advance.
pub struct OfflineRunner {
    pipeline: StepPipeline,
    automaton: SuffixAutomaton,
    boot_interval: usize,
}

impl OfflineRunner {
    pub fn new(pipeline: StepPipeline, automaton: SuffixAutomaton, boot_interval: usize) -> Self {
        assert!(boot_interval > 0, "boot interval must be positive");
        Self {
            pipeline,
            automaton,
            boot_interval,
        }
    }

    /// `samples` in the order a [crate::runner::ReverseRunner] would receive
    /// them, most recent first. Verdict `k` covers `samples[0..=k]`.
    pub fn run(&mut self, samples: &[Vec<CkksCiphertext>]) -> Result<Vec<LweCiphertext<u32>>, MonitorError> {
        let predicates: Vec<Vec<CkksCiphertext>> = samples
            .iter()
            .map(|s| self.pipeline.predicates(s))
            .collect::<Result<_, _>>()?;
        let bits = self.pipeline.bits_batch(&predicates)?;
        tracing::info!(samples = samples.len(), "bridged offline trace");

        let bridge = self.pipeline.bridge();
        let mut engine: BackwardEngine = BackwardEngine::new(self.automaton.clone(), bridge.mid_degree());
        Ok(bits
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                sample
                    .iter()
                    .rev()
                    .for_each(|bit| engine.transition(bridge.module(), bit));
                if (i + 1) % self.boot_interval == 0 {
                    engine.refresh(bridge);
                }
                engine.verdict()
            })
            .collect())
    }
}
