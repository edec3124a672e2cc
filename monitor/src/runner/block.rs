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

/// Forward runner that buffers `block_size` samples, bridges them in one
/// parallel pass and refreshes once per block.
///
/// Between two block boundaries `feed` returns the verdict of the last
/// boundary unchanged.
pub struct BlockRunner {
    pipeline: StepPipeline,
    engine: ForwardEngine,
    block_size: usize,
    pending: Vec<Vec<CkksCiphertext>>,
    verdict: LweCiphertext<u32>,
    boundary: bool,
    blocks: usize,
}

impl BlockRunner {
    pub fn new(pipeline: StepPipeline, automaton: PrefixAutomaton, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must be positive");
        tracing::info!(
            states = automaton.automaton().num_states(),
            block_size,
            "block runner"
        );
        Self {
            engine: ForwardEngine::new(automaton, pipeline.bridge().mid_degree()),
            verdict: pipeline.initial_verdict(),
            pipeline,
            block_size,
            pending: Vec::with_capacity(block_size),
            boundary: false,
            blocks: 0,
        }
    }

    /// Samples buffered since the last boundary.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Bridges and applies the buffered block. The block leaves the buffer
    /// before bridging, so a failure discards it and leaves the engine and
    /// the verdict untouched.
    fn flush_block(&mut self) -> Result<(), MonitorError> {
        let block: Vec<Vec<CkksCiphertext>> =
            std::mem::replace(&mut self.pending, Vec::with_capacity(self.block_size));
        let bits: Vec<Vec<GgswFourier>> = self.pipeline.bits_batch(&block)?;
        let bridge = self.pipeline.bridge();
        bits.iter()
            .flatten()
            .for_each(|bit| self.engine.transition(bridge.module(), bit));
        self.engine.refresh(bridge);
        self.verdict = self.engine.verdict();
        self.blocks += 1;
        tracing::info!(block = self.blocks, "block boundary");
        Ok(())
    }
}

impl Monitor for BlockRunner {
    fn feed(&mut self, sample: &[CkksCiphertext]) -> Result<LweCiphertext<u32>, MonitorError> {
        self.boundary = false;
        let predicates: Vec<CkksCiphertext> = self.pipeline.predicates(sample)?;
        self.pending.push(predicates);
        if self.pending.len() >= self.block_size {
            self.flush_block()?;
            self.boundary = true;
        }
        Ok(self.verdict.clone())
    }

    fn result(&self) -> LweCiphertext<u32> {
        self.verdict.clone()
    }

    fn signal_size(&self) -> usize {
        self.pipeline.signal_size()
    }

    fn verdict_ready(&self) -> bool {
        self.boundary
    }
}
