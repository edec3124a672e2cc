use hemon_core::{ckks::CkksCiphertext, tfhe::LweCiphertext};

use crate::{MonitorError, runner::StepPipeline};

/// Predicates bridged to mid level booleans, without an automaton.
pub struct Pointwise {
    pipeline: StepPipeline,
}

impl Pointwise {
    pub fn new(pipeline: StepPipeline) -> Self {
        Self { pipeline }
    }

    /// One boolean per predicate of `sample`.
    pub fn feed(&mut self, sample: &[CkksCiphertext]) -> Result<Vec<LweCiphertext<u32>>, MonitorError> {
        let predicates: Vec<CkksCiphertext> = self.pipeline.predicates(sample)?;
        self.pipeline.booleans(&predicates)
    }
}
