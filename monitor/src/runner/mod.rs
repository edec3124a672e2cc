//! Runners feeding encrypted samples through the predicate evaluator, the
//! bridge and an automaton engine.
//!
//! | runner | input order | verdict |
//! |---|---|---|
//! | [OnlineRunner] | oldest first | every sample, for the prefix |
//! | [BlockRunner] | oldest first | every `block_size` samples, for the prefix |
//! | [ReverseRunner] | most recent first | every sample, for the suffix |
//! | [OfflineRunner] | whole trace, most recent first | one per suffix |

mod block;
mod offline;
mod online;
mod plain;
mod pointwise;
mod reverse;

pub use block::*;
pub use offline::*;
pub use online::*;
pub use plain::*;
pub use pointwise::*;
pub use reverse::*;

use std::io::{Read, Write};
use std::sync::Arc;

use hemon_core::{
    ckks::CkksCiphertext,
    tfhe::{GgswFourier, LweCiphertext},
};
use rayon::prelude::*;

use crate::{
    MonitorError,
    bridge::SchemeBridge,
    config::{AccuracyMode, MonitorConfig},
    engine::verdict_mu,
    predicate::PredicateEvaluator,
    stream::{SizedReader, SizedWriter},
};

/// Sample to predicate ciphertexts to mid level booleans to TRGSW bits.
pub struct StepPipeline {
    evaluator: PredicateEvaluator,
    bridge: Arc<SchemeBridge>,
    references: Vec<f64>,
    mode: AccuracyMode,
}

impl StepPipeline {
    pub fn new(evaluator: PredicateEvaluator, bridge: Arc<SchemeBridge>) -> Self {
        Self {
            references: evaluator.references(),
            mode: bridge.config().mode,
            evaluator,
            bridge,
        }
    }

    /// Pipeline with the references and accuracy mode of `config`.
    pub fn from_config(
        config: &MonitorConfig,
        evaluator: PredicateEvaluator,
        bridge: Arc<SchemeBridge>,
    ) -> Result<Self, MonitorError> {
        let pipeline: Self = Self::new(evaluator, bridge).with_mode(config.bridge.mode);
        if config.references.is_empty() {
            Ok(pipeline)
        } else {
            pipeline.with_references(config.references.clone())
        }
    }

    pub fn with_references(mut self, references: Vec<f64>) -> Result<Self, MonitorError> {
        let expected: usize = self.evaluator.predicate_size();
        if references.len() != expected {
            return Err(MonitorError::SizeMismatch {
                expected,
                actual: references.len(),
            });
        }
        self.references = references;
        Ok(self)
    }

    pub fn with_mode(mut self, mode: AccuracyMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn signal_size(&self) -> usize {
        self.evaluator.signal_size()
    }

    pub fn predicate_size(&self) -> usize {
        self.evaluator.predicate_size()
    }

    pub fn references(&self) -> &[f64] {
        &self.references
    }

    pub fn bridge(&self) -> &SchemeBridge {
        &self.bridge
    }

    pub fn predicates(&mut self, sample: &[CkksCiphertext]) -> Result<Vec<CkksCiphertext>, MonitorError> {
        self.evaluator.evaluate(sample)
    }

    /// Mid level booleans of one predicate vector, bridged in parallel.
    pub fn booleans(&self, predicates: &[CkksCiphertext]) -> Result<Vec<LweCiphertext<u32>>, MonitorError> {
        self.bridge
            .convert_all(predicates, &self.references, self.mode)
    }

    /// TRGSW bits of one sample, coordinate order.
    pub fn bits(&mut self, sample: &[CkksCiphertext]) -> Result<Vec<GgswFourier>, MonitorError> {
        let predicates: Vec<CkksCiphertext> = self.predicates(sample)?;
        let booleans: Vec<LweCiphertext<u32>> = self.booleans(&predicates)?;
        let bridge: &SchemeBridge = &self.bridge;
        Ok(booleans
            .par_iter()
            .map(|b| bridge.circuit_bootstrap(b))
            .collect())
    }

    /// TRGSW bits of many already evaluated samples, bridged and bootstrapped
    /// in one parallel pass.
    pub fn bits_batch(&self, predicates: &[Vec<CkksCiphertext>]) -> Result<Vec<Vec<GgswFourier>>, MonitorError> {
        let p: usize = self.predicate_size();
        let (bridge, mode): (&SchemeBridge, AccuracyMode) = (&self.bridge, self.mode);
        let flat: Vec<(&CkksCiphertext, f64)> = predicates
            .iter()
            .flat_map(|sample| sample.iter().zip(self.references.iter().copied()))
            .collect();
        let bits: Vec<GgswFourier> = flat
            .par_iter()
            .map(|(ct, r)| {
                let b: LweCiphertext<u32> = bridge.convert(ct, *r, mode)?;
                Ok(bridge.circuit_bootstrap(&b))
            })
            .collect::<Result<Vec<GgswFourier>, MonitorError>>()?;
        let mut bits = bits.into_iter();
        Ok((0..predicates.len())
            .map(|_| bits.by_ref().take(p).collect())
            .collect())
    }

    /// Trivial accepting verdict, returned before any verdict is computed.
    pub fn initial_verdict(&self) -> LweCiphertext<u32> {
        LweCiphertext::trivial(self.bridge.mid_degree(), verdict_mu())
    }
}

/// Encrypted runner fed one sample at a time.
pub trait Monitor {
    /// Consumes one sample and returns the current verdict.
    fn feed(&mut self, sample: &[CkksCiphertext]) -> Result<LweCiphertext<u32>, MonitorError>;

    /// Current verdict. Does not change the runner.
    fn result(&self) -> LweCiphertext<u32>;

    fn signal_size(&self) -> usize;

    /// Whether the last [Monitor::feed] produced a new verdict.
    fn verdict_ready(&self) -> bool {
        true
    }
}

/// Feeds every sample of `input` to `monitor`, writing each new verdict to
/// `output`. Returns the number of samples read.
pub fn run_stream<M: Monitor + ?Sized, R: Read, W: Write>(
    monitor: &mut M,
    input: &mut SizedReader<R>,
    output: &mut SizedWriter<W>,
) -> Result<usize, MonitorError> {
    let mut count: usize = 0;
    while let Some(sample) = input.read_sample(monitor.signal_size())? {
        let verdict: LweCiphertext<u32> = monitor.feed(&sample)?;
        if monitor.verdict_ready() {
            output.write_verdict(&verdict)?;
        }
        count += 1;
    }
    output.flush()?;
    tracing::info!(samples = count, "input stream exhausted");
    Ok(count)
}
