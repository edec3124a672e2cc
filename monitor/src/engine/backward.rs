use backend::{Module, Torus};
use hemon_core::tfhe::{GgswFourier, GlweCiphertext, LweCiphertext};
use rayon::prelude::*;

use crate::{automaton::SuffixAutomaton, bridge::SchemeBridge, engine::verdict_mu};

/// `weights[q]` is `+1/8` when the word read so far, taken in reverse
/// arrival order, is accepted from state `q`, and `-1/8` otherwise.
pub struct BackwardEngine {
    automaton: SuffixAutomaton,
    weights: Vec<GlweCiphertext<u32>>,
}

impl BackwardEngine {
    pub fn new(automaton: SuffixAutomaton, n: usize) -> Self {
        let mu: u32 = verdict_mu();
        let dfa = automaton.automaton();
        let weights: Vec<GlweCiphertext<u32>> = (0..dfa.num_states())
            .map(|q| GlweCiphertext::trivial_constant(n, if dfa.is_final(q) { mu } else { mu.neg() }))
            .collect();
        Self { automaton, weights }
    }

    pub fn automaton(&self) -> &SuffixAutomaton {
        &self.automaton
    }

    /// Prepends `bit` to the word: `w'[q] = CMUX(bit, w[d(q,1)], w[d(q,0)])`.
    pub fn transition(&mut self, module: &Module, bit: &GgswFourier) {
        let dfa = self.automaton.automaton();
        let weights: &[GlweCiphertext<u32>] = &self.weights;
        self.weights = (0..weights.len())
            .into_par_iter()
            .map(|q| {
                let (q0, q1) = (dfa.next(q, false), dfa.next(q, true));
                if q0 == q1 {
                    weights[q0].clone()
                } else {
                    bit.cmux(module, &weights[q1], &weights[q0])
                }
            })
            .collect();
    }

    /// Sign-bootstraps every weight back to a clean `±1/8`.
    pub fn refresh(&mut self, bridge: &SchemeBridge) {
        let mu: u32 = verdict_mu();
        self.weights.par_iter_mut().for_each(|w| {
            *w = bridge.sign_rotate(&w.sample_extract(0), mu);
        });
        tracing::debug!(states = self.weights.len(), "refreshed backward weights");
    }

    pub fn verdict(&self) -> LweCiphertext<u32> {
        self.weights[self.automaton.automaton().initial()].sample_extract(0)
    }
}
