use backend::{Module, Torus};
use hemon_core::tfhe::{GgswFourier, GlweCiphertext, LweCiphertext};
use rayon::prelude::*;

use crate::{automaton::PrefixAutomaton, bridge::SchemeBridge, engine::verdict_mu};

/// One-hot state vector: the constant coefficient of `states[q]` is `1/4`
/// on the current state and 0 elsewhere.
pub struct ForwardEngine {
    automaton: PrefixAutomaton,
    states: Vec<GlweCiphertext<u32>>,
}

fn quarter() -> u32 {
    u32::from_f64(0.25)
}

impl ForwardEngine {
    pub fn new(automaton: PrefixAutomaton, n: usize) -> Self {
        let initial: usize = automaton.automaton().initial();
        let states: Vec<GlweCiphertext<u32>> = (0..automaton.automaton().num_states())
            .map(|q| GlweCiphertext::trivial_constant(n, if q == initial { quarter() } else { 0 }))
            .collect();
        Self { automaton, states }
    }

    pub fn automaton(&self) -> &PrefixAutomaton {
        &self.automaton
    }

    pub fn states(&self) -> &[GlweCiphertext<u32>] {
        &self.states
    }

    /// Moves the one-hot vector along the edge labelled by `bit`:
    /// `s'[q'] = sum_{d(q,1)=q'} bit*s[q] + sum_{d(q,0)=q'} (s[q] - bit*s[q])`.
    pub fn transition(&mut self, module: &Module, bit: &GgswFourier) {
        let dfa = self.automaton.automaton();
        let products: Vec<Option<GlweCiphertext<u32>>> = self
            .states
            .par_iter()
            .enumerate()
            .map(|(q, s)| (dfa.next(q, false) != dfa.next(q, true)).then(|| bit.external_product(module, s)))
            .collect();

        let n: usize = bit.n();
        let mut next: Vec<GlweCiphertext<u32>> = vec![GlweCiphertext::alloc(n); self.states.len()];
        self.states
            .iter()
            .zip(products.iter())
            .enumerate()
            .for_each(|(q, (s, prod))| {
                let (q0, q1) = (dfa.next(q, false), dfa.next(q, true));
                match prod {
                    None => next[q0].add_inplace(s),
                    Some(prod) => {
                        next[q1].add_inplace(prod);
                        next[q0].add_inplace(s);
                        next[q0].sub_inplace(prod);
                    }
                }
            });
        self.states = next;
    }

    /// Bootstraps every state back to a noiseless-looking `0` or `1/4`.
    pub fn refresh(&mut self, bridge: &SchemeBridge) {
        let mu: u32 = verdict_mu();
        self.states.par_iter_mut().for_each(|s| {
            let mut lwe: LweCiphertext<u32> = s.sample_extract(0);
            lwe.add_constant(mu.neg());
            let mut fresh: GlweCiphertext<u32> = bridge.sign_rotate(&lwe, mu);
            fresh.add_constant(mu);
            *s = fresh;
        });
        tracing::debug!(states = self.states.len(), "refreshed forward states");
    }

    /// `+1/8` if the current state is accepting, `-1/8` otherwise.
    pub fn verdict(&self) -> LweCiphertext<u32> {
        let dfa = self.automaton.automaton();
        let n: usize = self.states[0].b.n();
        dfa.finals()
            .fold(LweCiphertext::trivial(n, verdict_mu().neg()), |mut acc, q| {
                acc.add_inplace(&self.states[q].sample_extract(0));
                acc
            })
    }
}
