use crate::{MonitorError, automaton::PrefixAutomaton, predicate::Predicate};

/// Cleartext counterpart of the forward runners.
pub struct PlainRunner {
    predicate: Box<dyn Predicate>,
    automaton: PrefixAutomaton,
    state: usize,
}

impl PlainRunner {
    pub fn new(predicate: Box<dyn Predicate>, automaton: PrefixAutomaton) -> Self {
        let state: usize = automaton.automaton().initial();
        Self {
            predicate,
            automaton,
            state,
        }
    }

    pub fn feed(&mut self, sample: &[f64]) -> Result<bool, MonitorError> {
        let expected: usize = self.predicate.signal_size();
        if sample.len() != expected {
            return Err(MonitorError::SizeMismatch {
                expected,
                actual: sample.len(),
            });
        }
        let bits: Vec<bool> = self
            .predicate
            .evaluate_plain(sample)
            .iter()
            .map(|v| *v > 0.0)
            .collect();
        self.state = self.automaton.automaton().run(self.state, &bits);
        Ok(self.result())
    }

    pub fn result(&self) -> bool {
        self.automaton.automaton().is_final(self.state)
    }
}
