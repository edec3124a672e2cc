//! Deterministic automata over single bits.
//!
//! A sample with `p` predicates is read as `p` consecutive bits, coordinate
//! 0 first, so a property over samples is an automaton whose accepting
//! states are only visited at sample boundaries.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::io::Read;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Largest number of predicates the per-sample constructors expand.
const MAX_ELEMENT_BITS: usize = 16;

/// On-disk layout: `transitions[q] = [next on 0, next on 1]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct AutomatonDef {
    initial: usize,
    finals: Vec<usize>,
    transitions: Vec<[usize; 2]>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AutomatonDef", into = "AutomatonDef")]
pub struct Automaton {
    initial: usize,
    accepting: Vec<bool>,
    transitions: Vec<[usize; 2]>,
}

impl TryFrom<AutomatonDef> for Automaton {
    type Error = MonitorError;

    fn try_from(def: AutomatonDef) -> Result<Self, Self::Error> {
        Automaton::new(def.initial, &def.finals, def.transitions)
    }
}

impl From<Automaton> for AutomatonDef {
    fn from(a: Automaton) -> Self {
        AutomatonDef {
            initial: a.initial,
            finals: a.finals().collect(),
            transitions: a.transitions,
        }
    }
}

impl Automaton {
    pub fn new(initial: usize, finals: &[usize], transitions: Vec<[usize; 2]>) -> Result<Self, MonitorError> {
        let n: usize = transitions.len();
        if n == 0 {
            return Err(MonitorError::InvalidAutomaton("no states".into()));
        }
        if initial >= n {
            return Err(MonitorError::InvalidAutomaton(format!(
                "initial state {} out of {} states",
                initial, n
            )));
        }
        if let Some((q, t)) = transitions
            .iter()
            .enumerate()
            .find(|(_, t)| t[0] >= n || t[1] >= n)
        {
            return Err(MonitorError::InvalidAutomaton(format!(
                "state {} has transition {:?} out of {} states",
                q, t, n
            )));
        }
        let mut accepting: Vec<bool> = vec![false; n];
        for q in finals {
            if *q >= n {
                return Err(MonitorError::InvalidAutomaton(format!(
                    "final state {} out of {} states",
                    q, n
                )));
            }
            accepting[*q] = true;
        }
        Ok(Self {
            initial,
            accepting,
            transitions,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MonitorError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MonitorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, MonitorError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    pub fn initial(&self) -> usize {
        self.initial
    }

    pub fn is_final(&self, q: usize) -> bool {
        self.accepting[q]
    }

    pub fn finals(&self) -> impl Iterator<Item = usize> + '_ {
        self.accepting
            .iter()
            .enumerate()
            .filter_map(|(q, f)| f.then_some(q))
    }

    #[inline]
    pub fn next(&self, q: usize, bit: bool) -> usize {
        self.transitions[q][bit as usize]
    }

    /// State reached from `q` after reading `bits`.
    pub fn run(&self, q: usize, bits: &[bool]) -> usize {
        bits.iter().fold(q, |q, b| self.next(q, *b))
    }

    pub fn accepts(&self, bits: &[bool]) -> bool {
        self.is_final(self.run(self.initial, bits))
    }

    /// Automaton of the reversed language, by reversing every edge and
    /// determinising with the subset construction.
    pub fn reversed(&self) -> Automaton {
        let n: usize = self.num_states();
        let mut preds: [Vec<Vec<usize>>; 2] = [vec![Vec::new(); n], vec![Vec::new(); n]];
        self.transitions.iter().enumerate().for_each(|(q, t)| {
            preds[0][t[0]].push(q);
            preds[1][t[1]].push(q);
        });

        let start: Vec<usize> = self.finals().collect();
        let mut index: BTreeMap<Vec<usize>, usize> = BTreeMap::new();
        let mut subsets: Vec<Vec<usize>> = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        index.insert(start.clone(), 0);
        subsets.push(start);
        queue.push_back(0);

        let mut transitions: Vec<[usize; 2]> = Vec::new();
        while let Some(id) = queue.pop_front() {
            let mut row: [usize; 2] = [0; 2];
            for (bit, pred) in preds.iter().enumerate() {
                let next: Vec<usize> = subsets[id]
                    .iter()
                    .flat_map(|q| pred[*q].iter().copied())
                    .sorted_unstable()
                    .dedup()
                    .collect();
                row[bit] = match index.get(&next) {
                    Some(j) => *j,
                    None => {
                        let j: usize = subsets.len();
                        index.insert(next.clone(), j);
                        subsets.push(next);
                        queue.push_back(j);
                        j
                    }
                };
            }
            #[cfg(debug_assertions)]
            {
                assert_eq!(id, transitions.len());
            }
            transitions.push(row);
        }

        let accepting: Vec<bool> = subsets.iter().map(|s| s.contains(&self.initial)).collect();
        tracing::debug!(states = n, reversed = subsets.len(), "reversed automaton");
        Automaton {
            initial: 0,
            accepting,
            transitions,
        }
    }

    /// Smallest equivalent automaton, states numbered in breadth-first order
    /// from the initial state. Two automata of the same language minimise to
    /// equal values.
    pub fn minimized(&self) -> Automaton {
        let reachable: Vec<usize> = self.reachable();

        let mut class: Vec<usize> = vec![usize::MAX; self.num_states()];
        reachable
            .iter()
            .for_each(|q| class[*q] = self.accepting[*q] as usize);
        let mut classes: usize = 0;
        loop {
            let mut ids: HashMap<(usize, usize, usize), usize> = HashMap::new();
            let refined: Vec<(usize, usize)> = reachable
                .iter()
                .map(|q| {
                    let t: [usize; 2] = self.transitions[*q];
                    let key: (usize, usize, usize) = (class[*q], class[t[0]], class[t[1]]);
                    let next_id: usize = ids.len();
                    (*q, *ids.entry(key).or_insert(next_id))
                })
                .collect();
            refined.iter().for_each(|(q, c)| class[*q] = *c);
            if ids.len() == classes {
                break;
            }
            classes = ids.len();
        }

        // Renumber classes breadth-first from the initial one.
        let mut order: Vec<usize> = vec![usize::MAX; classes];
        let mut representative: Vec<usize> = Vec::with_capacity(classes);
        let mut queue: VecDeque<usize> = VecDeque::new();
        order[class[self.initial]] = 0;
        representative.push(self.initial);
        queue.push_back(self.initial);
        while let Some(q) = queue.pop_front() {
            for next in self.transitions[q] {
                if order[class[next]] == usize::MAX {
                    order[class[next]] = representative.len();
                    representative.push(next);
                    queue.push_back(next);
                }
            }
        }

        let transitions: Vec<[usize; 2]> = representative
            .iter()
            .map(|q| {
                let t: [usize; 2] = self.transitions[*q];
                [order[class[t[0]]], order[class[t[1]]]]
            })
            .collect();
        let accepting: Vec<bool> = representative.iter().map(|q| self.accepting[*q]).collect();
        Automaton {
            initial: 0,
            accepting,
            transitions,
        }
    }

    fn reachable(&self) -> Vec<usize> {
        let mut seen: Vec<bool> = vec![false; self.num_states()];
        let mut order: Vec<usize> = vec![self.initial];
        seen[self.initial] = true;
        let mut i: usize = 0;
        while i < order.len() {
            for next in self.transitions[order[i]] {
                if !seen[next] {
                    seen[next] = true;
                    order.push(next);
                }
            }
            i += 1;
        }
        order
    }

    /// `G(pred)`: every sample of `predicates` bits satisfies `pred`.
    pub fn globally<F: Fn(&[bool]) -> bool>(predicates: usize, pred: F) -> Result<Automaton, MonitorError> {
        Self::per_sample(predicates, pred, true)
    }

    /// `F(pred)`: some sample of `predicates` bits satisfies `pred`.
    pub fn eventually<F: Fn(&[bool]) -> bool>(predicates: usize, pred: F) -> Result<Automaton, MonitorError> {
        Self::per_sample(predicates, pred, false)
    }

    /// A trie over the bits of one sample hanging below state 0, plus one
    /// absorbing state: the sink for `G`, the accepting state for `F`.
    fn per_sample<F: Fn(&[bool]) -> bool>(p: usize, pred: F, globally: bool) -> Result<Automaton, MonitorError> {
        if p == 0 || p > MAX_ELEMENT_BITS {
            return Err(MonitorError::InvalidAutomaton(format!(
                "{} predicates per sample outside [1, {}]",
                p, MAX_ELEMENT_BITS
            )));
        }
        let node = |len: usize, prefix: usize| (1usize << len) - 1 + prefix;
        let absorbing: usize = (1usize << p) - 1;

        let mut transitions: Vec<[usize; 2]> = vec![[absorbing; 2]; absorbing + 1];
        let mut bits: Vec<bool> = vec![false; p];
        (0..p).for_each(|len| {
            (0..1usize << len).for_each(|prefix| {
                (0..2usize).for_each(|b| {
                    let word: usize = prefix << 1 | b;
                    transitions[node(len, prefix)][b] = if len + 1 < p {
                        node(len + 1, word)
                    } else {
                        bits.iter_mut()
                            .enumerate()
                            .for_each(|(i, x)| *x = (word >> (p - 1 - i)) & 1 == 1);
                        if pred(&bits) != globally { absorbing } else { 0 }
                    };
                })
            })
        });

        let finals: [usize; 1] = if globally { [0] } else { [absorbing] };
        Automaton::new(0, &finals, transitions)
    }
}

/// Automaton read by the forward runners: after a prefix `a_1 .. a_i` its
/// state tells whether the prefix satisfies the property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixAutomaton(Arc<Automaton>);

impl PrefixAutomaton {
    pub fn new(dfa: Automaton) -> Self {
        Self(Arc::new(dfa))
    }

    pub fn automaton(&self) -> &Automaton {
        &self.0
    }
}

/// Automaton read by the reverse runners, which consume `a_n, a_{n-1}, ..`
/// and report whether each suffix `a_i .. a_n` satisfies the property.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuffixAutomaton(Arc<Automaton>);

impl SuffixAutomaton {
    /// From the automaton of the property itself.
    pub fn from_forward(dfa: Automaton) -> Self {
        Self(Arc::new(dfa))
    }

    /// From an automaton of the reversed property.
    pub fn from_reversed(dfa: &Automaton) -> Self {
        Self(Arc::new(dfa.reversed().minimized()))
    }

    /// Automaton of the property.
    pub fn automaton(&self) -> &Automaton {
        &self.0
    }
}
