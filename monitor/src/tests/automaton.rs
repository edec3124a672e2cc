use crate::{
    MonitorError,
    automaton::{Automaton, SuffixAutomaton},
};

/// All words over {0, 1} of length at most `max_len`.
fn words(max_len: usize) -> Vec<Vec<bool>> {
    (0..=max_len)
        .flat_map(|len| (0..1usize << len).map(move |w| (0..len).map(|i| (w >> i) & 1 == 1).collect()))
        .collect()
}

/// Accepts words containing "11".
fn contains_11() -> Automaton {
    Automaton::new(0, &[2], vec![[0, 1], [0, 2], [2, 2]]).unwrap()
}

/// `contains_11` with a duplicated accepting sink and an unreachable state.
fn contains_11_redundant() -> Automaton {
    Automaton::new(0, &[2, 3], vec![[0, 1], [0, 2], [3, 2], [3, 3], [4, 0]]).unwrap()
}

fn samples() -> Vec<Automaton> {
    vec![
        contains_11(),
        contains_11_redundant(),
        Automaton::globally(1, |b| b[0]).unwrap(),
        Automaton::globally(2, |b| b[0] && b[1]).unwrap(),
        Automaton::eventually(2, |b| b[0] != b[1]).unwrap(),
        // Last bit is 1.
        Automaton::new(0, &[1], vec![[0, 1], [0, 1]]).unwrap(),
    ]
}

#[test]
fn globally_single_predicate() {
    let g: Automaton = Automaton::globally(1, |b| b[0]).unwrap();
    assert!(g.accepts(&[]));
    assert!(g.accepts(&[true, true, true]));
    assert!(!g.accepts(&[true, false, true]));
    assert_eq!(g.num_states(), 2);
}

#[test]
fn per_sample_bits() {
    let g: Automaton = Automaton::globally(2, |b| b[0] && b[1]).unwrap();
    assert!(g.accepts(&[true, true, true, true]));
    assert!(!g.accepts(&[true, true, true, false]));
    // Inside a sample nothing is accepted.
    assert!(!g.accepts(&[true]));
    assert!(!g.accepts(&[true, true, true]));

    let f: Automaton = Automaton::eventually(2, |b| !b[0] && b[1]).unwrap();
    assert!(!f.accepts(&[true, true, true, false]));
    assert!(f.accepts(&[true, true, false, true]));
    assert!(f.accepts(&[false, true, false, false]));

    assert!(matches!(
        Automaton::globally(0, |_| true),
        Err(MonitorError::InvalidAutomaton(_))
    ));
}

#[test]
fn reversal_matches_enumeration() {
    samples().iter().for_each(|a| {
        let r: Automaton = a.reversed();
        words(8).iter().for_each(|w| {
            let rev: Vec<bool> = w.iter().rev().copied().collect();
            assert_eq!(r.accepts(w), a.accepts(&rev), "word {:?}", w);
        });
    });
}

#[test]
fn minimization_keeps_language() {
    samples().iter().for_each(|a| {
        let m: Automaton = a.minimized();
        assert!(m.num_states() <= a.num_states());
        assert_eq!(m.minimized(), m);
        words(8)
            .iter()
            .for_each(|w| assert_eq!(m.accepts(w), a.accepts(w), "word {:?}", w));
        assert_eq!(a.reversed().reversed().minimized(), m);
    });
    assert_eq!(contains_11_redundant().minimized(), contains_11().minimized());
    assert_eq!(contains_11_redundant().minimized().num_states(), 3);
}

#[test]
fn suffix_automaton_orientation() {
    let g: Automaton = Automaton::globally(1, |b| b[0]).unwrap();
    let forward: SuffixAutomaton = SuffixAutomaton::from_forward(g.clone());
    let reversed: SuffixAutomaton = SuffixAutomaton::from_reversed(&g.reversed());
    assert_eq!(forward.automaton(), &g);
    assert_eq!(reversed.automaton(), &g.minimized());

    let c: Automaton = Automaton::new(0, &[1], vec![[0, 1], [0, 1]]).unwrap();
    let suffix: SuffixAutomaton = SuffixAutomaton::from_reversed(&c.reversed());
    words(6)
        .iter()
        .for_each(|w| assert_eq!(suffix.automaton().accepts(w), c.accepts(w)));
}

#[test]
fn json_round_trip() {
    let a: Automaton = contains_11();
    let json: String = a.to_json().unwrap();
    assert_eq!(json, r#"{"initial":0,"finals":[2],"transitions":[[0,1],[0,2],[2,2]]}"#);
    assert_eq!(Automaton::from_json(&json).unwrap(), a);
    assert_eq!(Automaton::from_reader(json.as_bytes()).unwrap(), a);

    assert!(Automaton::from_json(r#"{"initial":0,"finals":[],"transitions":[[0,3]]}"#).is_err());
    assert!(Automaton::from_json(r#"{"initial":2,"finals":[],"transitions":[[0,0]]}"#).is_err());
    assert!(Automaton::from_json(r#"{"initial":0,"finals":[5],"transitions":[[0,0]]}"#).is_err());
    assert!(Automaton::from_json(r#"{"initial":0,"finals":[],"transitions":[]}"#).is_err());
}
