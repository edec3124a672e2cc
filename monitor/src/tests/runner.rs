use hemon_core::{CkksError, ReaderFrom, ckks::CkksCiphertext, tfhe::LweCiphertext};

use crate::{
    MonitorError,
    automaton::{Automaton, PrefixAutomaton, SuffixAutomaton},
    predicate::{Band, Threshold},
    runner::{
        BlockRunner, Monitor, OfflineRunner, OnlineRunner, PlainRunner, Pointwise, ReverseRunner, StepPipeline, run_stream,
    },
    stream::{SizedReader, SizedWriter},
    tests::fixture::{Encryptor, fixture},
};

fn globally_above() -> Automaton {
    Automaton::globally(1, |b| b[0]).unwrap()
}

fn above_70() -> Box<Threshold> {
    Box::new(Threshold::above(70.0, 200.0))
}

fn decrypt_all(verdicts: &[LweCiphertext<u32>]) -> Vec<bool> {
    let fx = fixture();
    verdicts.iter().map(|v| fx.decrypt_bool(v)).collect()
}

#[test]
fn plain_globally_above_70() {
    let mut runner: PlainRunner = PlainRunner::new(above_70(), PrefixAutomaton::new(globally_above()));
    assert!(runner.result());
    let verdicts: Vec<bool> = [100.0, 90.0, 80.0, 70.0, 60.0, 80.0, 90.0]
        .iter()
        .map(|v| runner.feed(&[*v]).unwrap())
        .collect();
    assert_eq!(verdicts, vec![true, true, true, false, false, false, false]);
    assert!(matches!(
        runner.feed(&[1.0, 2.0]),
        Err(MonitorError::SizeMismatch { expected: 1, actual: 2 })
    ));
}

#[test]
fn online_globally_above_70() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(31);
    let mut runner: OnlineRunner = OnlineRunner::new(fx.pipeline(above_70()), PrefixAutomaton::new(globally_above()));
    assert!(fx.decrypt_bool(&runner.result()));

    let verdicts: Vec<LweCiphertext<u32>> = [100.0, 90.0, 80.0, 70.0, 60.0, 80.0, 90.0]
        .iter()
        .map(|v| runner.feed(&[enc.encrypt(fx, *v)]).unwrap())
        .collect();
    assert_eq!(
        decrypt_all(&verdicts),
        vec![true, true, true, false, false, false, false]
    );

    let last: LweCiphertext<u32> = runner.result();
    assert_eq!(&last, verdicts.last().unwrap());
    assert_eq!(runner.result(), last);
}

#[test]
fn online_band_conjunction() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(32);
    let mut plain: PlainRunner = PlainRunner::new(
        Box::new(Band::new(60.0, 120.0, 300.0)),
        PrefixAutomaton::new(Automaton::globally(2, |b| b[0] && b[1]).unwrap()),
    );
    let mut runner: OnlineRunner = OnlineRunner::new(
        fx.pipeline(Box::new(Band::new(60.0, 120.0, 300.0))),
        PrefixAutomaton::new(Automaton::globally(2, |b| b[0] && b[1]).unwrap()),
    );
    [100.0, 110.0, 130.0, 90.0].iter().for_each(|v| {
        let verdict: LweCiphertext<u32> = runner.feed(&[enc.encrypt(fx, *v)]).unwrap();
        assert_eq!(fx.decrypt_bool(&verdict), plain.feed(&[*v]).unwrap(), "v={}", v);
    });
}

#[test]
fn block_cadence() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(33);
    let mut runner: BlockRunner = BlockRunner::new(fx.pipeline(above_70()), PrefixAutomaton::new(globally_above()), 3);
    let initial: LweCiphertext<u32> = runner.result();

    let values: [f64; 7] = [100.0, 90.0, 80.0, 60.0, 95.0, 99.0, 98.0];
    let mut outputs: Vec<LweCiphertext<u32>> = Vec::new();
    let mut ready: Vec<bool> = Vec::new();
    values.iter().for_each(|v| {
        outputs.push(runner.feed(&[enc.encrypt(fx, *v)]).unwrap());
        ready.push(runner.verdict_ready());
    });

    assert_eq!(ready, vec![false, false, true, false, false, true, false]);
    assert_eq!(outputs[0], initial);
    assert_eq!(outputs[1], initial);
    assert_eq!(outputs[3], outputs[2]);
    assert_eq!(outputs[4], outputs[2]);
    assert_eq!(outputs[6], outputs[5]);
    assert_eq!(runner.pending(), 1);
    assert!(fx.decrypt_bool(&outputs[2]));
    assert!(!fx.decrypt_bool(&outputs[5]));
    assert_eq!(runner.result(), outputs[6]);
}

#[test]
fn block_failure_discards_the_block() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(38);
    let pipeline: StepPipeline = fx.pipeline(above_70()).with_references(vec![1e-30]).unwrap();
    let mut runner: BlockRunner = BlockRunner::new(pipeline, PrefixAutomaton::new(globally_above()), 2);
    let initial: LweCiphertext<u32> = runner.result();

    assert_eq!(runner.feed(&[enc.encrypt(fx, 100.0)]).unwrap(), initial);
    assert!(!runner.verdict_ready());
    assert_eq!(runner.pending(), 1);

    assert!(matches!(
        runner.feed(&[enc.encrypt(fx, 90.0)]),
        Err(MonitorError::Ckks(CkksError::EncodingOverflow { .. }))
    ));
    assert!(!runner.verdict_ready());
    assert_eq!(runner.pending(), 0);

    assert_eq!(runner.feed(&[enc.encrypt(fx, 80.0)]).unwrap(), initial);
    assert!(!runner.verdict_ready());
    assert_eq!(runner.pending(), 1);
    assert_eq!(runner.result(), initial);
}

fn reverse_trace() -> Vec<f64> {
    vec![100.0, 90.0, 80.0, 75.0, 60.0, 80.0, 90.0]
}

#[test]
fn reverse_suffixes() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(34);
    let mut runner: ReverseRunner = ReverseRunner::new(
        fx.pipeline(above_70()),
        SuffixAutomaton::from_reversed(&globally_above().reversed()),
        2,
    );
    assert!(fx.decrypt_bool(&runner.result()));

    let verdicts: Vec<LweCiphertext<u32>> = reverse_trace()
        .iter()
        .map(|v| runner.feed(&[enc.encrypt(fx, *v)]).unwrap())
        .collect();
    assert_eq!(
        decrypt_all(&verdicts),
        vec![true, true, true, true, false, false, false]
    );
    assert_eq!(runner.result(), runner.result());
    assert_eq!(&runner.result(), verdicts.last().unwrap());
}

#[test]
fn offline_matches_reverse() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(35);
    let samples: Vec<Vec<CkksCiphertext>> = reverse_trace()
        .iter()
        .map(|v| vec![enc.encrypt(fx, *v)])
        .collect();
    let automaton: SuffixAutomaton = SuffixAutomaton::from_forward(globally_above());

    let mut reverse: ReverseRunner = ReverseRunner::new(fx.pipeline(above_70()), automaton.clone(), 3);
    let online: Vec<LweCiphertext<u32>> = samples.iter().map(|s| reverse.feed(s).unwrap()).collect();

    let mut offline: OfflineRunner = OfflineRunner::new(fx.pipeline(above_70()), automaton, 3);
    let batch: Vec<LweCiphertext<u32>> = offline.run(&samples).unwrap();
    assert_eq!(batch, online);
}

#[test]
fn runners_reject_wrong_sample_size() {
    let fx = fixture();
    let mut runner: OnlineRunner = OnlineRunner::new(fx.pipeline(above_70()), PrefixAutomaton::new(globally_above()));
    let before: LweCiphertext<u32> = runner.result();
    assert!(matches!(
        runner.feed(&[]),
        Err(MonitorError::SizeMismatch { expected: 1, actual: 0 })
    ));
    assert_eq!(runner.result(), before);
}

#[test]
fn pointwise_booleans() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(36);
    let mut pointwise: Pointwise = Pointwise::new(fx.pipeline(Box::new(Band::new(60.0, 120.0, 300.0))));
    [(50.0, [false, true]), (100.0, [true, true]), (150.0, [true, false])]
        .iter()
        .for_each(|(v, expected)| {
            let bits: Vec<LweCiphertext<u32>> = pointwise.feed(&[enc.encrypt(fx, *v)]).unwrap();
            assert_eq!(decrypt_all(&bits), expected.to_vec(), "v={}", v);
        });
}

#[test]
fn stream_of_samples() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(37);
    let mut input: SizedWriter<Vec<u8>> = SizedWriter::new(Vec::new());
    [100.0, 40.0, 90.0]
        .iter()
        .for_each(|v| input.write_ciphertext(&enc.encrypt(fx, *v)).unwrap());
    let input: Vec<u8> = input.into_inner();

    let mut runner: OnlineRunner = OnlineRunner::new(fx.pipeline(above_70()), PrefixAutomaton::new(globally_above()));
    let mut output: SizedWriter<Vec<u8>> = SizedWriter::new(Vec::new());
    let count: usize = run_stream(&mut runner, &mut SizedReader::new(input.as_slice()), &mut output).unwrap();
    assert_eq!(count, 3);

    let output: Vec<u8> = output.into_inner();
    let mut reader: SizedReader<&[u8]> = SizedReader::new(output.as_slice());
    let mut verdicts: Vec<bool> = Vec::new();
    while let Some(record) = reader.read_record().unwrap() {
        let mut ct: LweCiphertext<u32> = LweCiphertext::default();
        ct.read_from(&mut record.as_slice()).unwrap();
        verdicts.push(fx.decrypt_bool(&ct));
    }
    assert_eq!(verdicts, vec![true, false, false]);
}
