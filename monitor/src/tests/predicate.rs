use hemon_core::{
    CkksError,
    ckks::{CkksCiphertext, CkksParameters, CkksSecretKey, NoEmbedEncoder, RelinearizationKey},
};
use sampling::Source;

use crate::{
    MonitorError,
    predicate::{Band, DeltaBand, Deviation, Predicate, PredicateEvaluator, SafeDistance, Threshold, strict_margin},
    tests::fixture::{Encryptor, fixture},
};

/// Encrypted and plain evaluation agree in sign and, loosely, in value.
fn assert_agreement(predicate: Box<dyn Predicate>, samples: &[Vec<f64>]) {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(11);
    let mut encrypted: PredicateEvaluator = fx.evaluator(predicate);
    samples.iter().for_each(|values| {
        let sample: Vec<CkksCiphertext> = enc.encrypt_sample(fx, values);
        let cts: Vec<CkksCiphertext> = encrypted.evaluate(&sample).unwrap();
        let plain: Vec<f64> = encrypted.evaluate_plain(values).unwrap();
        assert_eq!(cts.len(), encrypted.predicate_size());
        assert_eq!(plain.len(), encrypted.predicate_size());
        cts.iter().zip(plain.iter()).for_each(|(ct, p)| {
            assert_eq!(ct.level(), 0);
            let v: f64 = fx.decrypt(ct);
            assert!((v - p).abs() < 1e-3 * p.abs().max(1.0), "sample {:?}: {} vs {}", values, v, p);
            assert_eq!(v > 0.0, *p > 0.0, "sample {:?}", values);
        });
    });
}

fn scalars(values: &[f64]) -> Vec<Vec<f64>> {
    values.iter().map(|v| vec![*v]).collect()
}

#[test]
fn threshold_above_and_below() {
    let values: Vec<Vec<f64>> = scalars(&[100.0, 70.5, 69.5, 3.0, -40.0]);
    assert_agreement(Box::new(Threshold::above(70.0, 200.0)), &values);
    assert_agreement(Box::new(Threshold::below(70.0, 200.0)), &values);
}

#[test]
fn ties_are_false() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(14);
    let m: f64 = strict_margin(200.0);
    [Threshold::above(70.0, 200.0), Threshold::below(70.0, 200.0)]
        .into_iter()
        .for_each(|t| {
            let mut evaluator: PredicateEvaluator = fx.evaluator(Box::new(t));
            let ct: CkksCiphertext = evaluator.evaluate(&[enc.encrypt(fx, 70.0)]).unwrap().remove(0);
            assert!((fx.decrypt(&ct) + m).abs() < 1e-6, "above={}", t.above);
            assert_eq!(evaluator.evaluate_plain(&[70.0]).unwrap(), vec![-m]);
        });
    assert_agreement(Box::new(Band::new(70.0, 180.0, 300.0)), &scalars(&[70.0, 180.0]));
}

#[test]
fn band_conjunction() {
    let predicate: Band = Band::new(70.0, 180.0, 300.0);
    assert_agreement(Box::new(predicate), &scalars(&[50.0, 100.0, 179.0, 250.0]));

    let mut plain: Band = predicate;
    [(50.0, false), (100.0, true), (250.0, false)]
        .iter()
        .for_each(|(x, inside)| {
            let v: Vec<f64> = plain.evaluate_plain(&[*x]);
            assert_eq!(v[0] > 0.0 && v[1] > 0.0, *inside);
        });
}

#[test]
fn delta_band_sentinel_then_difference() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(12);
    let mut evaluator: PredicateEvaluator = fx.evaluator(Box::new(DeltaBand::new(-5.0, 5.0, 100.0)));

    let first: Vec<CkksCiphertext> = evaluator.evaluate(&[enc.encrypt(fx, 42.0)]).unwrap();
    first
        .iter()
        .for_each(|ct| assert!((fx.decrypt(ct) - 42.0).abs() < 1e-6));

    let m: f64 = strict_margin(100.0);
    let second: Vec<CkksCiphertext> = evaluator.evaluate(&[enc.encrypt(fx, 45.0)]).unwrap();
    assert!((fx.decrypt(&second[0]) - (8.0 - m)).abs() < 1e-6);
    assert!((fx.decrypt(&second[1]) - (2.0 - m)).abs() < 1e-6);

    let third: Vec<CkksCiphertext> = evaluator.evaluate(&[enc.encrypt(fx, 35.0)]).unwrap();
    assert!((fx.decrypt(&third[0]) - (-5.0 - m)).abs() < 1e-6);
    assert!((fx.decrypt(&third[1]) - (15.0 - m)).abs() < 1e-6);

    let mut plain: DeltaBand = DeltaBand::new(-5.0, 5.0, 100.0);
    assert!(!plain.primed());
    assert_eq!(plain.evaluate_plain(&[42.0]), vec![42.0, 42.0]);
    assert_eq!(plain.evaluate_plain(&[45.0]), vec![8.0 - m, 2.0 - m]);
}

#[test]
fn deviation_squares() {
    assert_agreement(
        Box::new(Deviation::new(100.0, 20.0, 1e4)),
        &scalars(&[100.0, 115.0, 125.0, 70.0, 85.5]),
    );
}

#[test]
fn safe_distance_aligns_levels() {
    assert_agreement(
        Box::new(SafeDistance::new(1.5, 0.05, 500.0)),
        &[vec![80.0, 20.0], vec![40.0, 20.0], vec![10.0, 3.0], vec![200.0, 35.0]],
    );
}

#[test]
fn size_mismatch() {
    let fx = fixture();
    let mut enc: Encryptor = fx.encryptor(13);
    let mut evaluator: PredicateEvaluator = fx.evaluator(Box::new(Threshold::above(0.0, 1.0)));
    let sample: Vec<CkksCiphertext> = enc.encrypt_sample(fx, &[1.0, 2.0]);
    assert!(matches!(
        evaluator.evaluate(&sample),
        Err(MonitorError::SizeMismatch { expected: 1, actual: 2 })
    ));
    assert!(matches!(
        evaluator.evaluate_plain(&[]),
        Err(MonitorError::SizeMismatch { expected: 1, actual: 0 })
    ));
}

#[test]
fn foreign_ciphertexts_are_rejected() {
    let fx = fixture();
    let mut evaluator: PredicateEvaluator = fx.evaluator(Box::new(Threshold::above(0.0, 1.0)));
    let scale: f64 = fx.ckks.scale;
    [
        CkksCiphertext::alloc(fx.ckks.ring_degree, 2, 7, 60, scale),
        CkksCiphertext::alloc(fx.ckks.ring_degree, 2, 1, 60, scale),
        CkksCiphertext::alloc(fx.ckks.ring_degree / 2, 2, 0, 60, scale),
    ]
    .into_iter()
    .for_each(|ct| {
        assert!(matches!(
            evaluator.evaluate(&[ct]),
            Err(MonitorError::Ckks(CkksError::InvalidCiphertext(_)))
        ));
    });
    let product: CkksCiphertext = CkksCiphertext::alloc(fx.ckks.ring_degree, 3, 0, 60, scale);
    assert!(matches!(
        evaluator.evaluate(&[product]),
        Err(MonitorError::Ckks(CkksError::UnsupportedSize(3)))
    ));
}

#[test]
fn safe_distance_needs_three_levels() {
    let params: CkksParameters = CkksParameters {
        ring_degree: 256,
        modulus_bits: vec![60, 40, 60],
        ..CkksParameters::insecure_test()
    };
    let mut source_xs: Source = Source::new([0u8; 32]);
    let mut source_xa: Source = Source::new([1u8; 32]);
    let mut source_xe: Source = Source::new([2u8; 32]);
    let sk: CkksSecretKey = CkksSecretKey::generate(&params, &mut source_xs);
    let rlk: RelinearizationKey = RelinearizationKey::generate(&params, &sk, &mut source_xa, &mut source_xe);
    let encoder: NoEmbedEncoder = NoEmbedEncoder::new(&params);
    let sample: Vec<CkksCiphertext> = [50.0, 10.0]
        .iter()
        .map(|v| {
            let pt = encoder.encode(*v, params.top_level(), params.scale).unwrap();
            CkksCiphertext::encrypt_sk(&params, &pt, &sk, &mut source_xa, &mut source_xe)
        })
        .collect();

    let mut evaluator: PredicateEvaluator =
        PredicateEvaluator::new(&params, rlk, Box::new(SafeDistance::new(1.5, 0.05, 500.0)));
    assert!(matches!(
        evaluator.evaluate(&sample),
        Err(MonitorError::Ckks(CkksError::EndOfModulusChain))
    ));
}
