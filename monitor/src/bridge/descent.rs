//! Level descent from the coarse LWE to a clean mid level sign bit.

use backend::{Module, Torus};
use hemon_core::tfhe::LweCiphertext;

use crate::{
    bridge::KeyBundle,
    config::{AccuracyMode, BridgeConfig},
};

/// Mid level LWE of `+1/8` when the phase of `coarse` is in [0, 1/2) and
/// `-1/8` otherwise.
pub fn descend(
    keys: &KeyBundle,
    module: &Module,
    config: &BridgeConfig,
    coarse: &LweCiphertext<u64>,
    mode: AccuracyMode,
) -> LweCiphertext<u32> {
    match config.digits(mode) {
        Some(digits) => hom_decomp(keys, module, config.digit_bits, digits, coarse),
        None => direct(keys, module, coarse),
    }
}

fn sign_mu() -> u32 {
    u32::from_f64(0.125)
}

/// Key switches coarse -> mid -> fine and sign-bootstraps once. Only
/// reliable when the phase is far from 0 and 1/2.
pub fn direct(keys: &KeyBundle, module: &Module, coarse: &LweCiphertext<u64>) -> LweCiphertext<u32> {
    let mid: LweCiphertext<u32> = keys.coarse_to_mid.keyswitch(coarse);
    let fine: LweCiphertext<u32> = keys.mid_to_fine.keyswitch(&mid);
    keys.blind_rotation.gate_bootstrap(module, &fine, sign_mu())
}

/// Sign of the top `digit_bits * digits` bits of the coarse phase.
///
/// Digit `d` (1 = least significant) is the coarse LWE shifted left by
/// `digit_bits * (digits - d)` and switched to the mid level, so that its top
/// bits hold the digit and everything below is the previous digit. Walking
/// up, every digit receives `±2^-(digit_bits+2)` from the sign of the one
/// below, which moves its lower part to the middle of a digit unit, away
/// from the key switching noise. The most significant digit then carries the
/// sign of the whole phase.
pub fn hom_decomp(
    keys: &KeyBundle,
    module: &Module,
    digit_bits: u32,
    digits: usize,
    coarse: &LweCiphertext<u64>,
) -> LweCiphertext<u32> {
    #[cfg(debug_assertions)]
    {
        assert!(digits >= 1);
        assert!(digit_bits as usize * digits <= u32::BITS as usize);
    }
    let offset: u32 = 1 << (u32::BITS - digit_bits - 1);
    let carry_mu: u32 = 1 << (u32::BITS - digit_bits - 2);

    let shifted: Vec<LweCiphertext<u32>> = (1..=digits)
        .map(|d| {
            let mut c: LweCiphertext<u64> = coarse.clone();
            c.shl_inplace(digit_bits * (digits - d) as u32);
            keys.coarse_to_mid.keyswitch(&c)
        })
        .collect();

    let to_fine = |digit: &LweCiphertext<u32>, carry: Option<&LweCiphertext<u32>>| -> LweCiphertext<u32> {
        let mut digit: LweCiphertext<u32> = digit.clone();
        if let Some(c) = carry {
            digit.add_inplace(c);
        }
        digit.add_constant(offset.neg());
        let mut fine: LweCiphertext<u32> = keys.mid_to_fine.keyswitch(&digit);
        fine.add_constant(offset);
        fine
    };

    let mut carry: Option<LweCiphertext<u32>> = None;
    for digit in &shifted[..digits - 1] {
        let fine: LweCiphertext<u32> = to_fine(digit, carry.as_ref());
        carry = Some(keys.blind_rotation.gate_bootstrap(module, &fine, carry_mu));
    }
    let fine: LweCiphertext<u32> = to_fine(&shifted[digits - 1], carry.as_ref());
    keys.blind_rotation.gate_bootstrap(module, &fine, sign_mu())
}
