//! Homomorphic automaton evaluation over TRGSW-encrypted bits.
//!
//! [ForwardEngine] tracks the current state as a one-hot vector of TRLWE
//! ciphertexts and answers for the prefix read so far. [BackwardEngine]
//! keeps one acceptance weight per state and answers for the suffix read so
//! far, bits arriving most recent first.

mod backward;
mod forward;

pub use backward::*;
pub use forward::*;

use backend::Torus;

/// Phase of an accepting verdict; rejecting verdicts carry its opposite.
pub fn verdict_mu() -> u32 {
    u32::from_f64(0.125)
}
