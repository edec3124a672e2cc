//! Approximate arithmetic over power-of-two moduli.
//!
//! Values are encoded without the canonical embedding: a plaintext holds
//! `round(value * scale)` in its constant coefficient. Ciphertexts are
//! `(c_0, c_1, ...)` with phase `c_0 + c_1 * s + c_2 * s^2 + ...` mod Q_l.

mod ciphertext;
mod encryption;
mod evaluator;
mod keys;
mod parameters;
mod plaintext;

pub use ciphertext::*;
pub use evaluator::*;
pub use keys::*;
pub use parameters::*;
pub use plaintext::*;
