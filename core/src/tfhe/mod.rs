//! Boolean scheme over the discretized torus.
//!
//! Phases are `b + <a, s>`: an LWE ciphertext stores `b` first and a TRLWE
//! ciphertext is the pair `(b, a)` with phase `b + a * s`.

mod blind_rotation;
mod circuit_bootstrapping;
mod ggsw;
mod glwe;
mod keyswitch;
mod lwe;
mod parameters;
mod pks;

pub use blind_rotation::*;
pub use circuit_bootstrapping::*;
pub use ggsw::*;
pub use glwe::*;
pub use keyswitch::*;
pub use lwe::*;
pub use parameters::*;
pub use pks::*;
