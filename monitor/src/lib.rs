//! Monitoring of encrypted signals against temporal properties.
//!
//! Samples arrive as CKKS ciphertexts. A [`predicate::PredicateEvaluator`]
//! turns every sample into one ciphertext per atomic proposition, the
//! [`bridge::SchemeBridge`] converts each of those into a TFHE boolean, and
//! the runners in [`runner`] drive a homomorphic automaton over the resulting
//! bits, exposing an encrypted verdict.

pub mod automaton;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod predicate;
pub mod runner;
pub mod stream;

#[cfg(test)]
mod tests;

pub use automaton::{Automaton, PrefixAutomaton, SuffixAutomaton};
pub use config::{AccuracyMode, BridgeConfig, Level, MonitorConfig, RunnerMode};
pub use error::{MonitorError, StreamError};
