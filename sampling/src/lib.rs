pub mod distributions;
pub mod source;

pub use distributions::{BoundedNormal, Distributions};
pub use source::{Source, new_seed};
