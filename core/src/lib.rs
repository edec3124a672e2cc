pub mod ckks;
pub mod error;
pub mod infos;
pub mod serialization;
pub mod tfhe;


pub use error::CkksError;
pub use infos::Infos;
pub use serialization::{ReaderFrom, WriterTo};

pub(crate) const SIX_SIGMA: f64 = 6.0;
