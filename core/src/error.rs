#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CkksError {
    #[error("level mismatch: {0} != {1}")]
    LevelMismatch(usize, usize),

    #[error("scale mismatch: {0} != {1}")]
    ScaleMismatch(f64, f64),

    #[error("cannot rescale or switch below level 0")]
    EndOfModulusChain,

    #[error("cannot switch from level {from} to higher level {to}")]
    InvalidTargetLevel { from: usize, to: usize },

    #[error("ciphertext of size {0} cannot be relinearized")]
    NotRelinearizable(usize),

    #[error("operation does not support ciphertexts of size {0}")]
    UnsupportedSize(usize),

    #[error("value {value} at scale {scale} does not fit modulus 2^{log_q}")]
    EncodingOverflow { value: f64, scale: f64, log_q: u32 },

    #[error("scale 2^{log_scale:.1} exceeds modulus 2^{log_q}")]
    ScaleOutOfBounds { log_scale: f64, log_q: u32 },

    #[error("ciphertext does not belong to these parameters: {0}")]
    InvalidCiphertext(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}
