pub trait Infos {
    /// Ring degree for polynomial types, dimension for LWE types.
    fn n(&self) -> usize;

    /// Base two logarithm of the ciphertext modulus.
    fn log_q(&self) -> usize;
}
