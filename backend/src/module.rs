use crate::fft::{FFT64, FourierPoly, reim_addmul};
use crate::poly::Poly;
use crate::torus::Torus;

/// Ring context for Z[X]/(X^N + 1): holds the FFT tables shared by all
/// polynomial products of degree N.
pub struct Module {
    n: usize,
    fft: FFT64,
}

impl Module {
    pub fn new(n: usize) -> Self {
        Self { n, fft: FFT64::new(n) }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn fft(&self) -> &FFT64 {
        &self.fft
    }

    pub fn new_fourier(&self) -> FourierPoly {
        FourierPoly::alloc(self.n)
    }

    pub fn prepare_i64(&self, a: &[i64]) -> FourierPoly {
        let mut res: FourierPoly = self.new_fourier();
        self.fft.forward_i64(&mut res, a);
        res
    }

    pub fn prepare_torus<T: Torus>(&self, a: &Poly<T>) -> FourierPoly {
        let mut res: FourierPoly = self.new_fourier();
        self.fft.forward_torus(&mut res, &a.coeffs);
        res
    }

    /// res = a * b where b is a prepared small integer polynomial.
    pub fn mul_prepared<T: Torus>(&self, res: &mut Poly<T>, a: &Poly<T>, b: &FourierPoly) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(a.n(), self.n);
            assert_eq!(res.n(), self.n);
        }
        let a_dft: FourierPoly = self.prepare_torus(a);
        let mut tmp: FourierPoly = self.new_fourier();
        reim_addmul(&mut tmp, &a_dft, b);
        self.fft.backward_torus(&mut res.coeffs, &mut tmp);
    }
}

#[cfg(test)]
mod tests {
    use super::Module;
    use crate::poly::Poly;

    #[test]
    fn mul_prepared_matches_mul_small() {
        let n: usize = 32;
        let module: Module = Module::new(n);
        let a: Poly<u32> = Poly::from_coeffs((0..n as u32).map(|i| i.wrapping_mul(0x9e3779b9)).collect());
        let s: Vec<i64> = (0..n as i64).map(|i| (i * 7 + 1) % 2).collect();

        let mut expected: Poly<u32> = Poly::alloc(n);
        a.mul_small(&s, &mut expected);

        let mut res: Poly<u32> = Poly::alloc(n);
        module.mul_prepared(&mut res, &a, &module.prepare_i64(&s));
        assert_eq!(res, expected);
    }
}
