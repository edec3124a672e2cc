use std::f64::consts::PI;

use crate::torus::Torus;

/// Negacyclic FFT over f64 for Z[X]/(X^N + 1).
///
/// A polynomial of degree N is folded into N/2 complex values
/// z_j = (a_j + i * a_{j+N/2}) * w^j with w = exp(i*pi/N), followed by a
/// cyclic DFT of size N/2. Values are stored in "reim" layout: the N/2 real
/// parts followed by the N/2 imaginary parts.
pub struct FFT64 {
    n: usize,
    twist_re: Vec<f64>,
    twist_im: Vec<f64>,
    omega_re: Vec<f64>,
    omega_im: Vec<f64>,
    rev: Vec<usize>,
}

/// A polynomial in the Fourier domain of an [FFT64] table.
#[derive(Clone, Debug, PartialEq)]
pub struct FourierPoly {
    pub data: Vec<f64>,
}

impl FourierPoly {
    pub fn alloc(n: usize) -> Self {
        Self { data: vec![0.0; n] }
    }

    pub fn n(&self) -> usize {
        self.data.len()
    }

    pub fn zero(&mut self) {
        self.data.fill(0.0)
    }
}

impl FFT64 {
    pub fn new(n: usize) -> Self {
        assert!(n.is_power_of_two() && n >= 2, "invalid ring degree: {}", n);
        let m: usize = n >> 1;
        let log_m: u32 = m.trailing_zeros();

        let mut twist_re: Vec<f64> = Vec::with_capacity(m);
        let mut twist_im: Vec<f64> = Vec::with_capacity(m);
        (0..m).for_each(|j| {
            let angle: f64 = PI * (j as f64) / (n as f64);
            twist_re.push(angle.cos());
            twist_im.push(angle.sin());
        });

        let mut omega_re: Vec<f64> = Vec::with_capacity(m.max(1));
        let mut omega_im: Vec<f64> = Vec::with_capacity(m.max(1));
        (0..m.max(1)).for_each(|k| {
            let angle: f64 = -2.0 * PI * (k as f64) / (m as f64);
            omega_re.push(angle.cos());
            omega_im.push(angle.sin());
        });

        let rev: Vec<usize> = (0..m)
            .map(|i| {
                if log_m == 0 {
                    0
                } else {
                    i.reverse_bits() >> (usize::BITS - log_m)
                }
            })
            .collect();

        Self {
            n,
            twist_re,
            twist_im,
            omega_re,
            omega_im,
            rev,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    fn dft(&self, re: &mut [f64], im: &mut [f64], inverse: bool) {
        let m: usize = self.n >> 1;

        (0..m).for_each(|i| {
            let j: usize = self.rev[i];
            if i < j {
                re.swap(i, j);
                im.swap(i, j);
            }
        });

        let mut len: usize = 2;
        while len <= m {
            let half: usize = len >> 1;
            let step: usize = m / len;
            (0..m).step_by(len).for_each(|start| {
                (0..half).for_each(|j| {
                    let wr: f64 = self.omega_re[j * step];
                    let wi: f64 = if inverse {
                        -self.omega_im[j * step]
                    } else {
                        self.omega_im[j * step]
                    };
                    let (ur, ui) = (re[start + j], im[start + j]);
                    let (xr, xi) = (re[start + j + half], im[start + j + half]);
                    let vr: f64 = xr * wr - xi * wi;
                    let vi: f64 = xr * wi + xi * wr;
                    re[start + j] = ur + vr;
                    im[start + j] = ui + vi;
                    re[start + j + half] = ur - vr;
                    im[start + j + half] = ui - vi;
                });
            });
            len <<= 1;
        }
    }

    /// res <- FFT(a) for a polynomial with (small) signed integer coefficients.
    pub fn forward_i64(&self, res: &mut FourierPoly, a: &[i64]) {
        self.forward_with(res, |i| a[i] as f64)
    }

    /// res <- FFT(a) for a torus polynomial, using the centered representative.
    pub fn forward_torus<T: Torus>(&self, res: &mut FourierPoly, a: &[T]) {
        self.forward_with(res, |i| a[i].to_signed() as f64)
    }

    fn forward_with<F: Fn(usize) -> f64>(&self, res: &mut FourierPoly, a: F) {
        let m: usize = self.n >> 1;
        #[cfg(debug_assertions)]
        {
            assert_eq!(res.n(), self.n);
        }
        let (re, im) = res.data.split_at_mut(m);
        (0..m).for_each(|j| {
            let (xr, xi) = (a(j), a(j + m));
            re[j] = xr * self.twist_re[j] - xi * self.twist_im[j];
            im[j] = xr * self.twist_im[j] + xi * self.twist_re[j];
        });
        self.dft(re, im, false);
    }

    /// Inverse transform in place, leaving the real coefficients of the
    /// product in `a.data` (unrounded).
    fn backward_inplace(&self, a: &mut FourierPoly) {
        let m: usize = self.n >> 1;
        let (re, im) = a.data.split_at_mut(m);
        self.dft(re, im, true);
        let inv_m: f64 = 1.0 / (m as f64);
        (0..m).for_each(|j| {
            let (zr, zi) = (re[j] * inv_m, im[j] * inv_m);
            re[j] = zr * self.twist_re[j] + zi * self.twist_im[j];
            im[j] = zi * self.twist_re[j] - zr * self.twist_im[j];
        });
    }

    /// res <- IFFT(a) rounded to integers. Destroys `a`.
    pub fn backward_i64(&self, res: &mut [i64], a: &mut FourierPoly) {
        self.backward_inplace(a);
        res.iter_mut().zip(a.data.iter()).for_each(|(r, x)| *r = x.round() as i64);
    }

    /// res <- IFFT(a) mod 2^BITS. Destroys `a`.
    pub fn backward_torus<T: Torus>(&self, res: &mut [T], a: &mut FourierPoly) {
        self.backward_inplace(a);
        res.iter_mut()
            .zip(a.data.iter())
            .for_each(|(r, x)| *r = T::from_signed(reduce_f64(*x)));
    }

    /// res += IFFT(a) mod 2^BITS. Destroys `a`.
    pub fn backward_torus_add<T: Torus>(&self, res: &mut [T], a: &mut FourierPoly) {
        self.backward_inplace(a);
        res.iter_mut()
            .zip(a.data.iter())
            .for_each(|(r, x)| *r = r.add(T::from_signed(reduce_f64(*x))));
    }
}

/// Rounds to the nearest integer, reducing mod 2^64 for out of range values.
#[inline(always)]
fn reduce_f64(x: f64) -> i64 {
    let r: f64 = x.round();
    if r.abs() < 9.2e18 {
        r as i64
    } else {
        (r % 18446744073709551616.0) as i128 as i64
    }
}

/// res += a * b (pointwise complex product in reim layout).
pub fn reim_addmul(res: &mut FourierPoly, a: &FourierPoly, b: &FourierPoly) {
    let m: usize = res.n() >> 1;
    #[cfg(debug_assertions)]
    {
        assert_eq!(a.n(), res.n());
        assert_eq!(b.n(), res.n());
    }
    let (res_re, res_im) = res.data.split_at_mut(m);
    let (a_re, a_im) = a.data.split_at(m);
    let (b_re, b_im) = b.data.split_at(m);
    (0..m).for_each(|j| {
        res_re[j] += a_re[j] * b_re[j] - a_im[j] * b_im[j];
        res_im[j] += a_re[j] * b_im[j] + a_im[j] * b_re[j];
    });
}

pub fn reim_add_inplace(res: &mut FourierPoly, a: &FourierPoly) {
    #[cfg(debug_assertions)]
    {
        assert_eq!(a.n(), res.n());
    }
    res.data.iter_mut().zip(a.data.iter()).for_each(|(r, x)| *r += x);
}
