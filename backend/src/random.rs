use rand_core::RngCore;
use rug::Integer;
use rug::integer::Order;
use sampling::distributions::BoundedNormal;
use sampling::source::Source;

use crate::bigpoly::BigPoly;
use crate::poly::Poly;
use crate::torus::Torus;

pub trait FillUniform {
    /// Fills the receiver with uniform values over its modulus.
    fn fill_uniform(&mut self, source: &mut Source);
}

pub trait AddNormal {
    /// Adds a normal error with standard deviation `sigma`, bounded to \[-bound, bound\].
    ///
    /// For torus types sigma is a fraction of the torus, for integer types it
    /// is an absolute value.
    fn add_normal(&mut self, source: &mut Source, sigma: f64, bound: f64);
}

impl FillUniform for u32 {
    fn fill_uniform(&mut self, source: &mut Source) {
        *self = source.next_u32()
    }
}

impl FillUniform for u64 {
    fn fill_uniform(&mut self, source: &mut Source) {
        *self = source.next_u64()
    }
}

impl<T: Torus + FillUniform> FillUniform for [T] {
    fn fill_uniform(&mut self, source: &mut Source) {
        self.iter_mut().for_each(|x| x.fill_uniform(source))
    }
}

impl<T: Torus + FillUniform> FillUniform for Poly<T> {
    fn fill_uniform(&mut self, source: &mut Source) {
        self.coeffs.fill_uniform(source)
    }
}

impl<T: Torus> AddNormal for [T] {
    fn add_normal(&mut self, source: &mut Source, sigma: f64, bound: f64) {
        let dist: BoundedNormal = BoundedNormal::new(sigma, bound);
        self.iter_mut()
            .for_each(|x| *x = x.add(T::from_f64(dist.sample(source))));
    }
}

impl<T: Torus> AddNormal for Poly<T> {
    fn add_normal(&mut self, source: &mut Source, sigma: f64, bound: f64) {
        self.coeffs.add_normal(source, sigma, bound)
    }
}

/// Uniform sampling over Z_{2^log_q}; the modulus is not carried by
/// [BigPoly] so it is passed explicitly.
pub fn fill_uniform_big(a: &mut BigPoly, log_q: u32, source: &mut Source) {
    let bytes: usize = BigPoly::coeff_bytes(log_q);
    let mut buf: Vec<u8> = vec![0u8; bytes];
    a.coeffs.iter_mut().for_each(|c| {
        source.fill_bytes(&mut buf);
        *c = Integer::from_digits(&buf, Order::Lsf);
        c.keep_bits_mut(log_q);
    });
}

impl AddNormal for BigPoly {
    /// The result is not reduced: callers reduce with their own modulus.
    fn add_normal(&mut self, source: &mut Source, sigma: f64, bound: f64) {
        let dist: BoundedNormal = BoundedNormal::new(sigma, bound);
        self.coeffs
            .iter_mut()
            .for_each(|c| *c += dist.sample(source).round() as i64);
    }
}
