use rand_distr::{Distribution, Normal};

use crate::source::Source;

/// Secret key distributions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distributions {
    /// Ternary in {-1, 0, 1}, non-zero with probability p.
    TernaryProb(f64),
    /// Ternary with exactly h non-zero coefficients.
    TernaryFixed(usize),
    /// Uniform in {0, 1}.
    Binary,
}

impl Distributions {
    pub fn fill_i64(&self, data: &mut [i64], source: &mut Source) {
        match *self {
            Distributions::TernaryProb(p) => {
                assert!((0.0..=1.0).contains(&p), "invalid probability: {}", p);
                data.iter_mut().for_each(|x| {
                    *x = if source.next_f64(0.0, 1.0) < p {
                        if source.next_bool() { 1 } else { -1 }
                    } else {
                        0
                    }
                });
            }
            Distributions::TernaryFixed(h) => {
                assert!(h <= data.len(), "hamming weight {} > n={}", h, data.len());
                data.fill(0);
                let n: usize = data.len();
                let mask: u64 = (n as u64).next_power_of_two() - 1;
                let mut idx: Vec<usize> = (0..n).collect();
                // partial Fisher-Yates
                (0..h).for_each(|i| {
                    let j: usize = i + source.next_u64n((n - i) as u64, mask) as usize;
                    idx.swap(i, j);
                    data[idx[i]] = if source.next_bool() { 1 } else { -1 };
                });
            }
            Distributions::Binary => data
                .iter_mut()
                .for_each(|x| *x = source.next_bool() as i64),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Distributions::Binary)
    }
}

/// Normal distribution with rejection outside of [-bound, bound].
#[derive(Clone, Copy, Debug)]
pub struct BoundedNormal {
    dist: Normal<f64>,
    bound: f64,
}

impl BoundedNormal {
    pub fn new(sigma: f64, bound: f64) -> Self {
        let dist: Normal<f64> = match Normal::new(0.0, sigma) {
            Ok(dist) => dist,
            Err(_) => panic!("invalid standard deviation: {}", sigma),
        };
        assert!(bound >= sigma, "bound={} < sigma={}", bound, sigma);
        Self { dist, bound }
    }

    pub fn sigma(&self) -> f64 {
        self.dist.std_dev()
    }

    #[inline(always)]
    pub fn sample(&self, source: &mut Source) -> f64 {
        let mut x: f64 = self.dist.sample(source);
        while x.abs() > self.bound {
            x = self.dist.sample(source)
        }
        x
    }
}
