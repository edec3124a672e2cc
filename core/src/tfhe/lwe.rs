use std::io::{Read, Result, Write};

use backend::{AddNormal, FillUniform, Torus};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use itertools::izip;
use sampling::{Distributions, Source};

use crate::{
    Infos, ReaderFrom, SIX_SIGMA, WriterTo,
    serialization::{TorusWord, invalid_data},
};

/// LWE secret with small integer coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweSecret {
    pub(crate) data: Vec<i64>,
}

impl LweSecret {
    pub fn generate(n: usize, dist: Distributions, source: &mut Source) -> Self {
        let mut data: Vec<i64> = vec![0; n];
        dist.fill_i64(&mut data, source);
        Self { data }
    }

    pub fn from_coeffs(data: Vec<i64>) -> Self {
        Self { data }
    }

    pub fn n(&self) -> usize {
        self.data.len()
    }

    pub fn coeffs(&self) -> &[i64] {
        &self.data
    }
}

/// `data = [b, a_0, ..., a_{n-1}]`, phase `b + sum_j a_j * s_j`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LweCiphertext<T: Torus> {
    pub(crate) data: Vec<T>,
}

impl<T: Torus> Infos for LweCiphertext<T> {
    fn n(&self) -> usize {
        self.data.len() - 1
    }

    fn log_q(&self) -> usize {
        T::BITS as usize
    }
}

impl<T: Torus> LweCiphertext<T> {
    pub fn alloc(n: usize) -> Self {
        Self {
            data: vec![T::ZERO; n + 1],
        }
    }

    /// Noiseless encryption of `m` under any key.
    pub fn trivial(n: usize, m: T) -> Self {
        let mut res: Self = Self::alloc(n);
        res.data[0] = m;
        res
    }

    pub fn from_raw(b: T, a: Vec<T>) -> Self {
        let mut data: Vec<T> = Vec::with_capacity(a.len() + 1);
        data.push(b);
        data.extend(a);
        Self { data }
    }

    pub fn b(&self) -> T {
        self.data[0]
    }

    pub fn a(&self) -> &[T] {
        &self.data[1..]
    }

    pub fn encrypt_sk(&mut self, m: T, sk: &LweSecret, source_xa: &mut Source, source_xe: &mut Source, sigma: f64)
    where
        T: FillUniform,
    {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), sk.n());
        }
        self.data[1..].fill_uniform(source_xa);
        let mut e: [T; 1] = [T::ZERO];
        e.add_normal(source_xe, sigma, SIX_SIGMA * sigma);
        let dot: T = izip!(self.data[1..].iter(), sk.data.iter()).fold(T::ZERO, |acc, (a, s)| acc.add(a.mul_i64(*s)));
        self.data[0] = m.add(e[0]).sub(dot);
    }

    pub fn phase(&self, sk: &LweSecret) -> T {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), sk.n());
        }
        izip!(self.data[1..].iter(), sk.data.iter()).fold(self.data[0], |acc, (a, s)| acc.add(a.mul_i64(*s)))
    }

    /// True iff the phase lies in [0, 1/2).
    pub fn decrypt_bool(&self, sk: &LweSecret) -> bool {
        self.phase(sk).to_signed() >= 0
    }

    pub fn add_inplace(&mut self, a: &LweCiphertext<T>) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), a.n());
        }
        izip!(self.data.iter_mut(), a.data.iter()).for_each(|(x, y)| *x = x.add(*y));
    }

    pub fn sub_inplace(&mut self, a: &LweCiphertext<T>) {
        #[cfg(debug_assertions)]
        {
            assert_eq!(self.n(), a.n());
        }
        izip!(self.data.iter_mut(), a.data.iter()).for_each(|(x, y)| *x = x.sub(*y));
    }

    pub fn neg_inplace(&mut self) {
        self.data.iter_mut().for_each(|x| *x = x.neg());
    }

    /// Adds a plaintext constant to the phase.
    pub fn add_constant(&mut self, m: T) {
        self.data[0] = self.data[0].add(m);
    }

    /// Multiplies the phase by 2^bits.
    pub fn shl_inplace(&mut self, bits: u32) {
        self.data.iter_mut().for_each(|x| *x = x.shl(bits));
    }
}

impl<T: Torus + TorusWord> WriterTo for LweCiphertext<T> {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LittleEndian>(T::BITS)?;
        writer.write_u64::<LittleEndian>(self.data.len() as u64)?;
        self.data.iter().try_for_each(|x| x.write_word(writer))
    }
}

/// Largest `n + 1` accepted from a serialized LWE ciphertext.
pub const MAX_LWE_WORDS: u64 = (1 << 17) + 1;

impl<T: Torus + TorusWord> ReaderFrom for LweCiphertext<T> {
    fn read_from<R: Read>(&mut self, reader: &mut R) -> Result<()> {
        let bits: u32 = reader.read_u32::<LittleEndian>()?;
        if bits != T::BITS {
            return Err(invalid_data(format!("torus of {} bits != {}", bits, T::BITS)));
        }
        let len: u64 = reader.read_u64::<LittleEndian>()?;
        if len == 0 || len > MAX_LWE_WORDS {
            return Err(invalid_data(format!("LWE ciphertext of {} words", len)));
        }
        let mut data: Vec<T> = Vec::new();
        for _ in 0..len {
            data.push(T::read_word(reader)?);
        }
        self.data = data;
        Ok(())
    }
}
