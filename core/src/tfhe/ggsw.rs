use backend::{FourierPoly, Gadget, Module, Torus, reim_addmul};
use sampling::Source;

use crate::{
    Infos,
    tfhe::{GlweCiphertext, GlweSecret},
};

/// TRGSW encryption of a small integer m over the 32-bit torus.
///
/// Rows `0..l` have phase `m * w_i`, rows `l..2l` have phase `m * w_i * s`,
/// with `w_i` the gadget weights.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GgswCiphertext {
    pub(crate) rows: Vec<GlweCiphertext<u32>>,
    pub(crate) gadget: Gadget,
}

/// [GgswCiphertext] with every polynomial in the Fourier domain, ready for
/// external products.
#[derive(Clone, Debug, PartialEq)]
pub struct GgswFourier {
    pub(crate) rows: Vec<[FourierPoly; 2]>,
    pub(crate) gadget: Gadget,
}

impl GgswCiphertext {
    pub fn encrypt_sk(
        m: i64,
        sk: &GlweSecret,
        gadget: Gadget,
        source_xa: &mut Source,
        source_xe: &mut Source,
        sigma: f64,
    ) -> Self {
        let n: usize = sk.n();
        let l: usize = gadget.rows;
        let rows: Vec<GlweCiphertext<u32>> = (0..2 * l)
            .map(|r| {
                let mut row: GlweCiphertext<u32> = GlweCiphertext::alloc(n);
                row.encrypt_zero_sk(sk, source_xa, source_xe, sigma);
                let mw: u32 = gadget.weight::<u32>(r % l).mul_i64(m);
                if r < l {
                    row.b.coeffs[0] = row.b.coeffs[0].add(mw);
                } else {
                    row.a.coeffs[0] = row.a.coeffs[0].add(mw);
                }
                row
            })
            .collect();
        Self { rows, gadget }
    }

    /// Assembles a TRGSW from externally computed rows, as done by circuit
    /// bootstrapping.
    pub fn from_rows(rows: Vec<GlweCiphertext<u32>>, gadget: Gadget) -> Self {
        assert_eq!(rows.len(), 2 * gadget.rows, "{} rows for a gadget of {}", rows.len(), gadget.rows);
        Self { rows, gadget }
    }

    pub fn gadget(&self) -> Gadget {
        self.gadget
    }

    pub fn prepare(&self, module: &Module) -> GgswFourier {
        GgswFourier {
            rows: self
                .rows
                .iter()
                .map(|row| [module.prepare_torus(&row.b), module.prepare_torus(&row.a)])
                .collect(),
            gadget: self.gadget,
        }
    }
}

impl GgswFourier {
    pub fn n(&self) -> usize {
        self.rows[0][0].n()
    }

    /// TRLWE whose phase is approximately m times the phase of `glwe`.
    pub fn external_product(&self, module: &Module, glwe: &GlweCiphertext<u32>) -> GlweCiphertext<u32> {
        let n: usize = glwe.n();
        let l: usize = self.gadget.rows;
        #[cfg(debug_assertions)]
        {
            assert_eq!(module.n(), n);
            assert_eq!(self.n(), n);
        }

        let mut digits_b: Vec<Vec<i64>> = vec![vec![0; n]; l];
        let mut digits_a: Vec<Vec<i64>> = vec![vec![0; n]; l];
        self.gadget.decompose_poly_signed(&glwe.b.coeffs, &mut digits_b);
        self.gadget.decompose_poly_signed(&glwe.a.coeffs, &mut digits_a);

        let mut acc_b: FourierPoly = module.new_fourier();
        let mut acc_a: FourierPoly = module.new_fourier();
        let mut tmp: FourierPoly = module.new_fourier();
        (0..l).for_each(|i| {
            module.fft().forward_i64(&mut tmp, &digits_b[i]);
            reim_addmul(&mut acc_b, &tmp, &self.rows[i][0]);
            reim_addmul(&mut acc_a, &tmp, &self.rows[i][1]);
            module.fft().forward_i64(&mut tmp, &digits_a[i]);
            reim_addmul(&mut acc_b, &tmp, &self.rows[l + i][0]);
            reim_addmul(&mut acc_a, &tmp, &self.rows[l + i][1]);
        });

        let mut res: GlweCiphertext<u32> = GlweCiphertext::alloc(n);
        module.fft().backward_torus(&mut res.b.coeffs, &mut acc_b);
        module.fft().backward_torus(&mut res.a.coeffs, &mut acc_a);
        res
    }

    /// `c0 + self ⊡ (c1 - c0)`: selects c1 when m = 1 and c0 when m = 0.
    pub fn cmux(&self, module: &Module, c1: &GlweCiphertext<u32>, c0: &GlweCiphertext<u32>) -> GlweCiphertext<u32> {
        let mut diff: GlweCiphertext<u32> = c1.clone();
        diff.sub_inplace(c0);
        let mut res: GlweCiphertext<u32> = self.external_product(module, &diff);
        res.add_inplace(c0);
        res
    }
}

