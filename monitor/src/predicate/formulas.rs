use hemon_core::{
    CkksError,
    ckks::{CkksCiphertext, CkksPlaintext},
};

use crate::predicate::{Arith, Predicate, strict_margin};

/// `x > c` (above) or `x < c` (below) on a scalar signal, as
/// `x - c - margin` or `c - x - margin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threshold {
    pub constant: f64,
    pub reference: f64,
    pub above: bool,
}

impl Threshold {
    pub fn above(constant: f64, reference: f64) -> Self {
        Self {
            constant,
            reference,
            above: true,
        }
    }

    pub fn below(constant: f64, reference: f64) -> Self {
        Self {
            constant,
            reference,
            above: false,
        }
    }
}

impl Predicate for Threshold {
    fn signal_size(&self) -> usize {
        1
    }

    fn predicate_size(&self) -> usize {
        1
    }

    fn references(&self) -> Vec<f64> {
        vec![self.reference]
    }

    fn evaluate(&mut self, arith: &Arith, sample: &[CkksCiphertext]) -> Result<Vec<CkksCiphertext>, CkksError> {
        let x: &CkksCiphertext = &sample[0];
        let m: f64 = strict_margin(self.reference);
        let res: CkksCiphertext = if self.above {
            arith
                .evaluator
                .sub_plain(x, &arith.plain_like(self.constant + m, x)?)?
        } else {
            let c: CkksPlaintext = arith.plain_like(self.constant - m, x)?;
            arith.evaluator.add_plain(&arith.evaluator.negate(x), &c)?
        };
        Ok(vec![res])
    }

    fn evaluate_plain(&mut self, sample: &[f64]) -> Vec<f64> {
        let (x, m): (f64, f64) = (sample[0], strict_margin(self.reference));
        if self.above {
            vec![x - self.constant - m]
        } else {
            vec![self.constant - x - m]
        }
    }
}

/// `low < x` and `x < high` as two propositions; the automaton takes the
/// conjunction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
    pub reference: f64,
}

impl Band {
    pub fn new(low: f64, high: f64, reference: f64) -> Self {
        Self { low, high, reference }
    }
}

fn band(arith: &Arith, x: &CkksCiphertext, low: f64, high: f64, m: f64) -> Result<Vec<CkksCiphertext>, CkksError> {
    let above: CkksCiphertext = arith
        .evaluator
        .sub_plain(x, &arith.plain_like(low + m, x)?)?;
    let below: CkksCiphertext = arith
        .evaluator
        .add_plain(&arith.evaluator.negate(x), &arith.plain_like(high - m, x)?)?;
    Ok(vec![above, below])
}

impl Predicate for Band {
    fn signal_size(&self) -> usize {
        1
    }

    fn predicate_size(&self) -> usize {
        2
    }

    fn references(&self) -> Vec<f64> {
        vec![self.reference; 2]
    }

    fn evaluate(&mut self, arith: &Arith, sample: &[CkksCiphertext]) -> Result<Vec<CkksCiphertext>, CkksError> {
        band(arith, &sample[0], self.low, self.high, strict_margin(self.reference))
    }

    fn evaluate_plain(&mut self, sample: &[f64]) -> Vec<f64> {
        let m: f64 = strict_margin(self.reference);
        vec![sample[0] - self.low - m, self.high - sample[0] - m]
    }
}

/// [`Band`] on the difference between consecutive samples.
///
/// There is no difference at the first sample: both coordinates then carry
/// the raw sample.
#[derive(Clone, Debug, PartialEq)]
pub struct DeltaBand {
    pub low: f64,
    pub high: f64,
    pub reference: f64,
    previous: Option<CkksCiphertext>,
    previous_plain: Option<f64>,
}

impl DeltaBand {
    pub fn new(low: f64, high: f64, reference: f64) -> Self {
        Self {
            low,
            high,
            reference,
            previous: None,
            previous_plain: None,
        }
    }

    /// Whether an encrypted sample has been seen.
    pub fn primed(&self) -> bool {
        self.previous.is_some()
    }
}

impl Predicate for DeltaBand {
    fn signal_size(&self) -> usize {
        1
    }

    fn predicate_size(&self) -> usize {
        2
    }

    fn references(&self) -> Vec<f64> {
        vec![self.reference; 2]
    }

    fn evaluate(&mut self, arith: &Arith, sample: &[CkksCiphertext]) -> Result<Vec<CkksCiphertext>, CkksError> {
        let x: &CkksCiphertext = &sample[0];
        let res: Vec<CkksCiphertext> = match &self.previous {
            None => vec![x.clone(), x.clone()],
            Some(prev) => band(
                arith,
                &arith.evaluator.sub(x, prev)?,
                self.low,
                self.high,
                strict_margin(self.reference),
            )?,
        };
        self.previous = Some(x.clone());
        Ok(res)
    }

    fn evaluate_plain(&mut self, sample: &[f64]) -> Vec<f64> {
        let x: f64 = sample[0];
        let res: Vec<f64> = match self.previous_plain {
            None => vec![x, x],
            Some(prev) => {
                let (d, m): (f64, f64) = (x - prev, strict_margin(self.reference));
                vec![d - self.low - m, self.high - d - m]
            }
        };
        self.previous_plain = Some(x);
        res
    }
}

/// `|x - center| > radius`, as `(x - center)^2 - radius^2 - margin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deviation {
    pub center: f64,
    pub radius: f64,
    pub reference: f64,
}

impl Deviation {
    pub fn new(center: f64, radius: f64, reference: f64) -> Self {
        Self {
            center,
            radius,
            reference,
        }
    }
}

impl Predicate for Deviation {
    fn signal_size(&self) -> usize {
        1
    }

    fn predicate_size(&self) -> usize {
        1
    }

    fn references(&self) -> Vec<f64> {
        vec![self.reference]
    }

    fn evaluate(&mut self, arith: &Arith, sample: &[CkksCiphertext]) -> Result<Vec<CkksCiphertext>, CkksError> {
        let x: &CkksCiphertext = &sample[0];
        let d: CkksCiphertext = arith
            .evaluator
            .sub_plain(x, &arith.plain_like(self.center, x)?)?;
        let sq: CkksCiphertext = arith.square(&d)?;
        let r2: CkksPlaintext = arith.plain_like(self.radius * self.radius + strict_margin(self.reference), &sq)?;
        Ok(vec![arith.evaluator.sub_plain(&sq, &r2)?])
    }

    fn evaluate_plain(&mut self, sample: &[f64]) -> Vec<f64> {
        let d: f64 = sample[0] - self.center;
        vec![d * d - self.radius * self.radius - strict_margin(self.reference)]
    }
}

/// Safe following distance: `gap > reaction * v + inv_double_decel * v^2`
/// on samples `[gap, v]`.
///
/// Needs three data levels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafeDistance {
    pub reaction: f64,
    pub inv_double_decel: f64,
    pub reference: f64,
}

impl SafeDistance {
    pub fn new(reaction: f64, inv_double_decel: f64, reference: f64) -> Self {
        Self {
            reaction,
            inv_double_decel,
            reference,
        }
    }
}

impl Predicate for SafeDistance {
    fn signal_size(&self) -> usize {
        2
    }

    fn predicate_size(&self) -> usize {
        1
    }

    fn references(&self) -> Vec<f64> {
        vec![self.reference]
    }

    fn evaluate(&mut self, arith: &Arith, sample: &[CkksCiphertext]) -> Result<Vec<CkksCiphertext>, CkksError> {
        let (gap, v) = (&sample[0], &sample[1]);

        // Every term ends two levels down with the same scale.
        let braking: CkksCiphertext = arith.scale_by(&arith.square(v)?, self.inv_double_decel)?;
        let reaction: CkksCiphertext = arith.align(&arith.scale_by(v, self.reaction)?)?;
        let gap: CkksCiphertext = arith.align(&arith.align(gap)?)?;

        let res: CkksCiphertext = arith.evaluator.sub(&gap, &reaction)?;
        let res: CkksCiphertext = arith.evaluator.sub(&res, &braking)?;
        let m: CkksPlaintext = arith.plain_like(strict_margin(self.reference), &res)?;
        Ok(vec![arith.evaluator.sub_plain(&res, &m)?])
    }

    fn evaluate_plain(&mut self, sample: &[f64]) -> Vec<f64> {
        let (gap, v) = (sample[0], sample[1]);
        vec![gap - (self.reaction * v + self.inv_double_decel * v * v) - strict_margin(self.reference)]
    }
}
