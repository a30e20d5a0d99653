//! Polynomials in evaluation form.

use crate::{arith::Scalar, errors::KzgError};

/// A polynomial represented by its evaluations over a power-of-two domain of
/// roots of unity, stored in bit-reversal-permuted domain order (element i
/// is the evaluation at the i-th permuted root). There is no coefficient
/// form anywhere in this crate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    evaluations: Vec<Scalar>,
}

impl Polynomial {
    pub fn new(evaluations: Vec<Scalar>) -> Result<Self, KzgError> {
        if evaluations.is_empty() || !evaluations.len().is_power_of_two() {
            return Err(KzgError::LengthMismatch(format!(
                "polynomial has {} evaluations, expected a power of two",
                evaluations.len()
            )));
        }
        Ok(Polynomial { evaluations })
    }

    pub fn evaluations(&self) -> &[Scalar] {
        &self.evaluations
    }

    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scalar> {
        self.evaluations.get(index)
    }
}
