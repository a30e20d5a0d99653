//! Extension fields Fq2 and Fq12 as coefficient vectors over [Fq].
//!
//! Both fields are quotient rings Fq\[x\]/(m(x)) for a fixed monic modulus
//! polynomial: x^2 + 1 for Fq2 and x^12 - 2x^6 + 2 for Fq12. Elements are
//! stored as their low-degree coefficient vectors and all operations reduce by
//! repeated top-coefficient elimination. The multiplicative inverse runs a
//! polynomial extended Euclidean algorithm whose degree bookkeeping must skip
//! trailing zero coefficients exactly; see [poly_deg].

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::{arith::Fq, errors::KzgError};

lazy_static! {
    /// Low-degree coefficients of the Fq2 modulus polynomial x^2 + 1.
    static ref FQ2_MODULUS_COEFFS: Vec<Fq> = vec![Fq::one(), Fq::zero()];

    /// Low-degree coefficients of the Fq12 modulus polynomial x^12 - 2x^6 + 2.
    static ref FQ12_MODULUS_COEFFS: Vec<Fq> = {
        let mut coeffs = vec![Fq::zero(); 12];
        coeffs[0] = Fq::from_u64(2);
        coeffs[6] = Fq::from_u64(2).neg();
        coeffs
    };
}

/// Degree of a coefficient vector, skipping trailing zeros; the zero vector
/// reports degree 0.
fn poly_deg(p: &[Fq]) -> usize {
    let mut d = p.len() - 1;
    while d > 0 && p[d].is_zero() {
        d -= 1;
    }
    d
}

fn poly_add(a: &[Fq], b: &[Fq]) -> Vec<Fq> {
    a.iter().zip(b).map(|(x, y)| x.add(y)).collect()
}

fn poly_sub(a: &[Fq], b: &[Fq]) -> Vec<Fq> {
    a.iter().zip(b).map(|(x, y)| x.sub(y)).collect()
}

fn poly_neg(a: &[Fq]) -> Vec<Fq> {
    a.iter().map(Fq::neg).collect()
}

/// Schoolbook product of two degree-(n-1) vectors followed by reduction
/// modulo the monic polynomial x^n + modulus_coeffs(x).
fn poly_mul_reduce(a: &[Fq], b: &[Fq], modulus_coeffs: &[Fq]) -> Vec<Fq> {
    let degree = a.len();
    let mut product = vec![Fq::zero(); 2 * degree - 1];
    for (i, ai) in a.iter().enumerate() {
        if ai.is_zero() {
            continue;
        }
        for (j, bj) in b.iter().enumerate() {
            product[i + j] = product[i + j].add(&ai.mul(bj));
        }
    }

    // Eliminate the top coefficient one power at a time: x^(degree + exp)
    // rewrites to -modulus_coeffs(x) * x^exp.
    while product.len() > degree {
        let top = product.pop().expect("length checked above");
        let exp = product.len() - degree;
        if top.is_zero() {
            continue;
        }
        for (i, m) in modulus_coeffs.iter().enumerate() {
            product[exp + i] = product[exp + i].sub(&top.mul(m));
        }
    }
    product
}

/// Quotient of the polynomial long division a / b (remainder discarded).
///
/// Requires b nonzero; the quotient's leading coefficient always cancels the
/// dividend's, which is what the Euclid loop in [poly_inverse] needs for its
/// degree to decrease.
fn poly_rounded_div(a: &[Fq], b: &[Fq]) -> Result<Vec<Fq>, KzgError> {
    let dega = poly_deg(a);
    let degb = poly_deg(b);
    let lead_inv = b[degb].inverse()?;

    let mut temp = a.to_vec();
    let mut quotient = vec![Fq::zero(); a.len()];
    let mut i = dega as isize - degb as isize;
    while i >= 0 {
        let shift = i as usize;
        let coeff = temp[degb + shift].mul(&lead_inv);
        quotient[shift] = quotient[shift].add(&coeff);
        for c in 0..=degb {
            temp[c + shift] = temp[c + shift].sub(&quotient[shift].mul(&b[c]));
        }
        i -= 1;
    }
    quotient.truncate(poly_deg(&quotient) + 1);
    Ok(quotient)
}

/// Inverse in Fq[x]/(x^n + modulus_coeffs(x)) via the extended Euclidean
/// algorithm on (n+1)-length padded vectors.
///
/// The loop maintains lm * input == low (mod m) and hm * input == high
/// (mod m); it ends when the remainder degree hits 0, leaving low constant,
/// so lm / low[0] is the inverse.
fn poly_inverse(coeffs: &[Fq], modulus_coeffs: &[Fq]) -> Result<Vec<Fq>, KzgError> {
    let degree = coeffs.len();
    if coeffs.iter().all(Fq::is_zero) {
        return Err(KzgError::DivisionByZero);
    }

    let mut lm = vec![Fq::zero(); degree + 1];
    lm[0] = Fq::one();
    let mut hm = vec![Fq::zero(); degree + 1];

    let mut low: Vec<Fq> = coeffs.iter().cloned().chain([Fq::zero()]).collect();
    let mut high: Vec<Fq> = modulus_coeffs.iter().cloned().chain([Fq::one()]).collect();

    while poly_deg(&low) > 0 {
        let mut r = poly_rounded_div(&high, &low)?;
        r.resize(degree + 1, Fq::zero());

        let mut nm = hm.clone();
        let mut new = high.clone();
        for i in 0..=degree {
            for j in 0..=(degree - i) {
                nm[i + j] = nm[i + j].sub(&lm[i].mul(&r[j]));
                new[i + j] = new[i + j].sub(&low[i].mul(&r[j]));
            }
        }

        hm = lm;
        high = low;
        lm = nm;
        low = new;
    }

    let scale = low[0].inverse()?;
    Ok(lm[..degree].iter().map(|c| c.mul(&scale)).collect())
}

/// Square-and-multiply over the exponent's bits, most significant first.
fn poly_pow(base: &[Fq], exponent: &BigUint, modulus_coeffs: &[Fq]) -> Vec<Fq> {
    let degree = base.len();
    let mut result = vec![Fq::zero(); degree];
    result[0] = Fq::one();
    if exponent.is_zero() {
        return result;
    }
    for bit in (0..exponent.bits()).rev() {
        result = poly_mul_reduce(&result, &result, modulus_coeffs);
        if exponent.bit(bit) {
            result = poly_mul_reduce(&result, base, modulus_coeffs);
        }
    }
    result
}

/// An element c0 + c1*i of Fq2, with i^2 = -1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fq2 {
    coeffs: [Fq; 2],
}

impl Fq2 {
    pub fn new(real: Fq, imag: Fq) -> Self {
        Fq2 {
            coeffs: [real, imag],
        }
    }

    pub fn from_u64s(real: u64, imag: u64) -> Self {
        Fq2::new(Fq::from_u64(real), Fq::from_u64(imag))
    }

    pub fn zero() -> Self {
        Fq2::new(Fq::zero(), Fq::zero())
    }

    pub fn one() -> Self {
        Fq2::new(Fq::one(), Fq::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(Fq::is_zero)
    }

    pub fn real(&self) -> &Fq {
        &self.coeffs[0]
    }

    pub fn imag(&self) -> &Fq {
        &self.coeffs[1]
    }

    pub fn add(&self, rhs: &Fq2) -> Fq2 {
        Fq2::from_vec(poly_add(&self.coeffs, &rhs.coeffs))
    }

    pub fn sub(&self, rhs: &Fq2) -> Fq2 {
        Fq2::from_vec(poly_sub(&self.coeffs, &rhs.coeffs))
    }

    pub fn mul(&self, rhs: &Fq2) -> Fq2 {
        Fq2::from_vec(poly_mul_reduce(
            &self.coeffs,
            &rhs.coeffs,
            &FQ2_MODULUS_COEFFS,
        ))
    }

    pub fn square(&self) -> Fq2 {
        self.mul(self)
    }

    pub fn neg(&self) -> Fq2 {
        Fq2::from_vec(poly_neg(&self.coeffs))
    }

    pub fn mul_u64(&self, k: u64) -> Fq2 {
        Fq2::new(self.coeffs[0].mul_u64(k), self.coeffs[1].mul_u64(k))
    }

    pub fn inverse(&self) -> Result<Fq2, KzgError> {
        Ok(Fq2::from_vec(poly_inverse(
            &self.coeffs,
            &FQ2_MODULUS_COEFFS,
        )?))
    }

    pub fn div(&self, rhs: &Fq2) -> Result<Fq2, KzgError> {
        Ok(self.mul(&rhs.inverse()?))
    }

    pub fn pow(&self, exponent: &BigUint) -> Fq2 {
        Fq2::from_vec(poly_pow(&self.coeffs, exponent, &FQ2_MODULUS_COEFFS))
    }

    fn from_vec(coeffs: Vec<Fq>) -> Self {
        let mut it = coeffs.into_iter();
        let real = it.next().expect("fixed length 2");
        let imag = it.next().expect("fixed length 2");
        Fq2::new(real, imag)
    }
}

/// An element of Fq12 as a twelve-coefficient vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fq12 {
    coeffs: Vec<Fq>,
}

impl Fq12 {
    pub const DEGREE: usize = 12;

    pub fn new(coeffs: Vec<Fq>) -> Self {
        debug_assert_eq!(coeffs.len(), Self::DEGREE);
        Fq12 { coeffs }
    }

    pub fn zero() -> Self {
        Fq12::new(vec![Fq::zero(); Self::DEGREE])
    }

    pub fn one() -> Self {
        let mut coeffs = vec![Fq::zero(); Self::DEGREE];
        coeffs[0] = Fq::one();
        Fq12::new(coeffs)
    }

    /// The distinguished element w (a single 1 at index 1), used by the G2
    /// twist: untwisted coordinates live in the subring generated by w^6.
    pub fn w() -> Self {
        let mut coeffs = vec![Fq::zero(); Self::DEGREE];
        coeffs[1] = Fq::one();
        Fq12::new(coeffs)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(Fq::is_zero)
    }

    pub fn is_one(&self) -> bool {
        self == &Fq12::one()
    }

    pub fn coeff(&self, index: usize) -> &Fq {
        &self.coeffs[index]
    }

    pub fn set_coeff(&mut self, index: usize, value: Fq) {
        self.coeffs[index] = value;
    }

    pub fn add(&self, rhs: &Fq12) -> Fq12 {
        Fq12::new(poly_add(&self.coeffs, &rhs.coeffs))
    }

    pub fn sub(&self, rhs: &Fq12) -> Fq12 {
        Fq12::new(poly_sub(&self.coeffs, &rhs.coeffs))
    }

    pub fn mul(&self, rhs: &Fq12) -> Fq12 {
        Fq12::new(poly_mul_reduce(
            &self.coeffs,
            &rhs.coeffs,
            &FQ12_MODULUS_COEFFS,
        ))
    }

    pub fn square(&self) -> Fq12 {
        self.mul(self)
    }

    pub fn neg(&self) -> Fq12 {
        Fq12::new(poly_neg(&self.coeffs))
    }

    pub fn mul_u64(&self, k: u64) -> Fq12 {
        Fq12::new(self.coeffs.iter().map(|c| c.mul_u64(k)).collect())
    }

    pub fn inverse(&self) -> Result<Fq12, KzgError> {
        Ok(Fq12::new(poly_inverse(&self.coeffs, &FQ12_MODULUS_COEFFS)?))
    }

    pub fn div(&self, rhs: &Fq12) -> Result<Fq12, KzgError> {
        Ok(self.mul(&rhs.inverse()?))
    }

    pub fn pow(&self, exponent: &BigUint) -> Fq12 {
        Fq12::new(poly_pow(&self.coeffs, exponent, &FQ12_MODULUS_COEFFS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FQ_MODULUS;
    use num_bigint::BigUint;
    use num_traits::One;

    #[test]
    fn test_fq2_i_squared_is_minus_one() {
        let i = Fq2::from_u64s(0, 1);
        assert_eq!(i.square(), Fq2::new(Fq::one().neg(), Fq::zero()));
    }

    #[test]
    fn test_fq2_one_plus_i_squared() {
        // (1 + i)^2 = 2i.
        let x = Fq2::from_u64s(1, 1);
        assert_eq!(x.square(), Fq2::from_u64s(0, 2));
    }

    #[test]
    fn test_fq2_inverse_roundtrip() {
        let x = Fq2::from_u64s(3, 7);
        assert_eq!(x.mul(&x.inverse().unwrap()), Fq2::one());
        assert_eq!(Fq2::zero().inverse(), Err(KzgError::DivisionByZero));
    }

    #[test]
    fn test_fq2_distributes_over_mul() {
        let a = Fq2::from_u64s(5, 11);
        let b = Fq2::from_u64s(13, 2);
        let c = Fq2::from_u64s(17, 23);
        assert_eq!(a.mul(&b.add(&c)), a.mul(&b).add(&a.mul(&c)));
    }

    #[test]
    fn test_fq2_frobenius_order() {
        // x^(q^2) = x for every x in Fq2.
        let x = Fq2::from_u64s(9, 4);
        let q_squared = &*FQ_MODULUS * &*FQ_MODULUS;
        assert_eq!(x.pow(&q_squared), x);
    }

    #[test]
    fn test_fq12_w_sixth_power() {
        // w^12 = 2w^6 - 2, so w^12 - 2w^6 + 2 = 0.
        let w = Fq12::w();
        let w6 = w.pow(&BigUint::from(6u32));
        let w12 = w.pow(&BigUint::from(12u32));
        assert_eq!(
            w12.sub(&w6.mul_u64(2)).add(&Fq12::one().mul_u64(2)),
            Fq12::zero()
        );
    }

    #[test]
    fn test_fq12_inverse_roundtrip() {
        let mut coeffs = vec![Fq::zero(); 12];
        for (k, c) in coeffs.iter_mut().enumerate() {
            *c = Fq::from_u64(3 * k as u64 + 1);
        }
        let x = Fq12::new(coeffs);
        assert!(x.mul(&x.inverse().unwrap()).is_one());
        assert_eq!(Fq12::zero().inverse(), Err(KzgError::DivisionByZero));
    }

    #[test]
    fn test_fq12_pow_zero_and_one() {
        let x = Fq12::w().add(&Fq12::one());
        assert!(x.pow(&BigUint::from(0u32)).is_one());
        assert_eq!(x.pow(&BigUint::one()), x);
    }

    #[test]
    fn test_fq12_div_inverts_mul() {
        let a = Fq12::w().mul_u64(5).add(&Fq12::one().mul_u64(3));
        let b = Fq12::w().mul_u64(2).add(&Fq12::one().mul_u64(7));
        assert_eq!(a.mul(&b).div(&b).unwrap(), a);
    }
}
