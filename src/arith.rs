//! Modular arithmetic over the two prime fields of BLS12-381.
//!
//! The primitive operations are parameterized by the modulus so the same code
//! serves both the base field (coordinates, modulus [FQ_MODULUS]) and the
//! scalar field (polynomial coefficients, modulus [BLS_MODULUS]); the two are
//! never mixed within a single call. [Fq] and [Scalar] wrap the primitives
//! with a canonical-residue invariant: the inner integer is always in
//! `[0, modulus)`.
//!
//! All arithmetic uses arbitrary-precision integers and is *not*
//! constant-time; this crate targets reference correctness, not side-channel
//! resistance.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::{
    consts::{BLS_MODULUS, BYTES_PER_FIELD_ELEMENT, FQ_MODULUS},
    errors::KzgError,
};

/// `(x + y) mod modulus`, for canonical x and y.
pub fn add_mod(x: &BigUint, y: &BigUint, modulus: &BigUint) -> BigUint {
    let sum = x + y;
    if sum >= *modulus {
        sum - modulus
    } else {
        sum
    }
}

/// `(x - y) mod modulus`, for canonical x and y.
pub fn sub_mod(x: &BigUint, y: &BigUint, modulus: &BigUint) -> BigUint {
    if x >= y {
        x - y
    } else {
        x + modulus - y
    }
}

/// `(x * y) mod modulus`.
pub fn mul_mod(x: &BigUint, y: &BigUint, modulus: &BigUint) -> BigUint {
    (x * y) % modulus
}

/// `(-x) mod modulus`, for canonical x.
pub fn neg_mod(x: &BigUint, modulus: &BigUint) -> BigUint {
    if x.is_zero() {
        BigUint::zero()
    } else {
        modulus - x
    }
}

/// The unique y in `[1, modulus)` with `x * y == 1 (mod modulus)`, computed
/// with the extended Euclidean algorithm.
///
/// Fails with [KzgError::DivisionByZero] when `x == 0 (mod modulus)`.
pub fn inverse_mod(x: &BigUint, modulus: &BigUint) -> Result<BigUint, KzgError> {
    let x = x % modulus;
    if x.is_zero() {
        return Err(KzgError::DivisionByZero);
    }

    // Iterative extended Euclid on (modulus, x), tracking only the Bezout
    // coefficient of x.
    let m = BigInt::from_biguint(Sign::Plus, modulus.clone());
    let mut r0 = m.clone();
    let mut r1 = BigInt::from_biguint(Sign::Plus, x);
    let mut t0 = BigInt::zero();
    let mut t1 = BigInt::one();

    while !r1.is_zero() {
        let q = &r0 / &r1;
        let r2 = &r0 - &q * &r1;
        let t2 = &t0 - &q * &t1;
        r0 = r1;
        r1 = r2;
        t0 = t1;
        t1 = t2;
    }

    if !r0.is_one() {
        // Cannot happen for a prime modulus and nonzero x.
        return Err(KzgError::DivisionByZero);
    }

    let t = ((t0 % &m) + &m) % &m;
    Ok(t.to_biguint().expect("residue normalized to [0, modulus)"))
}

/// `x / y (mod modulus)`, i.e. `x * inverse(y)`.
pub fn div_mod(x: &BigUint, y: &BigUint, modulus: &BigUint) -> Result<BigUint, KzgError> {
    Ok(mul_mod(x, &inverse_mod(y, modulus)?, modulus))
}

/// `base ^ exponent (mod modulus)` for a signed exponent.
///
/// A negative exponent inverts the base first and raises the inverse to the
/// exponent's magnitude; a modular integer is never raised to a negative
/// native power directly.
pub fn pow_mod(base: &BigUint, exponent: &BigInt, modulus: &BigUint) -> Result<BigUint, KzgError> {
    match exponent.sign() {
        Sign::Minus => {
            let inv = inverse_mod(base, modulus)?;
            Ok(inv.modpow(exponent.magnitude(), modulus))
        }
        _ => Ok((base % modulus).modpow(exponent.magnitude(), modulus)),
    }
}

/// An element of the base field Z_q, always stored as its canonical residue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fq(BigUint);

impl Fq {
    pub fn new(value: BigUint) -> Self {
        Fq(value % &*FQ_MODULUS)
    }

    pub fn from_u64(value: u64) -> Self {
        Fq::new(BigUint::from(value))
    }

    pub fn zero() -> Self {
        Fq(BigUint::zero())
    }

    pub fn one() -> Self {
        Fq(BigUint::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn add(&self, rhs: &Fq) -> Fq {
        Fq(add_mod(&self.0, &rhs.0, &FQ_MODULUS))
    }

    pub fn sub(&self, rhs: &Fq) -> Fq {
        Fq(sub_mod(&self.0, &rhs.0, &FQ_MODULUS))
    }

    pub fn mul(&self, rhs: &Fq) -> Fq {
        Fq(mul_mod(&self.0, &rhs.0, &FQ_MODULUS))
    }

    pub fn square(&self) -> Fq {
        self.mul(self)
    }

    pub fn neg(&self) -> Fq {
        Fq(neg_mod(&self.0, &FQ_MODULUS))
    }

    pub fn inverse(&self) -> Result<Fq, KzgError> {
        Ok(Fq(inverse_mod(&self.0, &FQ_MODULUS)?))
    }

    pub fn div(&self, rhs: &Fq) -> Result<Fq, KzgError> {
        Ok(Fq(div_mod(&self.0, &rhs.0, &FQ_MODULUS)?))
    }

    pub fn mul_u64(&self, k: u64) -> Fq {
        Fq(mul_mod(&self.0, &BigUint::from(k), &FQ_MODULUS))
    }

    pub fn pow(&self, exponent: &BigUint) -> Fq {
        Fq(self.0.modpow(exponent, &FQ_MODULUS))
    }

    /// Canonical big-endian encoding, left-padded to 48 bytes.
    pub fn to_bytes_be(&self) -> [u8; 48] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 48];
        out[48 - raw.len()..].copy_from_slice(&raw);
        out
    }
}

/// An element of the scalar field Z_r (a `BlsFieldElement`), always stored as
/// its canonical residue. Hashable so evaluation domains can be indexed by
/// value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Scalar(BigUint);

impl Scalar {
    pub fn new(value: BigUint) -> Self {
        Scalar(value % &*BLS_MODULUS)
    }

    pub fn from_u64(value: u64) -> Self {
        Scalar::new(BigUint::from(value))
    }

    pub fn zero() -> Self {
        Scalar(BigUint::zero())
    }

    pub fn one() -> Self {
        Scalar(BigUint::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    pub fn add(&self, rhs: &Scalar) -> Scalar {
        Scalar(add_mod(&self.0, &rhs.0, &BLS_MODULUS))
    }

    pub fn sub(&self, rhs: &Scalar) -> Scalar {
        Scalar(sub_mod(&self.0, &rhs.0, &BLS_MODULUS))
    }

    pub fn mul(&self, rhs: &Scalar) -> Scalar {
        Scalar(mul_mod(&self.0, &rhs.0, &BLS_MODULUS))
    }

    pub fn neg(&self) -> Scalar {
        Scalar(neg_mod(&self.0, &BLS_MODULUS))
    }

    pub fn inverse(&self) -> Result<Scalar, KzgError> {
        Ok(Scalar(inverse_mod(&self.0, &BLS_MODULUS)?))
    }

    pub fn div(&self, rhs: &Scalar) -> Result<Scalar, KzgError> {
        Ok(Scalar(div_mod(&self.0, &rhs.0, &BLS_MODULUS)?))
    }

    pub fn pow_u64(&self, exponent: u64) -> Scalar {
        Scalar(self.0.modpow(&BigUint::from(exponent), &BLS_MODULUS))
    }

    /// Decodes a 32-byte big-endian chunk, rejecting non-canonical values.
    pub fn from_bytes_be_checked(bytes: &[u8; BYTES_PER_FIELD_ELEMENT]) -> Result<Self, KzgError> {
        let value = BigUint::from_bytes_be(bytes);
        if value >= *BLS_MODULUS {
            return Err(KzgError::InvalidScalar(
                "value is not a canonical scalar (>= BLS_MODULUS)".to_string(),
            ));
        }
        Ok(Scalar(value))
    }

    /// Canonical big-endian encoding, left-padded to 32 bytes.
    pub fn to_bytes_be(&self) -> [u8; BYTES_PER_FIELD_ELEMENT] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; BYTES_PER_FIELD_ELEMENT];
        out[BYTES_PER_FIELD_ELEMENT - raw.len()..].copy_from_slice(&raw);
        out
    }
}
