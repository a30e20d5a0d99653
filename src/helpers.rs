//! Domain construction, scalar utilities and the multi-scalar G1 product.

use num_bigint::BigUint;
use num_traits::One;
use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::{
    arith::Scalar,
    blob::Blob,
    consts::{BLS_MODULUS, BYTES_PER_FIELD_ELEMENT, FIAT_SHAMIR_PROTOCOL_DOMAIN, PRIMITIVE_ROOT_OF_UNITY},
    curve::{G1Point, Point},
    errors::KzgError,
    polynomial::Polynomial,
    serialization::compress_g1,
    srs::KzgSettings,
};

/// Reverses the low `bit_length` bits of `value`; higher bits must be clear.
pub fn reverse_bits(value: usize, bit_length: u32) -> usize {
    debug_assert!(bit_length <= usize::BITS);
    debug_assert!(bit_length == usize::BITS || value < (1 << bit_length));
    if bit_length == 0 {
        return 0;
    }
    value.reverse_bits() >> (usize::BITS - bit_length)
}

/// Reorders a power-of-two-length slice by reversing the bits of each index.
///
/// The permutation is an involution, so it converts both ways between
/// natural and bit-reversed domain order.
pub fn bit_reversal_permutation<T: Clone>(elements: &[T]) -> Result<Vec<T>, KzgError> {
    if elements.is_empty() || !elements.len().is_power_of_two() {
        return Err(KzgError::LengthMismatch(format!(
            "cannot bit-reverse a sequence of length {}",
            elements.len()
        )));
    }
    let bit_length = elements.len().trailing_zeros();
    Ok((0..elements.len())
        .map(|i| elements[reverse_bits(i, bit_length)].clone())
        .collect())
}

/// The width-element domain of roots of unity in natural order:
/// powers of 7^((r - 1) / width).
///
/// Width must be a power of two dividing r - 1 (any power of two up to 2^32).
pub fn compute_roots_of_unity(width: usize) -> Result<Vec<Scalar>, KzgError> {
    if width == 0 || !width.is_power_of_two() {
        return Err(KzgError::SetupError(format!(
            "domain width {} is not a power of two",
            width
        )));
    }
    let r_minus_one = &*BLS_MODULUS - BigUint::one();
    if width as u128 > (1u128 << 32) {
        return Err(KzgError::SetupError(format!(
            "domain width {} does not divide r - 1",
            width
        )));
    }

    let exponent = &r_minus_one / BigUint::from(width as u64);
    let generator = Scalar::new(BigUint::from(PRIMITIVE_ROOT_OF_UNITY).modpow(&exponent, &BLS_MODULUS));
    let roots = compute_powers(&generator, width);

    // The last power times the generator must close the cycle.
    debug_assert!(roots
        .last()
        .map(|last| last.mul(&generator) == Scalar::one())
        .unwrap_or(false));
    Ok(roots)
}

/// The first `count` powers of x: [1, x, x^2, ..., x^(count - 1)].
pub fn compute_powers(x: &Scalar, count: usize) -> Vec<Scalar> {
    let mut powers = Vec::with_capacity(count);
    let mut current = Scalar::one();
    for _ in 0..count {
        powers.push(current.clone());
        current = current.mul(x);
    }
    powers
}

/// SHA-256 of the input reduced into the scalar field.
pub fn hash_to_bls_field(data: &[u8]) -> Scalar {
    let digest = Sha256::digest(data);
    Scalar::new(BigUint::from_bytes_be(&digest))
}

/// Decodes a 32-byte big-endian scalar, rejecting non-canonical values.
pub fn bytes_to_bls_field(bytes: &[u8; BYTES_PER_FIELD_ELEMENT]) -> Result<Scalar, KzgError> {
    Scalar::from_bytes_be_checked(bytes)
}

/// Splits a blob into 32-byte chunks and decodes each into a scalar.
pub fn blob_to_polynomial(blob: &Blob) -> Result<Polynomial, KzgError> {
    let mut evaluations = Vec::with_capacity(blob.field_elements());
    for (index, chunk) in blob.data().chunks(BYTES_PER_FIELD_ELEMENT).enumerate() {
        let mut bytes = [0u8; BYTES_PER_FIELD_ELEMENT];
        bytes.copy_from_slice(chunk);
        let scalar = Scalar::from_bytes_be_checked(&bytes).map_err(|_| {
            KzgError::InvalidScalar(format!("blob chunk {} is not a canonical scalar", index))
        })?;
        evaluations.push(scalar);
    }
    Polynomial::new(evaluations)
}

/// The multi-scalar multiplication sum_i scalars[i] * points[i].
///
/// Point-scalar products run in parallel; the empty product is the point at
/// infinity.
pub fn g1_lincomb(points: &[G1Point], scalars: &[Scalar]) -> Result<G1Point, KzgError> {
    if points.len() != scalars.len() {
        return Err(KzgError::LengthMismatch(format!(
            "lincomb over {} points with {} scalars",
            points.len(),
            scalars.len()
        )));
    }
    points
        .par_iter()
        .zip(scalars.par_iter())
        .map(|(point, scalar)| point.scalar_mul_subgroup(scalar))
        .try_reduce(|| Point::Infinity, |a, b| a.add(&b))
}

/// The Fiat-Shamir challenge binding a blob to its commitment:
/// SHA-256 over the domain tag, the domain width as a 16-byte big-endian
/// integer, the blob bytes and the compressed commitment, reduced mod r.
pub fn compute_challenge(blob: &Blob, commitment: &G1Point, width: usize) -> Scalar {
    let mut data = Vec::with_capacity(16 + 16 + blob.len() + 48);
    data.extend_from_slice(FIAT_SHAMIR_PROTOCOL_DOMAIN);
    data.extend_from_slice(&(width as u128).to_be_bytes());
    data.extend_from_slice(blob.data());
    data.extend_from_slice(&compress_g1(commitment));
    hash_to_bls_field(&data)
}

/// Evaluates an evaluation-form polynomial at an arbitrary point via the
/// barycentric formula:
///
/// p(z) = (z^width - 1) / width * sum_i p_i * w_i / (z - w_i)
///
/// where w_i ranges over the bit-reversal-permuted domain aligned with the
/// polynomial. A z inside the domain is answered by direct lookup; the exact
/// domain-membership check is what keeps every denominator nonzero.
pub fn evaluate_polynomial_in_evaluation_form(
    poly: &Polynomial,
    z: &Scalar,
    settings: &KzgSettings,
) -> Result<Scalar, KzgError> {
    let width = settings.width();
    if poly.len() != width {
        return Err(KzgError::LengthMismatch(format!(
            "polynomial width {} does not match setup width {}",
            poly.len(),
            width
        )));
    }

    if let Some(index) = settings.domain_index(z) {
        return Ok(poly.evaluations()[index].clone());
    }

    let roots = settings.roots_of_unity_brp();
    let mut sum = Scalar::zero();
    for (evaluation, root) in poly.evaluations().iter().zip(roots) {
        let term = evaluation.mul(root).div(&z.sub(root))?;
        sum = sum.add(&term);
    }

    let width_scalar = Scalar::from_u64(width as u64);
    let z_pow = z.pow_u64(width as u64);
    sum.mul(&z_pow.sub(&Scalar::one())).div(&width_scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::G1_GENERATOR;

    #[test]
    fn test_reverse_bits_known_values() {
        assert_eq!(reverse_bits(0, 4), 0);
        assert_eq!(reverse_bits(1, 4), 8);
        assert_eq!(reverse_bits(0b0011, 4), 0b1100);
        assert_eq!(reverse_bits(5, 3), 5);
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn test_bit_reversal_permutation_is_involution() {
        let sequence: Vec<u32> = (0..16).collect();
        let permuted = bit_reversal_permutation(&sequence).unwrap();
        assert_ne!(permuted, sequence);
        let restored = bit_reversal_permutation(&permuted).unwrap();
        assert_eq!(restored, sequence);
    }

    #[test]
    fn test_bit_reversal_permutation_rejects_non_power_of_two() {
        assert!(bit_reversal_permutation(&[1u8, 2, 3]).is_err());
        assert!(bit_reversal_permutation::<u8>(&[]).is_err());
    }

    #[test]
    fn test_roots_of_unity_width_two() {
        let roots = compute_roots_of_unity(2).unwrap();
        assert_eq!(roots[0], Scalar::one());
        assert_eq!(roots[1], Scalar::zero().sub(&Scalar::one()));
    }

    #[test]
    fn test_roots_of_unity_are_primitive() {
        let width = 16;
        let roots = compute_roots_of_unity(width).unwrap();
        assert_eq!(roots.len(), width);
        let generator = &roots[1];
        // Order exactly width: the half-power is not 1.
        assert_eq!(generator.pow_u64(width as u64), Scalar::one());
        assert_ne!(generator.pow_u64(width as u64 / 2), Scalar::one());
        // All roots are distinct.
        for i in 0..width {
            for j in (i + 1)..width {
                assert_ne!(roots[i], roots[j]);
            }
        }
    }

    #[test]
    fn test_roots_of_unity_rejects_bad_width() {
        assert!(compute_roots_of_unity(0).is_err());
        assert!(compute_roots_of_unity(12).is_err());
    }

    #[test]
    fn test_compute_powers() {
        let x = Scalar::from_u64(3);
        let powers = compute_powers(&x, 5);
        assert_eq!(powers.len(), 5);
        assert_eq!(powers[0], Scalar::one());
        assert_eq!(powers[4], Scalar::from_u64(81));
        assert!(compute_powers(&x, 0).is_empty());
    }

    #[test]
    fn test_hash_to_bls_field_is_deterministic() {
        let a = hash_to_bls_field(b"some input");
        let b = hash_to_bls_field(b"some input");
        let c = hash_to_bls_field(b"other input");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_g1_lincomb_matches_sequential_fold() {
        let points = vec![
            G1_GENERATOR.clone(),
            G1_GENERATOR.double().unwrap(),
            G1_GENERATOR.clone(),
        ];
        let scalars = vec![
            Scalar::from_u64(3),
            Scalar::from_u64(5),
            Scalar::from_u64(7),
        ];
        // 3G + 5(2G) + 7G = 20G.
        let expected = G1_GENERATOR
            .scalar_mul(&BigUint::from(20u32))
            .unwrap();
        assert_eq!(g1_lincomb(&points, &scalars).unwrap(), expected);
    }

    #[test]
    fn test_g1_lincomb_empty_is_infinity() {
        assert!(g1_lincomb(&[], &[]).unwrap().is_infinity());
        assert!(matches!(
            g1_lincomb(&[G1_GENERATOR.clone()], &[]),
            Err(KzgError::LengthMismatch(_))
        ));
    }
}
