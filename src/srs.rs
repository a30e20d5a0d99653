//! The trusted setup (structured reference string) and its loading paths.

use std::collections::HashMap;

use crate::{
    arith::Scalar,
    consts::{BYTES_PER_G1_COMPRESSED, BYTES_PER_G2_COMPRESSED, FIELD_ELEMENTS_PER_BLOB},
    curve::{G1Point, G2Point, G1_GENERATOR, G2_GENERATOR},
    errors::KzgError,
    helpers::{bit_reversal_permutation, compute_roots_of_unity},
    serialization::{decompress_g1, decompress_g2},
};

/// An immutable trusted setup every protocol operation borrows.
///
/// Holds the Lagrange-basis G1 powers of the secret (bit-reversal-permuted to
/// align with blob order), the first monomial G2 powers, and the matching
/// evaluation domain. The width is any power of two up to
/// [FIELD_ELEMENTS_PER_BLOB]; smaller widths make the full protocol
/// exercisable without mainnet-sized inputs.
#[derive(Clone, Debug)]
pub struct KzgSettings {
    width: usize,
    g1_lagrange_brp: Vec<G1Point>,
    g2_monomial: Vec<G2Point>,
    roots_of_unity: Vec<Scalar>,
    roots_of_unity_brp: Vec<Scalar>,
    domain_index: HashMap<Scalar, usize>,
}

impl KzgSettings {
    /// Builds settings from already-validated points. G1 Lagrange points are
    /// supplied in natural domain order and permuted here; G2 points are the
    /// monomial powers [G2, [s]G2, ...].
    pub fn from_points(
        g1_lagrange: Vec<G1Point>,
        g2_monomial: Vec<G2Point>,
    ) -> Result<Self, KzgError> {
        let width = g1_lagrange.len();
        if width == 0 || !width.is_power_of_two() || width > FIELD_ELEMENTS_PER_BLOB {
            return Err(KzgError::SetupError(format!(
                "setup has {} G1 points, expected a power of two up to {}",
                width, FIELD_ELEMENTS_PER_BLOB
            )));
        }
        if g2_monomial.len() < 2 {
            return Err(KzgError::SetupError(format!(
                "setup has {} G2 points, need at least 2",
                g2_monomial.len()
            )));
        }

        let roots_of_unity = compute_roots_of_unity(width)?;
        let roots_of_unity_brp = bit_reversal_permutation(&roots_of_unity)?;
        let g1_lagrange_brp = bit_reversal_permutation(&g1_lagrange)?;

        let domain_index = roots_of_unity_brp
            .iter()
            .enumerate()
            .map(|(index, root)| (root.clone(), index))
            .collect();

        Ok(KzgSettings {
            width,
            g1_lagrange_brp,
            g2_monomial,
            roots_of_unity,
            roots_of_unity_brp,
            domain_index,
        })
    }

    /// Decodes and fully validates a setup from compressed point bytes:
    /// every point must decode, lie on its curve and pass the subgroup
    /// check.
    pub fn from_compressed_bytes(g1_bytes: &[u8], g2_bytes: &[u8]) -> Result<Self, KzgError> {
        if g1_bytes.len() % BYTES_PER_G1_COMPRESSED != 0 {
            return Err(KzgError::SetupError(format!(
                "G1 setup data of {} bytes is not a whole number of compressed points",
                g1_bytes.len()
            )));
        }
        if g2_bytes.len() % BYTES_PER_G2_COMPRESSED != 0 {
            return Err(KzgError::SetupError(format!(
                "G2 setup data of {} bytes is not a whole number of compressed points",
                g2_bytes.len()
            )));
        }

        let mut g1_lagrange = Vec::with_capacity(g1_bytes.len() / BYTES_PER_G1_COMPRESSED);
        for (index, chunk) in g1_bytes.chunks(BYTES_PER_G1_COMPRESSED).enumerate() {
            let mut bytes = [0u8; BYTES_PER_G1_COMPRESSED];
            bytes.copy_from_slice(chunk);
            let point = decompress_g1(&bytes)
                .map_err(|error| KzgError::SetupError(format!("G1 point {}: {}", index, error)))?;
            if !point.subgroup_check()? {
                return Err(KzgError::SetupError(format!(
                    "G1 point {} is not in the order-r subgroup",
                    index
                )));
            }
            g1_lagrange.push(point);
        }

        let mut g2_monomial = Vec::with_capacity(g2_bytes.len() / BYTES_PER_G2_COMPRESSED);
        for (index, chunk) in g2_bytes.chunks(BYTES_PER_G2_COMPRESSED).enumerate() {
            let mut bytes = [0u8; BYTES_PER_G2_COMPRESSED];
            bytes.copy_from_slice(chunk);
            let point = decompress_g2(&bytes)
                .map_err(|error| KzgError::SetupError(format!("G2 point {}: {}", index, error)))?;
            if !point.subgroup_check()? {
                return Err(KzgError::SetupError(format!(
                    "G2 point {} is not in the order-r subgroup",
                    index
                )));
            }
            g2_monomial.push(point);
        }

        Self::from_points(g1_lagrange, g2_monomial)
    }

    /// Derives a toy setup from a known secret, for tests and local tooling
    /// only. The Lagrange value of the i-th basis polynomial at the secret s
    /// has the closed form
    ///
    /// l_i(s) = w_i * (s^width - 1) / (width * (s - w_i))
    ///
    /// which avoids any coefficient-form interpolation. The secret must not
    /// be a domain point.
    pub fn insecure_setup(width: usize, secret: &Scalar) -> Result<Self, KzgError> {
        let roots_of_unity = compute_roots_of_unity(width)?;
        if secret.pow_u64(width as u64) == Scalar::one() {
            return Err(KzgError::SetupError(
                "setup secret is a root of unity in its own domain".to_string(),
            ));
        }

        let width_scalar = Scalar::from_u64(width as u64);
        let vanishing = secret.pow_u64(width as u64).sub(&Scalar::one());
        let mut g1_lagrange = Vec::with_capacity(width);
        for root in &roots_of_unity {
            let numerator = root.mul(&vanishing);
            let denominator = width_scalar.mul(&secret.sub(root));
            let lagrange_value = numerator.div(&denominator)?;
            g1_lagrange.push(G1_GENERATOR.scalar_mul_subgroup(&lagrange_value)?);
        }

        let g2_monomial = vec![
            G2_GENERATOR.clone(),
            G2_GENERATOR.scalar_mul_subgroup(secret)?,
        ];
        Self::from_points(g1_lagrange, g2_monomial)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Lagrange G1 points in bit-reversed domain order, aligned with blob
    /// element order.
    pub fn g1_lagrange_brp(&self) -> &[G1Point] {
        &self.g1_lagrange_brp
    }

    /// Monomial G2 points; index 1 is [s]G2, the verifier's view of the
    /// secret.
    pub fn g2_monomial(&self) -> &[G2Point] {
        &self.g2_monomial
    }

    pub fn roots_of_unity(&self) -> &[Scalar] {
        &self.roots_of_unity
    }

    pub fn roots_of_unity_brp(&self) -> &[Scalar] {
        &self.roots_of_unity_brp
    }

    /// Index of z in the bit-reversed domain, if z is a domain point.
    pub fn domain_index(&self, z: &Scalar) -> Option<usize> {
        self.domain_index.get(z).copied()
    }
}
