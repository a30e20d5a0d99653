//! The KZG commitment protocol over blobs: commit, prove, verify, batch
//! verify.
//!
//! Public entry points speak compressed bytes at the boundary (commitments
//! and proofs as 48-byte arrays, scalars as 32-byte arrays) and validate
//! everything untrusted; the `_impl` variants operate on already-validated
//! points and scalars. All operations borrow an immutable [KzgSettings].

use rayon::prelude::*;

use crate::{
    arith::Scalar,
    blob::Blob,
    consts::{BYTES_PER_FIELD_ELEMENT, BYTES_PER_G1_COMPRESSED, RANDOM_CHALLENGE_KZG_BATCH_DOMAIN},
    curve::{G1Point, G1_GENERATOR},
    errors::KzgError,
    helpers::{
        bytes_to_bls_field, compute_challenge, compute_powers,
        evaluate_polynomial_in_evaluation_form, g1_lincomb, hash_to_bls_field,
    },
    pairing::pairing_check,
    polynomial::Polynomial,
    serialization::{compress_g1, validate_kzg_g1},
    srs::KzgSettings,
};

/// A commitment to a blob: a compressed G1 point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KzgCommitment([u8; BYTES_PER_G1_COMPRESSED]);

impl KzgCommitment {
    pub fn from_bytes(bytes: [u8; BYTES_PER_G1_COMPRESSED]) -> Self {
        KzgCommitment(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; BYTES_PER_G1_COMPRESSED] {
        &self.0
    }

    /// Decodes, curve-checks and subgroup-checks the commitment.
    pub fn to_point(&self) -> Result<G1Point, KzgError> {
        validate_kzg_g1(&self.0)
    }
}

/// An opening proof: a compressed G1 point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KzgProof([u8; BYTES_PER_G1_COMPRESSED]);

impl KzgProof {
    pub fn from_bytes(bytes: [u8; BYTES_PER_G1_COMPRESSED]) -> Self {
        KzgProof(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; BYTES_PER_G1_COMPRESSED] {
        &self.0
    }

    pub fn to_point(&self) -> Result<G1Point, KzgError> {
        validate_kzg_g1(&self.0)
    }
}

/// Validates untrusted commitment bytes (decode, curve equation, subgroup).
pub fn bytes_to_kzg_commitment(
    bytes: &[u8; BYTES_PER_G1_COMPRESSED],
) -> Result<KzgCommitment, KzgError> {
    validate_kzg_g1(bytes)?;
    Ok(KzgCommitment(*bytes))
}

/// Validates untrusted proof bytes (decode, curve equation, subgroup).
pub fn bytes_to_kzg_proof(bytes: &[u8; BYTES_PER_G1_COMPRESSED]) -> Result<KzgProof, KzgError> {
    validate_kzg_g1(bytes)?;
    Ok(KzgProof(*bytes))
}

fn check_blob_width(blob: &Blob, settings: &KzgSettings) -> Result<(), KzgError> {
    if blob.field_elements() != settings.width() {
        return Err(KzgError::LengthMismatch(format!(
            "blob holds {} field elements but the setup width is {}",
            blob.field_elements(),
            settings.width()
        )));
    }
    Ok(())
}

/// Commits to a blob: the multi-scalar product of the blob's scalars against
/// the Lagrange setup points.
pub fn blob_to_kzg_commitment(
    blob: &Blob,
    settings: &KzgSettings,
) -> Result<KzgCommitment, KzgError> {
    check_blob_width(blob, settings)?;
    let poly = blob.to_polynomial()?;
    let commitment = g1_lincomb(settings.g1_lagrange_brp(), poly.evaluations())?;
    Ok(KzgCommitment(compress_g1(&commitment)))
}

/// Opens a blob's polynomial at an arbitrary point z, returning the proof
/// and the claimed evaluation y.
pub fn compute_kzg_proof(
    blob: &Blob,
    z_bytes: &[u8; BYTES_PER_FIELD_ELEMENT],
    settings: &KzgSettings,
) -> Result<(KzgProof, [u8; BYTES_PER_FIELD_ELEMENT]), KzgError> {
    check_blob_width(blob, settings)?;
    let poly = blob.to_polynomial()?;
    let z = bytes_to_bls_field(z_bytes)?;
    let (proof, y) = compute_kzg_proof_impl(&poly, &z, settings)?;
    Ok((KzgProof(compress_g1(&proof)), y.to_bytes_be()))
}

/// The removable-singularity case of the quotient polynomial: the quotient's
/// value at the one domain point equal to z, computed as the sum of
/// (p_i - y) * w_i / (z * (z - w_i)) over all other domain points.
fn compute_quotient_eval_within_domain(
    z: &Scalar,
    poly: &Polynomial,
    y: &Scalar,
    settings: &KzgSettings,
) -> Result<Scalar, KzgError> {
    let mut result = Scalar::zero();
    for (evaluation, root) in poly.evaluations().iter().zip(settings.roots_of_unity_brp()) {
        if root == z {
            continue;
        }
        let numerator = evaluation.sub(y).mul(root);
        let denominator = z.mul(&z.sub(root));
        result = result.add(&numerator.div(&denominator)?);
    }
    Ok(result)
}

/// Proof computation on a decoded polynomial and scalar.
///
/// The quotient (p(x) - y) / (x - z) is built pointwise in evaluation form;
/// when z is itself a domain point the one vanishing denominator is replaced
/// by the closed-form limit from
/// [compute_quotient_eval_within_domain].
pub fn compute_kzg_proof_impl(
    poly: &Polynomial,
    z: &Scalar,
    settings: &KzgSettings,
) -> Result<(G1Point, Scalar), KzgError> {
    if poly.len() != settings.width() {
        return Err(KzgError::LengthMismatch(format!(
            "polynomial width {} does not match setup width {}",
            poly.len(),
            settings.width()
        )));
    }
    let y = evaluate_polynomial_in_evaluation_form(poly, z, settings)?;

    let roots = settings.roots_of_unity_brp();
    let mut quotient = Vec::with_capacity(poly.len());
    let mut singular_index = None;
    for (index, (evaluation, root)) in poly.evaluations().iter().zip(roots).enumerate() {
        if root == z {
            // Filled in below; at most one domain point can equal z.
            singular_index = Some(index);
            quotient.push(Scalar::zero());
            continue;
        }
        quotient.push(evaluation.sub(&y).div(&root.sub(z))?);
    }
    if let Some(index) = singular_index {
        quotient[index] = compute_quotient_eval_within_domain(z, poly, &y, settings)?;
    }

    let proof = g1_lincomb(settings.g1_lagrange_brp(), &quotient)?;
    Ok((proof, y))
}

/// Verifies a single opening from untrusted bytes.
pub fn verify_kzg_proof(
    commitment: &KzgCommitment,
    z_bytes: &[u8; BYTES_PER_FIELD_ELEMENT],
    y_bytes: &[u8; BYTES_PER_FIELD_ELEMENT],
    proof: &KzgProof,
    settings: &KzgSettings,
) -> Result<bool, KzgError> {
    let commitment = commitment.to_point()?;
    let z = bytes_to_bls_field(z_bytes)?;
    let y = bytes_to_bls_field(y_bytes)?;
    let proof = proof.to_point()?;
    verify_kzg_proof_impl(&commitment, &z, &y, &proof, settings)
}

/// The pairing equation e(P - [y]G1, -G2) * e(proof, [s]G2 - [z]G2) == 1.
///
/// Inputs must already be validated subgroup points and canonical scalars.
pub fn verify_kzg_proof_impl(
    commitment: &G1Point,
    z: &Scalar,
    y: &Scalar,
    proof: &G1Point,
    settings: &KzgSettings,
) -> Result<bool, KzgError> {
    let g2_generator = &settings.g2_monomial()[0];
    let x_minus_z = settings.g2_monomial()[1].add(&g2_generator.scalar_mul_subgroup(z)?.neg())?;
    let p_minus_y = commitment.add(&G1_GENERATOR.scalar_mul_subgroup(y)?.neg())?;

    pairing_check(&[
        (p_minus_y, g2_generator.neg()),
        (proof.clone(), x_minus_z),
    ])
}

/// Opens a blob at its own Fiat-Shamir challenge point, binding the proof to
/// the (blob, commitment) pair.
pub fn compute_blob_kzg_proof(
    blob: &Blob,
    commitment: &KzgCommitment,
    settings: &KzgSettings,
) -> Result<KzgProof, KzgError> {
    check_blob_width(blob, settings)?;
    let commitment_point = commitment.to_point()?;
    let poly = blob.to_polynomial()?;
    let challenge = compute_challenge(blob, &commitment_point, settings.width());
    let (proof, _) = compute_kzg_proof_impl(&poly, &challenge, settings)?;
    Ok(KzgProof(compress_g1(&proof)))
}

/// Verifies a blob against its commitment and blob proof.
pub fn verify_blob_kzg_proof(
    blob: &Blob,
    commitment: &KzgCommitment,
    proof: &KzgProof,
    settings: &KzgSettings,
) -> Result<bool, KzgError> {
    check_blob_width(blob, settings)?;
    let commitment_point = commitment.to_point()?;
    let proof_point = proof.to_point()?;
    let poly = blob.to_polynomial()?;
    let challenge = compute_challenge(blob, &commitment_point, settings.width());
    let y = evaluate_polynomial_in_evaluation_form(&poly, &challenge, settings)?;
    verify_kzg_proof_impl(&commitment_point, &challenge, &y, &proof_point, settings)
}

/// Powers of the batch aggregation challenge, derived by hashing the whole
/// batch under its own domain tag.
fn compute_r_powers(
    commitments: &[G1Point],
    zs: &[Scalar],
    ys: &[Scalar],
    proofs: &[G1Point],
    width: usize,
) -> Vec<Scalar> {
    let count = commitments.len();
    let mut data = Vec::with_capacity(16 + 16 + count * (2 * 48 + 2 * 32));
    data.extend_from_slice(RANDOM_CHALLENGE_KZG_BATCH_DOMAIN);
    data.extend_from_slice(&(width as u64).to_be_bytes());
    data.extend_from_slice(&(count as u64).to_be_bytes());
    for i in 0..count {
        data.extend_from_slice(&compress_g1(&commitments[i]));
        data.extend_from_slice(&zs[i].to_bytes_be());
        data.extend_from_slice(&ys[i].to_bytes_be());
        data.extend_from_slice(&compress_g1(&proofs[i]));
    }
    let r = hash_to_bls_field(&data);
    compute_powers(&r, count)
}

/// Verifies a batch of openings with a single pairing check.
///
/// Each claim is weighted by a power of a batch challenge; the weighted sums
/// collapse the n pairing equations into one. An empty batch is vacuously
/// true.
pub fn verify_kzg_proof_batch(
    commitments: &[G1Point],
    zs: &[Scalar],
    ys: &[Scalar],
    proofs: &[G1Point],
    settings: &KzgSettings,
) -> Result<bool, KzgError> {
    let count = commitments.len();
    if zs.len() != count || ys.len() != count || proofs.len() != count {
        return Err(KzgError::LengthMismatch(format!(
            "batch of {} commitments with {} points, {} evaluations, {} proofs",
            count,
            zs.len(),
            ys.len(),
            proofs.len()
        )));
    }

    let r_powers = compute_r_powers(commitments, zs, ys, proofs, settings.width());

    let proof_lincomb = g1_lincomb(proofs, &r_powers)?;
    let weighted_zs: Vec<Scalar> = r_powers.iter().zip(zs).map(|(r, z)| r.mul(z)).collect();
    let proof_z_lincomb = g1_lincomb(proofs, &weighted_zs)?;

    let c_minus_y: Vec<G1Point> = commitments
        .iter()
        .zip(ys)
        .map(|(commitment, y)| {
            commitment.add(&G1_GENERATOR.scalar_mul_subgroup(y)?.neg())
        })
        .collect::<Result<_, _>>()?;
    let c_minus_y_lincomb = g1_lincomb(&c_minus_y, &r_powers)?;

    let g2_generator = &settings.g2_monomial()[0];
    pairing_check(&[
        (c_minus_y_lincomb.add(&proof_z_lincomb)?, g2_generator.neg()),
        (proof_lincomb, settings.g2_monomial()[1].clone()),
    ])
}

/// Derives every blob's challenge point and evaluation in one parallel pass.
fn compute_challenges_and_evaluate_polynomials(
    blobs: &[Blob],
    commitments: &[G1Point],
    settings: &KzgSettings,
) -> Result<(Vec<Scalar>, Vec<Scalar>), KzgError> {
    let pairs: Vec<(Scalar, Scalar)> = blobs
        .par_iter()
        .zip(commitments.par_iter())
        .map(|(blob, commitment)| {
            check_blob_width(blob, settings)?;
            let poly = blob.to_polynomial()?;
            let challenge = compute_challenge(blob, commitment, settings.width());
            let y = evaluate_polynomial_in_evaluation_form(&poly, &challenge, settings)?;
            Ok((challenge, y))
        })
        .collect::<Result<_, KzgError>>()?;
    Ok(pairs.into_iter().unzip())
}

/// Verifies a batch of (blob, commitment, proof) triples with one pairing
/// check.
pub fn verify_blob_kzg_proof_batch(
    blobs: &[Blob],
    commitments: &[KzgCommitment],
    proofs: &[KzgProof],
    settings: &KzgSettings,
) -> Result<bool, KzgError> {
    if blobs.len() != commitments.len() || blobs.len() != proofs.len() {
        return Err(KzgError::LengthMismatch(format!(
            "batch of {} blobs with {} commitments and {} proofs",
            blobs.len(),
            commitments.len(),
            proofs.len()
        )));
    }

    let commitment_points: Vec<G1Point> = commitments
        .iter()
        .map(KzgCommitment::to_point)
        .collect::<Result<_, _>>()?;
    let proof_points: Vec<G1Point> = proofs
        .iter()
        .map(KzgProof::to_point)
        .collect::<Result<_, _>>()?;

    let (challenges, ys) =
        compute_challenges_and_evaluate_polynomials(blobs, &commitment_points, settings)?;

    verify_kzg_proof_batch(&commitment_points, &challenges, &ys, &proof_points, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref SETTINGS: KzgSettings =
            KzgSettings::insecure_setup(4, &Scalar::from_u64(41337)).expect("valid toy setup");
    }

    fn constant_blob(value: u8, width: usize) -> Blob {
        let mut data = vec![0u8; width * BYTES_PER_FIELD_ELEMENT];
        for i in 0..width {
            data[(i + 1) * BYTES_PER_FIELD_ELEMENT - 1] = value;
        }
        Blob::new(data).expect("valid blob")
    }

    #[test]
    fn test_commitment_to_constant_blob_is_scaled_generator() {
        // A constant polynomial c commits to [c]G1 regardless of the setup
        // secret.
        let blob = constant_blob(9, 4);
        let commitment = blob_to_kzg_commitment(&blob, &SETTINGS).unwrap();
        let expected = G1_GENERATOR
            .scalar_mul_subgroup(&Scalar::from_u64(9))
            .unwrap();
        assert_eq!(commitment.to_point().unwrap(), expected);
    }

    #[test]
    fn test_blob_width_mismatch_is_rejected() {
        let blob = constant_blob(1, 8);
        assert!(matches!(
            blob_to_kzg_commitment(&blob, &SETTINGS),
            Err(KzgError::LengthMismatch(_))
        ));
        assert!(matches!(
            compute_kzg_proof(&blob, &[0u8; 32], &SETTINGS),
            Err(KzgError::LengthMismatch(_))
        ));
    }

    #[test]
    fn test_compute_kzg_proof_rejects_non_canonical_z() {
        let blob = constant_blob(1, 4);
        let z_bytes = [0xffu8; 32];
        assert!(matches!(
            compute_kzg_proof(&blob, &z_bytes, &SETTINGS),
            Err(KzgError::InvalidScalar(_))
        ));
    }

    #[test]
    fn test_constant_blob_proof_is_infinity() {
        // The quotient of a constant polynomial is zero, so the proof is the
        // identity and y equals the constant at every z.
        let blob = constant_blob(5, 4);
        let z = Scalar::from_u64(123456789);
        let poly = blob.to_polynomial().unwrap();
        let (proof, y) = compute_kzg_proof_impl(&poly, &z, &SETTINGS).unwrap();
        assert!(proof.is_infinity());
        assert_eq!(y, Scalar::from_u64(5));
    }

    #[test]
    fn test_bytes_to_kzg_commitment_validates() {
        let blob = constant_blob(2, 4);
        let commitment = blob_to_kzg_commitment(&blob, &SETTINGS).unwrap();
        assert_eq!(
            bytes_to_kzg_commitment(commitment.as_bytes()).unwrap(),
            commitment
        );
        assert!(bytes_to_kzg_proof(&[0u8; 48]).is_err());
    }

    #[test]
    fn test_batch_length_mismatch_is_rejected() {
        let blob = constant_blob(1, 4);
        let commitment = blob_to_kzg_commitment(&blob, &SETTINGS).unwrap();
        assert!(matches!(
            verify_blob_kzg_proof_batch(&[blob], &[commitment], &[], &SETTINGS),
            Err(KzgError::LengthMismatch(_))
        ));
    }
}
