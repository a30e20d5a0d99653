//! Optimal-ate pairing over BLS12-381.
//!
//! The Miller loop runs over the 62 low bits of the curve parameter
//! [ATE_LOOP_COUNT], accumulating line-function evaluations in Fq12; the
//! final exponentiation maps the accumulator into the order-r subgroup where
//! equal pairings compare equal. Multi-pairing products share a single final
//! exponentiation.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use num_traits::One;

use crate::{
    consts::{ATE_LOOP_COUNT, BLS_MODULUS, FQ_MODULUS, LOG_ATE_LOOP_COUNT},
    curve::{g1_to_g12, twist, G1Point, G2Point, G12Point, Point},
    errors::KzgError,
    extension::Fq12,
};

lazy_static! {
    /// (q^12 - 1) / r, the cofactor that maps Miller loop outputs to the
    /// canonical r-th roots of unity.
    static ref FINAL_EXPONENT: BigUint =
        (FQ_MODULUS.pow(12) - BigUint::one()) / &*BLS_MODULUS;
}

/// Evaluates the line through p1 and p2 at t.
///
/// Uses the chord slope when the x-coordinates differ, the tangent slope when
/// the points coincide, and the vertical line x - x1 when the points are
/// mutual inverses. None of the three operands may be the point at infinity;
/// the Miller loop never produces one here for valid inputs.
pub fn line_function(p1: &G12Point, p2: &G12Point, t: &G12Point) -> Result<Fq12, KzgError> {
    let ((x1, y1), (x2, y2), (xt, yt)) = match (p1, p2, t) {
        (
            Point::Affine { x: x1, y: y1 },
            Point::Affine { x: x2, y: y2 },
            Point::Affine { x: xt, y: yt },
        ) => ((x1, y1), (x2, y2), (xt, yt)),
        _ => {
            return Err(KzgError::PointNotOnCurve(
                "line function is undefined at the point at infinity".to_string(),
            ))
        }
    };

    if x1 != x2 {
        let m = y2.sub(y1).div(&x2.sub(x1))?;
        Ok(m.mul(&xt.sub(x1)).sub(&yt.sub(y1)))
    } else if y1 == y2 {
        let m = x1.square().mul_u64(3).div(&y1.mul_u64(2))?;
        Ok(m.mul(&xt.sub(x1)).sub(&yt.sub(y1)))
    } else {
        Ok(xt.sub(x1))
    }
}

/// The raw (non-final-exponentiated) Miller loop accumulator for the pair
/// (q, p), both already in Fq12 coordinates.
///
/// A pair containing the point at infinity contributes the multiplicative
/// identity, so products over degenerate pairs stay well defined.
pub fn miller_loop(q: &G12Point, p: &G12Point) -> Result<Fq12, KzgError> {
    if q.is_infinity() || p.is_infinity() {
        return Ok(Fq12::one());
    }

    let mut f = Fq12::one();
    let mut r = q.clone();
    for i in (0..=LOG_ATE_LOOP_COUNT).rev() {
        f = f.square().mul(&line_function(&r, &r, p)?);
        r = r.double()?;
        if ATE_LOOP_COUNT & (1 << i) != 0 {
            f = f.mul(&line_function(&r, q, p)?);
            r = r.add(q)?;
        }
    }
    Ok(f)
}

/// Raises the Miller loop accumulator to (q^12 - 1) / r.
pub fn final_exponentiate(f: &Fq12) -> Fq12 {
    f.pow(&FINAL_EXPONENT)
}

/// The full pairing e(Q, P) for Q in G2 and P in G1.
pub fn pairing(q: &G2Point, p: &G1Point) -> Result<Fq12, KzgError> {
    if !q.is_valid_point() {
        return Err(KzgError::PointNotOnCurve(
            "G2 pairing input fails the curve equation".to_string(),
        ));
    }
    if !p.is_valid_point() {
        return Err(KzgError::PointNotOnCurve(
            "G1 pairing input fails the curve equation".to_string(),
        ));
    }
    Ok(final_exponentiate(&miller_loop(
        &twist(q),
        &g1_to_g12(p),
    )?))
}

/// True iff the product of pairings over all pairs is the identity.
///
/// Multiplies the raw Miller loop accumulators and applies the final
/// exponentiation once to the product; exponentiating per pair would do the
/// same work n times over. An empty slice of pairs is vacuously true.
pub fn pairing_check(pairs: &[(G1Point, G2Point)]) -> Result<bool, KzgError> {
    let mut product = Fq12::one();
    for (p, q) in pairs {
        if !p.is_valid_point() {
            return Err(KzgError::PointNotOnCurve(
                "G1 pairing input fails the curve equation".to_string(),
            ));
        }
        if !q.is_valid_point() {
            return Err(KzgError::PointNotOnCurve(
                "G2 pairing input fails the curve equation".to_string(),
            ));
        }
        product = product.mul(&miller_loop(&twist(q), &g1_to_g12(p))?);
    }
    Ok(final_exponentiate(&product).is_one())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{G1_GENERATOR, G2_GENERATOR};

    #[test]
    fn test_line_function_rejects_infinity() {
        let g = g1_to_g12(&G1_GENERATOR);
        assert!(matches!(
            line_function(&G12Point::Infinity, &g, &g),
            Err(KzgError::PointNotOnCurve(_))
        ));
    }

    #[test]
    fn test_line_function_vanishes_on_its_points() {
        // The chord through P and 2P evaluates to zero at both.
        let p = g1_to_g12(&G1_GENERATOR);
        let p2 = p.double().unwrap();
        let at_p = line_function(&p, &p2, &p).unwrap();
        let at_p2 = line_function(&p, &p2, &p2).unwrap();
        assert!(at_p.is_zero());
        assert!(at_p2.is_zero());
    }

    #[test]
    fn test_miller_loop_identity_on_infinity() {
        let g = g1_to_g12(&G1_GENERATOR);
        assert!(miller_loop(&G12Point::Infinity, &g).unwrap().is_one());
        assert!(miller_loop(&g, &G12Point::Infinity).unwrap().is_one());
    }

    #[test]
    fn test_empty_pairing_check_is_true() {
        assert!(pairing_check(&[]).unwrap());
    }

    #[test]
    fn test_pairing_rejects_off_curve_points() {
        let bogus = G1Point::affine(crate::arith::Fq::from_u64(1), crate::arith::Fq::from_u64(1));
        assert!(matches!(
            pairing(&G2_GENERATOR, &bogus),
            Err(KzgError::PointNotOnCurve(_))
        ));
    }

    #[test]
    fn test_pairing_with_inverse_cancels() {
        // e(P, Q) * e(-P, Q) == 1, checked with one shared final
        // exponentiation.
        let pairs = [
            (G1_GENERATOR.clone(), G2_GENERATOR.clone()),
            (G1_GENERATOR.neg(), G2_GENERATOR.clone()),
        ];
        assert!(pairing_check(&pairs).unwrap());
    }
}
