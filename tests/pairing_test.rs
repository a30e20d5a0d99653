use num_bigint::BigUint;
use rust_kzg_bls12_381::{
    curve::{G1Point, G2Point, G1_GENERATOR, G2_GENERATOR},
    pairing::{final_exponentiate, miller_loop, pairing, pairing_check},
};

#[test]
fn test_pairing_is_nondegenerate_and_bilinear_in_g1() {
    let e_p_q = pairing(&G2_GENERATOR, &G1_GENERATOR).unwrap();
    assert!(!e_p_q.is_one(), "the pairing of the generators is not 1");

    // e(2P, Q) == e(P, Q)^2
    let doubled = G1_GENERATOR.double().unwrap();
    let e_2p_q = pairing(&G2_GENERATOR, &doubled).unwrap();
    assert_eq!(e_2p_q, e_p_q.pow(&BigUint::from(2u32)));
}

#[test]
fn test_pairing_bilinear_in_g2() {
    // e(P, 2Q) == e(2P, Q): both sides equal e(P, Q)^2.
    let e_p_2q = pairing(&G2_GENERATOR.double().unwrap(), &G1_GENERATOR).unwrap();
    let e_2p_q = pairing(&G2_GENERATOR, &G1_GENERATOR.double().unwrap()).unwrap();
    assert_eq!(e_p_2q, e_2p_q);
}

#[test]
fn test_pairing_check_accepts_cancelling_pairs() {
    // e(3P, Q) * e(-3P, Q) == 1.
    let three_p = G1_GENERATOR.scalar_mul(&BigUint::from(3u32)).unwrap();
    assert!(pairing_check(&[
        (three_p.clone(), G2_GENERATOR.clone()),
        (three_p.neg(), G2_GENERATOR.clone()),
    ])
    .unwrap());
}

#[test]
fn test_pairing_check_detects_unbalanced_pairs() {
    // e(P, Q) * e(-2P, Q) != 1.
    let doubled = G1_GENERATOR.double().unwrap();
    assert!(!pairing_check(&[
        (G1_GENERATOR.clone(), G2_GENERATOR.clone()),
        (doubled.neg(), G2_GENERATOR.clone()),
    ])
    .unwrap());
}

#[test]
fn test_pairing_check_ignores_infinity_pairs() {
    // Degenerate pairs contribute the identity to the product.
    assert!(pairing_check(&[
        (G1Point::Infinity, G2_GENERATOR.clone()),
        (G1_GENERATOR.clone(), G2Point::Infinity),
    ])
    .unwrap());
}

#[test]
fn test_shared_final_exponentiation_matches_per_pair() {
    use rust_kzg_bls12_381::curve::{g1_to_g12, twist};

    // final_exp(m1 * m2) == final_exp(m1) * final_exp(m2).
    let m1 = miller_loop(&twist(&G2_GENERATOR), &g1_to_g12(&G1_GENERATOR)).unwrap();
    let m2 = miller_loop(
        &twist(&G2_GENERATOR),
        &g1_to_g12(&G1_GENERATOR.double().unwrap()),
    )
    .unwrap();
    assert_eq!(
        final_exponentiate(&m1.mul(&m2)),
        final_exponentiate(&m1).mul(&final_exponentiate(&m2))
    );
}
