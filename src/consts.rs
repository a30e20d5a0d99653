use lazy_static::lazy_static;
use num_bigint::BigUint;

/// Size of a scalar (Fr element) in its canonical big-endian encoding.
pub const BYTES_PER_FIELD_ELEMENT: usize = 32;

/// Size of a compressed G1 point.
pub const BYTES_PER_G1_COMPRESSED: usize = 48;

/// Size of a compressed G2 point.
pub const BYTES_PER_G2_COMPRESSED: usize = 96;

/// Number of field elements in a mainnet blob.
pub const FIELD_ELEMENTS_PER_BLOB: usize = 4096;

/// Size of a mainnet blob in bytes.
pub const BYTES_PER_BLOB: usize = FIELD_ELEMENTS_PER_BLOB * BYTES_PER_FIELD_ELEMENT;

/// Generator of the multiplicative group of the scalar field, used to derive
/// roots of unity.
pub const PRIMITIVE_ROOT_OF_UNITY: u64 = 7;

/// Domain separator for the Fiat-Shamir challenge binding a blob to its
/// commitment.
pub const FIAT_SHAMIR_PROTOCOL_DOMAIN: &[u8; 16] = b"FSBLOBVERIFY_V1_";

/// Domain separator for the random challenge used to aggregate a batch of
/// proofs into one pairing check.
pub const RANDOM_CHALLENGE_KZG_BATCH_DOMAIN: &[u8; 16] = b"RCKZGBATCH___V1_";

/// The optimal-ate Miller loop count for BLS12-381 (the absolute value of the
/// curve parameter t), 0xd201000000010000.
pub const ATE_LOOP_COUNT: u64 = 15_132_376_222_941_642_752;

/// Index of the highest bit of [ATE_LOOP_COUNT] below the leading one; the
/// Miller loop runs from this bit down to bit 0.
pub const LOG_ATE_LOOP_COUNT: u32 = 62;

lazy_static! {
    /// The base field prime q: coordinates of G1 points live in Z_q.
    pub static ref FQ_MODULUS: BigUint = BigUint::parse_bytes(
        b"4002409555221667393417789825735904156556882819939007885332058136124031650490837864442687629129015664037894272559787",
        10,
    )
    .expect("valid base field modulus");

    /// The subgroup order r (BLS_MODULUS): scalars and polynomial
    /// coefficients live in Z_r.
    pub static ref BLS_MODULUS: BigUint = BigUint::parse_bytes(
        b"52435875175126190479447740508185965837690552500527637822603658699938581184513",
        10,
    )
    .expect("valid scalar field modulus");
}
