use thiserror::Error;

/// Errors surfaced while validating untrusted input or performing KZG
/// operations.
///
/// Every variant is a recoverable validation failure: callers are expected to
/// reject the offending input and move on. A failed pairing check is *not* an
/// error; the `verify_*` functions return `Ok(false)` for that case and
/// reserve `Err` for malformed input that aborts verification before the
/// pairing is attempted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KzgError {
    /// Malformed compressed point bytes: bad flag bits, flag/payload
    /// inconsistency, or an out-of-range coordinate.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Decoded coordinates do not satisfy the curve equation, or no square
    /// root exists for the recovered x-coordinate.
    #[error("point not on curve: {0}")]
    PointNotOnCurve(String),

    /// The point is on the curve but outside the prime-order subgroup.
    #[error("point not in subgroup: {0}")]
    NotInSubgroup(String),

    /// A multiplicative inverse of the additive identity was requested.
    #[error("division by zero")]
    DivisionByZero,

    /// Batch inputs (or a blob and the trusted setup) disagree on length.
    #[error("length mismatch: {0}")]
    LengthMismatch(String),

    /// A byte-decoded field element is not a canonical residue (>= modulus).
    #[error("invalid scalar: {0}")]
    InvalidScalar(String),

    /// The supplied trusted setup could not be loaded.
    #[error("invalid trusted setup: {0}")]
    SetupError(String),
}
