//! ## Library Design / Architecture
//!
//! KZG polynomial commitments over BLS12-381, self-contained: the base and
//! extension fields, the curve groups, the optimal-ate pairing and the
//! compressed point codec are all implemented here on top of
//! arbitrary-precision integers, with no external curve backend.
//!
//! ### Data Types
//!
//! The main data pipeline goes:
//! > user data -> [blob::Blob] -> [polynomial::Polynomial] ->
//! > KZG Commitment / Proof
//!
//! - User Data: arbitrary bytes
//! - Blob: serialized scalars, 32 bytes each
//!   - obtained from user data by inserting a zero guard byte every 31 bytes
//!     so each 32-byte word is a canonical scalar ([blob::Blob::from_raw_data])
//! - Polynomial: scalars interpreted as evaluations over a power-of-two
//!   domain of roots of unity, in bit-reversal-permuted order. There is no
//!   coefficient form; evaluation at arbitrary points uses the barycentric
//!   formula.
//! - [srs::KzgSettings]: the trusted setup (Lagrange G1 points, monomial G2
//!   points, the evaluation domain), borrowed by every protocol operation.
//!
//! The protocol functions live in [kzg]: committing to a blob, opening at a
//! point, verifying an opening, and the blob-oriented prove/verify pair with
//! their batch variants. Commitments and proofs cross the API boundary as
//! compressed 48-byte G1 points and are validated (decoding, curve equation,
//! subgroup membership) before use.
//!
//! The arithmetic stack is layered the obvious way: [arith] (Fq and the
//! scalar field) -> [extension] (Fq2, Fq12) -> [curve] (G1/G2/G12 group law)
//! -> [pairing] (Miller loop and final exponentiation). It favors being
//! auditable against the reference equations over speed, and none of it is
//! constant-time.
//!
//! ### Example
//!
//! ```rust
//! use rust_kzg_bls12_381::{
//!     arith::Scalar,
//!     blob::Blob,
//!     kzg::{blob_to_kzg_commitment, compute_kzg_proof},
//!     srs::KzgSettings,
//! };
//!
//! // A toy setup; production uses KzgSettings::from_compressed_bytes with
//! // points from a real ceremony.
//! let settings = KzgSettings::insecure_setup(4, &Scalar::from_u64(1234)).unwrap();
//!
//! // 96 raw bytes span four 31-byte chunks, matching the width-4 setup.
//! let data = "some rollup batcher data".repeat(4);
//! let blob = Blob::from_raw_data(data.as_bytes());
//! let commitment = blob_to_kzg_commitment(&blob, &settings).unwrap();
//!
//! let z = Scalar::from_u64(17).to_bytes_be();
//! let (proof, y) = compute_kzg_proof(&blob, &z, &settings).unwrap();
//! ```

pub mod arith;
pub mod blob;
pub mod consts;
pub mod curve;
pub mod errors;
pub mod extension;
pub mod helpers;
pub mod kzg;
pub mod pairing;
pub mod polynomial;
pub mod serialization;
pub mod srs;

pub use blob::Blob;
pub use errors::KzgError;
pub use kzg::{KzgCommitment, KzgProof};
pub use polynomial::Polynomial;
pub use srs::KzgSettings;
