//! A blob: raw bytes representing a polynomial in evaluation form.

use serde::{Deserialize, Serialize};

use crate::{
    consts::BYTES_PER_FIELD_ELEMENT,
    errors::KzgError,
    helpers,
    polynomial::Polynomial,
};

/// A slice of serialized scalars, 32 bytes each. The byte content is raw and
/// potentially non-canonical; canonicity is checked when the blob is
/// converted to a [Polynomial].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    blob_data: Vec<u8>,
}

impl Blob {
    /// Wraps existing bytes. The length must be a power-of-two number of
    /// 32-byte field elements.
    pub fn new(blob_data: Vec<u8>) -> Result<Self, KzgError> {
        if blob_data.is_empty() || blob_data.len() % BYTES_PER_FIELD_ELEMENT != 0 {
            return Err(KzgError::LengthMismatch(format!(
                "blob length {} is not a multiple of {}",
                blob_data.len(),
                BYTES_PER_FIELD_ELEMENT
            )));
        }
        let field_elements = blob_data.len() / BYTES_PER_FIELD_ELEMENT;
        if !field_elements.is_power_of_two() {
            return Err(KzgError::LengthMismatch(format!(
                "blob holds {} field elements, expected a power of two",
                field_elements
            )));
        }
        Ok(Blob { blob_data })
    }

    /// Makes arbitrary bytes blob-safe: each 31-byte chunk is prefixed with a
    /// zero byte, guaranteeing every 32-byte word decodes below the scalar
    /// modulus, and the result is zero-padded to a power-of-two element
    /// count.
    pub fn from_raw_data(data: &[u8]) -> Self {
        let mut blob_data =
            Vec::with_capacity(data.len() / 31 * BYTES_PER_FIELD_ELEMENT + BYTES_PER_FIELD_ELEMENT);
        for chunk in data.chunks(31) {
            blob_data.push(0u8);
            blob_data.extend_from_slice(chunk);
            blob_data.resize(blob_data.len() + 31 - chunk.len(), 0u8);
        }
        if blob_data.is_empty() {
            blob_data.resize(BYTES_PER_FIELD_ELEMENT, 0u8);
        }

        let field_elements = blob_data.len() / BYTES_PER_FIELD_ELEMENT;
        let padded = field_elements.next_power_of_two();
        blob_data.resize(padded * BYTES_PER_FIELD_ELEMENT, 0u8);
        Blob { blob_data }
    }

    /// Strips the padding byte inserted by [Blob::from_raw_data] from every
    /// word. Trailing zero padding from the power-of-two fill is kept; the
    /// caller owns its own length framing.
    pub fn to_raw_data(&self) -> Vec<u8> {
        self.blob_data
            .chunks(BYTES_PER_FIELD_ELEMENT)
            .flat_map(|chunk| &chunk[1..])
            .copied()
            .collect()
    }

    pub fn data(&self) -> &[u8] {
        &self.blob_data
    }

    pub fn len(&self) -> usize {
        self.blob_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blob_data.is_empty()
    }

    /// Number of 32-byte field elements the blob carries.
    pub fn field_elements(&self) -> usize {
        self.blob_data.len() / BYTES_PER_FIELD_ELEMENT
    }

    /// Decodes every 32-byte chunk into a scalar, failing on any
    /// non-canonical chunk.
    pub fn to_polynomial(&self) -> Result<Polynomial, KzgError> {
        helpers::blob_to_polynomial(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_lengths() {
        assert!(matches!(
            Blob::new(vec![0u8; 31]),
            Err(KzgError::LengthMismatch(_))
        ));
        assert!(matches!(
            Blob::new(vec![0u8; 96]),
            Err(KzgError::LengthMismatch(_))
        ));
        assert!(Blob::new(vec![0u8; 128]).is_ok());
    }

    #[test]
    fn test_from_raw_data_pads_and_aligns() {
        let blob = Blob::from_raw_data(&[0xffu8; 100]);
        // 100 bytes fill four 31-byte chunks, padded up to 4 field elements.
        assert_eq!(blob.field_elements(), 4);
        // Every word starts with the zero guard byte.
        for chunk in blob.data().chunks(BYTES_PER_FIELD_ELEMENT) {
            assert_eq!(chunk[0], 0);
        }
        blob.to_polynomial().unwrap();
    }

    #[test]
    fn test_raw_data_roundtrip() {
        let data: Vec<u8> = (0u8..62).collect();
        let blob = Blob::from_raw_data(&data);
        let recovered = blob.to_raw_data();
        assert_eq!(&recovered[..data.len()], &data[..]);
        assert!(recovered[data.len()..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_from_raw_data_empty_input() {
        let blob = Blob::from_raw_data(&[]);
        assert_eq!(blob.field_elements(), 1);
    }

    #[test]
    fn test_to_polynomial_rejects_non_canonical_chunk() {
        let mut data = vec![0u8; 64];
        data[0] = 0xff;
        let blob = Blob::new(data).unwrap();
        assert!(matches!(
            blob.to_polynomial(),
            Err(KzgError::InvalidScalar(_))
        ));
    }
}
