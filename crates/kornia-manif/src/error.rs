use thiserror::Error;

/// Maximum deviation from unit norm accepted when building a rotation from raw coefficients.
pub const QUATERNION_NORM_TOLERANCE: f64 = 1e-5;

/// Errors raised when reading or writing group and tangent coefficients.
#[derive(Debug, Error, PartialEq)]
pub enum LieError {
    /// The coefficient slice does not match the representation size.
    #[error("coefficient block has wrong size: expected {expected}, got {got}")]
    WrongCoeffSize {
        /// Number of coefficients required by the type.
        expected: usize,
        /// Number of coefficients provided.
        got: usize,
    },

    /// The quaternion coefficients are too far from the unit sphere.
    #[error("quaternion is not normalized: norm is {norm}")]
    NonUnitQuaternion {
        /// Norm of the offending quaternion.
        norm: f64,
    },

    /// A state buffer cannot be split into whole coefficient blocks.
    #[error("buffer of length {len} is not a multiple of the block size {block}")]
    UnalignedBuffer {
        /// Length of the buffer.
        len: usize,
        /// Coefficients per block.
        block: usize,
    },
}

/// Check that a coefficient slice holds exactly `expected` scalars.
pub(crate) fn check_size(coeffs: &[f64], expected: usize) -> Result<(), LieError> {
    if coeffs.len() != expected {
        return Err(LieError::WrongCoeffSize {
            expected,
            got: coeffs.len(),
        });
    }
    Ok(())
}
