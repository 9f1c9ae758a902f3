//! 6x6 matrices for SE(3) Jacobians and adjoints.
//!
//! A [`Mat6F64`] is viewed as a 2x2 grid of 3x3 blocks, where block `(0, 0)` acts on the
//! angular part of a twist and block `(1, 1)` on the linear part.

use std::ops::{Add, Index, IndexMut, Mul, Neg, Sub};

use glam::DMat3;

/// A row-major 6x6 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat6F64(pub [[f64; 6]; 6]);

impl Mat6F64 {
    /// The zero matrix.
    pub const ZERO: Self = Self([[0.0; 6]; 6]);

    /// The identity matrix.
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
    ]);

    /// Assemble a matrix from its four 3x3 blocks.
    pub fn from_blocks(
        top_left: &DMat3,
        top_right: &DMat3,
        bottom_left: &DMat3,
        bottom_right: &DMat3,
    ) -> Self {
        let mut mat = Self::ZERO;
        mat.set_block(0, 0, top_left);
        mat.set_block(0, 1, top_right);
        mat.set_block(1, 0, bottom_left);
        mat.set_block(1, 1, bottom_right);
        mat
    }

    /// Assemble a block lower-triangular matrix `[[diag, 0], [lower, diag]]`.
    pub fn from_lower_triangular(diag: &DMat3, lower: &DMat3) -> Self {
        Self::from_blocks(diag, &DMat3::ZERO, lower, diag)
    }

    /// Copy the 3x3 block at block-row `row` and block-column `col`.
    pub fn block(&self, row: usize, col: usize) -> DMat3 {
        let mut cols = [[0.0; 3]; 3];
        for (c, column) in cols.iter_mut().enumerate() {
            for (r, value) in column.iter_mut().enumerate() {
                *value = self.0[3 * row + r][3 * col + c];
            }
        }
        DMat3::from_cols_array_2d(&cols)
    }

    /// Overwrite the 3x3 block at block-row `row` and block-column `col`.
    pub fn set_block(&mut self, row: usize, col: usize, block: &DMat3) {
        let cols = block.to_cols_array_2d();
        for (c, column) in cols.iter().enumerate() {
            for (r, value) in column.iter().enumerate() {
                self.0[3 * row + r][3 * col + c] = *value;
            }
        }
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..6 {
            for j in 0..6 {
                out.0[j][i] = self.0[i][j];
            }
        }
        out
    }

    /// Multiply with a column vector.
    pub fn mul_vec(&self, v: &[f64; 6]) -> [f64; 6] {
        let mut out = [0.0; 6];
        for (row, value) in self.0.iter().zip(out.iter_mut()) {
            *value = row.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
        }
        out
    }

    /// Whether all the entries are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|v| v.is_finite())
    }

    /// Largest absolute entry-wise difference with `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Default for Mat6F64 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Index<(usize, usize)> for Mat6F64 {
    type Output = f64;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.0[row][col]
    }
}

impl IndexMut<(usize, usize)> for Mat6F64 {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.0[row][col]
    }
}

impl Add for Mat6F64 {
    type Output = Mat6F64;

    fn add(self, rhs: Self) -> Self::Output {
        let mut out = self;
        for (a, b) in out.0.iter_mut().flatten().zip(rhs.0.iter().flatten()) {
            *a += b;
        }
        out
    }
}

impl Sub for Mat6F64 {
    type Output = Mat6F64;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Neg for Mat6F64 {
    type Output = Mat6F64;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

impl Mul<f64> for Mat6F64 {
    type Output = Mat6F64;

    fn mul(self, rhs: f64) -> Self::Output {
        let mut out = self;
        out.0.iter_mut().flatten().for_each(|v| *v *= rhs);
        out
    }
}

impl Mul for Mat6F64 {
    type Output = Mat6F64;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut out = Self::ZERO;
        for i in 0..6 {
            for j in 0..6 {
                out.0[i][j] = (0..6).map(|k| self.0[i][k] * rhs.0[k][j]).sum();
            }
        }
        out
    }
}
