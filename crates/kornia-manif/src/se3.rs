//! # SE(3): 3D rigid body transformations
//!
//! [`SE3`] is the semi-direct product SO(3) ⋉ R³, stored as an [`SO3`] rotation plus a
//! translation. Its raw coefficients are `[tx, ty, tz, qx, qy, qz, qw]`.
//!
//! The Lie algebra se(3) is represented by [`SE3Tangent`], a twist whose coefficients are
//! ordered **angular first**: `[ωx, ωy, ωz, ρx, ρy, ρz]`. With this ordering the adjoint is
//! block lower-triangular:
//!
//! ```text
//! Adj(R, t) = [    R      0 ]
//!             [ [t]× R    R ]
//! ```
//!
//! and every 6x6 Jacobian in this module uses the same block layout.

use std::ops::{Add, Mul, MulAssign, Neg, Sub};

use glam::{DMat3, DMat4, DVec3};
use rand::Rng;

use crate::error::{check_size, LieError};
use crate::group::{LieGroup, Tangent};
use crate::mat6::Mat6F64;
use crate::so3::{SERIES_THRESHOLD, SO3, SO3Tangent};

/// Jacobian of a transformed point with respect to the transformation (3x6, row-major).
pub type ActJacobianSE3 = [[f64; 6]; 3];

/// A 3D rigid body transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SE3 {
    /// The rotation part.
    pub r: SO3,
    /// The translation part.
    pub t: DVec3,
}

impl SE3 {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        r: SO3::IDENTITY,
        t: DVec3::ZERO,
    };

    /// Create a new transformation from a rotation and a translation.
    #[inline]
    pub fn new(r: SO3, t: DVec3) -> Self {
        Self { r, t }
    }

    /// Create a new transformation from a 3x3 rotation matrix and a translation.
    pub fn from_rotation_translation(rotation: &DMat3, translation: DVec3) -> Self {
        Self::new(SO3::from_matrix(rotation), translation)
    }

    /// Create a new transformation from a 4x4 homogeneous matrix.
    pub fn from_matrix(mat: &DMat4) -> Self {
        Self::new(
            SO3::from_matrix(&DMat3::from_mat4(*mat)),
            mat.w_axis.truncate(),
        )
    }

    /// The 4x4 homogeneous transformation matrix.
    pub fn transform(&self) -> DMat4 {
        let r = self.rotation();
        DMat4::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            r.z_axis.extend(0.0),
            self.t.extend(1.0),
        )
    }

    /// The 3x3 rotation matrix.
    #[inline]
    pub fn rotation(&self) -> DMat3 {
        self.r.matrix()
    }

    /// The translation vector.
    #[inline]
    pub fn translation(&self) -> DVec3 {
        self.t
    }

    /// The rotation part as an [`SO3`] element.
    #[inline]
    pub fn so3(&self) -> SO3 {
        self.r
    }

    /// The x component of the translation.
    #[inline]
    pub fn x(&self) -> f64 {
        self.t.x
    }

    /// The y component of the translation.
    #[inline]
    pub fn y(&self) -> f64 {
        self.t.y
    }

    /// The z component of the translation.
    #[inline]
    pub fn z(&self) -> f64 {
        self.t.z
    }
}

impl LieGroup for SE3 {
    type Tangent = SE3Tangent;
    type Jacobian = Mat6F64;
    type ActJacobian = ActJacobianSE3;

    const DIM: usize = 3;
    const DOF: usize = 6;
    const REP_SIZE: usize = 7;

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn inverse(&self, jacobian: Option<&mut Mat6F64>) -> Self {
        if let Some(jac) = jacobian {
            *jac = -self.adj();
        }
        Self::new(self.r.inverse(None), -(self.rotation().transpose() * self.t))
    }

    fn compose(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Mat6F64>,
        jacobian_other: Option<&mut Mat6F64>,
    ) -> Self {
        if let Some(jac) = jacobian_self {
            *jac = other.inverse(None).adj();
        }
        if let Some(jac) = jacobian_other {
            *jac = Mat6F64::IDENTITY;
        }
        Self::new(
            self.r.compose(&other.r, None, None),
            self.rotation() * other.t + self.t,
        )
    }

    fn act(
        &self,
        vector: DVec3,
        jacobian_self: Option<&mut ActJacobianSE3>,
        jacobian_vector: Option<&mut DMat3>,
    ) -> DVec3 {
        let r = self.rotation();
        if let Some(jac) = jacobian_self {
            // [ -R [v]x | R ]
            let angular = -(r * SO3::hat(vector));
            for (i, row) in jac.iter_mut().enumerate() {
                for j in 0..3 {
                    row[j] = angular.col(j)[i];
                    row[j + 3] = r.col(j)[i];
                }
            }
        }
        if let Some(jac) = jacobian_vector {
            *jac = r;
        }
        r * vector + self.t
    }

    fn log(&self, jacobian: Option<&mut Mat6F64>) -> SE3Tangent {
        let omega = self.r.log(None);
        let tangent = SE3Tangent::new(omega.omega, omega.ljacinv() * self.t);
        if let Some(jac) = jacobian {
            *jac = tangent.rjacinv();
        }
        tangent
    }

    fn adj(&self) -> Mat6F64 {
        let r = self.rotation();
        Mat6F64::from_lower_triangular(&r, &(SO3::hat(self.t) * r))
    }

    fn random() -> Self {
        let mut rng = rand::rng();
        Self::new(
            SO3::random(),
            DVec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            ),
        )
    }

    fn normalize(&mut self) {
        self.r.normalize();
    }

    fn coeffs(&self) -> Vec<f64> {
        let mut coeffs = self.t.to_array().to_vec();
        coeffs.extend(self.r.coeffs());
        coeffs
    }

    fn from_coeffs(coeffs: &[f64]) -> Result<Self, LieError> {
        check_size(coeffs, Self::REP_SIZE)?;
        let r = SO3::from_coeffs(&coeffs[3..])?;
        Ok(Self::new(r, DVec3::new(coeffs[0], coeffs[1], coeffs[2])))
    }
}

impl Mul<SE3> for SE3 {
    type Output = SE3;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs, None, None)
    }
}

impl MulAssign<SE3> for SE3 {
    #[inline]
    fn mul_assign(&mut self, rhs: SE3) {
        *self = *self * rhs;
    }
}

impl Mul<DVec3> for SE3 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.act(rhs, None, None)
    }
}

impl Add<SE3Tangent> for SE3 {
    type Output = SE3;

    fn add(self, rhs: SE3Tangent) -> Self::Output {
        self.rplus(&rhs, None, None)
    }
}

impl Sub<SE3> for SE3 {
    type Output = SE3Tangent;

    fn sub(self, rhs: SE3) -> Self::Output {
        self.rminus(&rhs, None, None)
    }
}

/// An element of se(3): a twist with angular part `omega` and linear part `rho`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SE3Tangent {
    /// Angular part.
    pub omega: DVec3,
    /// Linear part.
    pub rho: DVec3,
}

impl SE3Tangent {
    /// Create a twist from its angular and linear parts.
    #[inline]
    pub fn new(omega: DVec3, rho: DVec3) -> Self {
        Self { omega, rho }
    }

    /// Create a twist from `[ωx, ωy, ωz, ρx, ρy, ρz]`.
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self::new(
            DVec3::new(arr[0], arr[1], arr[2]),
            DVec3::new(arr[3], arr[4], arr[5]),
        )
    }

    /// The coefficients `[ωx, ωy, ωz, ρx, ρy, ρz]`.
    pub fn to_array(&self) -> [f64; 6] {
        [
            self.omega.x,
            self.omega.y,
            self.omega.z,
            self.rho.x,
            self.rho.y,
            self.rho.z,
        ]
    }

    /// The angular part as an so(3) element.
    #[inline]
    pub fn so3(&self) -> SO3Tangent {
        SO3Tangent::new(self.omega)
    }

    /// The block coupling the linear and angular parts in the left Jacobian, Q(ρ, ω).
    ///
    /// ```text
    /// Q = ½ P + c1 (W P + P W + W P W)
    ///         + c2 (W W P + P W W - 3 W P W)
    ///         + c3 (W P W W + W W P W)
    /// ```
    ///
    /// with `P = [ρ]×`, `W = [ω]×` and
    /// `c1 = (θ - sin θ) / θ³`, `c2 = (θ² + 2 cos θ - 2) / (2 θ⁴)`,
    /// `c3 = (2 θ - 3 sin θ + θ cos θ) / (2 θ⁵)`.
    pub fn coupling_block(rho: DVec3, omega: DVec3) -> DMat3 {
        let p = SO3::hat(rho);
        let w = SO3::hat(omega);
        let theta_sq = omega.length_squared();

        let (c1, c2, c3) = if theta_sq < SERIES_THRESHOLD * SERIES_THRESHOLD {
            (
                1.0 / 6.0 - theta_sq / 120.0 + theta_sq * theta_sq / 5040.0,
                1.0 / 24.0 - theta_sq / 720.0 + theta_sq * theta_sq / 40320.0,
                1.0 / 120.0 - theta_sq / 2520.0,
            )
        } else {
            let theta = theta_sq.sqrt();
            let (sin_t, cos_t) = theta.sin_cos();
            (
                (theta - sin_t) / (theta_sq * theta),
                (theta_sq + 2.0 * cos_t - 2.0) / (2.0 * theta_sq * theta_sq),
                (2.0 * theta - 3.0 * sin_t + theta * cos_t) / (2.0 * theta_sq * theta_sq * theta),
            )
        };

        let wp = w * p;
        let pw = p * w;
        let wpw = wp * w;

        p * 0.5
            + (wp + pw + wpw) * c1
            + (w * wp + pw * w - wpw * 3.0) * c2
            + (wpw * w + w * wpw) * c3
    }
}

impl Tangent for SE3Tangent {
    type Group = SE3;
    type LieAlgebra = DMat4;

    const DOF: usize = 6;

    fn zero() -> Self {
        Self::new(DVec3::ZERO, DVec3::ZERO)
    }

    fn random() -> Self {
        let mut rng = rand::rng();
        let mut arr = [0.0; 6];
        arr.iter_mut()
            .for_each(|v| *v = rng.random_range(-1.0..1.0));
        Self::from_array(arr)
    }

    fn exp(&self, jacobian: Option<&mut Mat6F64>) -> SE3 {
        if let Some(jac) = jacobian {
            *jac = self.rjac();
        }
        let so3 = self.so3();
        SE3::new(so3.exp(None), so3.ljac() * self.rho)
    }

    fn hat(&self) -> DMat4 {
        let w = SO3::hat(self.omega);
        DMat4::from_cols(
            w.x_axis.extend(0.0),
            w.y_axis.extend(0.0),
            w.z_axis.extend(0.0),
            self.rho.extend(0.0),
        )
    }

    fn vee(algebra: &DMat4) -> Self {
        Self::new(
            SO3::vee(&DMat3::from_mat4(*algebra)),
            algebra.w_axis.truncate(),
        )
    }

    fn rjac(&self) -> Mat6F64 {
        Mat6F64::from_lower_triangular(
            &self.so3().rjac(),
            &Self::coupling_block(-self.rho, -self.omega),
        )
    }

    fn rjacinv(&self) -> Mat6F64 {
        let jr_inv = self.so3().rjacinv();
        let q = Self::coupling_block(-self.rho, -self.omega);
        Mat6F64::from_lower_triangular(&jr_inv, &-(jr_inv * q * jr_inv))
    }

    fn squared_norm(&self) -> f64 {
        self.omega.length_squared() + self.rho.length_squared()
    }

    fn coeffs(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    fn from_coeffs(coeffs: &[f64]) -> Result<Self, LieError> {
        check_size(coeffs, Self::DOF)?;
        let mut arr = [0.0; 6];
        arr.copy_from_slice(coeffs);
        Ok(Self::from_array(arr))
    }
}

impl Add for SE3Tangent {
    type Output = SE3Tangent;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.omega + rhs.omega, self.rho + rhs.rho)
    }
}

impl Sub for SE3Tangent {
    type Output = SE3Tangent;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.omega - rhs.omega, self.rho - rhs.rho)
    }
}

impl Neg for SE3Tangent {
    type Output = SE3Tangent;

    fn neg(self) -> Self::Output {
        Self::new(-self.omega, -self.rho)
    }
}

impl Mul<f64> for SE3Tangent {
    type Output = SE3Tangent;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.omega * rhs, self.rho * rhs)
    }
}
