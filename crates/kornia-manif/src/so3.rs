//! # SO(3): 3D rotations
//!
//! [`SO3`] stores a rotation as a unit quaternion `[x, y, z, w]`. The Lie algebra so(3) is
//! represented by [`SO3Tangent`], an axis-angle vector whose direction is the rotation axis
//! and whose magnitude is the angle in radians.
//!
//! `q` and `-q` describe the same rotation. The logarithm always picks the representative
//! with `w >= 0`, so the returned angle lies in `[0, π]`.

use std::ops::{Add, Mul, MulAssign, Neg, Sub};

use glam::{DMat3, DQuat, DVec3};
use rand::Rng;

use crate::error::{check_size, LieError, QUATERNION_NORM_TOLERANCE};
use crate::group::{LieGroup, Tangent};

/// Below this angle the exponential and logarithm switch to their Taylor expansions.
pub const SMALL_ANGLE_EPSILON: f64 = 1.0e-8;

/// Below this angle the Jacobian coefficients switch to their Taylor expansions.
pub const SERIES_THRESHOLD: f64 = 1.0e-2;

/// A 3D rotation, stored as a unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SO3 {
    /// The unit quaternion.
    pub q: DQuat,
}

impl SO3 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self { q: DQuat::IDENTITY };

    /// Create a new rotation from a quaternion.
    /// NOTE: quaternion should be normalized
    #[inline]
    pub fn new(q: DQuat) -> Self {
        Self { q }
    }

    /// Create a new rotation from an arbitrary non-zero quaternion, normalizing it.
    pub fn from_quaternion(q: DQuat) -> Self {
        Self { q: q.normalize() }
    }

    /// Create a rotation from a 3x3 rotation matrix.
    pub fn from_matrix(mat: &DMat3) -> Self {
        Self {
            q: DQuat::from_mat3(mat).normalize(),
        }
    }

    /// Create a rotation of `angle` radians around `axis`.
    pub fn from_axis_angle(axis: DVec3, angle: f64) -> Self {
        SO3Tangent::new(axis.normalize() * angle).exp(None)
    }

    /// The underlying unit quaternion.
    #[inline]
    pub fn quaternion(&self) -> DQuat {
        self.q
    }

    /// The 3x3 rotation matrix.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_quat(self.q)
    }

    /// The x coefficient of the quaternion.
    #[inline]
    pub fn x(&self) -> f64 {
        self.q.x
    }

    /// The y coefficient of the quaternion.
    #[inline]
    pub fn y(&self) -> f64 {
        self.q.y
    }

    /// The z coefficient of the quaternion.
    #[inline]
    pub fn z(&self) -> f64 {
        self.q.z
    }

    /// The w (real) coefficient of the quaternion.
    #[inline]
    pub fn w(&self) -> f64 {
        self.q.w
    }

    /// Vector space -> Lie algebra. Also the cross-product (skew) matrix of `v`.
    pub fn hat(v: DVec3) -> DMat3 {
        let (a, b, c) = (v.x, v.y, v.z);
        DMat3::from_cols_array(&[0.0, c, -b, -c, 0.0, a, b, -a, 0.0])
    }

    /// Lie algebra -> vector space
    pub fn vee(omega: &DMat3) -> DVec3 {
        DVec3::new(omega.y_axis.z, omega.z_axis.x, omega.x_axis.y)
    }
}

impl LieGroup for SO3 {
    type Tangent = SO3Tangent;
    type Jacobian = DMat3;
    type ActJacobian = DMat3;

    const DIM: usize = 3;
    const DOF: usize = 3;
    const REP_SIZE: usize = 4;

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn inverse(&self, jacobian: Option<&mut DMat3>) -> Self {
        if let Some(jac) = jacobian {
            *jac = -self.adj();
        }
        Self {
            q: self.q.conjugate(),
        }
    }

    fn compose(
        &self,
        other: &Self,
        jacobian_self: Option<&mut DMat3>,
        jacobian_other: Option<&mut DMat3>,
    ) -> Self {
        if let Some(jac) = jacobian_self {
            *jac = other.inverse(None).adj();
        }
        if let Some(jac) = jacobian_other {
            *jac = DMat3::IDENTITY;
        }
        // keep the quaternion on S³
        Self {
            q: (self.q * other.q).normalize(),
        }
    }

    fn act(
        &self,
        vector: DVec3,
        jacobian_self: Option<&mut DMat3>,
        jacobian_vector: Option<&mut DMat3>,
    ) -> DVec3 {
        let r = self.matrix();
        if let Some(jac) = jacobian_self {
            *jac = -(r * SO3::hat(vector));
        }
        if let Some(jac) = jacobian_vector {
            *jac = r;
        }
        r * vector
    }

    fn log(&self, jacobian: Option<&mut DMat3>) -> SO3Tangent {
        let (w, vec) = if self.q.w < 0.0 {
            (-self.q.w, -DVec3::new(self.q.x, self.q.y, self.q.z))
        } else {
            (self.q.w, DVec3::new(self.q.x, self.q.y, self.q.z))
        };

        let sin_half_sq = vec.length_squared();
        let sin_half = sin_half_sq.sqrt();

        let scale = if sin_half < SMALL_ANGLE_EPSILON {
            // taylor expansion of 2 * atan2(s, w) / s around s = 0
            2.0 / w * (1.0 - sin_half_sq / (3.0 * w * w))
        } else {
            2.0 * sin_half.atan2(w) / sin_half
        };

        let tangent = SO3Tangent::new(vec * scale);
        if let Some(jac) = jacobian {
            *jac = tangent.rjacinv();
        }
        tangent
    }

    fn adj(&self) -> DMat3 {
        self.matrix()
    }

    fn random() -> Self {
        let mut rng = rand::rng();

        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let r3: f64 = rng.random();

        // uniform sampling on S³ (Shoemake)
        let one_minus_r1_sqrt = (1.0 - r1).sqrt();
        let r1_sqrt = r1.sqrt();

        let w = one_minus_r1_sqrt * (2.0 * std::f64::consts::PI * r2).cos();
        let x = one_minus_r1_sqrt * (2.0 * std::f64::consts::PI * r2).sin();
        let y = r1_sqrt * (2.0 * std::f64::consts::PI * r3).cos();
        let z = r1_sqrt * (2.0 * std::f64::consts::PI * r3).sin();

        Self {
            q: DQuat::from_xyzw(x, y, z, w).normalize(),
        }
    }

    fn normalize(&mut self) {
        self.q = self.q.normalize();
    }

    fn coeffs(&self) -> Vec<f64> {
        self.q.to_array().to_vec()
    }

    fn from_coeffs(coeffs: &[f64]) -> Result<Self, LieError> {
        check_size(coeffs, Self::REP_SIZE)?;
        let q = DQuat::from_xyzw(coeffs[0], coeffs[1], coeffs[2], coeffs[3]);
        let norm = q.length();
        if (norm - 1.0).abs() > QUATERNION_NORM_TOLERANCE {
            return Err(LieError::NonUnitQuaternion { norm });
        }
        Ok(Self { q: q / norm })
    }
}

impl Mul<SO3> for SO3 {
    type Output = SO3;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(&rhs, None, None)
    }
}

impl MulAssign<SO3> for SO3 {
    #[inline]
    fn mul_assign(&mut self, rhs: SO3) {
        *self = *self * rhs;
    }
}

impl Mul<DVec3> for SO3 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.act(rhs, None, None)
    }
}

impl Add<SO3Tangent> for SO3 {
    type Output = SO3;

    fn add(self, rhs: SO3Tangent) -> Self::Output {
        self.rplus(&rhs, None, None)
    }
}

impl Sub<SO3> for SO3 {
    type Output = SO3Tangent;

    fn sub(self, rhs: SO3) -> Self::Output {
        self.rminus(&rhs, None, None)
    }
}

/// An element of so(3): a rotation vector (axis times angle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SO3Tangent {
    /// The rotation vector.
    pub omega: DVec3,
}

impl SO3Tangent {
    /// Create a tangent vector from a rotation vector.
    #[inline]
    pub fn new(omega: DVec3) -> Self {
        Self { omega }
    }

    /// Create a tangent vector from its three components.
    #[inline]
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(DVec3::new(x, y, z))
    }

    /// The rotation angle in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.omega.length()
    }
}

impl Tangent for SO3Tangent {
    type Group = SO3;
    type LieAlgebra = DMat3;

    const DOF: usize = 3;

    fn zero() -> Self {
        Self::new(DVec3::ZERO)
    }

    fn random() -> Self {
        let mut rng = rand::rng();
        Self::from_xyz(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        )
    }

    fn exp(&self, jacobian: Option<&mut DMat3>) -> SO3 {
        let theta_sq = self.omega.length_squared();
        let theta = theta_sq.sqrt();

        let (w, b) = if theta < SMALL_ANGLE_EPSILON {
            // taylor expansion of cos(x/2) and sin(x/2)/x around 0
            (1.0 - theta_sq / 8.0, 0.5 - theta_sq / 48.0)
        } else {
            let theta_half = 0.5 * theta;
            (theta_half.cos(), theta_half.sin() / theta)
        };

        if let Some(jac) = jacobian {
            *jac = self.rjac();
        }

        let xyz = self.omega * b;
        SO3::new(DQuat::from_xyzw(xyz.x, xyz.y, xyz.z, w))
    }

    fn hat(&self) -> DMat3 {
        SO3::hat(self.omega)
    }

    fn vee(algebra: &DMat3) -> Self {
        Self::new(SO3::vee(algebra))
    }

    fn rjac(&self) -> DMat3 {
        let skew = self.hat();
        let theta_sq = self.omega.length_squared();

        let (a, b) = if theta_sq < SERIES_THRESHOLD * SERIES_THRESHOLD {
            (
                0.5 - theta_sq / 24.0 + theta_sq * theta_sq / 720.0,
                1.0 / 6.0 - theta_sq / 120.0 + theta_sq * theta_sq / 5040.0,
            )
        } else {
            let theta = theta_sq.sqrt();
            (
                (1.0 - theta.cos()) / theta_sq,
                (theta - theta.sin()) / (theta_sq * theta),
            )
        };

        DMat3::IDENTITY - skew * a + (skew * skew) * b
    }

    fn rjacinv(&self) -> DMat3 {
        let skew = self.hat();
        let theta_sq = self.omega.length_squared();

        let c = if theta_sq < SERIES_THRESHOLD * SERIES_THRESHOLD {
            1.0 / 12.0 + theta_sq / 720.0 + theta_sq * theta_sq / 30240.0
        } else {
            let theta = theta_sq.sqrt();
            let theta_half = 0.5 * theta;
            // finite at θ = π
            1.0 / theta_sq - theta_half.cos() / (2.0 * theta * theta_half.sin())
        };

        DMat3::IDENTITY + skew * 0.5 + (skew * skew) * c
    }

    fn squared_norm(&self) -> f64 {
        self.omega.length_squared()
    }

    fn coeffs(&self) -> Vec<f64> {
        self.omega.to_array().to_vec()
    }

    fn from_coeffs(coeffs: &[f64]) -> Result<Self, LieError> {
        check_size(coeffs, Self::DOF)?;
        Ok(Self::from_xyz(coeffs[0], coeffs[1], coeffs[2]))
    }
}

impl Add for SO3Tangent {
    type Output = SO3Tangent;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.omega + rhs.omega)
    }
}

impl Sub for SO3Tangent {
    type Output = SO3Tangent;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.omega - rhs.omega)
    }
}

impl Neg for SO3Tangent {
    type Output = SO3Tangent;

    fn neg(self) -> Self::Output {
        Self::new(-self.omega)
    }
}

impl Mul<f64> for SO3Tangent {
    type Output = SO3Tangent;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.omega * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;
    const STEP: f64 = 1e-6;

    fn assert_mat3_eq(a: &DMat3, b: &DMat3, epsilon: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a.col(i)[j], b.col(i)[j], epsilon = epsilon);
            }
        }
    }

    fn assert_vec3_eq(a: DVec3, b: DVec3, epsilon: f64) {
        assert_relative_eq!(a.x, b.x, epsilon = epsilon);
        assert_relative_eq!(a.y, b.y, epsilon = epsilon);
        assert_relative_eq!(a.z, b.z, epsilon = epsilon);
    }

    // central differences of a map between tangent spaces, evaluated at zero
    fn numerical_jacobian(f: impl Fn(DVec3) -> DVec3) -> DMat3 {
        let mut cols = [DVec3::ZERO; 3];
        for (i, col) in cols.iter_mut().enumerate() {
            let mut delta = DVec3::ZERO;
            delta[i] = STEP;
            *col = (f(delta) - f(-delta)) / (2.0 * STEP);
        }
        DMat3::from_cols(cols[0], cols[1], cols[2])
    }

    #[test]
    fn test_identity() {
        let s = SO3::identity();
        assert_relative_eq!(s.x(), 0.0);
        assert_relative_eq!(s.y(), 0.0);
        assert_relative_eq!(s.z(), 0.0);
        assert_relative_eq!(s.w(), 1.0);

        let mut r = SO3::random();
        r.set_identity();
        assert_eq!(r, SO3::IDENTITY);
    }

    #[test]
    fn test_from_quaternion() {
        let q = DQuat::from_xyzw(4.0, -2.0, 1.0, 3.5);
        let s = SO3::from_quaternion(q);
        let expected = q.normalize();
        assert_relative_eq!(s.x(), expected.x, epsilon = EPSILON);
        assert_relative_eq!(s.y(), expected.y, epsilon = EPSILON);
        assert_relative_eq!(s.z(), expected.z, epsilon = EPSILON);
        assert_relative_eq!(s.w(), expected.w, epsilon = EPSILON);
    }

    #[test]
    fn test_from_matrix() {
        let mat = DMat3::from_cols_array(&[1.0, 0.0, 0.0, 0.0, 0.6, 0.8, 0.0, -0.8, 0.6]);
        let s = SO3::from_matrix(&mat);

        let expected = DQuat::from_xyzw(0.5, 0.0, 0.0, 1.0).normalize();
        assert_relative_eq!(s.x(), expected.x, epsilon = EPSILON);
        assert_relative_eq!(s.y(), expected.y, epsilon = EPSILON);
        assert_relative_eq!(s.z(), expected.z, epsilon = EPSILON);
        assert_relative_eq!(s.w(), expected.w, epsilon = EPSILON);
        assert_mat3_eq(&s.matrix(), &mat, EPSILON);
    }

    #[test]
    fn test_from_axis_angle() {
        let s = SO3::from_axis_angle(DVec3::new(0.0, 0.0, 2.0), std::f64::consts::FRAC_PI_2);
        let rotated = s * DVec3::X;
        assert_vec3_eq(rotated, DVec3::Y, EPSILON);
    }

    #[test]
    fn test_coeffs() -> Result<(), LieError> {
        let s = SO3::random();
        let coeffs = s.coeffs();
        assert_eq!(coeffs.len(), SO3::REP_SIZE);

        let back = SO3::from_coeffs(&coeffs)?;
        assert!(back.is_approx(&s, EPSILON));

        let mut out = [0.0; 4];
        s.write_coeffs(&mut out)?;
        assert_eq!(out.to_vec(), coeffs);

        assert_eq!(
            SO3::from_coeffs(&[0.0, 0.0, 1.0]),
            Err(LieError::WrongCoeffSize {
                expected: 4,
                got: 3
            })
        );
        assert!(matches!(
            SO3::from_coeffs(&[1.0, 1.0, 0.0, 0.0]),
            Err(LieError::NonUnitQuaternion { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_unit_norm_after_compose() {
        let mut s = SO3::IDENTITY;
        for _ in 0..1000 {
            s = s.compose(&SO3::random(), None, None);
            assert_relative_eq!(s.q.length(), 1.0, epsilon = 1e-12);
        }
        let mut t = SO3::random();
        for _ in 0..1000 {
            t *= SO3Tangent::from_xyz(0.01, -0.02, 0.03).exp(None);
        }
        assert_relative_eq!(t.q.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose_inverse() {
        for _ in 0..10 {
            let s = SO3::random();
            let identity = s.compose(&s.inverse(None), None, None);
            assert!(identity.is_approx(&SO3::IDENTITY, 1e-9));
            let identity = s.inverse(None) * s;
            assert!(identity.is_approx(&SO3::IDENTITY, 1e-9));
        }
    }

    #[test]
    fn test_rplus_rminus_roundtrip() {
        let x = SO3::random();
        let tau = SO3Tangent::from_xyz(0.4, -0.2, 0.7);
        let y = x + tau;
        let diff = y - x;
        assert_vec3_eq(diff.omega, tau.omega, EPSILON);
    }

    #[test]
    fn test_lplus_lminus_roundtrip() {
        let x = SO3::random();
        let tau = SO3Tangent::from_xyz(-0.3, 1.1, 0.2);
        let y = x.lplus(&tau);
        let diff = y.lminus(&x);
        assert_vec3_eq(diff.omega, tau.omega, EPSILON);
    }

    #[test]
    fn test_exp_zero() {
        let s = SO3Tangent::zero().exp(None);
        assert_eq!(s.q, DQuat::IDENTITY);
    }

    #[test]
    fn test_exp_log() {
        let test_vectors = [
            DVec3::new(0.1, 0.2, 0.3),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(-0.5, 0.3, -0.2),
            DVec3::new(1e-10, -2e-10, 3e-10),
            DVec3::new(0.0, 0.0, 3.1),
        ];

        for v in test_vectors.iter() {
            let log = SO3Tangent::new(*v).exp(None).log(None);
            assert_vec3_eq(log.omega, *v, 1e-9);
        }
    }

    #[test]
    fn test_log_exp() {
        for _ in 0..20 {
            let s = SO3::random();
            let back = s.log(None).exp(None);
            assert!(back.is_approx(&s, 1e-9));
        }
    }

    #[test]
    fn test_log_near_pi() {
        // q and -q for a rotation of π around z
        let s = SO3::new(DQuat::from_xyzw(0.0, 0.0, 1.0, 0.0));
        let log = s.log(None);
        assert_relative_eq!(log.angle(), std::f64::consts::PI, epsilon = EPSILON);

        let s = SO3::new(DQuat::from_xyzw(0.0, 0.0, -1.0, 1e-12).normalize());
        let log = s.log(None);
        assert!(log.omega.is_finite());
        assert_relative_eq!(log.angle(), std::f64::consts::PI, epsilon = 1e-9);

        let jr_inv = log.rjacinv();
        assert!(jr_inv.is_finite());
    }

    #[test]
    fn test_log_sign_invariance() {
        let s = SO3::random();
        let flipped = SO3::new(-s.q);
        assert_vec3_eq(s.log(None).omega, flipped.log(None).omega, EPSILON);
    }

    #[test]
    fn test_hat() {
        let hat_v = SO3Tangent::from_xyz(1.0, 2.0, 3.0).hat();

        assert_relative_eq!(hat_v.x_axis.x, 0.0);
        assert_relative_eq!(hat_v.x_axis.y, 3.0);
        assert_relative_eq!(hat_v.x_axis.z, -2.0);
        assert_relative_eq!(hat_v.y_axis.x, -3.0);
        assert_relative_eq!(hat_v.y_axis.y, 0.0);
        assert_relative_eq!(hat_v.y_axis.z, 1.0);
        assert_relative_eq!(hat_v.z_axis.x, 2.0);
        assert_relative_eq!(hat_v.z_axis.y, -1.0);
        assert_relative_eq!(hat_v.z_axis.z, 0.0);

        // hat(a) * b == a x b
        let a = DVec3::new(0.3, -1.2, 0.5);
        let b = DVec3::new(-0.7, 0.1, 2.0);
        assert_vec3_eq(SO3::hat(a) * b, a.cross(b), EPSILON);
    }

    #[test]
    fn test_hat_vee() {
        let test_vectors = [
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-0.5, 0.0, 1.5),
            DVec3::new(0.1, -0.2, 0.3),
        ];

        for v in test_vectors.iter() {
            let tangent = SO3Tangent::new(*v);
            let recovered = SO3Tangent::vee(&tangent.hat());
            assert_vec3_eq(recovered.omega, *v, EPSILON);
        }
    }

    #[test]
    fn test_matrix() {
        let so3 = SO3::from_quaternion(DQuat::from_xyzw(0.1, 0.2, 0.3, 0.9));
        let r = so3.matrix();
        assert_mat3_eq(&(r.transpose() * r), &DMat3::IDENTITY, EPSILON);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = EPSILON);
        assert_mat3_eq(&so3.inverse(None).matrix(), &r.transpose(), EPSILON);
    }

    #[test]
    fn test_act() {
        let t = DVec3::new(1.0, 2.0, 3.0);
        assert_vec3_eq(SO3::IDENTITY * t, t, EPSILON);

        let s = SO3::from_quaternion(DQuat::from_xyzw(0.1, 0.2, 0.3, 0.9));
        let rotated = s.act(t, None, None);
        assert_relative_eq!(rotated.length(), t.length(), epsilon = EPSILON);
        assert_vec3_eq(rotated, s.q * t, EPSILON);
    }

    #[test]
    fn test_adjoint() {
        let x = SO3::from_quaternion(DQuat::from_xyzw(0.1, 0.2, 0.3, 0.9));
        let y = SO3::from_quaternion(DQuat::from_xyzw(-0.2, 0.1, 0.4, 0.8));

        assert_mat3_eq(&x.inverse(None).adj(), &x.adj().inverse(), EPSILON);
        assert_mat3_eq(&(x * y).adj(), &(x.adj() * y.adj()), EPSILON);

        // Adj(X) τ == log(X exp(τ) X⁻¹)
        let tau = SO3Tangent::from_xyz(0.1, -0.3, 0.2);
        let lhs = x.adj() * tau.omega;
        let rhs = (x * tau.exp(None) * x.inverse(None)).log(None).omega;
        assert_vec3_eq(lhs, rhs, EPSILON);
    }

    #[test]
    fn test_jacobians_small_angle() {
        let tau = SO3Tangent::from_xyz(1e-4, -2e-4, 5e-5);
        assert_mat3_eq(&(tau.rjac() * tau.rjacinv()), &DMat3::IDENTITY, EPSILON);
        assert_mat3_eq(&(tau.ljac() * tau.ljacinv()), &DMat3::IDENTITY, EPSILON);
        assert_mat3_eq(&SO3Tangent::zero().rjac(), &DMat3::IDENTITY, EPSILON);
    }

    #[test]
    fn test_jacobian_inverses() {
        let test_vectors = [
            DVec3::new(0.1, 0.2, 0.3),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(-1.2, 0.7, 1.9),
        ];
        for v in test_vectors.iter() {
            let tau = SO3Tangent::new(*v);
            assert_mat3_eq(&(tau.rjac() * tau.rjacinv()), &DMat3::IDENTITY, 1e-9);
            assert_mat3_eq(&(tau.ljac() * tau.ljacinv()), &DMat3::IDENTITY, 1e-9);
            // Jl == Jr^T and Jr τ == τ
            assert_mat3_eq(&tau.ljac(), &tau.rjac().transpose(), 1e-12);
            assert_vec3_eq(tau.rjac() * tau.omega, tau.omega, 1e-12);
            // Jl == Adj(exp τ) Jr
            assert_mat3_eq(&tau.ljac(), &(tau.exp(None).adj() * tau.rjac()), 1e-9);
        }
    }

    #[test]
    fn test_exp_jacobian() {
        let tau = SO3Tangent::from_xyz(0.4, -0.9, 0.3);
        let mut jac = DMat3::ZERO;
        let x = tau.exp(Some(&mut jac));

        let numerical = numerical_jacobian(|d| {
            (tau + SO3Tangent::new(d))
                .exp(None)
                .rminus(&x, None, None)
                .omega
        });
        assert_mat3_eq(&jac, &numerical, 1e-6);
    }

    #[test]
    fn test_log_jacobian() {
        let x = SO3Tangent::from_xyz(0.5, 0.2, -1.1).exp(None);
        let mut jac = DMat3::ZERO;
        let tau = x.log(Some(&mut jac));

        let numerical = numerical_jacobian(|d| {
            (x + SO3Tangent::new(d)).log(None).omega - tau.omega
        });
        assert_mat3_eq(&jac, &numerical, 1e-6);
    }

    #[test]
    fn test_inverse_jacobian() {
        let x = SO3::random();
        let mut jac = DMat3::ZERO;
        let x_inv = x.inverse(Some(&mut jac));

        let numerical = numerical_jacobian(|d| {
            (x + SO3Tangent::new(d)).inverse(None).rminus(&x_inv, None, None).omega
        });
        assert_mat3_eq(&jac, &numerical, 1e-6);
    }

    #[test]
    fn test_compose_jacobians() {
        let x = SO3::random();
        let y = SO3::random();
        let mut jac_x = DMat3::ZERO;
        let mut jac_y = DMat3::ZERO;
        let xy = x.compose(&y, Some(&mut jac_x), Some(&mut jac_y));

        assert_mat3_eq(&jac_x, &y.inverse(None).adj(), EPSILON);
        assert_mat3_eq(&jac_y, &DMat3::IDENTITY, EPSILON);

        let numerical_x = numerical_jacobian(|d| {
            (x + SO3Tangent::new(d)).compose(&y, None, None).rminus(&xy, None, None).omega
        });
        let numerical_y = numerical_jacobian(|d| {
            x.compose(&(y + SO3Tangent::new(d)), None, None).rminus(&xy, None, None).omega
        });
        assert_mat3_eq(&jac_x, &numerical_x, 1e-6);
        assert_mat3_eq(&jac_y, &numerical_y, 1e-6);
    }

    #[test]
    fn test_act_jacobians() {
        let x = SO3::random();
        let v = DVec3::new(1.0, -2.0, 0.5);
        let mut jac_x = DMat3::ZERO;
        let mut jac_v = DMat3::ZERO;
        let out = x.act(v, Some(&mut jac_x), Some(&mut jac_v));

        let numerical_x = numerical_jacobian(|d| (x + SO3Tangent::new(d)).act(v, None, None) - out);
        let numerical_v = numerical_jacobian(|d| x.act(v + d, None, None) - out);
        assert_mat3_eq(&jac_x, &numerical_x, 1e-6);
        assert_mat3_eq(&jac_v, &numerical_v, 1e-6);
    }

    #[test]
    fn test_rplus_rminus_jacobians() {
        let x = SO3::random();
        let y = SO3::random();
        let tau = SO3Tangent::from_xyz(0.3, 0.1, -0.6);

        let mut jac_x = DMat3::ZERO;
        let mut jac_tau = DMat3::ZERO;
        let z = x.rplus(&tau, Some(&mut jac_x), Some(&mut jac_tau));
        let numerical_x = numerical_jacobian(|d| {
            (x + SO3Tangent::new(d))
                .rplus(&tau, None, None)
                .rminus(&z, None, None)
                .omega
        });
        let numerical_tau = numerical_jacobian(|d| {
            x.rplus(&(tau + SO3Tangent::new(d)), None, None)
                .rminus(&z, None, None)
                .omega
        });
        assert_mat3_eq(&jac_x, &numerical_x, 1e-6);
        assert_mat3_eq(&jac_tau, &numerical_tau, 1e-6);

        let mut jac_x = DMat3::ZERO;
        let mut jac_y = DMat3::ZERO;
        let diff = x.rminus(&y, Some(&mut jac_x), Some(&mut jac_y));
        let numerical_x = numerical_jacobian(|d| {
            (x + SO3Tangent::new(d)).rminus(&y, None, None).omega - diff.omega
        });
        let numerical_y = numerical_jacobian(|d| {
            x.rminus(&(y + SO3Tangent::new(d)), None, None).omega - diff.omega
        });
        assert_mat3_eq(&jac_x, &numerical_x, 1e-6);
        assert_mat3_eq(&jac_y, &numerical_y, 1e-6);
    }

    #[test]
    fn test_between() {
        let x = SO3::random();
        let y = SO3::random();
        let mut jac_x = DMat3::ZERO;
        let mut jac_y = DMat3::ZERO;
        let rel = x.between(&y, Some(&mut jac_x), Some(&mut jac_y));
        assert!((x * rel).is_approx(&y, 1e-9));

        let numerical_x = numerical_jacobian(|d| {
            (x + SO3Tangent::new(d)).between(&y, None, None).rminus(&rel, None, None).omega
        });
        assert_mat3_eq(&jac_x, &numerical_x, 1e-6);
        assert_mat3_eq(&jac_y, &DMat3::IDENTITY, EPSILON);
    }

    #[test]
    fn test_interp() {
        let x = SO3::random();
        let y = SO3::random();
        assert!(x.interp(&y, 0.0).is_approx(&x, 1e-9));
        assert!(x.interp(&y, 1.0).is_approx(&y, 1e-9));

        let half = x.interp(&y, 0.5);
        let d0 = half.rminus(&x, None, None).norm();
        let d1 = y.rminus(&half, None, None).norm();
        assert_relative_eq!(d0, d1, epsilon = 1e-9);
    }

    #[test]
    fn test_random() {
        for _ in 0..10 {
            let so3 = SO3::random();
            assert_relative_eq!(so3.q.length(), 1.0, epsilon = EPSILON);
            let tau = SO3Tangent::random();
            assert!(tau.omega.abs().max_element() <= 1.0);
        }
    }
}
