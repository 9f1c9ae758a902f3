//! # Lie group capabilities
//!
//! Every group in this crate implements [`LieGroup`] and has a companion tangent type
//! implementing [`Tangent`]. The two traits are tied together through associated types so
//! that generic code (e.g. [`crate::DeCasteljau`]) can move between the manifold and its
//! Lie algebra without knowing which group it operates on.
//!
//! ## Perturbation convention
//!
//! All Jacobians are expressed with respect to **right** (local) perturbations:
//!
//! ```text
//! J = d( f(X ⊕ δ) ⊖ f(X) ) / dδ,   X ⊕ δ = X ∘ exp(δ)
//! ```
//!
//! Every Jacobian argument is an optional output slot. Passing `None` skips the
//! computation entirely.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

use glam::{DMat3, DVec3};

use crate::error::{check_size, LieError};

/// Jacobian type associated with a tangent type.
pub type TangentJacobian<T> = <<T as Tangent>::Group as LieGroup>::Jacobian;

/// Operations shared by all Lie group elements.
pub trait LieGroup: Copy + Debug {
    /// The Lie algebra (tangent space) representation of the group.
    type Tangent: Tangent<Group = Self>;

    /// Square matrix mapping between tangent spaces (DOF × DOF).
    type Jacobian: Copy + Debug + PartialEq + Neg<Output = Self::Jacobian>;

    /// Jacobian of the group action with respect to the group element (3 × DOF).
    type ActJacobian: Copy + Debug;

    /// Dimension of the space the group acts on.
    const DIM: usize;

    /// Degrees of freedom, i.e. the tangent space dimension.
    const DOF: usize;

    /// Number of scalars used to store an element.
    const REP_SIZE: usize;

    /// The identity element.
    fn identity() -> Self;

    /// Reset this element to the identity.
    fn set_identity(&mut self) {
        *self = Self::identity();
    }

    /// The inverse element X⁻¹.
    ///
    /// * `jacobian` - d(X⁻¹)/dX = -Adj(X).
    fn inverse(&self, jacobian: Option<&mut Self::Jacobian>) -> Self;

    /// The composition X ∘ Y.
    ///
    /// * `jacobian_self` - d(X ∘ Y)/dX = Adj(Y⁻¹).
    /// * `jacobian_other` - d(X ∘ Y)/dY = I.
    fn compose(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::Jacobian>,
        jacobian_other: Option<&mut Self::Jacobian>,
    ) -> Self;

    /// Apply the group action to a 3D point.
    ///
    /// * `jacobian_self` - d(X·v)/dX.
    /// * `jacobian_vector` - d(X·v)/dv.
    fn act(
        &self,
        vector: DVec3,
        jacobian_self: Option<&mut Self::ActJacobian>,
        jacobian_vector: Option<&mut DMat3>,
    ) -> DVec3;

    /// Logarithmic map, lifting the element to its tangent representative.
    ///
    /// * `jacobian` - d(log X)/dX = Jr⁻¹(log X).
    fn log(&self, jacobian: Option<&mut Self::Jacobian>) -> Self::Tangent;

    /// The adjoint matrix, transporting tangent vectors between frames.
    fn adj(&self) -> Self::Jacobian;

    /// Sample a random element.
    fn random() -> Self;

    /// Project the element back onto the manifold.
    fn normalize(&mut self);

    /// The raw coefficients of this element.
    fn coeffs(&self) -> Vec<f64>;

    /// Build an element from raw coefficients.
    fn from_coeffs(coeffs: &[f64]) -> Result<Self, LieError>;

    /// Write the raw coefficients into `out`, which must hold exactly `REP_SIZE` scalars.
    fn write_coeffs(&self, out: &mut [f64]) -> Result<(), LieError> {
        check_size(out, Self::REP_SIZE)?;
        out.copy_from_slice(&self.coeffs());
        Ok(())
    }

    /// Right plus: X ⊕ τ = X ∘ exp(τ).
    ///
    /// * `jacobian_self` - d(X ⊕ τ)/dX = Adj(exp(τ)⁻¹).
    /// * `jacobian_tangent` - d(X ⊕ τ)/dτ = Jr(τ).
    fn rplus(
        &self,
        tangent: &Self::Tangent,
        jacobian_self: Option<&mut Self::Jacobian>,
        jacobian_tangent: Option<&mut Self::Jacobian>,
    ) -> Self {
        if let Some(jac) = jacobian_tangent {
            *jac = tangent.rjac();
        }
        self.compose(&tangent.exp(None), jacobian_self, None)
    }

    /// Right minus: X ⊖ Y = log(Y⁻¹ ∘ X).
    ///
    /// * `jacobian_self` - d(X ⊖ Y)/dX = Jr⁻¹(τ).
    /// * `jacobian_other` - d(X ⊖ Y)/dY = -Jl⁻¹(τ).
    fn rminus(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::Jacobian>,
        jacobian_other: Option<&mut Self::Jacobian>,
    ) -> Self::Tangent {
        let tangent = other.inverse(None).compose(self, None, None).log(None);
        if let Some(jac) = jacobian_self {
            *jac = tangent.rjacinv();
        }
        if let Some(jac) = jacobian_other {
            *jac = -tangent.ljacinv();
        }
        tangent
    }

    /// Left plus: τ ⊕ X = exp(τ) ∘ X.
    fn lplus(&self, tangent: &Self::Tangent) -> Self {
        tangent.exp(None).compose(self, None, None)
    }

    /// Left minus: X ⊖ Y = log(X ∘ Y⁻¹).
    fn lminus(&self, other: &Self) -> Self::Tangent {
        self.compose(&other.inverse(None), None, None).log(None)
    }

    /// The relative element X⁻¹ ∘ Y.
    ///
    /// * `jacobian_self` - d(X⁻¹ ∘ Y)/dX = -Adj(Y⁻¹ ∘ X).
    /// * `jacobian_other` - d(X⁻¹ ∘ Y)/dY = I.
    fn between(
        &self,
        other: &Self,
        jacobian_self: Option<&mut Self::Jacobian>,
        jacobian_other: Option<&mut Self::Jacobian>,
    ) -> Self {
        let relative = self.inverse(None).compose(other, None, jacobian_other);
        if let Some(jac) = jacobian_self {
            *jac = -relative.inverse(None).adj();
        }
        relative
    }

    /// Geodesic interpolation: X ⊕ (t · (Y ⊖ X)).
    fn interp(&self, other: &Self, t: f64) -> Self {
        let delta = other.rminus(self, None, None) * t;
        self.rplus(&delta, None, None)
    }

    /// Whether `other` lies within `tolerance` of this element, measured in the tangent space.
    fn is_approx(&self, other: &Self, tolerance: f64) -> bool {
        other.rminus(self, None, None).norm() <= tolerance
    }
}

/// Operations on elements of a Lie algebra.
pub trait Tangent:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
{
    /// The group this algebra belongs to.
    type Group: LieGroup<Tangent = Self>;

    /// Matrix representation of the algebra (the result of `hat`).
    type LieAlgebra: Copy + Debug;

    /// Number of scalars of the tangent vector.
    const DOF: usize;

    /// The zero tangent vector.
    fn zero() -> Self;

    /// Sample a random tangent vector.
    fn random() -> Self;

    /// Exponential map to the group.
    ///
    /// * `jacobian` - d(exp τ)/dτ = Jr(τ).
    fn exp(&self, jacobian: Option<&mut TangentJacobian<Self>>) -> Self::Group;

    /// Vector to matrix representation of the algebra.
    fn hat(&self) -> Self::LieAlgebra;

    /// Matrix to vector representation of the algebra.
    fn vee(algebra: &Self::LieAlgebra) -> Self;

    /// Right Jacobian Jr: exp(τ + δ) ≈ exp(τ) ∘ exp(Jr δ).
    fn rjac(&self) -> TangentJacobian<Self>;

    /// Inverse of the right Jacobian.
    fn rjacinv(&self) -> TangentJacobian<Self>;

    /// Left Jacobian Jl: exp(τ + δ) ≈ exp(Jl δ) ∘ exp(τ).
    fn ljac(&self) -> TangentJacobian<Self> {
        (-*self).rjac()
    }

    /// Inverse of the left Jacobian.
    fn ljacinv(&self) -> TangentJacobian<Self> {
        (-*self).rjacinv()
    }

    /// Squared euclidean norm of the coefficients.
    fn squared_norm(&self) -> f64;

    /// Euclidean norm of the coefficients.
    fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    /// The raw coefficients of this tangent vector.
    fn coeffs(&self) -> Vec<f64>;

    /// Build a tangent vector from raw coefficients.
    fn from_coeffs(coeffs: &[f64]) -> Result<Self, LieError>;
}
