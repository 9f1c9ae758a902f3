#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kornia Manif
//!
//! Lie groups with analytic Jacobians for state estimation, optimization and trajectory
//! planning, plus curve fitting directly on the group manifold.
//!
//! ## Supported Groups
//!
//! - **SO(3)**: 3D rotation group, tangent so(3)
//! - **SE(3)**: 3D rigid body transformations, tangent se(3)
//!
//! Both implement the [`LieGroup`] trait and their tangent types the [`Tangent`] trait,
//! so algorithms such as [`decasteljau()`] are written once for every group.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use kornia_manif::{LieGroup, Tangent, SE3, SE3Tangent};
//!
//! let pose = SE3Tangent::new(DVec3::new(0.0, 0.0, 0.5), DVec3::new(1.0, 0.0, 0.0)).exp(None);
//!
//! // transform a point and get the Jacobian with respect to the pose
//! let mut jacobian = [[0.0; 6]; 3];
//! let point = pose.act(DVec3::X, Some(&mut jacobian), None);
//!
//! // the tangent difference between two poses
//! let delta = pose.rminus(&SE3::IDENTITY, None, None);
//! assert!((delta - pose.log(None)).norm() < 1e-12);
//! # let _ = point;
//! ```

/// Errors raised by coefficient I/O.
pub mod error;

/// Generic capabilities shared by all Lie groups and their tangent spaces.
pub mod group;

/// Borrowed views over coefficient storage.
pub mod map;

/// 6x6 matrices.
pub mod mat6;

/// Special Euclidean group SE(3) for 3D rigid transformations.
pub mod se3;

/// Special Orthogonal group SO(3) for 3D rotations.
pub mod so3;

/// De Casteljau curve fitting on Lie groups.
pub mod decasteljau;

pub use decasteljau::{decasteljau, CurveFittingError, DeCasteljau};
pub use error::LieError;
pub use group::{LieGroup, Tangent};
pub use map::{map_blocks_mut, GroupMap, GroupRef};
pub use mat6::Mat6F64;
pub use se3::{SE3Tangent, SE3};
pub use so3::{SO3Tangent, SO3};
