/*!
Math aliases and the two value types the rig blends.

This module contains no blending policy. It defines:
- the nalgebra aliases used across the crate
- `ReferenceFrame`, the parent transform every constraint target is expressed in
- `Blendable`, the seam that lets one stack implementation serve both positions and
  rotations
*/

use nalgebra as na;

use crate::error::RigError;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// Below this sine of the half-angle, slerp falls back to normalized lerp.
const SLERP_EPS: f32 = 1.0e-6;

/// The camera rig's parent transform in world space.
///
/// Constraint sources receive this to express world-space targets relative to the rig.
/// It can only be constructed from finite values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceFrame {
    iso: Iso,
}

impl ReferenceFrame {
    pub fn new(iso: Iso) -> Result<Self, RigError> {
        let t = iso.translation.vector;
        let q = iso.rotation.coords;
        if t.iter().chain(q.iter()).all(|c| c.is_finite()) {
            Ok(Self { iso })
        } else {
            Err(RigError::NonFiniteReferenceFrame)
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self {
            iso: Iso::identity(),
        }
    }

    #[inline]
    pub fn from_parts(translation: Vec3, rotation: Quat) -> Result<Self, RigError> {
        Self::new(Iso::from_parts(translation.into(), rotation))
    }

    #[inline]
    pub fn iso(&self) -> &Iso {
        &self.iso
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.iso.translation.vector
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.iso.rotation
    }

    /// World-space point → frame-local point.
    #[inline]
    pub fn inverse_transform_point(&self, world: &Vec3) -> Vec3 {
        self.iso
            .inverse_transform_point(&na::Point3::from(*world))
            .coords
    }

    /// World-space rotation → frame-local rotation.
    #[inline]
    pub fn inverse_transform_rotation(&self, world: &Quat) -> Quat {
        self.iso.rotation.inverse() * world
    }

    /// Frame-local point → world-space point.
    #[inline]
    pub fn transform_point(&self, local: &Vec3) -> Vec3 {
        self.iso.transform_point(&na::Point3::from(*local)).coords
    }
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::identity()
    }
}

/// A value a constraint stack can composite.
///
/// `blend` is clamped: `t` outside `[0, 1]` is treated as the nearest bound.
pub trait Blendable: Copy + std::fmt::Debug {
    /// Starting point of every composite (zero offset / no rotation).
    fn neutral() -> Self;

    fn blend(&self, to: &Self, t: f32) -> Self;
}

impl Blendable for Vec3 {
    #[inline]
    fn neutral() -> Self {
        Vec3::zeros()
    }

    #[inline]
    fn blend(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t.clamp(0.0, 1.0))
    }
}

impl Blendable for Quat {
    #[inline]
    fn neutral() -> Self {
        Quat::identity()
    }

    /// Shortest-path spherical interpolation.
    #[inline]
    fn blend(&self, to: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        self.try_slerp(to, t, SLERP_EPS)
            .unwrap_or_else(|| self.nlerp(to, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1.0e-5;

    #[test]
    fn reference_frame_rejects_non_finite_values() {
        let iso = Iso::from_parts(Vec3::new(f32::NAN, 0.0, 0.0).into(), Quat::identity());
        assert!(matches!(
            ReferenceFrame::new(iso),
            Err(RigError::NonFiniteReferenceFrame)
        ));

        let iso = Iso::from_parts(Vec3::new(0.0, f32::INFINITY, 0.0).into(), Quat::identity());
        assert!(ReferenceFrame::new(iso).is_err());
    }

    #[test]
    fn inverse_transform_point_undoes_translation_and_rotation() {
        let frame = ReferenceFrame::from_parts(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
        )
        .unwrap();

        let world = frame.transform_point(&Vec3::new(1.0, 2.0, 3.0));
        let local = frame.inverse_transform_point(&world);
        assert!((local - Vec3::new(1.0, 2.0, 3.0)).norm() < EPS);
    }

    #[test]
    fn inverse_transform_rotation_is_relative_to_parent() {
        let parent = Quat::from_axis_angle(&Vec3::y_axis(), 0.5);
        let frame = ReferenceFrame::from_parts(Vec3::zeros(), parent).unwrap();
        let world = Quat::from_axis_angle(&Vec3::y_axis(), 1.25);

        let local = frame.inverse_transform_rotation(&world);
        assert!((local.angle() - 0.75).abs() < EPS);
    }

    #[test]
    fn vec3_blend_is_clamped_lerp() {
        let a = Vec3::zeros();
        let b = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(a.blend(&b, 0.5), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(a.blend(&b, 2.0), b);
        assert_eq!(a.blend(&b, -1.0), a);
    }

    #[test]
    fn quat_blend_halves_the_angle() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        let mid = a.blend(&b, 0.5);
        assert!((mid.angle() - FRAC_PI_2 * 0.5).abs() < EPS);
        assert!(a.blend(&b, 1.0).angle_to(&b) < EPS);
    }

    #[test]
    fn quat_blend_of_identical_rotations_is_stable() {
        let a = Quat::from_axis_angle(&Vec3::x_axis(), 0.3);
        let r = a.blend(&a, 0.5);
        assert!(r.angle_to(&a) < EPS);
    }
}
