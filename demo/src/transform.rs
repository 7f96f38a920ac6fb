//! Conversions between Bevy's glam types and the rig's nalgebra types.

use bevy::prelude::*;
use camera_rig::{Iso, Quat as RigQuat, Vec3 as RigVec3};
use nalgebra::{Quaternion, Translation3};

#[inline]
pub fn to_rig_vec(v: Vec3) -> RigVec3 {
    RigVec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn from_rig_vec(v: &RigVec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_rig_quat(q: Quat) -> RigQuat {
    RigQuat::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

#[inline]
pub fn from_rig_quat(q: &RigQuat) -> Quat {
    let c = q.into_inner().coords;
    Quat::from_xyzw(c.x, c.y, c.z, c.w)
}

/// Scale is dropped; the rig only deals in rigid poses.
pub fn to_iso(transform: &Transform) -> Iso {
    Iso::from_parts(
        Translation3::from(to_rig_vec(transform.translation)),
        to_rig_quat(transform.rotation),
    )
}

/// Writes a rig pose into an existing transform, keeping its scale.
pub fn apply_iso(transform: &mut Transform, pose: &Iso) {
    transform.translation = from_rig_vec(&pose.translation.vector);
    transform.rotation = from_rig_quat(&pose.rotation);
}
