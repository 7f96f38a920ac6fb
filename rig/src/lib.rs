pub mod constants;
pub mod constraint;
pub mod easing;
pub mod error;
pub mod math;
pub mod owner;
pub mod rig;
pub mod settings;
pub mod sources;
pub mod stack;

pub use constants::{
    BASE_PRIORITY, BLEND_DURATION_EPS, DEFAULT_AIM_PRIORITY, DEFAULT_FIXED_TIMESTEP,
    DEFAULT_LOCK_PRIORITY,
};
pub use constraint::{Constraint, SharedConstraint, TickContext};
pub use easing::{Easing, ease_in_out_quadratic};
pub use error::RigError;
pub use math::{Blendable, Iso, Quat, ReferenceFrame, Vec3};
pub use owner::{Owner, OwnerRef};
pub use rig::{CameraRig, CameraRigBuilder, RigPhase};
pub use settings::{AimSettings, CameraLockSettings, RigSettings};
pub use sources::{
    AimController, AimOffsetConstraint, Anchor, BodyFollowConstraint, CameraLock,
    FixedConstraint, PoseTransition, WorldTargetConstraint,
};
pub use stack::{ConstraintStack, EntryView};
