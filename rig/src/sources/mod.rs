/*!
Built-in constraint sources.

- anchor:       shared world-space poses written by the host
- fixed:        constant frame-space targets
- body_follow:  the rig's permanent, damped body-follow base constraint
- world_target: camera locks onto world anchors (position + rotation)
- aim_offset:   aim-down-sights camera offsets
*/

pub mod aim_offset;
pub mod anchor;
pub mod body_follow;
pub mod fixed;
pub mod world_target;

pub use aim_offset::{AimController, AimOffsetConstraint, PoseTransition};
pub use anchor::Anchor;
pub use body_follow::BodyFollowConstraint;
pub use fixed::FixedConstraint;
pub use world_target::{CameraLock, WorldTargetConstraint};
