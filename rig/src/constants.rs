/// Blend durations at or below this many seconds are treated as instant.
///
/// Used by both registration and removal:
/// - `add` with `duration <= BLEND_DURATION_EPS` starts fully blended in.
/// - `remove` with `duration <= BLEND_DURATION_EPS` drops the entry on the spot.
pub const BLEND_DURATION_EPS: f32 = 0.001;

/// Default fixed simulation step in seconds (50 Hz).
pub const DEFAULT_FIXED_TIMESTEP: f32 = 1.0 / 50.0;

/// Default damping applied to the body-follow base constraint.
///
/// Convention:
/// - 0.0 = fastest follow (least smoothing)
/// - 1.0 = slowest follow (heaviest smoothing)
pub const DEFAULT_POSITION_DAMPING: f32 = 0.25;

/// Per-tick follow factor of the body-follow constraint at `damping = 0`.
pub const BODY_FOLLOW_FAST: f32 = 0.1;

/// Per-tick follow factor of the body-follow constraint at `damping = 1`.
pub const BODY_FOLLOW_SLOW: f32 = 0.025;

/// Priority of the permanent base (body-follow) position constraint.
/// Everything registered by gameplay code should sit above it.
pub const BASE_PRIORITY: i32 = 0;

/// Default priority for aim-down-sights offsets.
pub const DEFAULT_AIM_PRIORITY: i32 = 100;

/// Aim constraints may never share the base constraint's slot.
pub const MIN_AIM_PRIORITY: i32 = 1;

/// Default priority for world camera locks (cutscenes, terminals, ...).
/// Sits well above aiming so a lock always wins.
pub const DEFAULT_LOCK_PRIORITY: i32 = 1000;

/// Default blend in/out time for world camera locks in seconds.
pub const DEFAULT_LOCK_BLEND: f32 = 0.5;

/// Default aim up/down time in seconds.
pub const DEFAULT_AIM_DURATION: f32 = 0.25;
