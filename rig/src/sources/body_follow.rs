use crate::{
    constants::{BODY_FOLLOW_FAST, BODY_FOLLOW_SLOW},
    constraint::{Constraint, TickContext},
    math::{Blendable, Vec3},
    owner::OwnerRef,
    sources::Anchor,
};

/// The rig's permanent base position constraint.
///
/// Follows the body's head anchor with exponential damping so animation blends on the
/// body don't jerk the camera. Without an anchor the target is the reference-frame origin.
///
/// Whenever the constraint regains activity (after being occluded by a full-strength
/// constraint above it) the damped position snaps to the current target instead of
/// sliding in from a stale value.
#[derive(Debug)]
pub struct BodyFollowConstraint {
    anchor: Option<Anchor>,
    damping: f32,
    damped: Vec3,
    snap_pending: bool,
    active: bool,
    owner: OwnerRef,
}

impl BodyFollowConstraint {
    pub fn new(anchor: Option<Anchor>, damping: f32, owner: OwnerRef) -> Self {
        Self {
            anchor,
            damping: damping.clamp(0.0, 1.0),
            damped: Vec3::zeros(),
            snap_pending: true,
            active: false,
            owner,
        }
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    pub fn damped_position(&self) -> Vec3 {
        self.damped
    }

    /// Fraction of the remaining distance covered per second.
    fn follow_rate(&self, fixed_timestep: f32) -> f32 {
        let fast = BODY_FOLLOW_FAST / fixed_timestep;
        let slow = BODY_FOLLOW_SLOW / fixed_timestep;
        fast + (slow - fast) * self.damping
    }

    fn goal(&self, ctx: &TickContext) -> Vec3 {
        match &self.anchor {
            Some(anchor) => ctx.frame.inverse_transform_point(&anchor.translation()),
            None => Vec3::zeros(),
        }
    }
}

impl Constraint<Vec3> for BodyFollowConstraint {
    fn target(&mut self, ctx: &TickContext) -> Vec3 {
        let goal = self.goal(ctx);
        if self.snap_pending {
            self.snap_pending = false;
            self.damped = goal;
        } else {
            let t = self.follow_rate(ctx.fixed_timestep) * ctx.dt;
            self.damped = self.damped.blend(&goal, t);
        }
        self.damped
    }

    fn strength(&self) -> f32 {
        1.0
    }

    fn set_active(&mut self, active: bool) {
        if self.active != active {
            self.active = active;
            if active {
                self.snap_pending = true;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn owner(&self) -> &OwnerRef {
        &self.owner
    }
}
