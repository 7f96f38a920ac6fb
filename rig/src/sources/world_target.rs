use std::{cell::RefCell, rc::Rc};

use crate::{
    constraint::{Constraint, TickContext},
    math::{Quat, Vec3},
    owner::{Owner, OwnerRef},
    rig::CameraRig,
    settings::CameraLockSettings,
    sources::Anchor,
};

/// Pins the camera to a world-space anchor, both position and rotation.
#[derive(Debug)]
pub struct WorldTargetConstraint {
    anchor: Anchor,
    position_active: bool,
    rotation_active: bool,
    owner: OwnerRef,
}

impl WorldTargetConstraint {
    pub fn new(anchor: Anchor, owner: OwnerRef) -> Self {
        Self {
            anchor,
            position_active: false,
            rotation_active: false,
            owner,
        }
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn position_active(&self) -> bool {
        self.position_active
    }

    pub fn rotation_active(&self) -> bool {
        self.rotation_active
    }
}

impl Constraint<Vec3> for WorldTargetConstraint {
    fn target(&mut self, ctx: &TickContext) -> Vec3 {
        ctx.frame.inverse_transform_point(&self.anchor.translation())
    }

    fn strength(&self) -> f32 {
        1.0
    }

    fn set_active(&mut self, active: bool) {
        self.position_active = active;
    }

    fn is_active(&self) -> bool {
        self.position_active
    }

    fn owner(&self) -> &OwnerRef {
        &self.owner
    }
}

impl Constraint<Quat> for WorldTargetConstraint {
    fn target(&mut self, ctx: &TickContext) -> Quat {
        ctx.frame.inverse_transform_rotation(&self.anchor.rotation())
    }

    fn strength(&self) -> f32 {
        1.0
    }

    fn set_active(&mut self, active: bool) {
        self.rotation_active = active;
    }

    fn is_active(&self) -> bool {
        self.rotation_active
    }

    fn owner(&self) -> &OwnerRef {
        &self.owner
    }
}

/// Engages and releases a [`WorldTargetConstraint`] on a rig (cutscenes, terminals,
/// security cameras).
///
/// The lock owns its constraint's liveness: dropping the lock purges any entries it left
/// on the rig at the next fixed tick.
#[derive(Debug)]
pub struct CameraLock {
    constraint: Rc<RefCell<WorldTargetConstraint>>,
    settings: CameraLockSettings,
    engaged: bool,
    _owner: Owner,
}

impl CameraLock {
    pub fn new(anchor: Anchor, settings: CameraLockSettings) -> Self {
        let owner = Owner::new();
        Self {
            constraint: Rc::new(RefCell::new(WorldTargetConstraint::new(
                anchor,
                owner.handle(),
            ))),
            settings,
            engaged: false,
            _owner: owner,
        }
    }

    /// Blends the rig onto the anchor. Engaging an engaged lock leaves its blend untouched.
    pub fn engage(&mut self, rig: &mut CameraRig) {
        if self.engaged {
            return;
        }

        let priority = self.settings.priority;
        let blend_in = self.settings.blend_in;
        rig.add_position_constraint(self.constraint.clone(), priority, blend_in);
        rig.add_rotation_constraint(self.constraint.clone(), priority, blend_in);
        self.engaged = true;
        log::debug!("camera lock engaged (priority {priority})");
    }

    /// Blends the rig back to the character over `blend_out`.
    pub fn release(&mut self, rig: &mut CameraRig) {
        if self.engaged {
            self.detach(rig, self.settings.blend_out);
        }
    }

    /// Drops the lock without blending.
    pub fn release_instant(&mut self, rig: &mut CameraRig) {
        if self.engaged {
            self.detach(rig, 0.0);
        }
    }

    fn detach(&mut self, rig: &mut CameraRig, blend_out: f32) {
        rig.remove_position_constraint(&self.constraint, blend_out);
        rig.remove_rotation_constraint(&self.constraint, blend_out);
        self.engaged = false;
        log::debug!("camera lock released (blend {blend_out}s)");
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn constraint(&self) -> &Rc<RefCell<WorldTargetConstraint>> {
        &self.constraint
    }

    pub fn settings(&self) -> &CameraLockSettings {
        &self.settings
    }
}
