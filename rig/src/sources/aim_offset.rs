use std::{cell::RefCell, rc::Rc};

use crate::{
    constants::BLEND_DURATION_EPS,
    constraint::{Constraint, TickContext},
    easing::Easing,
    math::{Blendable, Quat, Vec3},
    owner::{Owner, OwnerRef},
    rig::CameraRig,
    settings::AimSettings,
    sources::Anchor,
};

/// Eased hand-off of the weapon's pose rotation between two orientations.
#[derive(Clone, Copy, Debug)]
pub struct PoseTransition {
    from: Quat,
    to: Quat,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl PoseTransition {
    pub fn settled(rotation: Quat, easing: Easing) -> Self {
        Self {
            from: rotation,
            to: rotation,
            elapsed: 0.0,
            duration: 0.0,
            easing,
        }
    }

    /// Heads for `to` from wherever the current transition has got to.
    pub fn start(&mut self, to: Quat, duration: f32) {
        self.from = self.current();
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration;
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= BLEND_DURATION_EPS {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn current(&self) -> Quat {
        self.from.blend(&self.to, self.easing.apply(self.progress()))
    }

    pub fn is_settled(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Moves the camera so a weapon's sight lines up with the eye while aiming down sights.
///
/// `pose_position`/`pose_rotation` describe where the weapon sits relative to the camera
/// in its aim pose. The weapon turns into that pose through a [`PoseTransition`]; the
/// target undoes the weapon's current pose rotation, so the sight line stays level while
/// the weapon is still turning.
#[derive(Debug)]
pub struct AimOffsetConstraint {
    root: Anchor,
    pose_position: Vec3,
    pose_rotation: Quat,
    transition: PoseTransition,
    raised: bool,
    active: bool,
    owner: OwnerRef,
}

impl AimOffsetConstraint {
    pub fn new(root: Anchor, easing: Easing, owner: OwnerRef) -> Self {
        Self {
            root,
            pose_position: Vec3::zeros(),
            pose_rotation: Quat::identity(),
            transition: PoseTransition::settled(Quat::identity(), easing),
            raised: false,
            active: false,
            owner,
        }
    }

    /// Changing the pose while raised snaps the weapon onto it.
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.pose_position = position;
        self.pose_rotation = rotation;
        if self.raised {
            self.transition.start(rotation, 0.0);
        }
    }

    /// Turns the weapon into the aim pose over `duration`.
    pub fn raise(&mut self, duration: f32) {
        self.raised = true;
        self.transition.start(self.pose_rotation, duration);
    }

    /// Turns the weapon back to rest over `duration`.
    pub fn lower(&mut self, duration: f32) {
        self.raised = false;
        self.transition.start(Quat::identity(), duration);
    }

    pub fn advance(&mut self, dt: f32) {
        self.transition.advance(dt);
    }

    /// Weapon rotation relative to its rest pose right now.
    pub fn current_pose_rotation(&self) -> Quat {
        self.transition.current()
    }

    pub fn transition(&self) -> &PoseTransition {
        &self.transition
    }

    /// Sight point in world space.
    fn world_target(&self) -> Vec3 {
        let root = self.root.pose();
        let pose_rotation = self.transition.current();
        root.translation.vector + root.rotation * pose_rotation.inverse() * -self.pose_position
    }
}

impl Constraint<Vec3> for AimOffsetConstraint {
    fn target(&mut self, ctx: &TickContext) -> Vec3 {
        ctx.frame.inverse_transform_point(&self.world_target())
    }

    fn strength(&self) -> f32 {
        1.0
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn owner(&self) -> &OwnerRef {
        &self.owner
    }
}

/// Pushes and pops an [`AimOffsetConstraint`] as the wielder aims.
///
/// The host calls [`AimController::update`] once per fixed tick to move the weapon's pose
/// rotation, and reads [`AimController::pose_rotation`] when posing the weapon model.
#[derive(Debug)]
pub struct AimController {
    constraint: Rc<RefCell<AimOffsetConstraint>>,
    settings: AimSettings,
    aiming: bool,
    _owner: Owner,
}

impl AimController {
    pub fn new(root: Anchor, settings: AimSettings) -> Self {
        let owner = Owner::new();
        let settings = settings.sanitized();
        Self {
            constraint: Rc::new(RefCell::new(AimOffsetConstraint::new(
                root,
                settings.rotation_transition,
                owner.handle(),
            ))),
            settings,
            aiming: false,
            _owner: owner,
        }
    }

    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.constraint.borrow_mut().set_pose(position, rotation);
    }

    pub fn aim(&mut self, rig: &mut CameraRig) {
        if self.aiming {
            return;
        }
        rig.add_position_constraint(
            self.constraint.clone(),
            self.settings.priority,
            self.settings.aim_up_duration,
        );
        self.constraint
            .borrow_mut()
            .raise(self.settings.aim_up_duration);
        self.aiming = true;
    }

    pub fn stop_aim(&mut self, rig: &mut CameraRig) {
        if !self.aiming {
            return;
        }
        rig.remove_position_constraint(&self.constraint, self.settings.aim_down_duration);
        self.constraint
            .borrow_mut()
            .lower(self.settings.aim_down_duration);
        self.aiming = false;
    }

    /// Re-applies a saved aim state without transitions (e.g. after loading a save).
    pub fn restore(&mut self, rig: &mut CameraRig, aiming: bool) {
        rig.remove_position_constraint(&self.constraint, 0.0);
        if aiming {
            rig.add_position_constraint(self.constraint.clone(), self.settings.priority, 0.0);
            self.constraint.borrow_mut().raise(0.0);
        } else {
            self.constraint.borrow_mut().lower(0.0);
        }
        self.aiming = aiming;
    }

    /// Advances the weapon's pose rotation by `dt`.
    pub fn update(&mut self, dt: f32) {
        self.constraint.borrow_mut().advance(dt);
    }

    pub fn pose_rotation(&self) -> Quat {
        self.constraint.borrow().current_pose_rotation()
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn constraint(&self) -> &Rc<RefCell<AimOffsetConstraint>> {
        &self.constraint
    }
}
