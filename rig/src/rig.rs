//! The first-person camera rig: two constraint stacks plus fixed-tick/render-frame
//! scheduling.
//!
//! The host owns the loop. It calls [`CameraRig::fixed_tick`] once per simulation step and
//! [`CameraRig::render_frame`] once per rendered frame. Each fixed tick recomputes a target
//! position and rotation; render frames interpolate the visible local transform from the
//! previous target to the new one across exactly one fixed step, so the camera moves
//! smoothly regardless of how render and simulation rates line up.

use std::{cell::RefCell, rc::Rc};

use crate::{
    RigError,
    constants::BASE_PRIORITY,
    constraint::{Constraint, SharedConstraint, TickContext, same_source},
    math::{Blendable, Iso, Quat, ReferenceFrame, Vec3},
    owner::Owner,
    settings::RigSettings,
    sources::{Anchor, BodyFollowConstraint},
    stack::ConstraintStack,
};

/// Coarse state of the rig, derived from both stacks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RigPhase {
    /// Only the permanent base constraint is registered.
    Idle,
    /// At least one entry is blending in or out.
    Blending,
    /// Extra constraints are registered and all of them are settled.
    Settled,
}

#[derive(Debug, Default)]
pub struct CameraRigBuilder {
    frame: Option<Iso>,
    body_anchor: Option<Anchor>,
    settings: RigSettings,
}

impl CameraRigBuilder {
    /// The rig's parent transform. Required.
    pub fn reference_frame(mut self, frame: Iso) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Head/body anchor the base constraint follows. Defaults to the frame origin.
    pub fn body_anchor(mut self, anchor: Anchor) -> Self {
        self.body_anchor = Some(anchor);
        self
    }

    pub fn settings(mut self, settings: RigSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<CameraRig, RigError> {
        self.settings.validate()?;
        let frame = ReferenceFrame::new(self.frame.ok_or(RigError::MissingReferenceFrame)?)?;

        let owner = Owner::new();
        let base = Rc::new(RefCell::new(BodyFollowConstraint::new(
            self.body_anchor,
            self.settings.position_damping,
            owner.handle(),
        )));

        let epsilon = self.settings.full_strength_epsilon;
        let mut positions = ConstraintStack::<Vec3>::with_full_strength_epsilon(epsilon);
        positions.add(base.clone(), BASE_PRIORITY, 0.0);

        log::debug!(
            "camera rig built (fixed timestep {}s, damping {})",
            self.settings.fixed_timestep,
            self.settings.position_damping
        );

        Ok(CameraRig {
            frame,
            settings: self.settings,
            positions,
            rotations: ConstraintStack::with_full_strength_epsilon(epsilon),
            base,
            _owner: owner,
            start_position: Vec3::zeros(),
            target_position: Vec3::zeros(),
            local_position: Vec3::zeros(),
            start_rotation: Quat::identity(),
            target_rotation: Quat::identity(),
            local_rotation: Quat::identity(),
            positions_ticked: false,
            rotations_ticked: false,
            inverse_fixed_timestep: 1.0 / self.settings.fixed_timestep,
            frame_fraction: 0.0,
        })
    }
}

pub struct CameraRig {
    frame: ReferenceFrame,
    settings: RigSettings,
    positions: ConstraintStack<Vec3>,
    rotations: ConstraintStack<Quat>,
    base: Rc<RefCell<BodyFollowConstraint>>,
    // Keeps the base constraint alive for the rig's lifetime.
    _owner: Owner,
    start_position: Vec3,
    target_position: Vec3,
    local_position: Vec3,
    start_rotation: Quat,
    target_rotation: Quat,
    local_rotation: Quat,
    /// Whether the last fixed tick aggregated each stack.
    positions_ticked: bool,
    rotations_ticked: bool,
    inverse_fixed_timestep: f32,
    /// Progress through the current fixed step, in steps.
    frame_fraction: f32,
}

impl CameraRig {
    pub fn builder() -> CameraRigBuilder {
        CameraRigBuilder::default()
    }

    /// Primes the rig: one fixed tick, then jump straight to its target.
    pub fn start(&mut self) {
        self.fixed_tick(self.settings.fixed_timestep);
        self.frame_fraction = 1.0;
        self.local_position = self.target_position;
        self.local_rotation = self.target_rotation;
    }

    /// One simulation step: advance blends and recompute both targets.
    pub fn fixed_tick(&mut self, dt: f32) {
        self.frame_fraction = 0.0;
        let ctx = TickContext {
            frame: &self.frame,
            dt,
            fixed_timestep: self.settings.fixed_timestep,
        };

        // A stack that empties during aggregation still interpolates out to neutral.
        self.positions_ticked = !self.positions.is_empty();
        if self.positions_ticked {
            self.start_position = self.target_position;
            self.local_position = self.start_position;
            self.target_position = self.positions.aggregate(&ctx);
        } else {
            self.target_position = Vec3::neutral();
            self.local_position = Vec3::neutral();
        }

        self.rotations_ticked = !self.rotations.is_empty();
        if self.rotations_ticked {
            self.start_rotation = self.target_rotation;
            self.local_rotation = self.start_rotation;
            self.target_rotation = self.rotations.aggregate(&ctx);
        } else {
            self.target_rotation = Quat::neutral();
            self.local_rotation = Quat::neutral();
        }
    }

    /// One rendered frame: interpolate the visible transform toward the latest targets.
    pub fn render_frame(&mut self, dt: f32) {
        self.frame_fraction += dt * self.inverse_fixed_timestep;
        let t = self.frame_fraction.clamp(0.0, 1.0);

        if self.positions_ticked {
            self.local_position = self.start_position.blend(&self.target_position, t);
        }
        if self.rotations_ticked {
            self.local_rotation = self.start_rotation.blend(&self.target_rotation, t);
        }
    }

    pub fn add_position_constraint(
        &mut self,
        source: SharedConstraint<Vec3>,
        priority: i32,
        blend_duration: f32,
    ) {
        self.positions.add(source, priority, blend_duration);
    }

    /// Returns `false` if the source was not registered. The base constraint can never be
    /// removed.
    pub fn remove_position_constraint<S>(
        &mut self,
        source: &Rc<RefCell<S>>,
        blend_duration: f32,
    ) -> bool
    where
        S: Constraint<Vec3> + ?Sized,
    {
        if same_source(&self.base, source) {
            log::warn!("ignoring attempt to remove the base position constraint");
            return false;
        }
        self.positions.remove(source, blend_duration)
    }

    pub fn add_rotation_constraint(
        &mut self,
        source: SharedConstraint<Quat>,
        priority: i32,
        blend_duration: f32,
    ) {
        self.rotations.add(source, priority, blend_duration);
    }

    pub fn remove_rotation_constraint<S>(
        &mut self,
        source: &Rc<RefCell<S>>,
        blend_duration: f32,
    ) -> bool
    where
        S: Constraint<Quat> + ?Sized,
    {
        self.rotations.remove(source, blend_duration)
    }

    /// Moves the parent transform. Takes effect on the next fixed tick.
    pub fn set_reference_frame(&mut self, frame: Iso) -> Result<(), RigError> {
        self.frame = ReferenceFrame::new(frame)?;
        Ok(())
    }

    pub fn reference_frame(&self) -> &ReferenceFrame {
        &self.frame
    }

    pub fn phase(&self) -> RigPhase {
        if self.positions.is_blending() || self.rotations.is_blending() {
            RigPhase::Blending
        } else if self.positions.len() <= 1 && self.rotations.is_empty() {
            RigPhase::Idle
        } else {
            RigPhase::Settled
        }
    }

    #[inline]
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    #[inline]
    pub fn local_rotation(&self) -> Quat {
        self.local_rotation
    }

    /// The camera's transform relative to the reference frame.
    pub fn local_transform(&self) -> Iso {
        Iso::from_parts(self.local_position.into(), self.local_rotation)
    }

    /// The camera's transform in world space.
    pub fn world_transform(&self) -> Iso {
        self.frame.iso() * self.local_transform()
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    pub fn target_rotation(&self) -> Quat {
        self.target_rotation
    }

    pub fn position_stack(&self) -> &ConstraintStack<Vec3> {
        &self.positions
    }

    pub fn rotation_stack(&self) -> &ConstraintStack<Quat> {
        &self.rotations
    }

    pub fn base_constraint(&self) -> &Rc<RefCell<BodyFollowConstraint>> {
        &self.base
    }

    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }
}
