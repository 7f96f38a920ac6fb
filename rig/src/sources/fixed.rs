use crate::{
    constraint::{Constraint, TickContext},
    owner::OwnerRef,
};

/// A constraint with a constant frame-space target.
///
/// Handy for scripted offsets (crouch peek, recoil hold) and for driving a rig
/// without any world anchors.
#[derive(Debug)]
pub struct FixedConstraint<V> {
    value: V,
    strength: f32,
    active: bool,
    owner: OwnerRef,
    evaluations: u32,
}

impl<V: Copy> FixedConstraint<V> {
    pub fn new(value: V, owner: OwnerRef) -> Self {
        Self {
            value,
            strength: 1.0,
            active: false,
            owner,
            evaluations: 0,
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = strength;
        self
    }

    pub fn set_value(&mut self, value: V) {
        self.value = value;
    }

    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength;
    }

    /// How many times the stack asked for this constraint's target.
    pub fn evaluations(&self) -> u32 {
        self.evaluations
    }
}

impl<V: Copy> Constraint<V> for FixedConstraint<V> {
    fn target(&mut self, _ctx: &TickContext) -> V {
        self.evaluations += 1;
        self.value
    }

    fn strength(&self) -> f32 {
        self.strength
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
