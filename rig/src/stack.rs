//! Priority-sorted, time-blended constraint stack.
//!
//! # Model
//! - Entries are kept sorted ascending by priority (stable), so the last entry wins ties
//!   against everything registered before it.
//! - Each entry carries a `blend` in `[0, 1]` and a signed `blend_rate` (per second).
//!   Positive rates blend in, negative rates blend out, zero means settled.
//!
//! # Aggregation
//! One call per fixed tick:
//! 1. Walk back-to-front: purge entries whose owner is gone, advance blends, drop entries
//!    that finished blending out, settle entries that finished blending in.
//! 2. Find the active span: descend from the top and stop at the first entry that is fully
//!    engaged (`blend * strength == 1`). If none is, the span reaches the bottom entry.
//! 3. Flag entries inside the span active, entries below it inactive.
//! 4. Composite the span bottom-up from the neutral value, blending toward each target by
//!    `strength * ease_in_out_quadratic(blend)`.

use std::{cell::RefCell, rc::Rc};

use crate::{
    constants::BLEND_DURATION_EPS,
    constraint::{Constraint, SharedConstraint, TickContext, same_source},
    easing::ease_in_out_quadratic,
    math::Blendable,
};

struct ConstraintEntry<V> {
    source: SharedConstraint<V>,
    priority: i32,
    blend: f32,
    blend_rate: f32,
    active: bool,
}

/// Read-only snapshot of one stack entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntryView {
    pub priority: i32,
    pub blend: f32,
    pub blend_rate: f32,
    /// Inside the active span after the last aggregation.
    pub active: bool,
}

impl<V> ConstraintEntry<V> {
    fn view(&self) -> EntryView {
        EntryView {
            priority: self.priority,
            blend: self.blend,
            blend_rate: self.blend_rate,
            active: self.active,
        }
    }
}

pub struct ConstraintStack<V> {
    entries: Vec<ConstraintEntry<V>>,
    full_strength_epsilon: f32,
}

impl<V> Default for ConstraintStack<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            full_strength_epsilon: 0.0,
        }
    }
}

impl<V> std::fmt::Debug for ConstraintStack<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(ConstraintEntry::view))
            .finish()
    }
}

impl<V: Blendable> ConstraintStack<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `epsilon = 0.0` keeps the exact `blend * strength == 1.0` test.
    pub fn with_full_strength_epsilon(epsilon: f32) -> Self {
        Self {
            entries: Vec::new(),
            full_strength_epsilon: epsilon,
        }
    }

    /// Registers `source` at `priority`, blending it in over `blend_duration` seconds.
    ///
    /// Durations at or below [`BLEND_DURATION_EPS`] apply instantly. Registering a source
    /// that is already present logs a warning and adds a second entry; `remove` then takes
    /// the higher of the two first.
    pub fn add(&mut self, source: SharedConstraint<V>, priority: i32, blend_duration: f32) {
        if self.contains(&source) {
            log::warn!(
                "constraint source registered twice (priority {priority}); keeping both entries"
            );
        }

        let (blend, blend_rate) = if blend_duration > BLEND_DURATION_EPS {
            (0.0, 1.0 / blend_duration)
        } else {
            (1.0, 0.0)
        };

        self.entries.push(ConstraintEntry {
            source,
            priority,
            blend,
            blend_rate,
            active: false,
        });

        // Stable: equal priorities keep insertion order.
        self.entries.sort_by_key(|entry| entry.priority);
        log::debug!("constraint added at priority {priority} (blend {blend_duration}s)");
    }

    /// Starts blending `source` out over `blend_duration` seconds, or drops it immediately
    /// for instant durations.
    ///
    /// Blend-out starts from the entry's current blend, so interrupting a blend-in reverses
    /// it without a snap. Only the last (highest) matching entry is affected. Returns `false`
    /// if the source is not registered.
    pub fn remove<S>(&mut self, source: &Rc<RefCell<S>>, blend_duration: f32) -> bool
    where
        S: Constraint<V> + ?Sized,
    {
        let Some(index) = self
            .entries
            .iter()
            .rposition(|entry| same_source(&entry.source, source))
        else {
            return false;
        };

        if blend_duration > BLEND_DURATION_EPS {
            self.entries[index].blend_rate = -1.0 / blend_duration;
        } else {
            self.entries.remove(index);
        }
        log::debug!("constraint removed (blend {blend_duration}s)");
        true
    }

    /// Runs one aggregation pass and returns the composited target.
    ///
    /// An empty stack (including one emptied by this pass) yields `V::neutral()`.
    pub fn aggregate(&mut self, ctx: &TickContext) -> V {
        self.advance(ctx.dt);

        if self.entries.is_empty() {
            return V::neutral();
        }

        let span_start = self.active_span_start();
        for (index, entry) in self.entries.iter_mut().enumerate() {
            let active = index >= span_start;
            entry.active = active;
            entry.source.borrow_mut().set_active(active);
        }

        let mut value = V::neutral();
        for entry in &self.entries[span_start..] {
            let mut source = entry.source.borrow_mut();
            let target = source.target(ctx);
            let weight = source.strength() * ease_in_out_quadratic(entry.blend);
            value = value.blend(&target, weight);
        }
        value
    }

    /// Back-to-front so removals never shift an entry we have yet to visit.
    fn advance(&mut self, dt: f32) {
        for index in (0..self.entries.len()).rev() {
            if !self.entries[index].source.borrow().owner().is_alive() {
                log::debug!(
                    "purging constraint at priority {}: owner destroyed",
                    self.entries[index].priority
                );
                self.entries.remove(index);
                continue;
            }

            let entry = &mut self.entries[index];
            if entry.blend_rate == 0.0 {
                continue;
            }

            entry.blend += entry.blend_rate * dt;
            let blended_out = entry.blend_rate < 0.0 && entry.blend <= 0.0;
            if !blended_out && entry.blend > 1.0 {
                entry.blend = 1.0;
                entry.blend_rate = 0.0;
            }

            if blended_out {
                self.entries.remove(index);
            }
        }
    }

    /// Index of the lowest entry in the active span. Requires a non-empty stack.
    fn active_span_start(&self) -> usize {
        let mut index = self.entries.len() - 1;
        while index > 0 {
            let entry = &self.entries[index];
            let engaged = entry.blend * entry.source.borrow().strength();
            if self.is_full_strength(engaged) {
                break;
            }
            index -= 1;
        }
        index
    }

    #[allow(clippy::float_cmp)]
    #[inline]
    fn is_full_strength(&self, engaged: f32) -> bool {
        if self.full_strength_epsilon == 0.0 {
            engaged == 1.0
        } else {
            (engaged - 1.0).abs() <= self.full_strength_epsilon
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<S>(&self, source: &Rc<RefCell<S>>) -> bool
    where
        S: Constraint<V> + ?Sized,
    {
        self.entries
            .iter()
            .any(|entry| same_source(&entry.source, source))
    }

    /// Entries in ascending priority order.
    pub fn entries(&self) -> impl Iterator<Item = EntryView> + '_ {
        self.entries.iter().map(ConstraintEntry::view)
    }

    /// View of the last (highest) entry registered for `source`.
    pub fn entry<S>(&self, source: &Rc<RefCell<S>>) -> Option<EntryView>
    where
        S: Constraint<V> + ?Sized,
    {
        self.entries
            .iter()
            .rev()
            .find(|entry| same_source(&entry.source, source))
            .map(ConstraintEntry::view)
    }

    /// Is any entry still blending in or out?
    pub fn is_blending(&self) -> bool {
        self.entries.iter().any(|entry| entry.blend_rate != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::{Quat, ReferenceFrame, Vec3},
        owner::Owner,
        sources::FixedConstraint,
    };

    type Src<V> = Rc<RefCell<FixedConstraint<V>>>;

    fn src(owner: &Owner, value: Vec3) -> Src<Vec3> {
        Rc::new(RefCell::new(FixedConstraint::new(value, owner.handle())))
    }

    fn x(v: f32) -> Vec3 {
        Vec3::new(v, 0.0, 0.0)
    }

    fn tick(stack: &mut ConstraintStack<Vec3>, dt: f32) -> Vec3 {
        let frame = ReferenceFrame::identity();
        stack.aggregate(&TickContext {
            frame: &frame,
            dt,
            fixed_timestep: dt,
        })
    }

    fn assert_near(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).norm() < 1.0e-4,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn priorities(stack: &ConstraintStack<Vec3>) -> Vec<i32> {
        stack.entries().map(|e| e.priority).collect()
    }

    #[test]
    fn entries_stay_sorted_with_stable_ties() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let a = src(&owner, x(1.0));
        let b = src(&owner, x(2.0));
        let c = src(&owner, x(3.0));
        let d = src(&owner, x(4.0));

        stack.add(a.clone(), 5, 0.0);
        stack.add(b.clone(), -3, 0.0);
        stack.add(c.clone(), 10, 0.0);
        stack.add(d.clone(), 5, 0.0);

        assert_eq!(priorities(&stack), vec![-3, 5, 5, 10]);

        // Removing c exposes the tie; d (added after a) must be on top.
        stack.remove(&c, 0.0);
        assert_eq!(tick(&mut stack, 0.02), x(4.0));
    }

    #[test]
    fn instant_add_starts_fully_blended() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let a = src(&owner, x(1.0));
        stack.add(a.clone(), 0, 0.0);

        let view = stack.entry(&a).unwrap();
        assert_eq!(view.blend, 1.0);
        assert_eq!(view.blend_rate, 0.0);
    }

    #[test]
    fn timed_add_starts_at_zero_with_inverse_rate() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let a = src(&owner, x(1.0));
        stack.add(a.clone(), 0, 0.25);

        let view = stack.entry(&a).unwrap();
        assert_eq!(view.blend, 0.0);
        assert_eq!(view.blend_rate, 4.0);
    }

    #[test]
    fn durations_under_a_millisecond_are_instant() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let a = src(&owner, x(1.0));
        stack.add(a.clone(), 0, 0.0005);
        assert_eq!(stack.entry(&a).unwrap().blend, 1.0);

        stack.remove(&a, 0.0009);
        assert!(stack.is_empty());
    }

    #[test]
    fn removing_mid_blend_in_reverses_from_current_blend() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let base = src(&owner, x(0.0));
        let a = src(&owner, x(10.0));
        stack.add(base, 0, 0.0);
        stack.add(a.clone(), 10, 1.0);

        tick(&mut stack, 0.25);
        tick(&mut stack, 0.125);
        assert!((stack.entry(&a).unwrap().blend - 0.375).abs() < 1.0e-6);

        assert!(stack.remove(&a, 0.5));
        let view = stack.entry(&a).unwrap();
        assert!((view.blend - 0.375).abs() < 1.0e-6);
        assert_eq!(view.blend_rate, -2.0);

        tick(&mut stack, 0.125);
        assert!((stack.entry(&a).unwrap().blend - 0.125).abs() < 1.0e-6);

        tick(&mut stack, 0.125);
        assert!(!stack.contains(&a));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn blend_stays_within_unit_range() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let base = src(&owner, x(0.0));
        let a = src(&owner, x(1.0));
        let b = src(&owner, x(2.0));
        stack.add(base, 0, 0.0);
        stack.add(a.clone(), 1, 0.3);
        stack.add(b.clone(), 2, 0.7);

        for step in 0..200 {
            if step == 20 {
                stack.remove(&a, 0.45);
            }
            if step == 35 {
                stack.remove(&b, 0.1);
            }
            tick(&mut stack, 0.016);
            for view in stack.entries() {
                assert!(
                    (0.0..=1.0).contains(&view.blend),
                    "blend {} out of range at step {step}",
                    view.blend
                );
            }
        }
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn entries_with_dead_owners_are_purged_next_pass() {
        let keeper = Owner::new();
        let doomed = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let base = src(&keeper, x(0.0));
        let settled = src(&doomed, x(1.0));
        let blending_in = src(&doomed, x(2.0));
        let blending_out = src(&doomed, x(3.0));

        stack.add(base, 0, 0.0);
        stack.add(settled.clone(), 1, 0.0);
        stack.add(blending_in.clone(), 2, 1.0);
        stack.add(blending_out.clone(), 3, 0.0);
        stack.remove(&blending_out, 1.0);
        assert_eq!(stack.len(), 4);

        doomed.destroy();
        let out = tick(&mut stack, 0.02);

        assert_eq!(stack.len(), 1);
        assert!(!stack.contains(&settled));
        assert!(!stack.contains(&blending_in));
        assert!(!stack.contains(&blending_out));
        assert_eq!(out, x(0.0));
    }

    #[test]
    fn full_strength_top_entry_masks_everything_below() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let low = src(&owner, Vec3::new(-7.0, 3.0, 99.0));
        let mid = src(&owner, Vec3::new(123.0, -4.0, 0.5));
        let top = src(&owner, Vec3::new(1.5, 2.5, -3.5));
        stack.add(low.clone(), 0, 0.0);
        stack.add(mid.clone(), 1, 0.0);
        stack.add(top.clone(), 2, 0.0);

        let out = tick(&mut stack, 0.02);
        assert_eq!(out, Vec3::new(1.5, 2.5, -3.5));

        // Occluded sources are not asked for a target.
        assert_eq!(low.borrow().evaluations(), 0);
        assert_eq!(mid.borrow().evaluations(), 0);
        assert_eq!(top.borrow().evaluations(), 1);
    }

    #[test]
    fn activation_flags_follow_the_active_span() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let low = src(&owner, x(0.0));
        let mid = src(&owner, x(1.0));
        let top = src(&owner, x(2.0));
        stack.add(low.clone(), 0, 0.0);
        stack.add(mid.clone(), 1, 0.0);
        stack.add(top.clone(), 2, 0.5);

        // Top is still blending in, so the span ends at `mid`.
        tick(&mut stack, 0.1);
        let flags: Vec<bool> = stack.entries().map(|e| e.active).collect();
        assert_eq!(flags, vec![false, true, true]);
        assert!(!low.borrow().is_active());
        assert!(mid.borrow().is_active());
        assert!(top.borrow().is_active());

        // Once top is fully in, it is the whole span.
        for _ in 0..6 {
            tick(&mut stack, 0.1);
        }
        let flags: Vec<bool> = stack.entries().map(|e| e.active).collect();
        assert_eq!(flags, vec![false, false, true]);
        assert!(!mid.borrow().is_active());
    }

    #[test]
    fn partial_strength_never_masks_lower_entries() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let base = src(&owner, x(0.0));
        let half = Rc::new(RefCell::new(
            FixedConstraint::new(x(10.0), owner.handle()).with_strength(0.5),
        ));
        stack.add(base.clone(), 0, 0.0);
        stack.add(half.clone(), 1, 0.0);

        assert_near(tick(&mut stack, 0.02), x(5.0));
        assert!(base.borrow().is_active());
    }

    #[test]
    fn bottom_entry_is_always_in_the_span() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let only = Rc::new(RefCell::new(
            FixedConstraint::new(x(8.0), owner.handle()).with_strength(0.25),
        ));
        stack.add(only.clone(), 0, 0.0);

        assert_near(tick(&mut stack, 0.02), x(2.0));
        assert!(only.borrow().is_active());
    }

    #[test]
    fn exact_test_misses_near_full_strength_but_epsilon_catches_it() {
        let owner = Owner::new();
        let build = |epsilon: f32| {
            let mut stack = ConstraintStack::<Vec3>::with_full_strength_epsilon(epsilon);
            let base = src(&owner, x(0.0));
            let top = Rc::new(RefCell::new(
                FixedConstraint::new(x(10.0), owner.handle()).with_strength(0.99999),
            ));
            stack.add(base.clone(), 0, 0.0);
            stack.add(top, 1, 0.0);
            (stack, base)
        };

        let (mut exact, base) = build(0.0);
        tick(&mut exact, 0.02);
        assert!(base.borrow().is_active());

        let (mut tolerant, base) = build(1.0e-3);
        tick(&mut tolerant, 0.02);
        assert!(!base.borrow().is_active());
    }

    #[test]
    fn empty_stack_aggregates_to_neutral() {
        let mut stack = ConstraintStack::<Vec3>::new();
        assert_eq!(tick(&mut stack, 0.02), Vec3::zeros());
    }

    #[test]
    fn removing_unknown_source_is_a_no_op() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let a = src(&owner, x(1.0));
        let stranger = src(&owner, x(2.0));
        stack.add(a, 0, 0.0);

        assert!(!stack.remove(&stranger, 0.5));
        assert!(!stack.remove(&stranger, 0.0));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn duplicate_registration_keeps_both_and_remove_takes_the_last() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let a = src(&owner, x(1.0));
        stack.add(a.clone(), 1, 0.0);
        stack.add(a.clone(), 7, 0.0);
        assert_eq!(priorities(&stack), vec![1, 7]);

        stack.remove(&a, 0.0);
        assert_eq!(priorities(&stack), vec![1]);
    }

    #[test]
    fn blend_in_settles_one_tick_after_reaching_one() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let a = src(&owner, x(1.0));
        stack.add(a.clone(), 0, 0.5);

        tick(&mut stack, 0.25);
        tick(&mut stack, 0.25);
        let view = stack.entry(&a).unwrap();
        assert_eq!(view.blend, 1.0);
        assert!(stack.is_blending());

        tick(&mut stack, 0.25);
        let view = stack.entry(&a).unwrap();
        assert_eq!(view.blend, 1.0);
        assert_eq!(view.blend_rate, 0.0);
        assert!(!stack.is_blending());
    }

    #[test]
    fn scenario_blend_in_then_out() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let base = src(&owner, x(0.0));
        let b = src(&owner, x(10.0));
        stack.add(base.clone(), 0, 0.0);
        stack.add(b.clone(), 10, 1.0);

        assert_near(tick(&mut stack, 0.0), x(0.0));
        assert_near(tick(&mut stack, 0.5), x(5.0));
        assert_eq!(tick(&mut stack, 0.5), x(10.0));
        assert!(b.borrow().is_active());
        assert!(!base.borrow().is_active());

        stack.remove(&b, 0.5);
        assert_near(tick(&mut stack, 0.25), x(5.0));
        assert!(base.borrow().is_active());

        assert_eq!(tick(&mut stack, 0.25), x(0.0));
        assert!(!stack.contains(&b));
    }

    #[test]
    fn scenario_equal_priorities_last_added_wins() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Vec3>::new();
        let first = src(&owner, x(1.0));
        let second = src(&owner, x(2.0));
        stack.add(first.clone(), 5, 0.0);
        stack.add(second.clone(), 5, 0.0);

        assert_eq!(tick(&mut stack, 0.02), x(2.0));
        assert!(!first.borrow().is_active());
        assert!(second.borrow().is_active());
    }

    #[test]
    fn rotation_stack_blends_spherically() {
        let owner = Owner::new();
        let mut stack = ConstraintStack::<Quat>::new();
        let base = Rc::new(RefCell::new(FixedConstraint::new(
            Quat::identity(),
            owner.handle(),
        )));
        let turn = Rc::new(RefCell::new(FixedConstraint::new(
            Quat::from_axis_angle(&Vec3::y_axis(), 1.0),
            owner.handle(),
        )));
        stack.add(base, 0, 0.0);
        stack.add(turn, 1, 1.0);

        let frame = ReferenceFrame::identity();
        let ctx = TickContext {
            frame: &frame,
            dt: 0.5,
            fixed_timestep: 0.5,
        };
        let out = stack.aggregate(&ctx);
        assert!((out.angle() - 0.5).abs() < 1.0e-4);
    }
}
