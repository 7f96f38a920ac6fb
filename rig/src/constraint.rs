//! The capability contract every camera constraint source implements.

use std::{cell::RefCell, rc::Rc};

use crate::{
    math::ReferenceFrame,
    owner::OwnerRef,
};

/// Per-tick inputs handed to constraint sources.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    /// The rig's parent transform. Targets are expressed relative to it.
    pub frame: &'a ReferenceFrame,
    /// Seconds elapsed since the previous tick.
    pub dt: f32,
    /// Configured fixed tick length in seconds.
    pub fixed_timestep: f32,
}

/// A candidate camera target of type `V` (a position or a rotation).
///
/// A single object may implement both `Constraint<Vec3>` and `Constraint<Quat>`;
/// each impl then keeps its own active flag.
pub trait Constraint<V> {
    /// Target value in `ctx.frame` space. Called only while the entry is in the active span.
    fn target(&mut self, ctx: &TickContext) -> V;

    /// Maximum influence when fully blended in. Usually `1.0`.
    fn strength(&self) -> f32;

    /// Written by the stack after each aggregation. `false` means a higher-priority
    /// constraint fully occludes this one, so expensive per-frame work can be skipped.
    fn set_active(&mut self, active: bool);

    fn is_active(&self) -> bool;

    /// The owner responsible for this constraint's lifetime.
    fn owner(&self) -> &OwnerRef;
}

/// How stacks hold sources. Identity is the allocation address.
pub type SharedConstraint<V> = Rc<RefCell<dyn Constraint<V>>>;

/// Are both handles the same source object?
///
/// Compares data addresses only, so a concrete `Rc<RefCell<T>>` matches the
/// `SharedConstraint` it was coerced into.
#[inline]
pub fn same_source<A: ?Sized, B: ?Sized>(a: &Rc<RefCell<A>>, b: &Rc<RefCell<B>>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
