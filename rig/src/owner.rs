//! Liveness tokens for constraint owners.
//!
//! An [`Owner`] is held by whatever object is responsible for a constraint's lifetime
//! (a weapon, a cutscene trigger, the rig itself). Sources hand out [`OwnerRef`]s, the weak
//! half of the token. Once the `Owner` is dropped or destroyed every `OwnerRef` reports dead
//! and the constraint stack purges the entry on its next pass.
//!
//! # Invariants
//! - An `OwnerRef` never keeps its owner alive.
//! - Liveness is one-way: a dead `OwnerRef` never comes back.

use std::rc::{Rc, Weak};

/// Strong liveness token. Dropping it invalidates all [`OwnerRef`]s made from it.
#[derive(Debug, Default)]
pub struct Owner {
    token: Rc<()>,
}

impl Owner {
    pub fn new() -> Self {
        Self::default()
    }

    /// A weak handle that reports whether this owner still exists.
    pub fn handle(&self) -> OwnerRef {
        OwnerRef {
            token: Rc::downgrade(&self.token),
        }
    }

    /// Explicit teardown. Equivalent to dropping the owner.
    pub fn destroy(self) {}
}

/// Weak liveness handle. Cheap to clone.
#[derive(Clone, Debug)]
pub struct OwnerRef {
    token: Weak<()>,
}

impl OwnerRef {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.token.strong_count() > 0
    }
}
