use std::{cell::Cell, rc::Rc};

use crate::math::{Iso, Quat, Vec3};

/// A world-space pose shared between the host and constraint sources.
///
/// The host writes it (head bone, cutscene marker, weapon root); sources read it when
/// computing targets. Clones share the same pose.
#[derive(Clone, Debug)]
pub struct Anchor {
    pose: Rc<Cell<Iso>>,
}

impl Anchor {
    pub fn new(pose: Iso) -> Self {
        Self {
            pose: Rc::new(Cell::new(pose)),
        }
    }

    pub fn at(translation: Vec3) -> Self {
        Self::new(Iso::from_parts(translation.into(), Quat::identity()))
    }

    #[inline]
    pub fn pose(&self) -> Iso {
        self.pose.get()
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.pose.get().translation.vector
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        self.pose.get().rotation
    }

    pub fn set(&self, pose: Iso) {
        self.pose.set(pose);
    }

    pub fn set_translation(&self, translation: Vec3) {
        let mut pose = self.pose.get();
        pose.translation.vector = translation;
        self.pose.set(pose);
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::new(Iso::identity())
    }
}
