//! Easing curves mapping a blend fraction in `[0, 1]` to an eased fraction in `[0, 1]`.
//!
//! Every curve clamps its input, so callers can feed raw blend values without
//! pre-clamping. All curves satisfy `f(0) = 0` and `f(1) = 1`.

use num_traits::Float;
use serde::{Deserialize, Serialize};

#[inline]
fn clamp01<T: Float>(t: T) -> T {
    t.max(T::zero()).min(T::one())
}

#[inline]
fn two<T: Float>() -> T {
    T::one() + T::one()
}

#[inline]
fn half<T: Float>() -> T {
    T::one() / two()
}

#[inline]
pub fn linear<T: Float>(t: T) -> T {
    clamp01(t)
}

/// Quadratic ease-in-out. This is the curve used to weight constraint blends.
///
/// Symmetric about `t = 0.5`: `f(1 - t) = 1 - f(t)` and `f(0.5) = 0.5`.
#[inline]
pub fn ease_in_out_quadratic<T: Float>(t: T) -> T {
    let t = clamp01(t);
    if t < half() {
        two::<T>() * t * t
    } else {
        let four = two::<T>() + two::<T>();
        -T::one() + (four - two::<T>() * t) * t
    }
}

#[inline]
pub fn ease_in_cubic<T: Float>(t: T) -> T {
    let t = clamp01(t);
    t * t * t
}

#[inline]
pub fn ease_out_cubic<T: Float>(t: T) -> T {
    let u = clamp01(t) - T::one();
    u * u * u + T::one()
}

#[inline]
pub fn ease_in_out_cubic<T: Float>(t: T) -> T {
    let t = clamp01(t);
    let four = two::<T>() + two::<T>();
    if t < half() {
        four * t * t * t
    } else {
        let u = two::<T>() * t - two::<T>();
        half::<T>() * u * u * u + T::one()
    }
}

/// Shape of the weapon's rotation hand-off when raising or lowering an aim pose.
///
/// Constraint blends are always quadratic; pose transitions pick one of these.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    pub fn apply<T: Float>(self, t: T) -> T {
        match self {
            Easing::Linear => linear(t),
            Easing::EaseIn => ease_in_cubic(t),
            Easing::EaseOut => ease_out_cubic(t),
            Easing::EaseInOut => ease_in_out_cubic(t),
        }
    }
}
