/*!
Rig configuration.

All values are plain data so hosts can load them from any serde format. Distances are
in meters, time in seconds. `validate` is the only place configuration is checked;
the per-tick code assumes validated settings.
*/

use serde::{Deserialize, Serialize};

use crate::{
    RigError,
    constants::{
        DEFAULT_AIM_DURATION, DEFAULT_AIM_PRIORITY, DEFAULT_FIXED_TIMESTEP, DEFAULT_LOCK_BLEND,
        DEFAULT_LOCK_PRIORITY, DEFAULT_POSITION_DAMPING, MIN_AIM_PRIORITY,
    },
    easing::Easing,
};

/// Top-level rig settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigSettings {
    /// Duration of one fixed simulation tick. Render interpolation spans exactly this long.
    pub fixed_timestep: f32,
    /// Damping of the body-follow base constraint, `[0, 1]`.
    pub position_damping: f32,
    /// Tolerance for the "fully engaged" test that bounds the active span.
    ///
    /// `0.0` requires `blend * strength == 1.0` exactly.
    pub full_strength_epsilon: f32,
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            fixed_timestep: DEFAULT_FIXED_TIMESTEP,
            position_damping: DEFAULT_POSITION_DAMPING,
            full_strength_epsilon: 0.0,
        }
    }
}

impl RigSettings {
    pub fn validate(&self) -> Result<(), RigError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(RigError::InvalidFixedTimestep(self.fixed_timestep));
        }
        if !(0.0..=1.0).contains(&self.position_damping) {
            return Err(RigError::InvalidDamping(self.position_damping));
        }
        if !(0.0..1.0).contains(&self.full_strength_epsilon) {
            return Err(RigError::InvalidStrengthEpsilon(
                self.full_strength_epsilon,
            ));
        }
        Ok(())
    }
}

/// Settings for a world camera lock (cutscene / terminal view).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLockSettings {
    /// Time to blend the camera onto the lock target.
    pub blend_in: f32,
    /// Time to blend the camera back to the character.
    pub blend_out: f32,
    pub priority: i32,
}

impl Default for CameraLockSettings {
    fn default() -> Self {
        Self {
            blend_in: DEFAULT_LOCK_BLEND,
            blend_out: DEFAULT_LOCK_BLEND,
            priority: DEFAULT_LOCK_PRIORITY,
        }
    }
}

/// Settings for an aim-down-sights offset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimSettings {
    pub priority: i32,
    pub aim_up_duration: f32,
    pub aim_down_duration: f32,
    /// Easing of the weapon's rotation into and out of the aim pose.
    pub rotation_transition: Easing,
}

impl Default for AimSettings {
    fn default() -> Self {
        Self {
            priority: DEFAULT_AIM_PRIORITY,
            aim_up_duration: DEFAULT_AIM_DURATION,
            aim_down_duration: DEFAULT_AIM_DURATION,
            rotation_transition: Easing::default(),
        }
    }
}

impl AimSettings {
    /// Aim offsets must stay above the base constraint. Lower priorities are raised.
    pub fn sanitized(mut self) -> Self {
        if self.priority < MIN_AIM_PRIORITY {
            log::warn!(
                "aim priority {} is below the minimum, using {}",
                self.priority,
                MIN_AIM_PRIORITY
            );
            self.priority = MIN_AIM_PRIORITY;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(RigSettings::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_timestep() {
        for dt in [0.0, -0.02, f32::NAN, f32::INFINITY] {
            let settings = RigSettings {
                fixed_timestep: dt,
                ..RigSettings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(RigError::InvalidFixedTimestep(_))
            ));
        }
    }

    #[test]
    fn rejects_damping_out_of_range() {
        let settings = RigSettings {
            position_damping: 1.5,
            ..RigSettings::default()
        };
        assert_eq!(settings.validate(), Err(RigError::InvalidDamping(1.5)));
    }

    #[test]
    fn rejects_epsilon_out_of_range() {
        let settings = RigSettings {
            full_strength_epsilon: 1.0,
            ..RigSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(RigError::InvalidStrengthEpsilon(1.0))
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: RigSettings = serde_json::from_str(r#"{ "position_damping": 0.5 }"#).unwrap();
        assert_eq!(settings.position_damping, 0.5);
        assert_eq!(settings.fixed_timestep, DEFAULT_FIXED_TIMESTEP);
        assert_eq!(settings.full_strength_epsilon, 0.0);
    }

    #[test]
    fn lock_settings_deserialize() {
        let lock: CameraLockSettings =
            serde_json::from_str(r#"{ "blend_in": 1.0, "priority": 5 }"#).unwrap();
        assert_eq!(lock.blend_in, 1.0);
        assert_eq!(lock.blend_out, DEFAULT_LOCK_BLEND);
        assert_eq!(lock.priority, 5);
    }

    #[test]
    fn aim_priority_is_raised_to_minimum() {
        let aim = AimSettings {
            priority: -4,
            ..AimSettings::default()
        }
        .sanitized();
        assert_eq!(aim.priority, MIN_AIM_PRIORITY);

        let aim = AimSettings::default().sanitized();
        assert_eq!(aim.priority, DEFAULT_AIM_PRIORITY);
    }

    #[test]
    fn aim_transition_deserializes_by_name() {
        let aim: AimSettings =
            serde_json::from_str(r#"{ "rotation_transition": "Linear" }"#).unwrap();
        assert_eq!(aim.rotation_transition, Easing::Linear);
        assert_eq!(aim.priority, DEFAULT_AIM_PRIORITY);

        let aim: AimSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(aim.rotation_transition, Easing::EaseInOut);
    }
}
