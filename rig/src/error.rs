use thiserror::Error;

/// Setup-time failures. Nothing on the per-tick path returns an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RigError {
    /// The rig was built without a parent transform.
    #[error("camera rig requires a reference frame (parent transform)")]
    MissingReferenceFrame,

    #[error("reference frame contains non-finite values")]
    NonFiniteReferenceFrame,

    #[error("fixed timestep must be finite and positive, got {0}")]
    InvalidFixedTimestep(f32),

    #[error("position damping must be within [0, 1], got {0}")]
    InvalidDamping(f32),

    #[error("full-strength epsilon must be finite and within [0, 1), got {0}")]
    InvalidStrengthEpsilon(f32),
}
