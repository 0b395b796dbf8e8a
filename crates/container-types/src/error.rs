/// Errors raised while validating parameters or assembling planar geometry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("corner radius {radius} must be less than half of the smaller side ({limit})")]
    CornerRadiusTooLarge { radius: f64, limit: f64 },

    #[error("curve loop is open: segment {index} ends {gap} away from the next segment")]
    OpenLoop { index: usize, gap: f64 },

    #[error("curve loop needs at least {required} segments, got {provided}")]
    TooFewSegments { required: usize, provided: usize },
}

impl GeometryError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
