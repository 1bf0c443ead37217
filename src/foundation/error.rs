/// Convenience result type used across rastertex.
pub type RasterResult<T> = Result<T, RasterError>;

/// Error taxonomy for buffer access, region edits and codec boundaries.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    /// A coordinate fell outside the raster under the `error` overflow policy.
    #[error("({x}, {y}) is out of bounds on {width}x{height} texture")]
    OutOfBounds {
        /// Requested x coordinate.
        x: i64,
        /// Requested y coordinate.
        y: i64,
        /// Raster width.
        width: u32,
        /// Raster height.
        height: u32,
    },

    /// A two-buffer operation was given buffers of different sizes.
    #[error(
        "expected textures to have equal dimensions, but the target is {this_w}x{this_h} and the provided texture is {other_w}x{other_h}"
    )]
    DimensionMismatch {
        /// Target width.
        this_w: u32,
        /// Target height.
        this_h: u32,
        /// Operand width.
        other_w: u32,
        /// Operand height.
        other_h: u32,
    },

    /// An overflow mode name is not in the registry.
    #[error("unknown overflow mode '{name}' (known: {})", quote_list(.known))]
    UnknownPolicy {
        /// Name that was requested.
        name: String,
        /// Every name the registry accepts.
        known: Vec<&'static str>,
    },

    /// A per-pixel step of a region operation failed; the buffer was rolled back.
    #[error("{}", region_failure_message(.x, .y, .mapped_x, .mapped_y, .cause))]
    RegionOperationFailed {
        /// Virtual x coordinate being processed.
        x: i64,
        /// Virtual y coordinate being processed.
        y: i64,
        /// Resolved x coordinate.
        mapped_x: u32,
        /// Resolved y coordinate.
        mapped_y: u32,
        /// Underlying failure.
        #[source]
        cause: Box<RasterError>,
    },

    /// One step of an edit plan failed; earlier steps remain applied.
    #[error("step {index} ({kind}): {cause}")]
    PlanStepFailed {
        /// Zero-based step index.
        index: usize,
        /// Step kind, as spelled in the plan's `op` field.
        kind: &'static str,
        /// Underlying failure.
        #[source]
        cause: Box<RasterError>,
    },

    /// Invalid caller-provided data (dimensions, colors, plans).
    #[error("validation error: {0}")]
    Validation(String),

    /// Input exceeded the configured [`BufferLimits`](crate::BufferLimits).
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Encoding or decoding of image bytes failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RasterError {
    /// Build a [`RasterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RasterError::LimitExceeded`] value.
    pub fn limit(msg: impl Into<String>) -> Self {
        Self::LimitExceeded(msg.into())
    }

    /// Build a [`RasterError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`RasterError::Other`] from any displayable failure, e.g. a host transform error.
    pub fn other(msg: impl std::fmt::Display) -> Self {
        Self::Other(anyhow::anyhow!("{msg}"))
    }

    pub(crate) fn region_failed(
        x: i64,
        y: i64,
        mapped_x: u32,
        mapped_y: u32,
        cause: RasterError,
    ) -> Self {
        Self::RegionOperationFailed {
            x,
            y,
            mapped_x,
            mapped_y,
            cause: Box::new(cause),
        }
    }

    /// The error a plan step or region operation wrapped, or `self` when nothing was wrapped.
    pub fn root_cause(&self) -> &RasterError {
        match self {
            Self::PlanStepFailed { cause, .. } | Self::RegionOperationFailed { cause, .. } => {
                cause.root_cause()
            }
            other => other,
        }
    }
}

fn quote_list(names: &[&'static str]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn region_failure_message(x: &i64, y: &i64, mx: &u32, my: &u32, cause: &RasterError) -> String {
    if *x == i64::from(*mx) && *y == i64::from(*my) {
        format!("while applying pixel at ({mx}, {my}): {cause}")
    } else {
        format!("while applying pixel at actual({mx}, {my}) / virtual({x}, {y}): {cause}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
