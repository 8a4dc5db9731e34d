//! Generation error types.

/// Errors reported by the island generator.
///
/// None of these are used for normal control flow: a progressive run that
/// pauses reports [`StepOutcome::Yielded`](crate::StepOutcome::Yielded), not an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// The configuration cannot produce a field (non-positive size, bad
    /// weights, scale outside `(0, 1]`, ...). Raised before anything is allocated.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An edge walk left the field without meeting a tile of the requested layer.
    #[error("edge walk from grid ({x}, {y}) found no tile of layer {min_layer} or higher")]
    OutOfBounds {
        /// Grid-space X where the walk started.
        x: i32,
        /// Grid-space Y where the walk started.
        y: i32,
        /// The layer threshold that was searched for.
        min_layer: usize,
    },

    /// An active run was requested but no tile sink was supplied.
    #[error("active generation requires a tile sink")]
    MissingSink,

    /// The generator was built without a noise source.
    #[error("no noise source supplied")]
    MissingNoiseSource,

    /// A field query was made before any run classified a field.
    #[error("no field has been generated yet")]
    FieldUnavailable,

    /// `resume` was called with no run in progress.
    #[error("no generation run in progress")]
    NoActiveRun,
}
