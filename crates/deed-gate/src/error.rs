use std::fmt;

/// Errors that can occur while running the gate itself.
///
/// A rejected proposal is not an error: it is reported through
/// [`crate::Decision::Rejected`]. These variants cover stages that cannot
/// reach a decision at all.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A stage returned an unexpected error.
    #[error("stage error in '{stage}': {message}")]
    StageError { stage: String, message: String },

    /// The pipeline has no stages, so nothing would be checked.
    #[error("gate pipeline has no stages")]
    EmptyPipeline,
}

impl GateError {
    /// Create a stage error with a name and message.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageError {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

impl PartialEq for GateError {
    fn eq(&self, other: &Self) -> bool {
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

impl Eq for GateError {}
