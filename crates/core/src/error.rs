use thiserror::Error;

/// Failures of a single question-generation attempt.
///
/// Every variant is terminal for the current load: the caller never receives
/// a partial batch alongside an error.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request did not complete with a usable completion. The message is
    /// the upstream `error` body when one was returned, generic otherwise.
    #[error("question service request failed: {message}")]
    Transport { message: String },

    /// The upstream responded, but its text did not contain a readable JSON
    /// array.
    #[error("could not read questions from the model output: {0}")]
    Parse(&'static str),

    /// The array parsed, but an element did not match the expected question
    /// shape. The whole batch is rejected, never a partial one.
    #[error("model returned a malformed question: {reason}")]
    Schema { reason: String },
}

impl GenerationError {
    pub(crate) fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }
}
