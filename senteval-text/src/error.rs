use thiserror::Error;

/// Errors raised while preparing text resources.
///
/// Normalization itself never fails; everything here surfaces at load time.
#[derive(Debug, Error)]
pub enum TextError {
    #[error("stop word resource `{resource}` is unavailable: {reason}")]
    ResourceUnavailable { resource: String, reason: String },
}

impl TextError {
    pub(crate) fn unavailable(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = TextError> = std::result::Result<T, E>;
