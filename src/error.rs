use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("invalid quiz configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl QuizError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        QuizError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
