use serde::{Deserialize, Serialize};
use crate::identity::AccountError;
use crate::{CoreError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// Message for the user, produced by every service call that changes
/// something or fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }
}

impl From<&CoreError> for Notice {
    fn from(err: &CoreError) -> Self {
        let level = match (err, err.kind()) {
            (CoreError::Account(AccountError::Locked(_) | AccountError::NotSignedIn), _) => NoticeLevel::Warning,
            (_, ErrorKind::MissingReference | ErrorKind::InvalidTransition) => NoticeLevel::Warning,
            (_, ErrorKind::InvalidInput | ErrorKind::Storage) => NoticeLevel::Danger,
        };
        Notice::new(level, err.to_string())
    }
}
