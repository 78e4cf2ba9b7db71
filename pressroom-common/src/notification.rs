use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A one-shot message for the user, shown once by whoever renders the result it is attached to.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
}

impl Notification {
    #[must_use]
    pub fn new(level: NotificationLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, text)
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, text)
    }
}
