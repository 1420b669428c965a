//! Starred-item wire models returned by the source listing call.

use serde::Deserialize;

/// Kind discriminant for a starred item.
///
/// The source can star messages, files, file comments, and whole
/// channels. Only messages are processed; everything else collapses into
/// [`ItemKind::Other`] and is skipped by the cycle filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ItemKind {
    /// A starred message.
    Message,
    /// Any other starred entity.
    Other,
}

impl From<String> for ItemKind {
    fn from(value: String) -> Self {
        if value == "message" {
            Self::Message
        } else {
            Self::Other
        }
    }
}

/// One starred entry as returned by the listing call.
///
/// Read-only to this system: the only mutation ever applied is removing
/// the star, and only after the corresponding task has been created.
#[derive(Debug, Clone, Deserialize)]
pub struct StarredItem {
    /// Item kind; only message items are processed.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Conversation the item was starred in (absent for some non-message
    /// kinds).
    #[serde(default)]
    pub channel: Option<String>,
    /// The starred message payload (absent for non-message kinds).
    #[serde(default)]
    pub message: Option<Message>,
}

/// The starred message content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    /// Author user id.
    pub user: String,
    /// Raw message text.
    #[serde(default)]
    pub text: String,
    /// Source-local timestamp token, e.g. `"1690000000.000100"`.
    ///
    /// Doubles as the dedup key for star removal and as the permalink
    /// path segment (with its dots stripped).
    pub ts: String,
    /// Permalink supplied by the source, when present.
    #[serde(default)]
    pub permalink: Option<String>,
}
