//! Conversation container model and its kind discriminant.

use crate::{AppError, Result};

/// The three recognized conversation kinds.
///
/// The wire response expresses the kind as independent boolean flags; a
/// single tagged enum keeps the formatting branches exhaustive and makes
/// an unknown combination unrepresentable past construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// One-to-one direct message.
    DirectMessage,
    /// Multi-party direct message.
    GroupDirectMessage,
    /// Public or group channel.
    Channel,
}

impl ContextKind {
    /// Build a kind from the wire response's mutually exclusive flags.
    ///
    /// Public and group channels collapse into [`ContextKind::Channel`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Format`] when no flag is set or more than one
    /// is set.
    #[allow(clippy::fn_params_excessive_bools)] // Mirrors the wire flag set.
    pub fn from_flags(is_im: bool, is_mpim: bool, is_channel: bool, is_group: bool) -> Result<Self> {
        match (is_im, is_mpim, is_channel || is_group) {
            (true, false, false) => Ok(Self::DirectMessage),
            (false, true, false) => Ok(Self::GroupDirectMessage),
            (false, false, true) => Ok(Self::Channel),
            _ => Err(AppError::Format(format!(
                "ambiguous conversation kind: im={is_im} mpim={is_mpim} \
                 channel={is_channel} group={is_group}"
            ))),
        }
    }
}

/// A conversation container, resolved per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Conversation id.
    pub id: String,
    /// Display name (empty for direct messages).
    pub name: String,
    /// Purpose text; mention-extraction source for group direct messages.
    pub purpose: String,
    /// Kind discriminant driving title and notes formatting.
    pub kind: ContextKind,
}
