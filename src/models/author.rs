//! Resolved author identity for a starred message.

use serde::Deserialize;

/// Display identity for a message author.
///
/// Resolved lazily per item; identities are not cached across cycles
/// because each item is processed once and display names rarely change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Author {
    /// Source user id.
    pub id: String,
    /// Display name used in task titles.
    pub name: String,
}
