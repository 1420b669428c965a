//! Provider gateway abstractions.
//!
//! The sync engine reaches the outside world only through these two
//! traits, so the cycle logic can be exercised against in-memory fakes.
//! The concrete implementations are thin HTTP clients that map failures
//! onto the shared error taxonomy and never retry on their own.

use std::future::Future;
use std::pin::Pin;

use crate::models::author::Author;
use crate::models::context::Context;
use crate::models::item::StarredItem;
use crate::models::task::TaskDraft;
use crate::Result;

/// Read side of the sync: list starred items, resolve identities, clear
/// stars.
pub trait StarSource: Send + Sync {
    /// Fetch the current full set of starred items. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`](crate::AppError::Transport) on a
    /// network failure and [`AppError::Protocol`](crate::AppError::Protocol)
    /// when the provider answers with an application-level failure.
    fn list_starred(&self) -> Pin<Box<dyn Future<Output = Result<Vec<StarredItem>>> + Send + '_>>;

    /// Resolve a user id to a display identity.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StarSource::list_starred`].
    fn resolve_author(
        &self,
        user_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Author>> + Send + '_>>;

    /// Resolve a conversation id to its container, validating the kind
    /// flags into a [`ContextKind`](crate::models::context::ContextKind).
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StarSource::list_starred`], plus
    /// [`AppError::Format`](crate::AppError::Format) when the kind flags
    /// are absent or ambiguous.
    fn resolve_context(
        &self,
        channel_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Context>> + Send + '_>>;

    /// Clear the star for exactly the given `(channel, ts)` pair.
    ///
    /// Called at most once per item per cycle. A failure leaves the star
    /// untouched, so the item is re-offered on the next listing.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StarSource::list_starred`].
    fn acknowledge(
        &self,
        channel: &str,
        ts: &str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Write side of the sync: create one task per starred message.
pub trait TaskSink: Send + Sync {
    /// Submit a new task under the fixed target configuration.
    ///
    /// Implementations must not retry internally — retry policy belongs
    /// to the cycle loop so attempt counts stay observable in one place.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`](crate::AppError::Transport) on a
    /// network failure and [`AppError::Protocol`](crate::AppError::Protocol)
    /// when the provider rejects the task.
    fn create_task(
        &self,
        task: &TaskDraft,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
