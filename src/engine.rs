//! The per-cycle synchronization engine.
//!
//! One cycle walks every currently starred item through
//! list → filter → resolve → format → create → acknowledge. Items fail
//! independently: a poisoned item is logged and skipped, and never
//! blocks the rest of the list. Only a failure of the listing call
//! itself aborts a cycle.
//!
//! Task creation and star removal are two independent remote calls with
//! no shared transaction. When creation succeeds and removal fails, the
//! item is re-offered on the next cycle and a duplicate task is created:
//! delivery is **at-least-once**, not exactly-once.

use tracing::{debug, error, info};

use crate::formatter;
use crate::gateway::{StarSource, TaskSink};
use crate::models::item::{ItemKind, StarredItem};
use crate::models::task::TaskDraft;
use crate::{AppError, Result};

/// Outcome counters for one poll cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Items fully processed: task created and star removed.
    pub processed: usize,
    /// Non-message items skipped by the filter.
    pub skipped: usize,
    /// Items that failed at some stage and remain starred.
    pub failed: usize,
}

/// Drives one full pass over the starred-item feed.
pub struct SyncEngine<S, T> {
    source: S,
    sink: T,
    team_domain: String,
}

impl<S: StarSource, T: TaskSink> SyncEngine<S, T> {
    /// Build an engine over the given gateways.
    #[must_use]
    pub fn new(source: S, sink: T, team_domain: impl Into<String>) -> Self {
        Self {
            source,
            sink,
            team_domain: team_domain.into(),
        }
    }

    /// Run one poll cycle over all currently starred items.
    ///
    /// # Errors
    ///
    /// Returns an error only when the listing call itself fails. Per-item
    /// failures are logged and counted in the report instead.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let items = self.source.list_starred().await?;
        let mut report = CycleReport::default();

        for item in &items {
            if item.kind != ItemKind::Message {
                debug!("skipping non-message starred item");
                report.skipped += 1;
                continue;
            }

            match self.process_item(item).await {
                Ok(()) => report.processed += 1,
                Err(err) => {
                    report.failed += 1;
                    // Identity fields are what an operator needs to find
                    // and unstar the item by hand.
                    error!(
                        channel = item.channel.as_deref().unwrap_or(""),
                        ts = item.message.as_ref().map_or("", |m| m.ts.as_str()),
                        retryable = err.is_retryable(),
                        %err,
                        "starred item failed; star left in place"
                    );
                }
            }
        }

        Ok(report)
    }

    /// Walk one message item through resolve → format → create →
    /// acknowledge.
    async fn process_item(&self, item: &StarredItem) -> Result<()> {
        let channel = item
            .channel
            .as_deref()
            .ok_or_else(|| AppError::Format("starred message without a channel id".into()))?;
        let message = item
            .message
            .as_ref()
            .ok_or_else(|| AppError::Format("starred message without a payload".into()))?;

        let author = self.source.resolve_author(&message.user).await?;
        let context = self.source.resolve_context(channel).await?;

        let link = formatter::permalink(message, channel, &self.team_domain);
        let title = formatter::build_trimmed_title(message, &author);
        let notes = formatter::build_notes(message, &author, &context, &link);
        let task = TaskDraft::new(title, notes);

        self.sink.create_task(&task).await?;
        info!(title = %task.title, channel, ts = %message.ts, "task created");

        // Once the task exists the star must go, or the next cycle files
        // a duplicate.
        self.source.acknowledge(channel, &message.ts).await?;

        Ok(())
    }
}
