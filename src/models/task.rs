//! Outbound task record handed to the task sink.

/// A fully formatted task ready for submission.
///
/// Target-system routing (workspace, assignee, project) is fixed
/// configuration owned by the sink gateway, not per-task state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Bounded single-line title.
    pub title: String,
    /// HTML notes fragment.
    pub notes: String,
}

impl TaskDraft {
    /// Construct a draft from a formatted title and notes pair.
    #[must_use]
    pub fn new(title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: notes.into(),
        }
    }
}
