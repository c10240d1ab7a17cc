use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a task.
///
/// Declaration order doubles as display rank: `High` sorts first.
/// Tasks without a priority sort after all prioritized tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// A single entry in the scratchpad task list.
///
/// A task is valid when its text is non-empty after trimming whitespace.
/// Invalid tasks are dropped at every write boundary, not just at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Returns true when the text is non-empty after trimming.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Rank used by display-time sorting; absent priority sorts last.
    fn display_rank(&self) -> u8 {
        match self.priority {
            Some(Priority::High) => 0,
            Some(Priority::Medium) => 1,
            Some(Priority::Low) => 2,
            None => 3,
        }
    }
}

/// Drops invalid tasks, keeping insertion order of the rest.
pub fn retain_valid(tasks: Vec<Task>) -> Vec<Task> {
    tasks.into_iter().filter(Task::is_valid).collect()
}

/// Number of valid tasks not yet done.
pub fn pending_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.is_valid() && !t.done).count()
}

/// Badge value for the host indicator.
///
/// Returns `None` when nothing is pending - the badge is cleared,
/// never shown as "0".
pub fn badge_count(tasks: &[Task]) -> Option<usize> {
    match pending_count(tasks) {
        0 => None,
        n => Some(n),
    }
}

/// Read-only sorted view for display: priority order, insertion order
/// within the same priority. The stored list is never mutated.
pub fn sorted_for_display(tasks: &[Task]) -> Vec<Task> {
    let mut view = tasks.to_vec();
    view.sort_by_key(Task::display_rank);
    view
}
