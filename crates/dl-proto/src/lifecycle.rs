// lifecycle.rs — Canonical status strings and their classification.
//
// Events carry their status as free text so that producers can report
// whatever their subsystem calls a phase. The reducer only needs to know
// which broad stage a string means, so classification ignores case, spaces,
// underscores, and hyphens ("InProgress", "in_progress" and "In Progress"
// are the same stage).

use std::fmt;

pub const NOT_STARTED: &str = "Not Started";
pub const IN_PROGRESS: &str = "In Progress";
pub const COMPLETE: &str = "Complete";
pub const FAILED: &str = "Failed";
pub const SUCCEEDED: &str = "Succeeded";
pub const PENDING: &str = "Pending";
pub const STARTED: &str = "Started";
pub const TERMINATED: &str = "Terminated";
pub const CANCELED: &str = "Canceled";

/// The stage a status string describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    NotStarted,
    InProgress,
    Pending,
    Succeeded,
    Failed,
    Started,
    Terminated,
    Canceled,
    /// Anything the taxonomy doesn't recognise. Still stored verbatim.
    Other,
}

impl Lifecycle {
    pub fn classify(status: &str) -> Self {
        let normalized: String = status
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "notstarted" => Lifecycle::NotStarted,
            "inprogress" | "running" => Lifecycle::InProgress,
            "pending" => Lifecycle::Pending,
            "complete" | "completed" | "succeeded" | "success" => Lifecycle::Succeeded,
            "failed" | "failure" | "error" => Lifecycle::Failed,
            "started" => Lifecycle::Started,
            "terminated" | "stopped" => Lifecycle::Terminated,
            "canceled" | "cancelled" => Lifecycle::Canceled,
            _ => Lifecycle::Other,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::NotStarted => NOT_STARTED,
            Lifecycle::InProgress => IN_PROGRESS,
            Lifecycle::Pending => PENDING,
            Lifecycle::Succeeded => SUCCEEDED,
            Lifecycle::Failed => FAILED,
            Lifecycle::Started => STARTED,
            Lifecycle::Terminated => TERMINATED,
            Lifecycle::Canceled => CANCELED,
            Lifecycle::Other => "Other",
        };
        f.write_str(s)
    }
}
