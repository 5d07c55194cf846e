//! Progress status shared by blocks, phases and plans.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Progress of a block, phase or plan.
///
/// Blocks move `Pending → InProgress → Complete`, may drop to `Error` from
/// `InProgress`, and only return to `Pending` through a restart. `Waiting` is
/// never stored on a block; it is what a phase or plan reports when nothing has
/// been selected to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Waiting,
    Pending,
    InProgress,
    Complete,
    Error,
}

impl Status {
    /// Status of a parent from its children's statuses and whether one of
    /// the children is currently selected to run.
    ///
    /// The same rule applies to a phase over its blocks and to a plan over
    /// its phases:
    ///
    /// - Complete if every child is (or there are none)
    /// - else Error if any child failed, InProgress if any child is running
    /// - else Waiting if nothing is selected
    /// - else InProgress if some child already completed, Pending if none has
    pub fn progress(children: impl IntoIterator<Item = Status>, selected: bool) -> Status {
        let mut all_complete = true;
        let (mut any_complete, mut error, mut in_progress) = (false, false, false);
        for status in children {
            match status {
                Status::Complete => {
                    any_complete = true;
                    continue;
                }
                Status::Error => error = true,
                Status::InProgress => in_progress = true,
                Status::Pending | Status::Waiting => {}
            }
            all_complete = false;
        }

        if all_complete {
            Status::Complete
        } else if error {
            Status::Error
        } else if in_progress {
            Status::InProgress
        } else if !selected {
            Status::Waiting
        } else if any_complete {
            Status::InProgress
        } else {
            Status::Pending
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Status::Complete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Waiting => "waiting",
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Complete => "complete",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
