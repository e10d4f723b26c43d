//! Dashboard view model.
//!
//! Derives the three status columns from one flat task list by exact match
//! on the status field. Display-only: mutations go straight to the API and
//! the flat list is re-fetched afterward, so the board never outlives a
//! fetch.

use tracing::warn;

use crate::api::{Task, TaskStatus};

const COLUMN_WIDTH: usize = 34;
const SHORT_ID_LEN: usize = 8;

/// The three disjoint status columns of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub pending: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub completed: Vec<Task>,
}

impl Board {
    /// Partition a fetched list into columns, preserving fetch order.
    ///
    /// Tasks whose status is outside the three recognized values are placed
    /// in no column. They stay invisible, as the original client left them;
    /// the warn log is the only diagnostic.
    pub fn partition(tasks: Vec<Task>) -> Self {
        let mut board = Board::default();
        for task in tasks {
            match task.status {
                TaskStatus::Pending => board.pending.push(task),
                TaskStatus::InProgress => board.in_progress.push(task),
                TaskStatus::Completed => board.completed.push(task),
                TaskStatus::Other(ref status) => {
                    warn!(id = %task.id, status = %status, "task has unrecognized status — not shown");
                }
            }
        }
        board
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.in_progress.is_empty() && self.completed.is_empty()
    }

    /// Render the board as three text columns, headed with the original
    /// client's column titles.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No tasks yet — add one with `taskdeck add <title>`.\n".to_string();
        }

        let mut out = String::new();
        out.push_str(&row(&pad("To-Do"), &pad("In-Progress"), "Done"));
        out.push_str(&row(
            &pad(&"─".repeat(5)),
            &pad(&"─".repeat(11)),
            &"─".repeat(4),
        ));

        let rows = self
            .pending
            .len()
            .max(self.in_progress.len())
            .max(self.completed.len());
        for i in 0..rows {
            let left = self.pending.get(i).map(|t| cell(t, "")).unwrap_or_default();
            let mid = self
                .in_progress
                .get(i)
                .map(|t| cell(t, ""))
                .unwrap_or_default();
            let right = self
                .completed
                .get(i)
                .map(|t| cell(t, "✓ "))
                .unwrap_or_default();
            out.push_str(&row(&pad(&left), &pad(&mid), &right));
        }
        out
    }
}

fn row(left: &str, mid: &str, right: &str) -> String {
    format!("{left}{mid}{}\n", right.trim_end())
}

/// Pad a cell to the fixed column width. Overlong cells are truncated with
/// a trailing ellipsis so a cut-off title is distinguishable from a short
/// one.
fn pad(s: &str) -> String {
    let max = COLUMN_WIDTH - 2;
    let cell = if s.chars().count() > max {
        let mut truncated: String = s.chars().take(max - 1).collect();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    };
    format!("{:<width$}", cell, width = COLUMN_WIDTH)
}

fn cell(task: &Task, marker: &str) -> String {
    let short_id: String = task.id.chars().take(SHORT_ID_LEN).collect();
    format!("{marker}[{short_id}] {}", task.title)
}
