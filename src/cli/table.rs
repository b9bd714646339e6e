//! Table and summary rendering
//!
//! Pure formatting over the store's plain return values. Rows are
//! tinted by state: done green, canceled dimmed, pending high-priority
//! red. The `colored` crate drops the tints itself when stdout is not
//! a terminal or NO_COLOR is set.

use colored::{ColoredString, Colorize};

use crate::domain::Task;
use crate::storage::Stats;

const TITLE_WIDTH: usize = 30;

/// Renders numbered tasks as a fixed-width table
pub fn render_tasks(tasks: &[(usize, Task)]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<4} {:<width$} {:<8} {:<10} {:<12} {:<12} {:>4}\n",
        "#",
        "TITLE",
        "PRIORITY",
        "STATUS",
        "START",
        "END",
        "DUE",
        width = TITLE_WIDTH
    ));
    out.push_str(&"-".repeat(86));
    out.push('\n');

    for (id, task) in tasks {
        let end = task
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let due = match task.due_delta() {
            Ok(days) => format!("{days:+}"),
            Err(_) => "-".to_string(),
        };

        let line = format!(
            "{:<4} {:<width$} {:<8} {:<10} {:<12} {:<12} {:>4}",
            id,
            truncate(&task.title, TITLE_WIDTH),
            task.priority,
            status_label(task),
            task.start_date,
            end,
            due,
            width = TITLE_WIDTH
        );
        out.push_str(&tint(task, &line).to_string());
        out.push('\n');
    }

    out
}

/// Renders the stats block
pub fn render_stats(stats: &Stats) -> String {
    let mut out = String::new();

    out.push_str("Task Summary\n");
    out.push_str(&"=".repeat(40));
    out.push('\n');
    out.push_str(&format!("{}\n", format!("  Done:          {}", stats.done).green()));
    out.push_str(&format!(
        "{}\n",
        format!("  Canceled:      {}", stats.canceled).dimmed()
    ));
    out.push_str(&format!(
        "{}\n",
        format!("  High priority: {}", stats.high).red()
    ));
    out.push_str(&format!("  Low priority:  {}\n", stats.low));
    out.push_str(&format!(
        "{}\n",
        format!("  Pending:       {}", stats.pending).blue()
    ));
    out.push_str(&format!(
        "{}\n",
        format!("  Total:         {}", stats.total).cyan()
    ));

    out
}

// Canceled wins over done for display when both flags are set.
fn status_label(task: &Task) -> &'static str {
    if task.canceled {
        "canceled"
    } else if task.done {
        "done"
    } else {
        "pending"
    }
}

fn tint(task: &Task, line: &str) -> ColoredString {
    if task.canceled {
        line.dimmed()
    } else if task.done {
        line.green()
    } else if task.priority == crate::domain::Priority::High {
        line.red()
    } else {
        line.normal()
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max.saturating_sub(3)).collect();
    shortened.push_str("...");
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    fn plain() {
        colored::control::set_override(false);
    }

    fn sample(title: &str) -> Task {
        Task {
            title: title.to_string(),
            description: String::new(),
            start_date: "2024-01-01".parse().unwrap(),
            end_date: Some("2024-01-10".parse().unwrap()),
            done: false,
            priority: Priority::Low,
            canceled: false,
        }
    }

    #[test]
    fn table_shows_id_title_and_due() {
        plain();
        let rendered = render_tasks(&[(3, sample("Water the plants"))]);

        assert!(rendered.contains("Water the plants"));
        assert!(rendered.contains("3 "));
        assert!(rendered.contains("+9"));
        assert!(rendered.contains("pending"));
    }

    #[test]
    fn missing_end_date_shows_placeholder_due() {
        plain();
        let mut task = sample("No deadline");
        task.end_date = None;
        let rendered = render_tasks(&[(1, task)]);

        let row = rendered.lines().nth(2).unwrap();
        assert!(row.trim_end().ends_with('-'));
    }

    #[test]
    fn status_prefers_canceled_over_done() {
        let mut task = sample("x");
        task.done = true;
        task.canceled = true;
        assert_eq!(status_label(&task), "canceled");
    }

    #[test]
    fn long_titles_are_truncated() {
        plain();
        let rendered = render_tasks(&[(1, sample(&"x".repeat(60)))]);
        assert!(rendered.contains("..."));
        assert!(!rendered.contains(&"x".repeat(40)));
    }

    #[test]
    fn stats_block_lists_all_counts() {
        plain();
        let rendered = render_stats(&Stats {
            total: 5,
            done: 2,
            canceled: 1,
            high: 2,
            low: 3,
            pending: 2,
        });

        assert!(rendered.contains("Done:          2"));
        assert!(rendered.contains("Canceled:      1"));
        assert!(rendered.contains("High priority: 2"));
        assert!(rendered.contains("Low priority:  3"));
        assert!(rendered.contains("Pending:       2"));
        assert!(rendered.contains("Total:         5"));
    }
}
