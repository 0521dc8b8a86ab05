use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single task, as composed in the form and shown on a card.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

/// How urgent a task is. New drafts start at `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Stable identity of a task list entry. Assigned on creation and
/// never reused, unlike positions which shift on deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u32);

/// The free-text fields of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
}

/// Success messages shown as transient toasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Added,
    Updated,
    Deleted,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("no task at position {} (the list has {} tasks)", .index + 1, .len)]
    NoSuchTask { index: usize, len: usize },

    #[error("positions start at 1")]
    InvalidPosition,

    #[error("unknown priority '{0}', expected low, medium or high")]
    UnknownPriority(String),

    #[error("invalid due date '{0}', expected YYYY-MM-DD, today, tomorrow, +<duration> or none")]
    InvalidDueDate(String),
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Low
    }
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .iter()
            .copied()
            .find(|priority| priority.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TaskError::UnknownPriority(s.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Added => "Task added successfully!",
            Notice::Updated => "Task updated successfully!",
            Notice::Deleted => "Task deleted successfully!",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Task {
    pub fn new(title: &str, description: &str, due_date: Option<NaiveDate>, priority: Priority) -> Self {
        Task {
            title: title.to_string(),
            description: description.to_string(),
            due_date,
            priority,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
        }
    }

    pub fn fmt_due_date(&self) -> String {
        due_date_label(self.due_date)
    }
}

/// Format a date the long way, e.g. "April 5th, 2024".
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// The text shown for an optional due date.
pub fn due_date_label(due_date: Option<NaiveDate>) -> String {
    match due_date {
        Some(date) => long_date(date),
        None => "No due date".to_string(),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    // 11th, 12th and 13th break the pattern
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn long_date_uses_english_ordinals() {
        assert_eq!(long_date(date(2024, 4, 5)), "April 5th, 2024");
        assert_eq!(long_date(date(2024, 1, 1)), "January 1st, 2024");
        assert_eq!(long_date(date(2024, 2, 2)), "February 2nd, 2024");
        assert_eq!(long_date(date(2024, 3, 3)), "March 3rd, 2024");
        assert_eq!(long_date(date(2024, 3, 4)), "March 4th, 2024");
        assert_eq!(long_date(date(2024, 5, 11)), "May 11th, 2024");
        assert_eq!(long_date(date(2024, 5, 12)), "May 12th, 2024");
        assert_eq!(long_date(date(2024, 5, 13)), "May 13th, 2024");
        assert_eq!(long_date(date(2024, 5, 21)), "May 21st, 2024");
        assert_eq!(long_date(date(2024, 5, 22)), "May 22nd, 2024");
        assert_eq!(long_date(date(2024, 5, 23)), "May 23rd, 2024");
        assert_eq!(long_date(date(2024, 12, 31)), "December 31st, 2024");
    }

    #[test]
    fn missing_due_date_has_a_label() {
        assert_eq!(due_date_label(None), "No due date");
        assert_eq!(Task::default().fmt_due_date(), "No due date");
    }

    #[test]
    fn default_task_is_an_empty_low_priority_draft() {
        let task = Task::default();
        assert_eq!(task.title, "");
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::Low);
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
        assert_eq!("Medium".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!(" HIGH ".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(
            "urgent".parse::<Priority>(),
            Err(TaskError::UnknownPriority("urgent".to_string()))
        );
    }

    #[test]
    fn notices_carry_the_toast_text() {
        assert_eq!(Notice::Added.to_string(), "Task added successfully!");
        assert_eq!(Notice::Updated.to_string(), "Task updated successfully!");
        assert_eq!(Notice::Deleted.to_string(), "Task deleted successfully!");
    }

    #[test]
    fn no_such_task_reports_one_based_positions() {
        let err = TaskError::NoSuchTask { index: 3, len: 2 };
        assert_eq!(err.to_string(), "no task at position 4 (the list has 2 tasks)");
    }
}
