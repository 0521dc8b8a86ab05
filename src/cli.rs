use chrono::{Days, NaiveDate};
use humantime::parse_duration;
use std::path::PathBuf;
use std::str::FromStr;
use structopt::clap;
use structopt::StructOpt;

use crate::model::{self, TaskError};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Debug, StructOpt)]
#[structopt(name = "TodoMaster", about = "Your personal task manager.")]
pub struct CommandLineArgs {
    /// Read session commands from a file instead of the terminal.
    #[structopt(parse(from_os_str), short, long)]
    pub script: Option<PathBuf>,

    /// Wrap task descriptions at this many columns.
    #[structopt(short, long, default_value = "60")]
    pub width: usize,

    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[structopt(short, long, parse(from_occurrences))]
    pub verbose: u8,
}

/// One line typed during a session.
#[derive(Debug, PartialEq, StructOpt)]
#[structopt(name = "todomaster", about = "Session commands, one per line.")]
pub enum Action {
    /// Set the title of the task in the form, taken as typed.
    Title {
        #[structopt(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// Set the description of the task in the form, taken as typed.
    #[structopt(alias = "desc")]
    Description {
        #[structopt(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// Set the due date: YYYY-MM-DD, today, tomorrow, +<duration> (e.g. +3days) or none.
    Due {
        #[structopt()]
        when: DueDate,
    },
    /// Set the priority: low, medium or high.
    Priority {
        #[structopt()]
        level: model::Priority,
    },
    /// Add the task in the form, or save it if it is being edited.
    Submit,
    /// Load the task at a position into the form.
    Edit {
        #[structopt()]
        position: usize,
    },
    /// Delete the task at a position.
    #[structopt(alias = "rm")]
    Delete {
        #[structopt()]
        position: usize,
    },
    /// Show the form and the task list.
    Show,
    /// End the session.
    #[structopt(alias = "exit")]
    Quit,
}

/// A due date as typed by the user, resolved against the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDate {
    Clear,
    On(NaiveDate),
    DaysFromToday(u64),
}

impl DueDate {
    pub fn resolve(self, today: NaiveDate) -> Result<Option<NaiveDate>, TaskError> {
        match self {
            DueDate::Clear => Ok(None),
            DueDate::On(date) => Ok(Some(date)),
            DueDate::DaysFromToday(days) => today
                .checked_add_days(Days::new(days))
                .map(Some)
                .ok_or_else(|| TaskError::InvalidDueDate(format!("+{}days", days))),
        }
    }
}

impl FromStr for DueDate {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TaskError::InvalidDueDate(s.to_string());
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "clear" => Ok(DueDate::Clear),
            "today" => Ok(DueDate::DaysFromToday(0)),
            "tomorrow" => Ok(DueDate::DaysFromToday(1)),
            relative if relative.starts_with('+') => {
                let duration = parse_duration(&relative[1..]).map_err(|_| invalid())?;
                // only whole days make sense for a date
                if duration.as_secs() % SECONDS_PER_DAY != 0 || duration.subsec_nanos() != 0 {
                    return Err(invalid());
                }
                Ok(DueDate::DaysFromToday(duration.as_secs() / SECONDS_PER_DAY))
            }
            absolute => NaiveDate::parse_from_str(absolute, "%Y-%m-%d")
                .map(DueDate::On)
                .map_err(|_| invalid()),
        }
    }
}

/// Parse a session line into an action. Blank lines and `#` comments
/// yield `None`.
pub fn parse_line(line: &str) -> Option<Result<Action, clap::Error>> {
    let line = line.trim_start();
    if line.trim_end().is_empty() || line.starts_with('#') {
        return None;
    }

    let (command, rest) = match line.find(char::is_whitespace) {
        Some(at) => (&line[..at], &line[at..]),
        None => (line, ""),
    };
    // free text never goes through clap: it would eat leading dashes and
    // collapse runs of spaces
    let text = || free_text(rest);
    match command {
        "title" => return Some(Ok(Action::Title { text: text() })),
        "description" | "desc" => return Some(Ok(Action::Description { text: text() })),
        _ => {}
    }

    let words = std::iter::once("todomaster").chain(line.split_whitespace());
    Some(Action::from_iter_safe(words))
}

/// The text after the command word, minus the one separator that ends it.
fn free_text(rest: &str) -> String {
    let mut chars = rest.chars();
    match chars.next() {
        Some(separator) if separator.is_whitespace() => chars.as_str().to_string(),
        _ => rest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parse(line: &str) -> Action {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn due_dates_parse_in_every_form() {
        let today = date(2024, 4, 5);
        let resolve = |s: &str| s.parse::<DueDate>().unwrap().resolve(today).unwrap();

        assert_eq!(resolve("none"), None);
        assert_eq!(resolve("today"), Some(today));
        assert_eq!(resolve("Tomorrow"), Some(date(2024, 4, 6)));
        assert_eq!(resolve("+3days"), Some(date(2024, 4, 8)));
        assert_eq!(resolve("+1week"), Some(date(2024, 4, 12)));
        assert_eq!(resolve("2024-12-25"), Some(date(2024, 12, 25)));
    }

    #[test]
    fn malformed_due_dates_are_rejected() {
        for input in &["soon", "+36h", "+", "2024-13-01", "05/04/2024"] {
            assert_eq!(
                input.parse::<DueDate>(),
                Err(TaskError::InvalidDueDate(input.to_string())),
                "{} should not parse",
                input
            );
        }
    }

    #[test]
    fn free_text_is_kept_as_typed() {
        assert_eq!(
            parse("title Buy   2  eggs "),
            Action::Title {
                text: "Buy   2  eggs ".to_string()
            }
        );
        assert_eq!(
            parse("desc"),
            Action::Description {
                text: String::new()
            }
        );
    }

    #[test]
    fn free_text_may_start_with_dashes() {
        assert_eq!(
            parse("title -5C outside"),
            Action::Title {
                text: "-5C outside".to_string()
            }
        );
        assert_eq!(
            parse("desc --urgent call bank"),
            Action::Description {
                text: "--urgent call bank".to_string()
            }
        );
        assert_eq!(
            parse("description -"),
            Action::Description {
                text: "-".to_string()
            }
        );
    }

    #[test]
    fn commands_and_aliases() {
        assert_eq!(parse("submit"), Action::Submit);
        assert_eq!(parse("edit 2"), Action::Edit { position: 2 });
        assert_eq!(parse("rm 1"), Action::Delete { position: 1 });
        assert_eq!(parse("exit"), Action::Quit);
        assert_eq!(
            parse("priority HIGH"),
            Action::Priority {
                level: Priority::High
            }
        );
        assert_eq!(
            parse("due 2024-04-05"),
            Action::Due {
                when: DueDate::On(date(2024, 4, 5))
            }
        );
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("# a comment").is_none());
    }

    #[test]
    fn unknown_commands_are_errors() {
        assert!(parse_line("frobnicate").unwrap().is_err());
        assert!(parse_line("edit two").unwrap().is_err());
        assert!(parse_line("priority urgent").unwrap().is_err());
    }
}
