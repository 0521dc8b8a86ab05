use anyhow::{Context, Result};
use chrono::NaiveDate;
use prettytable::{format, Table};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use structopt::clap::ErrorKind;
use textwrap::fill;
use tracing::{info, warn};

use crate::cli::{parse_line, Action};
use crate::model::{Field, Notice, Task, TaskError};
use crate::store::{State, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Column at which descriptions are wrapped.
    pub width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { width: 60 }
    }
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Render the whole screen: header, form and one card per task.
pub fn render(state: &State, options: &RenderOptions) -> String {
    let mut screen = String::from("TodoMaster\nYour personal task manager\n\n");
    screen.push_str(&form(state, options).to_string());
    screen.push('\n');

    if state.tasks().is_empty() {
        screen.push_str("No tasks yet.\n");
    }
    for (index, entry) in state.tasks().iter().enumerate() {
        let editing = state.editing_index() == Some(index);
        screen.push_str(&card(index + 1, &entry.task, editing, options).to_string());
    }
    screen
}

/// The form, showing the draft and the label of the submit control.
pub fn form(state: &State, options: &RenderOptions) -> Table {
    let draft = state.draft();
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row![bH2->"Add a New Task"]);
    table.add_row(row!["Title", placeholder(&draft.title, "Task Title")]);
    table.add_row(row![
        "Description",
        fill(&placeholder(&draft.description, "Task Description"), options.width)
    ]);
    table.add_row(row!["Due Date", draft.fmt_due_date()]);
    table.add_row(row!["Priority", draft.priority]);
    table.add_row(row![H2->format!("[{}]", submit_label(state))]);
    table
}

/// A task card. `position` is 1-based, as typed in `edit` and `delete`.
pub fn card(position: usize, task: &Task, editing: bool, options: &RenderOptions) -> Table {
    let mut title = format!("{}. {}", position, task.title);
    if editing {
        title.push_str(" (editing)");
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row![bH2->title]);
    table.add_row(row![H2->fill(&task.description, options.width)]);
    table.add_row(row!["Due Date:", task.fmt_due_date()]);
    table.add_row(row!["Priority:", task.priority]);
    table.add_row(row![
        format!("[Edit {}]", position),
        format!("[Delete {}]", position)
    ]);
    table
}

pub fn submit_label(state: &State) -> &'static str {
    if state.is_editing() {
        "Update Task"
    } else {
        "Add Task"
    }
}

pub fn toast(notice: Notice) -> String {
    format!("==> {}", notice)
}

fn placeholder(value: &str, hint: &str) -> String {
    if value.is_empty() {
        format!("({})", hint)
    } else {
        value.to_string()
    }
}

/// A subscriber drawing published snapshots to `out`. Draft edits redraw
/// only the form; anything touching the list, the editing mode or an
/// explicit refresh redraws the whole screen.
pub fn console_view<W>(
    out: Rc<RefCell<W>>,
    options: RenderOptions,
) -> impl FnMut(&Rc<State>, Option<Notice>)
where
    W: Write + 'static,
{
    let mut last: Option<Rc<State>> = None;
    move |state: &Rc<State>, notice: Option<Notice>| {
        let only_draft_changed = match &last {
            Some(previous) => {
                !Rc::ptr_eq(previous, state)
                    && previous.tasks() == state.tasks()
                    && previous.editing_index() == state.editing_index()
            }
            None => false,
        };

        let mut text = String::new();
        if let Some(notice) = notice {
            text.push_str(&toast(notice));
            text.push('\n');
        }
        if only_draft_changed && notice.is_none() {
            text.push_str(&form(state, &options).to_string());
        } else {
            text.push_str(&render(state, &options));
        }

        let mut out = out.borrow_mut();
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            warn!(%err, "failed to draw the view");
        }
        last = Some(Rc::clone(state));
    }
}

/// Apply one action to the store. `today` anchors relative due dates.
pub fn execute(store: &mut Store, action: Action, today: NaiveDate) -> Result<Flow, TaskError> {
    match action {
        Action::Title { text } => store.set_field(Field::Title, text),
        Action::Description { text } => store.set_field(Field::Description, text),
        Action::Due { when } => store.set_due_date(when.resolve(today)?),
        Action::Priority { level } => store.set_priority(level),
        Action::Submit => {
            store.submit()?;
        }
        Action::Edit { position } => store.load_for_editing(index_of(position)?)?,
        Action::Delete { position } => {
            store.remove_at(index_of(position)?)?;
        }
        Action::Show => store.refresh(),
        Action::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn index_of(position: usize) -> Result<usize, TaskError> {
    position.checked_sub(1).ok_or(TaskError::InvalidPosition)
}

/// Read commands from `input` until it is exhausted or the user quits.
/// Failed commands are reported on `out` and the session goes on.
pub fn run_session<R, W, C>(
    store: &mut Store,
    input: R,
    out: &mut W,
    interactive: bool,
    today: C,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    C: Fn() -> NaiveDate,
{
    info!(interactive, "session started");
    store.refresh();
    prompt(out, interactive)?;

    for line in input.lines() {
        let line = line.context("Failed to read session input.")?;
        match parse_line(&line) {
            None => {}
            Some(Err(err)) => {
                if err.kind != ErrorKind::HelpDisplayed {
                    warn!(line = line.as_str(), "could not parse command");
                }
                writeln!(out, "{}", err.message).context("Failed to write to the terminal.")?;
            }
            Some(Ok(action)) => match execute(store, action, today()) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    warn!(%err, "command failed");
                    writeln!(out, "error: {}", err).context("Failed to write to the terminal.")?;
                }
            },
        }
        prompt(out, interactive)?;
    }

    info!(tasks = store.state().tasks().len(), "session ended");
    Ok(())
}

fn prompt<W: Write>(out: &mut W, interactive: bool) -> Result<()> {
    if interactive {
        write!(out, "> ")
            .and_then(|_| out.flush())
            .context("Failed to write to the terminal.")?;
    }
    Ok(())
}
