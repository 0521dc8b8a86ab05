use chrono::NaiveDate;
use std::rc::Rc;
use tracing::debug;

use crate::model::{Field, Notice, Priority, Task, TaskError, TaskId};
use crate::tasks::TaskList;

/// Everything the view needs: the draft in the form, the entry it will
/// overwrite (if any), and the task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    draft: Task,
    editing: Option<TaskId>,
    tasks: TaskList,
}

impl State {
    pub fn draft(&self) -> &Task {
        &self.draft
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Position of the task being edited. Derived from its id, so it follows
    /// the task when earlier ones are deleted.
    pub fn editing_index(&self) -> Option<usize> {
        self.editing.and_then(|id| self.tasks.position_of(id))
    }

    pub fn is_editing(&self) -> bool {
        self.editing_index().is_some()
    }
}

/// Called with every published snapshot and the notice, if any, the
/// transition produced.
pub type Subscriber = Box<dyn FnMut(&Rc<State>, Option<Notice>)>;

/// Owner of the application state. Every transition builds a new snapshot
/// and publishes it to the subscribers; snapshots already handed out are
/// never modified.
pub struct Store {
    state: Rc<State>,
    subscribers: Vec<Subscriber>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Store {
            state: Rc::new(State::default()),
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&Rc<State>, Option<Notice>) + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn snapshot(&self) -> Rc<State> {
        Rc::clone(&self.state)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn editing_index(&self) -> Option<usize> {
        self.state.editing_index()
    }

    /// Overwrite one text field of the draft.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *Rc::make_mut(&mut self.state).draft.field_mut(field) = value.into();
        self.publish(None);
    }

    /// Set or clear the draft due date.
    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        Rc::make_mut(&mut self.state).draft.due_date = due_date;
        self.publish(None);
    }

    pub fn set_priority(&mut self, priority: Priority) {
        Rc::make_mut(&mut self.state).draft.priority = priority;
        self.publish(None);
    }

    /// Commit the draft: overwrite the task being edited, or append a new
    /// one when not editing. The draft is reset either way. No validation
    /// is done, an empty title is committed like any other.
    pub fn submit(&mut self) -> Result<Notice, TaskError> {
        let state = Rc::make_mut(&mut self.state);
        let notice = match state.editing_index() {
            Some(index) => {
                state.tasks.replace_at(index, state.draft.clone())?;
                debug!(position = index + 1, "task updated");
                Notice::Updated
            }
            None => {
                let id = state.tasks.append(state.draft.clone());
                debug!(%id, position = state.tasks.len(), "task added");
                Notice::Added
            }
        };
        state.editing = None;
        state.draft = Task::default();
        self.publish(Some(notice));
        Ok(notice)
    }

    /// Copy the task at `index` into the draft and mark it as the one the
    /// next submit overwrites.
    pub fn load_for_editing(&mut self, index: usize) -> Result<(), TaskError> {
        let entry = self.state.tasks.entry(index)?.clone();
        let state = Rc::make_mut(&mut self.state);
        state.draft = entry.task;
        state.editing = Some(entry.id);
        debug!(position = index + 1, id = %entry.id, "task loaded for editing");
        self.publish(None);
        Ok(())
    }

    /// Delete the task at `index`. If it was being edited, the draft stays
    /// in the form but a submit will now add it as a new task.
    pub fn remove_at(&mut self, index: usize) -> Result<Task, TaskError> {
        let id = self.state.tasks.entry(index)?.id;
        let state = Rc::make_mut(&mut self.state);
        let removed = state.tasks.remove_at(index)?;
        if state.editing == Some(id) {
            state.editing = None;
            debug!(%id, "deleted the task being edited, editing cancelled");
        }
        debug!(position = index + 1, %id, "task deleted");
        self.publish(Some(Notice::Deleted));
        Ok(removed)
    }

    /// Publish the current snapshot again, without a notice.
    pub fn refresh(&mut self) {
        self.publish(None);
    }

    fn publish(&mut self, notice: Option<Notice>) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber(&self.state, notice);
        }
    }
}
