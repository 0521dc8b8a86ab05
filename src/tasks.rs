use crate::model::{Task, TaskError, TaskId};

/// An entry of the task list: the task plus the id it was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: TaskId,
    pub task: Task,
}

/// The ordered list of tasks. Insertion order is display order, and
/// positions close up when a task is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    entries: Vec<Entry>,
    next_id: u32,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task at the end of the list and return its new id.
    pub fn append(&mut self, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, task });
        id
    }

    /// Overwrite the task at `index` wholesale, keeping its id. Returns the
    /// task that was there before.
    pub fn replace_at(&mut self, index: usize, task: Task) -> Result<Task, TaskError> {
        let len = self.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(TaskError::NoSuchTask { index, len })?;
        Ok(std::mem::replace(&mut entry.task, task))
    }

    /// Remove the task at `index`, shifting every later task one position
    /// to the left.
    pub fn remove_at(&mut self, index: usize) -> Result<Task, TaskError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index).task)
    }

    /// The entry at `index`, or `NoSuchTask` when out of range.
    pub fn entry(&self, index: usize) -> Result<&Entry, TaskError> {
        self.check_index(index)?;
        Ok(&self.entries[index])
    }

    /// Current position of the task created with `id`, if it still exists.
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// The tasks in display order, without their ids.
    pub fn tasks(&self) -> Vec<Task> {
        self.entries.iter().map(|entry| entry.task.clone()).collect()
    }

    fn check_index(&self, index: usize) -> Result<(), TaskError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(TaskError::NoSuchTask {
                index,
                len: self.len(),
            })
        }
    }
}
